//! h2-core: a sans-I/O HTTP/2 server-side protocol engine.
//!
//! This crate provides the frame codec, HPACK header compression, and the
//! connection/stream state machines behind an HTTP/2 server. It performs no
//! I/O of its own: the embedder feeds it transport bytes and drains the
//! bytes it queues in return.
//!
//! # Scope
//!
//! - **Sans-I/O**: no sockets, no TLS, no async runtime. [`Connection`]
//!   exposes `feed_bytes` / `drain_outbound`; everything else (the socket
//!   loop, ALPN negotiation, the read ring buffer) is the embedder's job.
//! - **RFC 9113 frame codec**: all ten frame types, with the common 9-byte
//!   header.
//! - **RFC 7541 HPACK**: integer codec, Huffman codec, static + dynamic
//!   tables, encoder and decoder.
//! - **Flow control**: connection- and stream-level windows, tracked as
//!   signed 32-bit counters per RFC 9113 §6.9.1.
//!
//! Server push generation, priority-based DATA scheduling, HTTP/1.1 upgrade,
//! and trailers beyond a HEADERS-after-DATA with END_STREAM are out of
//! scope; see `DESIGN.md` for the reasoning.
//!
//! # Quick start
//!
//! ```
//! use h2_core::{Config, Connection};
//!
//! let mut conn = Connection::new(Config::default());
//! let events = conn.feed_bytes(h2_core::CONNECTION_PREFACE).unwrap();
//! assert!(events.is_empty());
//! // The driver has buffered the preface and is waiting for the peer's
//! // first SETTINGS frame before reaching the Active state.
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod frame;
pub mod hpack;
pub mod settings;
pub mod stream;

pub use config::Config;
pub use connection::{Connection, ConnectionState, Event, Request, Response};
pub use error::{ConnectionError, FrameError, HpackError, Http2Error, StreamError};
pub use frame::{error_code, flags, frame_type, settings_id, Frame, FrameHeader, CONNECTION_PREFACE};
pub use hpack::{Header, HpackDecoder, HpackEncoder};
pub use settings::{Settings, SettingsContext};
pub use stream::{Stream, StreamStateKind};
