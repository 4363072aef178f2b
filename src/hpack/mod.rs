//! HPACK header compression (RFC 7541): integer codec, Huffman codec,
//! static/dynamic tables, and the encoder/decoder built on top of them.

mod decoder;
mod dynamic_table;
mod encoder;
pub mod huffman;
pub mod int_codec;
pub mod static_table;

pub use decoder::HpackDecoder;
pub use dynamic_table::{DynamicTable, ENTRY_OVERHEAD};
pub use encoder::HpackEncoder;

/// A single decoded or to-be-encoded header field.
///
/// `sensitive` headers (e.g. `authorization`, `cookie` fragments) are always
/// encoded as "never indexed" literals regardless of table state, per RFC
/// 7541 §7.1 — this mirrors how a caller above HPACK (not this module) would
/// mark credentials, so the flag defaults to `false` and must be set
/// explicitly by callers that classify a header as sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
    pub sensitive: bool,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Header {
            name: name.into(),
            value: value.into(),
            sensitive: false,
        }
    }

    pub fn sensitive(name: impl Into<String>, value: impl Into<String>) -> Self {
        Header {
            name: name.into(),
            value: value.into(),
            sensitive: true,
        }
    }
}
