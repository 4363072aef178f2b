//! Error taxonomy (spec §7).
//!
//! Two levels mirror RFC 9113: codec-internal errors (this module) and the
//! stream/connection classification the driver maps them onto.

use thiserror::Error;

/// HPACK integer codec failures (RFC 7541 §5.1).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum IntegerError {
    #[error("integer decode needs more input")]
    Incomplete,
    #[error("integer exceeds the 2^30 compression-bomb guard")]
    TooLarge,
}

/// Huffman codec failures (RFC 7541 §5.2).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HuffmanError {
    #[error("huffman bitstream ended mid-code")]
    Incomplete,
    #[error("huffman padding was not a proper EOS prefix")]
    InvalidPadding,
    #[error("huffman bitstream decoded a literal EOS symbol")]
    UnexpectedEos,
}

/// HPACK decoder/encoder failures (RFC 7541 §6).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HpackError {
    #[error("integer codec error: {0}")]
    Integer(#[from] IntegerError),
    #[error("huffman codec error: {0}")]
    Huffman(#[from] HuffmanError),
    #[error("header block index {0} is invalid")]
    InvalidIndex(usize),
    #[error("header block has no complete representation at this position")]
    InvalidEncoding,
    #[error("header string is malformed")]
    InvalidString,
    #[error("decoded header list exceeds max_header_list_size ({limit} bytes)")]
    HeaderTooLarge { limit: usize },
    #[error("header block ended with an incomplete representation")]
    IncompleteData,
    #[error("dynamic table size update must precede all header field representations")]
    SizeUpdateNotAtStart,
    #[error("dynamic table size update {requested} exceeds negotiated limit {limit}")]
    SizeUpdateExceedsLimit { requested: usize, limit: usize },
}

/// Frame codec failures (RFC 9113 §4, §6).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("need {needed} more bytes to parse this frame")]
    Incomplete { needed: usize },
    #[error("frame length {length} exceeds the local MAX_FRAME_SIZE ({max})")]
    InvalidFrameSize { length: u32, max: u32 },
    #[error("frame of type {frame_type:#x} has invalid stream id {stream_id}")]
    InvalidStreamID { frame_type: u8, stream_id: u32 },
    #[error("SETTINGS parameter {id} has invalid value {value}")]
    InvalidSetting { id: u16, value: u32 },
    #[error("WINDOW_UPDATE increment {0} is invalid")]
    InvalidWindowSize(u32),
    #[error("padding length {pad_length} is not less than the payload length {payload_length}")]
    InvalidPadding {
        pad_length: usize,
        payload_length: usize,
    },
    #[error("malformed frame payload: {0}")]
    Malformed(&'static str),
}

/// Stream-level errors (recoverable; end one stream via RST_STREAM).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StreamError {
    #[error("frame received on a stream that is already closed")]
    StreamClosed,
    #[error("new stream refused: local concurrency limit reached")]
    RefusedStream,
    #[error("stream cancelled")]
    Cancel,
    #[error("stream-level flow-control window violation")]
    FlowControlError,
    #[error("HPACK decode failure limited to one stream's header block")]
    CompressionError,
    #[error("stream-level protocol violation (e.g. self-dependent PRIORITY)")]
    ProtocolError,
}

impl StreamError {
    pub fn error_code(self) -> u32 {
        use crate::frame::error_code;
        match self {
            StreamError::StreamClosed => error_code::STREAM_CLOSED,
            StreamError::RefusedStream => error_code::REFUSED_STREAM,
            StreamError::Cancel => error_code::CANCEL,
            StreamError::FlowControlError => error_code::FLOW_CONTROL_ERROR,
            StreamError::CompressionError => error_code::COMPRESSION_ERROR,
            StreamError::ProtocolError => error_code::PROTOCOL_ERROR,
        }
    }
}

/// Connection-level errors (fatal; end the connection via GOAWAY).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("protocol error: {0}")]
    ProtocolError(&'static str),
    #[error("frame size error: {0}")]
    FrameSizeError(&'static str),
    #[error("connection-level flow-control error: {0}")]
    FlowControlError(&'static str),
    #[error("HPACK compression error: {0}")]
    CompressionError(&'static str),
    #[error("settings acknowledgment timed out")]
    SettingsTimeout,
    #[error("connection preface did not match the expected 24-byte sequence")]
    PrefaceInvalid,
}

impl ConnectionError {
    pub fn error_code(&self) -> u32 {
        use crate::frame::error_code;
        match self {
            ConnectionError::ProtocolError(_) => error_code::PROTOCOL_ERROR,
            ConnectionError::FrameSizeError(_) => error_code::FRAME_SIZE_ERROR,
            ConnectionError::FlowControlError(_) => error_code::FLOW_CONTROL_ERROR,
            ConnectionError::CompressionError(_) => error_code::COMPRESSION_ERROR,
            ConnectionError::SettingsTimeout => error_code::SETTINGS_TIMEOUT,
            ConnectionError::PrefaceInvalid => error_code::PROTOCOL_ERROR,
        }
    }
}

/// Top-level error returned by the driver's public entry points.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Http2Error {
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error(transparent)]
    Hpack(#[from] HpackError),
    #[error("stream {stream_id} error: {source}")]
    Stream { stream_id: u32, source: StreamError },
    #[error(transparent)]
    Connection(#[from] ConnectionError),
}

impl From<HpackError> for ConnectionError {
    fn from(e: HpackError) -> Self {
        // Any HPACK decode failure corrupts the dynamic table for all
        // subsequent header blocks, so it is always a connection error
        // (spec §5 ordering guarantees; RFC 9113 §4.3).
        ConnectionError::CompressionError(match e {
            HpackError::InvalidIndex(_) => "invalid HPACK index",
            HpackError::InvalidEncoding => "invalid HPACK representation",
            HpackError::InvalidString => "invalid HPACK string literal",
            HpackError::HeaderTooLarge { .. } => "header list exceeds max_header_list_size",
            HpackError::IncompleteData => "truncated HPACK header block",
            HpackError::SizeUpdateNotAtStart => "dynamic table size update out of position",
            HpackError::SizeUpdateExceedsLimit { .. } => "dynamic table size update too large",
            HpackError::Integer(_) => "invalid HPACK integer",
            HpackError::Huffman(_) => "invalid Huffman string",
        })
    }
}
