//! Per-stream state machine and flow-control window (RFC 9113 §5.1, §6.9).

use crate::error::StreamError;
use crate::frame::Priority;
use crate::hpack::Header;

/// A stream's position in the RFC 9113 §5.1 state diagram. `ReservedLocal`
/// and `ReservedRemote` exist for server push, which this crate never
/// initiates but still must recognize if a future embedder layer does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStateKind {
    Idle,
    ReservedLocal,
    ReservedRemote,
    Open,
    HalfClosedLocal,
    HalfClosedRemote,
    Closed,
}

/// One HTTP/2 stream: its state, accumulated header/body data, and its
/// local flow-control window.
#[derive(Debug, Clone)]
pub struct Stream {
    pub id: u32,
    pub state: StreamStateKind,
    /// Signed per RFC 9113 §6.9.1: a sequence of SETTINGS changes can drive
    /// it negative even though WINDOW_UPDATE increments are always positive.
    pub send_window: i64,
    pub recv_window: i64,
    pub headers: Vec<Header>,
    pub body: Vec<u8>,
    pub end_stream_received: bool,
    /// Stored weight is the wire byte (weight - 1); `priority_weight()` gives
    /// the effective 1..=256 value. Defaults to the RFC 9113 §5.3.2 default
    /// (stored 15, effective 16, non-exclusive, depends on stream 0).
    pub priority_weight: u8,
    pub depends_on: u32,
    pub exclusive: bool,
    /// Response body bytes queued by `Connection::encode_response` but not
    /// yet emitted as DATA frames because the send window ran out.
    pub outbound_body: Vec<u8>,
    /// Whether the queued `outbound_body`, once fully flushed, should carry
    /// END_STREAM on its final DATA frame.
    pub outbound_end_stream: bool,
}

impl Stream {
    pub fn new(id: u32, initial_send_window: u32, initial_recv_window: u32) -> Self {
        Stream {
            id,
            state: StreamStateKind::Idle,
            send_window: initial_send_window as i64,
            recv_window: initial_recv_window as i64,
            headers: Vec::new(),
            body: Vec::new(),
            end_stream_received: false,
            priority_weight: 15,
            depends_on: 0,
            exclusive: false,
            outbound_body: Vec::new(),
            outbound_end_stream: false,
        }
    }

    /// Effective weight (RFC 9113 §5.3.2: the wire byte is weight - 1).
    pub fn priority_weight_effective(&self) -> u16 {
        self.priority_weight as u16 + 1
    }

    /// Record a PRIORITY specification (from a PRIORITY frame or a HEADERS
    /// frame's PRIORITY flag). Rejects self-dependency per RFC 9113 §5.3.1 —
    /// scheduling on the recorded value is out of scope (spec §1 Non-goals).
    pub fn set_priority(&mut self, priority: Priority) -> Result<(), StreamError> {
        if priority.stream_dependency == self.id {
            return Err(StreamError::ProtocolError);
        }
        self.depends_on = priority.stream_dependency;
        self.exclusive = priority.exclusive;
        self.priority_weight = priority.weight;
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, StreamStateKind::Closed)
    }

    /// Transition on receiving a HEADERS frame. `end_stream` is the frame's
    /// END_STREAM flag.
    pub fn on_recv_headers(&mut self, end_stream: bool) -> Result<(), StreamError> {
        match self.state {
            StreamStateKind::Idle => {
                self.state = if end_stream {
                    StreamStateKind::HalfClosedRemote
                } else {
                    StreamStateKind::Open
                };
                Ok(())
            }
            StreamStateKind::HalfClosedLocal if !self.end_stream_received => {
                if end_stream {
                    self.state = StreamStateKind::Closed;
                }
                Ok(())
            }
            StreamStateKind::Open if end_stream => {
                self.state = StreamStateKind::HalfClosedRemote;
                Ok(())
            }
            StreamStateKind::Open => Ok(()),
            StreamStateKind::Closed => Err(StreamError::StreamClosed),
            _ => Err(StreamError::StreamClosed),
        }
    }

    /// Transition on receiving a DATA frame.
    pub fn on_recv_data(&mut self, end_stream: bool) -> Result<(), StreamError> {
        match self.state {
            StreamStateKind::Open => {
                if end_stream {
                    self.state = StreamStateKind::HalfClosedRemote;
                }
                Ok(())
            }
            StreamStateKind::HalfClosedLocal => {
                if end_stream {
                    self.state = StreamStateKind::Closed;
                }
                Ok(())
            }
            StreamStateKind::Closed | StreamStateKind::HalfClosedRemote => {
                Err(StreamError::StreamClosed)
            }
            _ => Err(StreamError::StreamClosed),
        }
    }

    /// Transition when the local side finishes sending its response
    /// (END_STREAM on an outbound HEADERS or DATA frame).
    pub fn on_send_end_stream(&mut self) {
        self.state = match self.state {
            StreamStateKind::Open => StreamStateKind::HalfClosedLocal,
            StreamStateKind::HalfClosedRemote => StreamStateKind::Closed,
            other => other,
        };
    }

    pub fn reset(&mut self) {
        self.state = StreamStateKind::Closed;
    }

    /// Apply a WINDOW_UPDATE increment to the send window, checking for the
    /// RFC 9113 §6.9.1 overflow guard (window must never exceed 2^31 - 1).
    pub fn increase_send_window(&mut self, increment: u32) -> Result<(), StreamError> {
        self.send_window += increment as i64;
        if self.send_window > i32::MAX as i64 {
            return Err(StreamError::FlowControlError);
        }
        Ok(())
    }

    /// Debit the send window after emitting `n` bytes of DATA.
    pub fn consume_send_window(&mut self, n: u32) {
        self.send_window -= n as i64;
    }

    /// Debit the recv window after accepting `n` bytes of DATA, rejecting
    /// if the peer sent more than the window allowed.
    pub fn consume_recv_window(&mut self, n: u32) -> Result<(), StreamError> {
        self.recv_window -= n as i64;
        if self.recv_window < 0 {
            return Err(StreamError::FlowControlError);
        }
        Ok(())
    }

    pub fn replenish_recv_window(&mut self, n: u32) {
        self.recv_window += n as i64;
    }
}
