//! Connection driver (RFC 9113 §3–§6): preface, SETTINGS handshake,
//! CONTINUATION reassembly, frame dispatch, flow control, and the
//! request/response surface handed to the embedder.
//!
//! This is a sans-I/O state machine: `feed_bytes` consumes transport bytes
//! and returns application [`Event`]s; `drain_outbound` hands the caller
//! whatever frames the driver queued in response. No socket, thread, or
//! timer ever appears below this module.

use std::collections::HashMap;

use crate::config::Config;
use crate::error::{ConnectionError, Http2Error};
use crate::frame::{
    self, error_code, frame_type, settings_id, write_frame, Frame, FrameHeader, Priority,
};
use crate::hpack::{Header, HpackDecoder, HpackEncoder};
use crate::settings::{Settings, SettingsContext};
use crate::stream::{Stream, StreamStateKind};

/// Default connection-level flow-control window (RFC 9113 §6.9.2). Unlike
/// the per-stream window, this is never altered by SETTINGS_INITIAL_WINDOW_SIZE
/// — only WINDOW_UPDATE on stream 0 changes it.
const DEFAULT_CONNECTION_WINDOW: i64 = 65_535;

/// Where a `Connection` sits in the RFC 9113 §3.4–§6.8 lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    WaitingPreface,
    WaitingSettings,
    Active,
    GoingAway,
    Closed,
}

/// An assembled request: the pseudo-headers the driver recognizes, split
/// out from the rest of the header list, plus the accumulated body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub stream_id: u32,
    pub method: String,
    pub path: String,
    pub authority: Option<String>,
    pub scheme: Option<String>,
    pub headers: Vec<Header>,
    pub body: Vec<u8>,
}

/// What `on_request` hands back; the driver HPACK-encodes this into
/// HEADERS/CONTINUATION/DATA frames (§6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// The sans-I/O output of `feed_bytes` (§6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    RequestReady(Request),
    StreamClosed {
        stream_id: u32,
        error_code: Option<u32>,
    },
    ConnectionClosed {
        error_code: Option<u32>,
    },
}

/// CONTINUATION reassembly sub-state (§4.9): a HEADERS or PUSH_PROMISE
/// without END_HEADERS leaves the connection expecting only CONTINUATION
/// frames for this stream id until the block is complete.
struct ContinuationState {
    stream_id: u32,
    buffer: Vec<u8>,
    end_stream: bool,
}

/// How a frame-handling failure should be classified and surfaced: a
/// `RST_STREAM` for one stream, or a `GOAWAY` for the whole connection.
enum Fault {
    Connection(ConnectionError),
    Stream { stream_id: u32, error_code: u32 },
}

/// The per-connection state machine: stream map, both flow-control
/// directions, SETTINGS negotiation, HPACK codecs, and the outbound byte
/// buffer the transport drains.
pub struct Connection {
    config: Config,
    state: ConnectionState,
    settings: SettingsContext,
    streams: HashMap<u32, Stream>,
    last_peer_stream_id: u32,
    recv_window: i64,
    send_window: i64,
    hpack_decoder: HpackDecoder,
    hpack_encoder: HpackEncoder,
    inbound: Vec<u8>,
    outbound: Vec<u8>,
    continuation: Option<ContinuationState>,
    goaway_sent: bool,
    goaway_received: bool,
    error_code: Option<u32>,
}

impl Connection {
    pub fn new(config: Config) -> Self {
        let mut local = Settings::default();
        local.enable_push = false;
        local.max_concurrent_streams = Some(config.max_concurrent_streams);
        local.initial_window_size = config.initial_window_size;
        local.max_frame_size = config.max_frame_size;
        local.max_header_list_size = config.max_header_list_size;
        local.header_table_size = config.header_table_size;

        Connection {
            hpack_decoder: HpackDecoder::new(
                config.header_table_size as usize,
                config.max_header_list_size.map(|v| v as usize),
            ),
            hpack_encoder: HpackEncoder::new(Settings::default().header_table_size as usize),
            settings: SettingsContext::new(local),
            config,
            state: ConnectionState::WaitingPreface,
            streams: HashMap::new(),
            last_peer_stream_id: 0,
            recv_window: DEFAULT_CONNECTION_WINDOW,
            send_window: DEFAULT_CONNECTION_WINDOW,
            inbound: Vec::new(),
            outbound: Vec::new(),
            continuation: None,
            goaway_sent: false,
            goaway_received: false,
            error_code: None,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn stream(&self, stream_id: u32) -> Option<&Stream> {
        self.streams.get(&stream_id)
    }

    /// Take ownership of whatever frames the driver has queued, clearing
    /// the internal buffer. The transport is responsible for writing these
    /// bytes to the socket (§6).
    pub fn drain_outbound(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.outbound)
    }

    /// Feed newly-received transport bytes, returning the application
    /// events produced. A partial frame or preface is buffered internally
    /// and produces no event until the rest arrives.
    pub fn feed_bytes(&mut self, data: &[u8]) -> Result<Vec<Event>, Http2Error> {
        self.inbound.extend_from_slice(data);
        let mut events = Vec::new();

        loop {
            match self.state {
                ConnectionState::Closed => break,
                ConnectionState::WaitingPreface => {
                    if self.inbound.len() < frame::CONNECTION_PREFACE.len() {
                        break;
                    }
                    if self.inbound[..frame::CONNECTION_PREFACE.len()] != *frame::CONNECTION_PREFACE
                    {
                        log::warn!("connection preface did not match");
                        self.error_code = Some(error_code::PROTOCOL_ERROR);
                        self.close(&mut events);
                        break;
                    }
                    self.inbound.drain(..frame::CONNECTION_PREFACE.len());
                    self.state = ConnectionState::WaitingSettings;
                    log::debug!("preface accepted, waiting for peer SETTINGS");
                    self.send_local_settings();
                }
                _ => {
                    if self.inbound.len() < FrameHeader::SIZE {
                        break;
                    }
                    let header = FrameHeader::parse(&self.inbound).expect("length checked above");

                    if header.length > self.config.max_frame_size
                        && header.frame_type != frame_type::SETTINGS
                    {
                        self.fail_connection(
                            ConnectionError::FrameSizeError(
                                "frame length exceeds local MAX_FRAME_SIZE",
                            ),
                            &mut events,
                        );
                        break;
                    }

                    let total = header.total_size();
                    if self.inbound.len() < total {
                        break;
                    }
                    let payload: Vec<u8> = self.inbound[FrameHeader::SIZE..total].to_vec();
                    self.inbound.drain(..total);

                    if self.state == ConnectionState::WaitingSettings {
                        if header.frame_type != frame_type::SETTINGS || header.is_ack() {
                            self.fail_connection(
                                ConnectionError::ProtocolError(
                                    "first frame after the preface must be non-ACK SETTINGS",
                                ),
                                &mut events,
                            );
                            break;
                        }
                        self.state = ConnectionState::Active;
                    }

                    match self.dispatch(header, payload, &mut events) {
                        Ok(()) => {}
                        Err(Fault::Connection(e)) => {
                            self.fail_connection(e, &mut events);
                            break;
                        }
                        Err(Fault::Stream {
                            stream_id,
                            error_code,
                        }) => self.reset_stream(stream_id, error_code, &mut events),
                    }
                }
            }
        }

        Ok(events)
    }

    fn dispatch(
        &mut self,
        header: FrameHeader,
        payload: Vec<u8>,
        events: &mut Vec<Event>,
    ) -> Result<(), Fault> {
        let frame = match frame::parse_frame(&header, &payload) {
            Ok(frame) => frame,
            Err(e) => return Err(Self::classify_frame_error(&header, e)),
        };

        if let Some(cont) = &self.continuation {
            let matches_continuation =
                matches!(&frame, Frame::Continuation { stream_id, .. } if *stream_id == cont.stream_id);
            if !matches_continuation {
                return Err(Fault::Connection(ConnectionError::ProtocolError(
                    "a non-CONTINUATION frame (or one for a different stream) arrived while a header block was being reassembled",
                )));
            }
        }

        match frame {
            Frame::Data {
                stream_id,
                data,
                end_stream,
            } => self.on_data(stream_id, data, end_stream, header.length, events),
            Frame::Headers {
                stream_id,
                header_block,
                end_stream,
                end_headers,
                priority,
            } => self.on_headers(stream_id, header_block, end_stream, end_headers, priority, events),
            Frame::Priority {
                stream_id,
                priority,
            } => self.on_priority(stream_id, priority),
            Frame::RstStream {
                stream_id,
                error_code,
            } => self.on_rst_stream(stream_id, error_code, events),
            Frame::Settings { ack, params } => self.on_settings(ack, params),
            Frame::PushPromise { .. } => Err(Fault::Connection(ConnectionError::ProtocolError(
                "PUSH_PROMISE is never valid on a connection where this side never advertised server push",
            ))),
            Frame::Ping { ack, data } => self.on_ping(ack, data),
            Frame::GoAway {
                last_stream_id,
                error_code,
                ..
            } => self.on_goaway(last_stream_id, error_code, events),
            Frame::WindowUpdate {
                stream_id,
                increment,
            } => self.on_window_update(stream_id, increment),
            Frame::Continuation {
                stream_id,
                header_block,
                end_headers,
            } => self.on_continuation(stream_id, header_block, end_headers, events),
        }
    }

    fn classify_frame_error(header: &FrameHeader, e: crate::error::FrameError) -> Fault {
        use crate::error::FrameError;
        match e {
            FrameError::InvalidWindowSize(_) if header.stream_id != 0 => Fault::Stream {
                stream_id: header.stream_id,
                error_code: error_code::FLOW_CONTROL_ERROR,
            },
            FrameError::InvalidWindowSize(_) => Fault::Connection(ConnectionError::FlowControlError(
                "WINDOW_UPDATE increment was zero",
            )),
            FrameError::InvalidFrameSize { .. } => {
                Fault::Connection(ConnectionError::FrameSizeError("frame had an invalid fixed size"))
            }
            FrameError::InvalidStreamID { .. } => Fault::Connection(ConnectionError::ProtocolError(
                "frame type used with a disallowed stream id",
            )),
            FrameError::InvalidSetting { .. } => {
                Fault::Connection(ConnectionError::ProtocolError("malformed SETTINGS parameter"))
            }
            FrameError::InvalidPadding { .. } => {
                Fault::Connection(ConnectionError::ProtocolError("padding length exceeded frame payload"))
            }
            FrameError::Malformed(msg) => Fault::Connection(ConnectionError::ProtocolError(msg)),
            FrameError::Incomplete { .. } => {
                Fault::Connection(ConnectionError::ProtocolError("frame payload shorter than its header declared"))
            }
        }
    }

    fn on_data(
        &mut self,
        stream_id: u32,
        data: Vec<u8>,
        end_stream: bool,
        frame_length: u32,
        events: &mut Vec<Event>,
    ) -> Result<(), Fault> {
        // The whole DATA payload (including Pad Length and padding) counts
        // against flow control, not just the application bytes (RFC 9113 §6.9).
        let consumed = frame_length;
        self.recv_window -= consumed as i64;
        if self.recv_window < 0 {
            return Err(Fault::Connection(ConnectionError::FlowControlError(
                "connection recv window went negative",
            )));
        }

        let stream = self
            .streams
            .get_mut(&stream_id)
            .ok_or_else(|| Fault::Connection(ConnectionError::ProtocolError("DATA on an idle stream")))?;

        stream.on_recv_data(end_stream).map_err(|e| Fault::Stream {
            stream_id,
            error_code: e.error_code(),
        })?;
        stream.consume_recv_window(consumed).map_err(|e| Fault::Stream {
            stream_id,
            error_code: e.error_code(),
        })?;
        stream.body.extend_from_slice(&data);
        let closed_now = stream.is_closed();

        self.maybe_replenish_stream_window(stream_id);
        self.maybe_replenish_connection_window();

        if end_stream {
            self.emit_request_ready(stream_id, events);
        }
        if closed_now {
            events.push(Event::StreamClosed {
                stream_id,
                error_code: None,
            });
        }
        Ok(())
    }

    fn on_headers(
        &mut self,
        stream_id: u32,
        header_block: Vec<u8>,
        end_stream: bool,
        end_headers: bool,
        priority: Option<Priority>,
        events: &mut Vec<Event>,
    ) -> Result<(), Fault> {
        self.ensure_stream_for_headers(stream_id)?;

        if let Some(p) = priority {
            if let Some(stream) = self.streams.get_mut(&stream_id) {
                stream.set_priority(p).map_err(|e| Fault::Stream {
                    stream_id,
                    error_code: e.error_code(),
                })?;
            }
        }

        if !end_headers {
            if header_block.len() > self.config.max_header_block_size() {
                return Err(Fault::Connection(ConnectionError::CompressionError(
                    "header block exceeds the CONTINUATION accumulator cap",
                )));
            }
            self.continuation = Some(ContinuationState {
                stream_id,
                buffer: header_block,
                end_stream,
            });
            return Ok(());
        }

        self.finish_header_block(stream_id, header_block, end_stream, events)
    }

    /// Validate and register a newly-seen peer-initiated stream id (§4.9).
    /// A no-op if the stream already exists (e.g. a trailers HEADERS frame).
    fn ensure_stream_for_headers(&mut self, stream_id: u32) -> Result<(), Fault> {
        if self.streams.contains_key(&stream_id) {
            return Ok(());
        }
        if stream_id == 0 || stream_id % 2 == 0 {
            return Err(Fault::Connection(ConnectionError::ProtocolError(
                "client-initiated stream id must be odd and non-zero",
            )));
        }
        if stream_id <= self.last_peer_stream_id {
            return Err(Fault::Connection(ConnectionError::ProtocolError(
                "stream id did not strictly increase",
            )));
        }
        self.last_peer_stream_id = stream_id;

        let cap = self.settings.local.max_concurrent_streams.unwrap_or(u32::MAX);
        let active = self.streams.values().filter(|s| !s.is_closed()).count() as u32;
        if active >= cap {
            return Err(Fault::Stream {
                stream_id,
                error_code: error_code::REFUSED_STREAM,
            });
        }

        self.streams.insert(
            stream_id,
            Stream::new(
                stream_id,
                self.settings.remote.initial_window_size,
                self.settings.local.initial_window_size,
            ),
        );
        Ok(())
    }

    fn finish_header_block(
        &mut self,
        stream_id: u32,
        block: Vec<u8>,
        end_stream: bool,
        events: &mut Vec<Event>,
    ) -> Result<(), Fault> {
        let decoded = self
            .hpack_decoder
            .decode(&block)
            .map_err(|e| Fault::Connection(ConnectionError::from(e)))?;

        let stream = self.streams.get_mut(&stream_id).ok_or_else(|| {
            Fault::Connection(ConnectionError::ProtocolError("header block for an unknown stream"))
        })?;
        stream.on_recv_headers(end_stream).map_err(|e| Fault::Stream {
            stream_id,
            error_code: e.error_code(),
        })?;
        stream.headers.extend(decoded);
        let closed_now = stream.is_closed();

        if end_stream {
            self.emit_request_ready(stream_id, events);
        }
        if closed_now {
            events.push(Event::StreamClosed {
                stream_id,
                error_code: None,
            });
        }
        Ok(())
    }

    fn on_continuation(
        &mut self,
        stream_id: u32,
        fragment: Vec<u8>,
        end_headers: bool,
        events: &mut Vec<Event>,
    ) -> Result<(), Fault> {
        let cont = self
            .continuation
            .as_mut()
            .filter(|c| c.stream_id == stream_id)
            .ok_or_else(|| {
                Fault::Connection(ConnectionError::ProtocolError("unexpected CONTINUATION frame"))
            })?;
        cont.buffer.extend_from_slice(&fragment);
        if cont.buffer.len() > self.config.max_header_block_size() {
            self.continuation = None;
            return Err(Fault::Connection(ConnectionError::CompressionError(
                "CONTINUATION accumulator exceeded its configured cap",
            )));
        }
        if !end_headers {
            return Ok(());
        }
        let ContinuationState {
            stream_id,
            buffer,
            end_stream,
        } = self.continuation.take().expect("checked Some above");
        self.finish_header_block(stream_id, buffer, end_stream, events)
    }

    fn on_priority(&mut self, stream_id: u32, priority: Priority) -> Result<(), Fault> {
        // PRIORITY is valid in any stream state, including for streams this
        // connection never created (RFC 9113 §5.3); with no stored stream
        // there is nothing to update, and that's fine — scheduling on the
        // value is out of scope (spec §1 Non-goals) either way.
        if let Some(stream) = self.streams.get_mut(&stream_id) {
            stream.set_priority(priority).map_err(|e| Fault::Stream {
                stream_id,
                error_code: e.error_code(),
            })?;
        }
        Ok(())
    }

    fn on_rst_stream(
        &mut self,
        stream_id: u32,
        error_code: u32,
        events: &mut Vec<Event>,
    ) -> Result<(), Fault> {
        if let Some(stream) = self.streams.get_mut(&stream_id) {
            stream.reset();
        }
        events.push(Event::StreamClosed {
            stream_id,
            error_code: Some(error_code),
        });
        Ok(())
    }

    fn on_settings(&mut self, ack: bool, params: Vec<(u16, u32)>) -> Result<(), Fault> {
        if ack {
            self.settings.mark_local_acked();
            log::debug!("peer acknowledged our SETTINGS");
            return Ok(());
        }

        let old_initial_window = self.settings.remote.initial_window_size;
        for &(id, value) in &params {
            self.settings
                .remote
                .apply(id, value)
                .map_err(|_| Fault::Connection(Self::settings_error(id)))?;
        }

        // A changed INITIAL_WINDOW_SIZE applies retroactively as a delta to
        // every stream's send window (RFC 9113 §6.9.2), not just new streams.
        let new_initial_window = self.settings.remote.initial_window_size;
        if new_initial_window != old_initial_window {
            let delta = new_initial_window as i64 - old_initial_window as i64;
            for stream in self.streams.values_mut() {
                stream.send_window += delta;
                if stream.send_window > i32::MAX as i64 {
                    return Err(Fault::Connection(ConnectionError::FlowControlError(
                        "INITIAL_WINDOW_SIZE update pushed a stream's send window past 2^31-1",
                    )));
                }
            }
        }

        self.hpack_encoder
            .set_max_dynamic_table_size(self.settings.remote.header_table_size as usize);

        self.outbound.extend(write_frame(&Frame::Settings {
            ack: true,
            params: Vec::new(),
        }));
        Ok(())
    }

    fn settings_error(id: u16) -> ConnectionError {
        match id {
            settings_id::ENABLE_PUSH => ConnectionError::ProtocolError("ENABLE_PUSH must be 0 or 1"),
            settings_id::INITIAL_WINDOW_SIZE => {
                ConnectionError::FlowControlError("INITIAL_WINDOW_SIZE exceeds 2^31-1")
            }
            settings_id::MAX_FRAME_SIZE => {
                ConnectionError::FrameSizeError("MAX_FRAME_SIZE outside [2^14, 2^24-1]")
            }
            _ => ConnectionError::ProtocolError("invalid SETTINGS parameter value"),
        }
    }

    fn on_ping(&mut self, ack: bool, data: [u8; 8]) -> Result<(), Fault> {
        if !ack {
            self.outbound
                .extend(write_frame(&Frame::Ping { ack: true, data }));
        }
        Ok(())
    }

    fn on_goaway(
        &mut self,
        last_stream_id: u32,
        error_code: u32,
        events: &mut Vec<Event>,
    ) -> Result<(), Fault> {
        self.goaway_received = true;
        self.error_code = Some(error_code);
        if self.state != ConnectionState::Closed {
            self.state = ConnectionState::GoingAway;
        }
        log::warn!("peer sent GOAWAY(last_stream_id={last_stream_id}, error_code={error_code})");

        let to_close: Vec<u32> = self
            .streams
            .iter()
            .filter(|(id, s)| **id > last_stream_id && !s.is_closed())
            .map(|(id, _)| *id)
            .collect();
        for id in to_close {
            if let Some(stream) = self.streams.get_mut(&id) {
                stream.reset();
            }
            events.push(Event::StreamClosed {
                stream_id: id,
                error_code: Some(error_code),
            });
        }
        Ok(())
    }

    fn on_window_update(&mut self, stream_id: u32, increment: u32) -> Result<(), Fault> {
        if stream_id == 0 {
            self.send_window += increment as i64;
            if self.send_window > i32::MAX as i64 {
                return Err(Fault::Connection(ConnectionError::FlowControlError(
                    "connection send window exceeded 2^31-1",
                )));
            }
            let pending: Vec<u32> = self
                .streams
                .iter()
                .filter(|(_, s)| !s.outbound_body.is_empty())
                .map(|(id, _)| *id)
                .collect();
            for id in pending {
                self.flush_pending_body(id);
            }
            return Ok(());
        }

        // A WINDOW_UPDATE can legitimately race a stream we've already
        // closed; RFC 9113 §5.1 says to ignore it rather than error.
        let Some(stream) = self.streams.get_mut(&stream_id) else {
            return Ok(());
        };
        stream.increase_send_window(increment).map_err(|e| Fault::Stream {
            stream_id,
            error_code: e.error_code(),
        })?;
        self.flush_pending_body(stream_id);
        Ok(())
    }

    fn emit_request_ready(&mut self, stream_id: u32, events: &mut Vec<Event>) {
        let Some(stream) = self.streams.get(&stream_id) else {
            return;
        };
        let mut method = String::new();
        let mut path = String::new();
        let mut authority = None;
        let mut scheme = None;
        let mut headers = Vec::with_capacity(stream.headers.len());
        for h in &stream.headers {
            match h.name.as_str() {
                ":method" => method = h.value.clone(),
                ":path" => path = h.value.clone(),
                ":authority" => authority = Some(h.value.clone()),
                ":scheme" => scheme = Some(h.value.clone()),
                _ => headers.push(h.clone()),
            }
        }
        events.push(Event::RequestReady(Request {
            stream_id,
            method,
            path,
            authority,
            scheme,
            headers,
            body: stream.body.clone(),
        }));
    }

    /// Emit a WINDOW_UPDATE once a window has dropped to half (or less) of
    /// its initial value (§4.9), restoring it back to that initial value.
    fn maybe_replenish_stream_window(&mut self, stream_id: u32) {
        let initial = self.settings.local.initial_window_size as i64;
        if let Some(stream) = self.streams.get_mut(&stream_id) {
            if stream.recv_window <= initial / 2 {
                let increment = (initial - stream.recv_window) as u32;
                if increment > 0 {
                    stream.replenish_recv_window(increment);
                    self.outbound.extend(write_frame(&Frame::WindowUpdate {
                        stream_id,
                        increment,
                    }));
                }
            }
        }
    }

    fn maybe_replenish_connection_window(&mut self) {
        let initial = DEFAULT_CONNECTION_WINDOW;
        if self.recv_window <= initial / 2 {
            let increment = (initial - self.recv_window) as u32;
            if increment > 0 {
                self.recv_window += increment as i64;
                self.outbound.extend(write_frame(&Frame::WindowUpdate {
                    stream_id: 0,
                    increment,
                }));
            }
        }
    }

    fn send_local_settings(&mut self) {
        let frame = Frame::Settings {
            ack: false,
            params: self.settings.local.to_params(),
        };
        self.outbound.extend(write_frame(&frame));
        self.settings.mark_local_sent();
    }

    /// Encode an application `Response` into HEADERS (+ CONTINUATION if the
    /// block exceeds the peer's MAX_FRAME_SIZE) followed by zero or more
    /// DATA frames, respecting both flow-control windows (§6).
    pub fn encode_response(&mut self, stream_id: u32, response: Response) -> Result<(), Http2Error> {
        if !self.streams.contains_key(&stream_id) {
            return Err(Http2Error::Connection(ConnectionError::ProtocolError(
                "encode_response called for an unknown stream",
            )));
        }

        let max_frame = (self.settings.remote.max_frame_size as usize).max(1);
        let mut headers = vec![Header::new(":status", response.status.to_string())];
        headers.extend(
            response
                .headers
                .into_iter()
                .map(|(name, value)| Header::new(name, value)),
        );
        let block = self.hpack_encoder.encode(&headers);
        let no_body = response.body.is_empty();

        let chunks: Vec<&[u8]> = if block.is_empty() {
            vec![&block[..]]
        } else {
            block.chunks(max_frame).collect()
        };
        let last_index = chunks.len() - 1;
        for (i, chunk) in chunks.into_iter().enumerate() {
            let is_last = i == last_index;
            if i == 0 {
                self.outbound.extend(write_frame(&Frame::Headers {
                    stream_id,
                    header_block: chunk.to_vec(),
                    end_stream: is_last && no_body,
                    end_headers: is_last,
                    priority: None,
                }));
            } else {
                self.outbound.extend(write_frame(&Frame::Continuation {
                    stream_id,
                    header_block: chunk.to_vec(),
                    end_headers: is_last,
                }));
            }
        }

        if no_body {
            self.on_local_end_stream(stream_id);
        } else {
            if let Some(stream) = self.streams.get_mut(&stream_id) {
                stream.outbound_body = response.body;
                stream.outbound_end_stream = true;
            }
            self.flush_pending_body(stream_id);
        }
        Ok(())
    }

    /// Send as many queued response-body DATA frames as the stream and
    /// connection send windows currently allow, stopping (not erroring)
    /// once the window is exhausted — the remainder waits for WINDOW_UPDATE.
    fn flush_pending_body(&mut self, stream_id: u32) {
        let max_frame = (self.settings.remote.max_frame_size as usize).max(1);
        loop {
            let Some(stream) = self.streams.get(&stream_id) else {
                return;
            };
            if stream.outbound_body.is_empty() {
                return;
            }
            let available = stream.send_window.min(self.send_window).max(0) as usize;
            let take = available.min(max_frame).min(stream.outbound_body.len());
            if take == 0 {
                return;
            }

            let stream = self.streams.get_mut(&stream_id).expect("checked above");
            let chunk: Vec<u8> = stream.outbound_body.drain(..take).collect();
            let is_last = stream.outbound_body.is_empty();
            let end_stream = is_last && stream.outbound_end_stream;
            stream.consume_send_window(take as u32);
            self.send_window -= take as i64;

            self.outbound.extend(write_frame(&Frame::Data {
                stream_id,
                data: chunk,
                end_stream,
            }));
            if end_stream {
                self.on_local_end_stream(stream_id);
                return;
            }
        }
    }

    fn on_local_end_stream(&mut self, stream_id: u32) {
        if let Some(stream) = self.streams.get_mut(&stream_id) {
            stream.on_send_end_stream();
        }
    }

    fn reset_stream(&mut self, stream_id: u32, code: u32, events: &mut Vec<Event>) {
        if let Some(stream) = self.streams.get_mut(&stream_id) {
            stream.reset();
        }
        self.outbound.extend(write_frame(&Frame::RstStream {
            stream_id,
            error_code: code,
        }));
        events.push(Event::StreamClosed {
            stream_id,
            error_code: Some(code),
        });
    }

    fn fail_connection(&mut self, err: ConnectionError, events: &mut Vec<Event>) {
        log::error!("connection error: {err}");
        let code = err.error_code();
        if !self.goaway_sent && self.state != ConnectionState::Closed {
            self.outbound.extend(write_frame(&Frame::GoAway {
                last_stream_id: self.last_peer_stream_id,
                error_code: code,
                debug_data: Vec::new(),
            }));
            self.goaway_sent = true;
        }
        self.error_code = Some(code);
        self.close(events);
    }

    fn close(&mut self, events: &mut Vec<Event>) {
        if self.state == ConnectionState::Closed {
            return;
        }
        self.state = ConnectionState::Closed;
        let ids: Vec<u32> = self.streams.keys().copied().collect();
        for id in ids {
            let stream = self.streams.get_mut(&id).expect("collected from streams");
            if !stream.is_closed() {
                stream.reset();
                events.push(Event::StreamClosed {
                    stream_id: id,
                    error_code: self.error_code,
                });
            }
        }
        events.push(Event::ConnectionClosed {
            error_code: self.error_code,
        });
    }
}
