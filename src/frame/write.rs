use super::{flags, frame_type, Frame, FrameHeader};

/// Serialize a single frame (header + payload). This crate never emits
/// padding on frames it writes; callers that need to split an oversized
/// HEADERS payload into HEADERS + CONTINUATION do so before calling this
/// (see `Connection::encode_response`).
pub fn write_frame(frame: &Frame) -> Vec<u8> {
    let (frame_type, flag_bits, stream_id, payload) = match frame {
        Frame::Data {
            stream_id,
            data,
            end_stream,
        } => (
            frame_type::DATA,
            if *end_stream { flags::END_STREAM } else { 0 },
            *stream_id,
            data.clone(),
        ),
        Frame::Headers {
            stream_id,
            header_block,
            end_stream,
            end_headers,
            priority,
        } => {
            let mut f = 0;
            if *end_stream {
                f |= flags::END_STREAM;
            }
            if *end_headers {
                f |= flags::END_HEADERS;
            }
            let mut payload = Vec::with_capacity(header_block.len() + 5);
            if let Some(p) = priority {
                f |= flags::PRIORITY;
                let dep = p.stream_dependency | if p.exclusive { 0x8000_0000 } else { 0 };
                payload.extend_from_slice(&dep.to_be_bytes());
                payload.push(p.weight);
            }
            payload.extend_from_slice(header_block);
            (frame_type::HEADERS, f, *stream_id, payload)
        }
        Frame::Priority {
            stream_id,
            priority,
        } => {
            let mut payload = Vec::with_capacity(5);
            let dep = priority.stream_dependency | if priority.exclusive { 0x8000_0000 } else { 0 };
            payload.extend_from_slice(&dep.to_be_bytes());
            payload.push(priority.weight);
            (frame_type::PRIORITY, 0, *stream_id, payload)
        }
        Frame::RstStream {
            stream_id,
            error_code,
        } => (
            frame_type::RST_STREAM,
            0,
            *stream_id,
            error_code.to_be_bytes().to_vec(),
        ),
        Frame::Settings { ack, params } => {
            if *ack {
                (frame_type::SETTINGS, flags::ACK, 0, Vec::new())
            } else {
                let mut payload = Vec::with_capacity(params.len() * 6);
                for (id, value) in params {
                    payload.extend_from_slice(&id.to_be_bytes());
                    payload.extend_from_slice(&value.to_be_bytes());
                }
                (frame_type::SETTINGS, 0, 0, payload)
            }
        }
        Frame::PushPromise {
            stream_id,
            promised_stream_id,
            header_block,
            end_headers,
        } => {
            let mut payload = Vec::with_capacity(4 + header_block.len());
            payload.extend_from_slice(&(promised_stream_id & 0x7fff_ffff).to_be_bytes());
            payload.extend_from_slice(header_block);
            let f = if *end_headers { flags::END_HEADERS } else { 0 };
            (frame_type::PUSH_PROMISE, f, *stream_id, payload)
        }
        Frame::Ping { ack, data } => (
            frame_type::PING,
            if *ack { flags::ACK } else { 0 },
            0,
            data.to_vec(),
        ),
        Frame::GoAway {
            last_stream_id,
            error_code,
            debug_data,
        } => {
            let mut payload = Vec::with_capacity(8 + debug_data.len());
            payload.extend_from_slice(&(last_stream_id & 0x7fff_ffff).to_be_bytes());
            payload.extend_from_slice(&error_code.to_be_bytes());
            payload.extend_from_slice(debug_data);
            (frame_type::GOAWAY, 0, 0, payload)
        }
        Frame::WindowUpdate {
            stream_id,
            increment,
        } => (
            frame_type::WINDOW_UPDATE,
            0,
            *stream_id,
            (increment & 0x7fff_ffff).to_be_bytes().to_vec(),
        ),
        Frame::Continuation {
            stream_id,
            header_block,
            end_headers,
        } => (
            frame_type::CONTINUATION,
            if *end_headers { flags::END_HEADERS } else { 0 },
            *stream_id,
            header_block.clone(),
        ),
    };

    let header = FrameHeader {
        length: payload.len() as u32,
        frame_type,
        flags: flag_bits,
        stream_id,
    };
    let mut out = Vec::with_capacity(FrameHeader::SIZE + payload.len());
    out.extend_from_slice(&header.write());
    out.extend_from_slice(&payload);
    out
}
