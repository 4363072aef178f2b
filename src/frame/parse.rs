use super::{flags, frame_type, Frame, FrameHeader, Priority};
use crate::error::FrameError;

/// Parse a frame body given its already-parsed header. `payload` must be
/// exactly `header.length` bytes (the caller slices it out of the input
/// buffer once a full frame is known to be present).
pub fn parse_frame(header: &FrameHeader, payload: &[u8]) -> Result<Frame, FrameError> {
    debug_assert_eq!(payload.len(), header.length as usize);

    match header.frame_type {
        frame_type::DATA => parse_data(header, payload),
        frame_type::HEADERS => parse_headers(header, payload),
        frame_type::PRIORITY => parse_priority(header, payload),
        frame_type::RST_STREAM => parse_rst_stream(header, payload),
        frame_type::SETTINGS => parse_settings(header, payload),
        frame_type::PUSH_PROMISE => parse_push_promise(header, payload),
        frame_type::PING => parse_ping(header, payload),
        frame_type::GOAWAY => parse_goaway(header, payload),
        frame_type::WINDOW_UPDATE => parse_window_update(header, payload),
        frame_type::CONTINUATION => Ok(Frame::Continuation {
            stream_id: header.stream_id,
            header_block: payload.to_vec(),
            end_headers: header.is_end_headers(),
        }),
        _ => Err(FrameError::Malformed("unknown frame type")),
    }
}

/// Strip and validate PADDED-flag framing: a leading 1-byte pad length
/// followed by the real payload followed by that many padding bytes
/// (RFC 9113 §6.1, §6.2, §6.6).
fn strip_padding<'a>(header: &FrameHeader, payload: &'a [u8]) -> Result<&'a [u8], FrameError> {
    if !header.is_padded() {
        return Ok(payload);
    }
    let Some(&pad_length) = payload.first() else {
        return Err(FrameError::Malformed("PADDED flag set on empty payload"));
    };
    let pad_length = pad_length as usize;
    let body = &payload[1..];
    if pad_length >= body.len() + 1 {
        return Err(FrameError::InvalidPadding {
            pad_length,
            payload_length: payload.len(),
        });
    }
    Ok(&body[..body.len() - pad_length])
}

fn parse_data(header: &FrameHeader, payload: &[u8]) -> Result<Frame, FrameError> {
    if header.stream_id == 0 {
        return Err(FrameError::InvalidStreamID {
            frame_type: frame_type::DATA,
            stream_id: 0,
        });
    }
    let data = strip_padding(header, payload)?;
    Ok(Frame::Data {
        stream_id: header.stream_id,
        data: data.to_vec(),
        end_stream: header.is_end_stream(),
    })
}

fn parse_headers(header: &FrameHeader, payload: &[u8]) -> Result<Frame, FrameError> {
    if header.stream_id == 0 {
        return Err(FrameError::InvalidStreamID {
            frame_type: frame_type::HEADERS,
            stream_id: 0,
        });
    }
    let body = strip_padding(header, payload)?;

    let (priority, header_block) = if header.has_priority() {
        if body.len() < 5 {
            return Err(FrameError::Malformed("HEADERS PRIORITY flag set but payload too short"));
        }
        let raw = u32::from_be_bytes([body[0], body[1], body[2], body[3]]);
        let priority = Priority {
            exclusive: raw & 0x8000_0000 != 0,
            stream_dependency: raw & 0x7fff_ffff,
            weight: body[4],
        };
        (Some(priority), &body[5..])
    } else {
        (None, body)
    };

    Ok(Frame::Headers {
        stream_id: header.stream_id,
        header_block: header_block.to_vec(),
        end_stream: header.is_end_stream(),
        end_headers: header.is_end_headers(),
        priority,
    })
}

fn parse_priority(header: &FrameHeader, payload: &[u8]) -> Result<Frame, FrameError> {
    if header.stream_id == 0 {
        return Err(FrameError::InvalidStreamID {
            frame_type: frame_type::PRIORITY,
            stream_id: 0,
        });
    }
    if payload.len() != 5 {
        return Err(FrameError::Malformed("PRIORITY frame must be exactly 5 bytes"));
    }
    let raw = u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]);
    let priority = Priority {
        exclusive: raw & 0x8000_0000 != 0,
        stream_dependency: raw & 0x7fff_ffff,
        weight: payload[4],
    };
    Ok(Frame::Priority {
        stream_id: header.stream_id,
        priority,
    })
}

fn parse_rst_stream(header: &FrameHeader, payload: &[u8]) -> Result<Frame, FrameError> {
    if header.stream_id == 0 {
        return Err(FrameError::InvalidStreamID {
            frame_type: frame_type::RST_STREAM,
            stream_id: 0,
        });
    }
    if payload.len() != 4 {
        return Err(FrameError::Malformed("RST_STREAM frame must be exactly 4 bytes"));
    }
    let error_code = u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]);
    Ok(Frame::RstStream {
        stream_id: header.stream_id,
        error_code,
    })
}

fn parse_settings(header: &FrameHeader, payload: &[u8]) -> Result<Frame, FrameError> {
    if header.stream_id != 0 {
        return Err(FrameError::InvalidStreamID {
            frame_type: frame_type::SETTINGS,
            stream_id: header.stream_id,
        });
    }
    if header.is_ack() {
        if !payload.is_empty() {
            return Err(FrameError::Malformed("SETTINGS ACK must have an empty payload"));
        }
        return Ok(Frame::Settings {
            ack: true,
            params: Vec::new(),
        });
    }
    if payload.len() % 6 != 0 {
        return Err(FrameError::Malformed("SETTINGS payload must be a multiple of 6 bytes"));
    }
    let mut params = Vec::with_capacity(payload.len() / 6);
    for chunk in payload.chunks_exact(6) {
        let id = u16::from_be_bytes([chunk[0], chunk[1]]);
        let value = u32::from_be_bytes([chunk[2], chunk[3], chunk[4], chunk[5]]);
        params.push((id, value));
    }
    Ok(Frame::Settings { ack: false, params })
}

fn parse_push_promise(header: &FrameHeader, payload: &[u8]) -> Result<Frame, FrameError> {
    if header.stream_id == 0 {
        return Err(FrameError::InvalidStreamID {
            frame_type: frame_type::PUSH_PROMISE,
            stream_id: 0,
        });
    }
    let body = strip_padding(header, payload)?;
    if body.len() < 4 {
        return Err(FrameError::Malformed("PUSH_PROMISE payload too short"));
    }
    let raw = u32::from_be_bytes([body[0], body[1], body[2], body[3]]);
    let promised_stream_id = raw & 0x7fff_ffff;
    Ok(Frame::PushPromise {
        stream_id: header.stream_id,
        promised_stream_id,
        header_block: body[4..].to_vec(),
        end_headers: header.is_end_headers(),
    })
}

fn parse_ping(header: &FrameHeader, payload: &[u8]) -> Result<Frame, FrameError> {
    if header.stream_id != 0 {
        return Err(FrameError::InvalidStreamID {
            frame_type: frame_type::PING,
            stream_id: header.stream_id,
        });
    }
    if payload.len() != 8 {
        return Err(FrameError::Malformed("PING frame must be exactly 8 bytes"));
    }
    let mut data = [0u8; 8];
    data.copy_from_slice(payload);
    Ok(Frame::Ping {
        ack: header.flags & flags::ACK != 0,
        data,
    })
}

fn parse_goaway(header: &FrameHeader, payload: &[u8]) -> Result<Frame, FrameError> {
    if header.stream_id != 0 {
        return Err(FrameError::InvalidStreamID {
            frame_type: frame_type::GOAWAY,
            stream_id: header.stream_id,
        });
    }
    if payload.len() < 8 {
        return Err(FrameError::Malformed("GOAWAY payload too short"));
    }
    let last_stream_id = u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]) & 0x7fff_ffff;
    let error_code = u32::from_be_bytes([payload[4], payload[5], payload[6], payload[7]]);
    Ok(Frame::GoAway {
        last_stream_id,
        error_code,
        debug_data: payload[8..].to_vec(),
    })
}

fn parse_window_update(header: &FrameHeader, payload: &[u8]) -> Result<Frame, FrameError> {
    if payload.len() != 4 {
        return Err(FrameError::Malformed("WINDOW_UPDATE frame must be exactly 4 bytes"));
    }
    let raw = u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]);
    let increment = raw & 0x7fff_ffff;
    if increment == 0 {
        return Err(FrameError::InvalidWindowSize(increment));
    }
    Ok(Frame::WindowUpdate {
        stream_id: header.stream_id,
        increment,
    })
}
