//! Parse-time frame validations (spec §4.6, §6).

use h2_core::frame::{frame_type, parse_frame, FrameHeader};
use h2_core::FrameError;

fn header(frame_type: u8, flags: u8, stream_id: u32, length: u32) -> FrameHeader {
    FrameHeader {
        length,
        frame_type,
        flags,
        stream_id,
    }
}

#[test]
fn priority_frame_must_be_exactly_five_bytes() {
    let h = header(frame_type::PRIORITY, 0, 1, 4);
    let err = parse_frame(&h, &[0, 0, 0, 0]).unwrap_err();
    assert!(matches!(err, FrameError::Malformed(_)));
}

#[test]
fn rst_stream_must_be_exactly_four_bytes() {
    let h = header(frame_type::RST_STREAM, 0, 1, 3);
    let err = parse_frame(&h, &[0, 0, 0]).unwrap_err();
    assert!(matches!(err, FrameError::Malformed(_)));
}

#[test]
fn window_update_must_be_exactly_four_bytes() {
    let h = header(frame_type::WINDOW_UPDATE, 0, 1, 3);
    let err = parse_frame(&h, &[0, 0, 1]).unwrap_err();
    assert!(matches!(err, FrameError::Malformed(_)));
}

#[test]
fn window_update_zero_increment_is_invalid() {
    let h = header(frame_type::WINDOW_UPDATE, 0, 1, 4);
    let err = parse_frame(&h, &[0, 0, 0, 0]).unwrap_err();
    assert!(matches!(err, FrameError::InvalidWindowSize(0)));
}

#[test]
fn settings_length_must_be_divisible_by_six() {
    let h = header(frame_type::SETTINGS, 0, 0, 7);
    let err = parse_frame(&h, &[0u8; 7]).unwrap_err();
    assert!(matches!(err, FrameError::Malformed(_)));
}

#[test]
fn goaway_must_be_at_least_eight_bytes() {
    let h = header(frame_type::GOAWAY, 0, 0, 5);
    let err = parse_frame(&h, &[0u8; 5]).unwrap_err();
    assert!(matches!(err, FrameError::Malformed(_)));
}

#[test]
fn padded_frame_rejects_pad_length_covering_whole_payload() {
    let h = header(frame_type::DATA, h2_core::frame::flags::PADDED, 1, 2);
    // pad_length = 1 leaves zero bytes for data + padding, so it can never
    // fit (payload_length - 1 byte pad-length field = 1, pad_length must be
    // strictly less than that).
    let err = parse_frame(&h, &[1, 0]).unwrap_err();
    assert!(matches!(err, FrameError::InvalidPadding { .. }));
}

#[test]
fn data_frame_on_stream_zero_is_a_stream_id_error() {
    let h = header(frame_type::DATA, 0, 0, 0);
    let err = parse_frame(&h, &[]).unwrap_err();
    assert!(matches!(err, FrameError::InvalidStreamID { stream_id: 0, .. }));
}

#[test]
fn settings_on_nonzero_stream_is_a_stream_id_error() {
    let h = header(frame_type::SETTINGS, 0, 1, 0);
    let err = parse_frame(&h, &[]).unwrap_err();
    assert!(matches!(err, FrameError::InvalidStreamID { .. }));
}
