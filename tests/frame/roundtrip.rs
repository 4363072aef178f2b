//! `parse(write(F)) == F` for every frame type (spec testable property, §8).

use h2_core::frame::{write_frame, Frame, FrameHeader, Priority};

fn roundtrip(frame: Frame) {
    let bytes = write_frame(&frame);
    let header = FrameHeader::parse(&bytes).unwrap();
    let parsed = h2_core::frame::parse_frame(&header, &bytes[FrameHeader::SIZE..]).unwrap();
    assert_eq!(parsed, frame);
}

#[test]
fn data_frame() {
    roundtrip(Frame::Data {
        stream_id: 1,
        data: b"hello".to_vec(),
        end_stream: true,
    });
}

#[test]
fn headers_frame_without_priority() {
    roundtrip(Frame::Headers {
        stream_id: 3,
        header_block: vec![0x82, 0x86, 0x84],
        end_stream: true,
        end_headers: true,
        priority: None,
    });
}

#[test]
fn headers_frame_with_priority_flag() {
    roundtrip(Frame::Headers {
        stream_id: 3,
        header_block: vec![0x82],
        end_stream: false,
        end_headers: true,
        priority: Some(Priority {
            exclusive: true,
            stream_dependency: 1,
            weight: 200,
        }),
    });
}

#[test]
fn priority_frame() {
    roundtrip(Frame::Priority {
        stream_id: 5,
        priority: Priority {
            exclusive: false,
            stream_dependency: 0,
            weight: 15,
        },
    });
}

#[test]
fn rst_stream_frame() {
    roundtrip(Frame::RstStream {
        stream_id: 7,
        error_code: 8,
    });
}

#[test]
fn settings_frame_with_params() {
    roundtrip(Frame::Settings {
        ack: false,
        params: vec![(1, 4096), (4, 65_535)],
    });
}

#[test]
fn settings_ack_frame() {
    roundtrip(Frame::Settings {
        ack: true,
        params: Vec::new(),
    });
}

#[test]
fn push_promise_frame() {
    roundtrip(Frame::PushPromise {
        stream_id: 1,
        promised_stream_id: 2,
        header_block: vec![0x82, 0x86],
        end_headers: true,
    });
}

#[test]
fn ping_frame() {
    roundtrip(Frame::Ping {
        ack: false,
        data: [1, 2, 3, 4, 5, 6, 7, 8],
    });
}

#[test]
fn goaway_frame_with_debug_data() {
    roundtrip(Frame::GoAway {
        last_stream_id: 9,
        error_code: 1,
        debug_data: b"why".to_vec(),
    });
}

#[test]
fn window_update_frame() {
    roundtrip(Frame::WindowUpdate {
        stream_id: 0,
        increment: 32_768,
    });
}

#[test]
fn continuation_frame() {
    roundtrip(Frame::Continuation {
        stream_id: 1,
        header_block: vec![0x8a],
        end_headers: true,
    });
}
