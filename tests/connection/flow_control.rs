//! Flow-control accounting at the stream and connection level (spec §8
//! scenario 7, and WINDOW_UPDATE edge cases).

use h2_core::frame::{error_code, write_frame, Frame, FrameHeader, CONNECTION_PREFACE};
use h2_core::{Config, Connection, Event};

fn handshake(conn: &mut Connection) {
    let mut data = CONNECTION_PREFACE.to_vec();
    data.extend(write_frame(&Frame::Settings {
        ack: false,
        params: vec![],
    }));
    conn.feed_bytes(&data).unwrap();
    conn.drain_outbound();
}

#[test]
fn exhausting_then_replenishing_the_stream_window() {
    let mut conn = Connection::new(Config::default());
    handshake(&mut conn);

    let mut data = write_frame(&Frame::Headers {
        stream_id: 1,
        header_block: vec![0x82, 0x86, 0x84],
        end_stream: false,
        end_headers: true,
        priority: None,
    });
    // Default INITIAL_WINDOW_SIZE is 65535; exhaust it exactly.
    data.extend(write_frame(&Frame::Data {
        stream_id: 1,
        data: vec![0u8; 65_535],
        end_stream: false,
    }));
    conn.feed_bytes(&data).unwrap();
    conn.drain_outbound();

    // Any further non-empty DATA on the same stream must now fail.
    let overrun = write_frame(&Frame::Data {
        stream_id: 1,
        data: vec![0u8; 1],
        end_stream: false,
    });
    let events = conn.feed_bytes(&overrun).unwrap();
    assert!(events.iter().any(|e| matches!(
        e,
        Event::StreamClosed { stream_id: 1, error_code: Some(c) } if *c == error_code::FLOW_CONTROL_ERROR
    )));
}

#[test]
fn window_update_on_stream_zero_targets_the_connection_window() {
    let mut conn = Connection::new(Config::default());
    handshake(&mut conn);

    let update = write_frame(&Frame::WindowUpdate {
        stream_id: 0,
        increment: 1000,
    });
    let events = conn.feed_bytes(&update).unwrap();
    assert!(events.is_empty());
}

#[test]
fn window_update_overflowing_send_window_is_a_flow_control_error() {
    let mut conn = Connection::new(Config::default());
    handshake(&mut conn);

    let data = write_frame(&Frame::Headers {
        stream_id: 1,
        header_block: vec![0x82, 0x86, 0x84],
        end_stream: false,
        end_headers: true,
        priority: None,
    });
    conn.feed_bytes(&data).unwrap();
    conn.drain_outbound();

    let update = write_frame(&Frame::WindowUpdate {
        stream_id: 1,
        increment: i32::MAX as u32,
    });
    let events = conn.feed_bytes(&update).unwrap();
    assert!(events.iter().any(|e| matches!(
        e,
        Event::StreamClosed { stream_id: 1, error_code: Some(c) } if *c == error_code::FLOW_CONTROL_ERROR
    )));
}
