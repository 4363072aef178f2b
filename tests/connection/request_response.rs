//! Request assembly and response encoding (spec §6, §8 scenario 3).

use h2_core::frame::{frame_type, write_frame, Frame, FrameHeader, CONNECTION_PREFACE};
use h2_core::{Config, Connection, Event, HpackDecoder, Response, StreamStateKind};

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
fn static_indexed_get_produces_request_ready_with_expected_fields() {
    let mut conn = Connection::new(Config::default());
    handshake(&mut conn);

    // RFC 7541 Appendix C.3.1-style block: :method GET, :scheme http,
    // :path /, :authority www.example.com (literal, incremental indexing).
    let mut block = vec![0x82, 0x86, 0x84, 0x01, 0x0f];
    block.extend_from_slice(b"www.example.com");
    let data = write_frame(&Frame::Headers {
        stream_id: 1,
        header_block: block,
        end_stream: true,
        end_headers: true,
        priority: None,
    });

    let events = conn.feed_bytes(&data).unwrap();
    let request = events
        .iter()
        .find_map(|e| match e {
            Event::RequestReady(r) => Some(r),
            _ => None,
        })
        .expect("expected RequestReady");

    assert_eq!(request.stream_id, 1);
    assert_eq!(request.method, "GET");
    assert_eq!(request.path, "/");
    assert_eq!(request.authority.as_deref(), Some("www.example.com"));
    assert_eq!(conn.stream(1).unwrap().state, StreamStateKind::HalfClosedRemote);
}

#[test]
fn response_headers_and_body_decode_back_to_the_values_given() {
    let mut conn = Connection::new(Config::default());
    handshake(&mut conn);

    let data = write_frame(&Frame::Headers {
        stream_id: 1,
        header_block: vec![0x82, 0x86, 0x84],
        end_stream: true,
        end_headers: true,
        priority: None,
    });
    conn.feed_bytes(&data).unwrap();
    conn.drain_outbound();

    conn.encode_response(
        1,
        Response {
            status: 200,
            headers: vec![("content-type".into(), "text/plain".into())],
            body: b"hello world".to_vec(),
        },
    )
    .unwrap();

    let out = conn.drain_outbound();
    let headers_header = FrameHeader::parse(&out).unwrap();
    assert_eq!(headers_header.frame_type, frame_type::HEADERS);
    assert!(headers_header.is_end_headers());
    assert!(!headers_header.is_end_stream());

    let block = &out[FrameHeader::SIZE..headers_header.total_size()];
    let mut decoder = HpackDecoder::new(4096, None);
    let decoded = decoder.decode(block).unwrap();
    assert!(decoded.iter().any(|h| h.name == ":status" && h.value == "200"));
    assert!(decoded
        .iter()
        .any(|h| h.name == "content-type" && h.value == "text/plain"));

    let rest = &out[headers_header.total_size()..];
    let data_header = FrameHeader::parse(rest).unwrap();
    assert_eq!(data_header.frame_type, frame_type::DATA);
    assert!(data_header.is_end_stream());
    assert_eq!(&rest[FrameHeader::SIZE..], b"hello world");
}

#[test]
fn oversized_response_headers_split_across_continuation_frames() {
    let mut config = Config::default();
    config.max_frame_size = 16_384;
    let mut conn = Connection::new(config);
    handshake(&mut conn);

    let data = write_frame(&Frame::Headers {
        stream_id: 1,
        header_block: vec![0x82, 0x86, 0x84],
        end_stream: true,
        end_headers: true,
        priority: None,
    });
    conn.feed_bytes(&data).unwrap();
    conn.drain_outbound();

    // Enough distinct large header values that Huffman-compressed output
    // still exceeds one MAX_FRAME_SIZE-sized HEADERS frame.
    let headers: Vec<(String, String)> = (0..400)
        .map(|i| (format!("x-custom-header-{i}"), "a".repeat(80)))
        .collect();
    conn.encode_response(
        1,
        Response {
            status: 200,
            headers,
            body: vec![],
        },
    )
    .unwrap();

    let out = conn.drain_outbound();
    let headers_header = FrameHeader::parse(&out).unwrap();
    assert_eq!(headers_header.frame_type, frame_type::HEADERS);
    assert!(!headers_header.is_end_headers());

    let rest = &out[headers_header.total_size()..];
    let cont_header = FrameHeader::parse(rest).unwrap();
    assert_eq!(cont_header.frame_type, frame_type::CONTINUATION);
}
