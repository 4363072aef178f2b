//! Round-trip tests for the 9-byte common frame header.

use h2_core::frame::{frame_type, FrameHeader};

#[test]
fn header_roundtrips_through_parse_and_write() {
    let header = FrameHeader {
        length: 0x00abcd,
        frame_type: frame_type::HEADERS,
        flags: 0x5,
        stream_id: 0x7fff_ffff,
    };
    let bytes = header.write();
    let parsed = FrameHeader::parse(&bytes).unwrap();
    assert_eq!(parsed, header);
}

#[test]
fn reserved_bit_is_masked_on_parse() {
    // Stream id field with the top reserved bit set should be stripped.
    let mut bytes = [0u8; FrameHeader::SIZE];
    bytes[3] = frame_type::DATA;
    bytes[5] = 0x80; // reserved bit + top byte of stream id
    bytes[8] = 0x01;
    let header = FrameHeader::parse(&bytes).unwrap();
    assert_eq!(header.stream_id, 1);
}

#[test]
fn parse_reports_incomplete_for_short_input() {
    let err = FrameHeader::parse(&[0, 0, 1]).unwrap_err();
    assert!(matches!(
        err,
        h2_core::FrameError::Incomplete { needed: 6 }
    ));
}

#[test]
fn total_size_is_header_plus_length() {
    let header = FrameHeader {
        length: 42,
        frame_type: frame_type::DATA,
        flags: 0,
        stream_id: 1,
    };
    assert_eq!(header.total_size(), FrameHeader::SIZE + 42);
}
