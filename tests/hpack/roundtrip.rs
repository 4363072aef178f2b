//! Encoder/decoder round trips (spec §8): `decode(encode(H)) == H`, in order,
//! for a header list without sensitive markers.

use h2_core::{Header, HpackDecoder, HpackEncoder};

#[test]
fn roundtrips_a_realistic_header_list_in_order() {
    let mut enc = HpackEncoder::new(4096);
    let mut dec = HpackDecoder::new(4096, None);

    let headers = vec![
        Header::new(":method", "GET"),
        Header::new(":scheme", "https"),
        Header::new(":path", "/resource"),
        Header::new(":authority", "example.com"),
        Header::new("accept", "*/*"),
        Header::new("x-request-id", "abc-123"),
    ];
    let block = enc.encode(&headers);
    let decoded = dec.decode(&block).unwrap();
    assert_eq!(decoded, headers);
}

#[test]
fn repeated_encode_calls_reuse_the_dynamic_table_across_blocks() {
    let mut enc = HpackEncoder::new(4096);
    let mut dec = HpackDecoder::new(4096, None);

    let first = vec![Header::new("x-trace", "trace-1")];
    let second = vec![Header::new("x-trace", "trace-1")];

    let block1 = enc.encode(&first);
    let block2 = enc.encode(&second);
    assert!(block2.len() < block1.len());

    assert_eq!(dec.decode(&block1).unwrap(), first);
    assert_eq!(dec.decode(&block2).unwrap(), second);
}

#[test]
fn shrinking_the_encoder_table_emits_a_size_update_the_decoder_honors() {
    let mut enc = HpackEncoder::new(4096);
    let mut dec = HpackDecoder::new(4096, None);

    enc.set_max_dynamic_table_size(0);
    let block = enc.encode(&[Header::new("x-custom", "value")]);
    let decoded = dec.decode(&block).unwrap();
    assert_eq!(decoded, vec![Header::new("x-custom", "value")]);
}

#[test]
fn sensitive_headers_never_populate_the_dynamic_table() {
    let mut enc = HpackEncoder::new(4096);
    let mut dec = HpackDecoder::new(4096, None);

    let headers = vec![Header::sensitive("authorization", "Bearer secret-token")];
    let block = enc.encode(&headers);
    assert_eq!(block[0] & 0b1111_0000, 0b0001_0000, "must use Literal Never Indexed");
    assert_eq!(dec.decode(&block).unwrap(), headers);

    // A later encode of the same (name, value) must not find an exact match
    // in the dynamic table (which would emit a one-byte Indexed Header
    // Field) because the sensitive header was never inserted into it.
    let block2 = enc.encode(&[Header::new("authorization", "Bearer secret-token")]);
    assert_eq!(block2[0] & 0b1000_0000, 0, "sensitive value must not be indexable");
}
