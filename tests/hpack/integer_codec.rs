//! HPACK integer codec properties (spec §4.1, §8).

use h2_core::hpack::int_codec::{decode_integer, encode_integer};

#[test]
fn roundtrips_across_prefix_widths_and_representative_values() {
    for prefix in 1..=8u8 {
        for value in [0u64, 1, 30, 127, 128, 1337, 16_384, 1 << 20, (1 << 30) - 1] {
            let encoded = encode_integer(value, prefix, 0);
            let (decoded, consumed) = decode_integer(&encoded, prefix).unwrap();
            assert_eq!(decoded, value, "prefix={prefix} value={value}");
            assert_eq!(consumed, encoded.len());
        }
    }
}

#[test]
fn rejects_values_at_or_above_the_compression_bomb_cap() {
    let err = decode_integer(&[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f], 8).unwrap_err();
    assert_eq!(err, h2_core::error::IntegerError::TooLarge);
}

#[test]
fn truncated_continuation_byte_is_incomplete_not_an_error() {
    let err = decode_integer(&[0xff], 8).unwrap_err();
    assert_eq!(err, h2_core::error::IntegerError::Incomplete);
}
