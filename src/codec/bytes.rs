//! Integer and hex conversions

use crate::error::{TxClientError, TxClientResult};

use ethers::types::U256;

/// Minimal big-endian bytes of `n`, left-padded with zeros to `size` if given.
///
/// Zero encodes as a single `0x00` byte. Padding never truncates.
pub fn integer_to_bytes(n: U256, size: Option<usize>) -> Vec<u8> {
    let mut buf = [0u8; 32];
    n.to_big_endian(&mut buf);

    let start = buf.iter().position(|b| *b != 0).unwrap_or(buf.len() - 1);
    let minimal = &buf[start..];

    match size {
        Some(size) if size > minimal.len() => {
            let mut padded = vec![0u8; size - minimal.len()];
            padded.extend_from_slice(minimal);
            padded
        }
        _ => minimal.to_vec(),
    }
}

/// Lowercase hex, optionally `0x`-prefixed
pub fn encode_hex(bytes: &[u8], prefix: bool) -> String {
    let encoded = hex::encode(bytes);
    if prefix {
        format!("0x{}", encoded)
    } else {
        encoded
    }
}

/// `0x`-prefixed lowercase hex
pub fn to_hex(bytes: &[u8]) -> String {
    encode_hex(bytes, true)
}

/// Decode hex with or without a `0x` prefix, in either case
pub fn decode_hex(input: &str) -> TxClientResult<Vec<u8>> {
    let digits = strip_hex_prefix(input);
    hex::decode(digits)
        .map_err(|e| TxClientError::InvalidInput(format!("invalid hex {:?}: {}", input, e)))
}

pub(crate) fn strip_hex_prefix(input: &str) -> &str {
    input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_to_bytes() {
        assert_eq!(integer_to_bytes(U256::zero(), None), vec![0x00]);
        assert_eq!(integer_to_bytes(U256::from(10), None), vec![0x0a]);
        assert_eq!(integer_to_bytes(U256::from(256), None), vec![0x01, 0x00]);
        assert_eq!(integer_to_bytes(U256::from(1), Some(2)), vec![0x00, 0x01]);
        assert_eq!(integer_to_bytes(U256::from(0x0102), Some(1)), vec![0x01, 0x02]);
        assert_eq!(integer_to_bytes(U256::MAX, None), vec![0xff; 32]);
    }

    #[test]
    fn test_hex_encode() {
        assert_eq!(to_hex(&[0x00]), "0x00");
        assert_eq!(encode_hex(&[0x00], false), "00");
        assert_eq!(to_hex(&[]), "0x");
        assert_eq!(to_hex(&[0xde, 0xad, 0xbe, 0xef]), "0xdeadbeef");
    }

    #[test]
    fn test_hex_decode() {
        assert_eq!(decode_hex("0x00").unwrap(), vec![0x00]);
        assert_eq!(decode_hex("0x").unwrap(), Vec::<u8>::new());
        assert_eq!(decode_hex("").unwrap(), Vec::<u8>::new());
        assert_eq!(decode_hex("DeadBEEF").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(decode_hex("0XAB").unwrap(), vec![0xab]);
        assert_eq!(decode_hex(&to_hex(b"x")).unwrap(), b"x".to_vec());

        assert!(matches!(decode_hex("0xzz"), Err(TxClientError::InvalidInput(_))));
        assert!(matches!(decode_hex("abc"), Err(TxClientError::InvalidInput(_))));
    }

    #[test]
    fn test_hex_round_trip() {
        let samples: [&[u8]; 4] = [b"", b"\x00", b"\x00\x01\x7f\x80\xff", &[0xaa; 77]];
        for sample in samples {
            assert_eq!(decode_hex(&to_hex(sample)).unwrap(), sample);
            assert_eq!(decode_hex(&encode_hex(sample, false)).unwrap(), sample);
            assert!(!encode_hex(sample, false).starts_with("0x"));
        }
    }
}
