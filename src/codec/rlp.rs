//! Recursive length-prefix encoding
//!
//! Integers are written as their minimal big-endian bytes, with zero being
//! the empty string. Strings and lists share the same length-prefix rule,
//! with bases `0x80` and `0xC0` respectively.

use super::bytes::integer_to_bytes;

use ethers::types::{Address, U256};

const STRING_OFFSET: u8 = 0x80;
const LIST_OFFSET: u8 = 0xC0;
/// Longest payload that fits in a single prefix byte
const SHORT_LIMIT: usize = 55;

/// A value that can be RLP encoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RlpItem {
    Int(U256),
    Bytes(Vec<u8>),
    List(Vec<RlpItem>),
}

impl RlpItem {
    pub fn encode(&self) -> Vec<u8> {
        encode(self)
    }
}

impl From<U256> for RlpItem {
    fn from(value: U256) -> Self {
        RlpItem::Int(value)
    }
}

impl From<u64> for RlpItem {
    fn from(value: u64) -> Self {
        RlpItem::Int(U256::from(value))
    }
}

impl From<Vec<u8>> for RlpItem {
    fn from(value: Vec<u8>) -> Self {
        RlpItem::Bytes(value)
    }
}

impl From<&[u8]> for RlpItem {
    fn from(value: &[u8]) -> Self {
        RlpItem::Bytes(value.to_vec())
    }
}

impl From<Address> for RlpItem {
    fn from(value: Address) -> Self {
        RlpItem::Bytes(value.as_bytes().to_vec())
    }
}

impl From<Vec<RlpItem>> for RlpItem {
    fn from(value: Vec<RlpItem>) -> Self {
        RlpItem::List(value)
    }
}

/// Encode an item, recursing into lists
pub fn encode(item: &RlpItem) -> Vec<u8> {
    match item {
        RlpItem::Int(value) if value.is_zero() => vec![STRING_OFFSET],
        RlpItem::Int(value) => encode_bytes(&integer_to_bytes(*value, None)),
        RlpItem::Bytes(bytes) => encode_bytes(bytes),
        RlpItem::List(items) => {
            let payload: Vec<u8> = items.iter().flat_map(encode).collect();
            let mut out = length_prefix(payload.len(), LIST_OFFSET);
            out.extend_from_slice(&payload);
            out
        }
    }
}

fn encode_bytes(bytes: &[u8]) -> Vec<u8> {
    if bytes.len() == 1 && bytes[0] < STRING_OFFSET {
        return bytes.to_vec();
    }

    let mut out = length_prefix(bytes.len(), STRING_OFFSET);
    out.extend_from_slice(bytes);
    out
}

fn length_prefix(len: usize, offset: u8) -> Vec<u8> {
    if len <= SHORT_LIMIT {
        return vec![offset + len as u8];
    }

    let len_bytes = integer_to_bytes(U256::from(len), None);
    let mut out = Vec::with_capacity(1 + len_bytes.len());
    out.push(offset + SHORT_LIMIT as u8 + len_bytes.len() as u8);
    out.extend_from_slice(&len_bytes);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_prefix(prefix: &[u8], payload: &[u8]) -> Vec<u8> {
        let mut out = prefix.to_vec();
        out.extend_from_slice(payload);
        out
    }

    fn list_of(item: RlpItem, count: usize) -> RlpItem {
        RlpItem::List(vec![item; count])
    }

    #[test]
    fn test_integers() {
        assert_eq!(encode(&RlpItem::from(0u64)), vec![0x80]);
        assert_eq!(encode(&RlpItem::from(0x7fu64)), vec![0x7f]);
        assert_eq!(encode(&RlpItem::from(0x80u64)), vec![0x81, 0x80]);
        assert_eq!(encode(&RlpItem::from(1024u64)), vec![0x82, 0x04, 0x00]);
    }

    #[test]
    fn test_zero_and_empty_string_match() {
        assert_eq!(encode(&RlpItem::from(0u64)), encode(&RlpItem::Bytes(vec![])));
    }

    #[test]
    fn test_single_bytes() {
        assert_eq!(encode(&RlpItem::Bytes(vec![0x00])), vec![0x00]);
        assert_eq!(encode(&RlpItem::Bytes(vec![0x7f])), vec![0x7f]);
        assert_eq!(encode(&RlpItem::Bytes(vec![0x80])), vec![0x81, 0x80]);
    }

    #[test]
    fn test_string_boundaries() {
        let p55 = vec![0x80; 55];
        let p56 = vec![0x80; 56];
        let p256 = vec![0x80; 256];

        assert_eq!(encode(&RlpItem::Bytes(p55.clone())), with_prefix(&[0xb7], &p55));
        assert_eq!(encode(&RlpItem::Bytes(p56.clone())), with_prefix(&[0xb8, 0x38], &p56));
        assert_eq!(
            encode(&RlpItem::Bytes(p256.clone())),
            with_prefix(&[0xb9, 0x01, 0x00], &p256)
        );
    }

    #[test]
    fn test_list_boundaries() {
        let item = RlpItem::Bytes(vec![0x7f]);

        assert_eq!(encode(&RlpItem::List(vec![])), vec![0xc0]);
        assert_eq!(encode(&RlpItem::List(vec![RlpItem::from(0u64)])), vec![0xc1, 0x80]);
        assert_eq!(encode(&list_of(item.clone(), 1)), vec![0xc1, 0x7f]);
        assert_eq!(
            encode(&list_of(item.clone(), 55)),
            with_prefix(&[0xf7], &[0x7f; 55])
        );
        assert_eq!(
            encode(&list_of(item.clone(), 56)),
            with_prefix(&[0xf8, 0x38], &[0x7f; 56])
        );
        assert_eq!(
            encode(&list_of(item, 256)),
            with_prefix(&[0xf9, 0x01, 0x00], &[0x7f; 256])
        );
    }

    #[test]
    fn test_nesting_composes() {
        let inner = RlpItem::List(vec![RlpItem::Bytes(vec![0x7f])]);
        let outer = RlpItem::List(vec![inner.clone()]);

        assert_eq!(encode(&outer), with_prefix(&[0xc2], &encode(&inner)));
        assert_eq!(encode(&outer), vec![0xc2, 0xc1, 0x7f]);
    }

    #[test]
    fn test_address_is_a_twenty_byte_string() {
        let encoded = encode(&RlpItem::from(Address::repeat_byte(0x35)));
        assert_eq!(encoded.len(), 21);
        assert_eq!(encoded[0], 0x94);
    }
}
