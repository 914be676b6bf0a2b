//! Byte codec - big-endian integers, hex strings and RLP
//!
//! Everything that is hashed or put on the wire goes through this module:
//! - Minimal big-endian integer encoding
//! - `0x`-prefixed hex encoding and tolerant decoding
//! - Recursive length-prefix (RLP) serialization

pub mod bytes;
pub mod rlp;

pub use bytes::{decode_hex, encode_hex, integer_to_bytes, to_hex};
pub use rlp::RlpItem;
