//! Local keccak256, the ledger's hash primitive

use ethers::types::H256;
use sha3::{Digest, Keccak256};

pub fn keccak256(data: &[u8]) -> H256 {
    H256::from_slice(Keccak256::digest(data).as_slice())
}

/// First four bytes of keccak256 of a function signature such as `hello()`
pub fn function_selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash.as_bytes()[..4]);
    selector
}
