//! Cryptographic primitives: keccak256 and secp256k1 transaction signing

pub mod keccak;
pub mod signer;

pub use keccak::{function_selector, keccak256};
pub use signer::{recover_public_key, RecoverableSignature, Signer};
