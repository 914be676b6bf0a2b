//! Transaction lifecycle: nonce, gas, signing, submission and confirmation

pub mod gas;
pub mod nonce;
pub mod revert;
pub mod sender;
pub mod transaction;

pub use revert::decode_revert_reason;
pub use sender::{parse_chain_id, SendOptions, TransactionSender};
pub use transaction::LegacyTransaction;
