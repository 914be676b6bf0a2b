//! Minimal client for signing and broadcasting legacy EVM transactions
//!
//! The client talks to a node over JSON-RPC, signs EIP-155 transactions
//! locally and waits for their receipts.
//!
//! ```no_run
//! use evm_txclient::{config::Settings, SendOptions, TransactionSender};
//!
//! # async fn deploy(init_code: &[u8]) -> anyhow::Result<()> {
//! let settings = Settings::load()?;
//! let sender = TransactionSender::from_settings(&settings).await?;
//!
//! let receipt = sender.send_tx(init_code, SendOptions::default()).await?;
//! if let Some(contract) = receipt.contract_address() {
//!     sender.call(contract, "hello").await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod chain;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod tx;

pub use chain::{HttpProvider, Receipt, RpcChannel};
pub use crypto::{RecoverableSignature, Signer};
pub use error::{TxClientError, TxClientResult};
pub use tx::{LegacyTransaction, SendOptions, TransactionSender};
