//! Error types for the transaction client

use std::time::Duration;
use thiserror::Error;

/// Main error type for the client
#[derive(Error, Debug)]
pub enum TxClientError {
    #[error("Invalid private key")]
    InvalidKey,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid chain id: {0}")]
    InvalidChainId(String),

    #[error("Invalid url: {0}")]
    InvalidUrl(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cannot connect to {url}: {message}")]
    Connection { url: String, message: String },

    #[error("Read timeout: {url}")]
    ReadTimeout { url: String },

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("{message}")]
    Remote { code: Option<i64>, message: String },

    #[error("Execution reverted: {0}")]
    Reverted(String),

    #[error("Transaction timeout: {tx_hash} (waited {waited:?})")]
    Timeout { tx_hash: String, waited: Duration },

    #[error("Transaction failure: {tx_hash}")]
    TransactionFailed { tx_hash: String },
}

impl TxClientError {
    /// Failures of the transport itself, before any remote method ran
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            TxClientError::Connection { .. }
                | TxClientError::ReadTimeout { .. }
                | TxClientError::InvalidUrl(_)
        )
    }

    /// Failures reported by the remote node
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            TxClientError::Remote { .. } | TxClientError::Reverted(_)
        )
    }
}

/// Result type for client operations
pub type TxClientResult<T> = Result<T, TxClientError>;
