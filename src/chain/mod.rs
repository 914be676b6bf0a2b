//! Chain module - the node-facing side of the client
//!
//! This module provides:
//! - The `RpcChannel` abstraction every remote call goes through
//! - An HTTP JSON-RPC provider with connect/read/keep-alive timeouts
//! - Receipt interpretation

pub mod provider;
pub mod receipt;
pub mod rpc;

pub use provider::HttpProvider;
pub use receipt::Receipt;
pub use rpc::{methods, parse_quantity, RpcChannel, LATEST};
