//! Account nonce lookup
//!
//! The nonce is read from the node for every transaction. Nothing is cached
//! locally, so two transactions in flight for the same account will race.

use crate::chain::{methods, parse_quantity, RpcChannel};
use crate::codec::to_hex;
use crate::error::TxClientResult;

use ethers::types::{Address, U256};
use serde_json::json;
use tracing::debug;

/// Transaction count of `address` at block tag `block`
pub async fn fetch_nonce(
    rpc: &dyn RpcChannel,
    address: Address,
    block: &str,
) -> TxClientResult<U256> {
    let count = rpc
        .invoke(
            methods::TRANSACTION_COUNT,
            vec![json!(to_hex(address.as_bytes())), json!(block)],
        )
        .await?;
    let nonce = parse_quantity(&count, "transaction count")?;

    debug!("Nonce for {}: {}", to_hex(address.as_bytes()), nonce);
    Ok(nonce)
}
