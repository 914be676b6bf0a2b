//! Gas price and gas limit queries
//!
//! A failed estimate is re-run as an `eth_call` so that a contract's revert
//! reason can be reported instead of the node's generic error.

use super::revert::decode_revert_reason;
use crate::chain::{methods, parse_quantity, RpcChannel, LATEST};
use crate::codec::to_hex;
use crate::error::{TxClientError, TxClientResult};

use ethers::types::{Address, U256};
use serde_json::{json, Value};
use tracing::{debug, warn};

/// Node's suggested gas price
pub async fn suggested_gas_price(rpc: &dyn RpcChannel) -> TxClientResult<U256> {
    let price = rpc.invoke(methods::GAS_PRICE, vec![]).await?;
    let price = parse_quantity(&price, "gas price")?;
    debug!("Suggested gas price: {}", price);
    Ok(price)
}

/// Estimate the gas limit for sending `data` to `to`
pub async fn estimate_gas_limit(
    rpc: &dyn RpcChannel,
    to: Option<Address>,
    data: &[u8],
) -> TxClientResult<U256> {
    let call = call_object(to, data);

    let estimate = rpc
        .invoke(methods::ESTIMATE_GAS, vec![call.clone()])
        .await
        .and_then(|gas| parse_quantity(&gas, "gas estimate"));

    match estimate {
        Ok(gas) => Ok(gas),
        Err(e) if e.is_transport() => Err(e),
        Err(e) => {
            debug!("Gas estimation failed, simulating call for a reason: {}", e);
            match revert_reason(rpc, call).await {
                Some(reason) => {
                    warn!("Transaction would revert: {}", reason);
                    Err(TxClientError::Reverted(reason))
                }
                None => Err(e),
            }
        }
    }
}

async fn revert_reason(rpc: &dyn RpcChannel, call: Value) -> Option<String> {
    match rpc.invoke(methods::CALL, vec![call, json!(LATEST)]).await {
        Ok(Value::String(payload)) => decode_revert_reason(&payload),
        Ok(_) => None,
        Err(e) => {
            debug!("Call simulation failed: {}", e);
            None
        }
    }
}

fn call_object(to: Option<Address>, data: &[u8]) -> Value {
    json!({
        "to": to.map(|address| to_hex(address.as_bytes())),
        "data": to_hex(data),
    })
}
