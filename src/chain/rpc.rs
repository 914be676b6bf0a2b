//! JSON-RPC channel abstraction and envelope types

use crate::error::{TxClientError, TxClientResult};

use async_trait::async_trait;
use ethers::types::U256;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Remote methods used by the client
pub mod methods {
    pub const CHAIN_ID: &str = "eth_chainId";
    pub const GAS_PRICE: &str = "eth_gasPrice";
    pub const ESTIMATE_GAS: &str = "eth_estimateGas";
    pub const CALL: &str = "eth_call";
    pub const TRANSACTION_COUNT: &str = "eth_getTransactionCount";
    pub const SEND_RAW_TRANSACTION: &str = "eth_sendRawTransaction";
    pub const TRANSACTION_RECEIPT: &str = "eth_getTransactionReceipt";
    pub const SHA3: &str = "web3_sha3";
}

/// Block tag for state queries
pub const LATEST: &str = "latest";

/// Request/response channel to a ledger node
///
/// One call is one remote method invocation; a JSON `null` result is
/// returned as `Value::Null`, not as an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RpcChannel: Send + Sync {
    async fn invoke(&self, method: &str, params: Vec<Value>) -> TxClientResult<Value>;
}

#[derive(Debug, Serialize)]
pub struct JsonRpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub method: &'a str,
    pub params: &'a [Value],
    pub id: u64,
}

impl<'a> JsonRpcRequest<'a> {
    pub fn new(method: &'a str, params: &'a [Value], id: u64) -> Self {
        Self {
            jsonrpc: "2.0",
            method,
            params,
            id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcError {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<ErrorData>,
}

/// The `data` member of an error object
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ErrorData {
    Text(String),
    Structured(Value),
}

/// Some nodes report `eth_call` reverts as an error whose data carries the
/// return payload behind this prefix.
const REVERTED_PREFIX: &str = "Reverted ";

impl JsonRpcResponse {
    /// Check the echoed id and turn the envelope into a result
    pub fn into_result(self, expected_id: u64) -> TxClientResult<Value> {
        if self.id.as_u64() != Some(expected_id) {
            return Err(TxClientError::Protocol(format!(
                "invalid response id: {} (expected {})",
                self.id, expected_id
            )));
        }

        if let Some(error) = self.error {
            let mut message = error.message;

            if let Some(ErrorData::Text(data)) = error.data {
                if let Some(payload) = data.strip_prefix(REVERTED_PREFIX) {
                    return Ok(Value::String(payload.to_string()));
                }
                message.push(' ');
                message.push_str(&data);
            }

            return Err(TxClientError::Remote {
                code: error.code,
                message,
            });
        }

        Ok(self.result.unwrap_or(Value::Null))
    }
}

/// Parse a hex quantity such as `"0x1a"`
pub fn parse_quantity(value: &Value, what: &str) -> TxClientResult<U256> {
    match value {
        Value::String(text) => {
            let digits = text.strip_prefix("0x").ok_or_else(|| {
                TxClientError::Protocol(format!("{} is not a hex quantity: {:?}", what, text))
            })?;
            if digits.is_empty() || digits.len() > 64 {
                return Err(TxClientError::Protocol(format!(
                    "{} is not a hex quantity: {:?}",
                    what, text
                )));
            }
            U256::from_str_radix(digits, 16).map_err(|_| {
                TxClientError::Protocol(format!("{} is not a hex quantity: {:?}", what, text))
            })
        }
        Value::Number(number) => number.as_u64().map(U256::from).ok_or_else(|| {
            TxClientError::Protocol(format!("{} is not a quantity: {}", what, number))
        }),
        other => Err(TxClientError::Protocol(format!(
            "{} is not a quantity: {}",
            what, other
        ))),
    }
}

/// Parse a string result such as a transaction hash
pub fn parse_string(value: Value, what: &str) -> TxClientResult<String> {
    match value {
        Value::String(text) => Ok(text),
        other => Err(TxClientError::Protocol(format!(
            "{} is not a string: {}",
            what, other
        ))),
    }
}
