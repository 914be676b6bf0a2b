//! Transaction receipts as returned by the node
//!
//! Only the status flag and the created contract address are interpreted;
//! the rest of the object is kept as-is for callers.

use super::rpc::parse_quantity;
use crate::codec::decode_hex;

use ethers::types::Address;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Receipt {
    raw: Value,
}

impl Receipt {
    /// Wrap a receipt result; `null` means not yet mined
    pub fn from_value(raw: Value) -> Option<Self> {
        if raw.is_null() {
            None
        } else {
            Some(Self { raw })
        }
    }

    /// Execution status, `None` when the node does not report one
    pub fn status(&self) -> Option<bool> {
        match self.raw.get("status")? {
            Value::Bool(ok) => Some(*ok),
            value @ (Value::String(_) | Value::Number(_)) => {
                parse_quantity(value, "status").ok().map(|status| !status.is_zero())
            }
            _ => None,
        }
    }

    /// False only for an explicit failure status
    pub fn succeeded(&self) -> bool {
        self.status() != Some(false)
    }

    /// Address of the contract created by this transaction
    pub fn contract_address(&self) -> Option<Address> {
        let text = self.raw.get("contractAddress")?.as_str()?;
        let bytes = decode_hex(text).ok()?;
        (bytes.len() == 20).then(|| Address::from_slice(&bytes))
    }

    pub fn transaction_hash(&self) -> Option<&str> {
        self.raw.get("transactionHash")?.as_str()
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn into_raw(self) -> Value {
        self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_is_pending() {
        assert!(Receipt::from_value(Value::Null).is_none());
    }

    #[test]
    fn test_status() {
        let ok = Receipt::from_value(json!({"status": "0x1"})).unwrap();
        assert_eq!(ok.status(), Some(true));
        assert!(ok.succeeded());

        let failed = Receipt::from_value(json!({"status": "0x0"})).unwrap();
        assert_eq!(failed.status(), Some(false));
        assert!(!failed.succeeded());

        let boolean = Receipt::from_value(json!({"status": false})).unwrap();
        assert!(!boolean.succeeded());

        let legacy = Receipt::from_value(json!({"root": "0xabcd"})).unwrap();
        assert_eq!(legacy.status(), None);
        assert!(legacy.succeeded());
    }

    #[test]
    fn test_contract_address() {
        let receipt = Receipt::from_value(json!({
            "status": "0x1",
            "transactionHash": "0x5e5f",
            "contractAddress": "0x5FbDB2315678afecb367f032d93F642f64180aa3"
        }))
        .unwrap();

        assert_eq!(
            receipt.contract_address(),
            Some(Address::from_slice(
                &decode_hex("0x5fbdb2315678afecb367f032d93f642f64180aa3").unwrap()
            ))
        );
        assert_eq!(receipt.transaction_hash(), Some("0x5e5f"));

        let call = Receipt::from_value(json!({"status": "0x1", "contractAddress": null})).unwrap();
        assert_eq!(call.contract_address(), None);
    }
}
