//! Legacy transaction record with EIP-155 replay protection

use crate::codec::rlp::{self, RlpItem};
use crate::crypto::RecoverableSignature;

use ethers::types::{Address, U256};

/// Legacy transaction in RLP field order
///
/// Before signing `v` holds the chain id and `r`, `s` are zero, which is the
/// EIP-155 signing payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyTransaction {
    pub nonce: U256,
    pub gas_price: U256,
    pub gas_limit: U256,
    /// `None` creates a contract
    pub to: Option<Address>,
    pub value: U256,
    /// Init code or call data
    pub data: Vec<u8>,
    pub v: U256,
    pub r: U256,
    pub s: U256,
}

impl LegacyTransaction {
    /// Build the unsigned record for `chain_id`
    pub fn new(
        chain_id: u64,
        nonce: U256,
        gas_price: U256,
        gas_limit: U256,
        to: Option<Address>,
        value: U256,
        data: Vec<u8>,
    ) -> Self {
        Self {
            nonce,
            gas_price,
            gas_limit,
            to,
            value,
            data,
            v: U256::from(chain_id),
            r: U256::zero(),
            s: U256::zero(),
        }
    }

    /// Apply a signature over the unsigned encoding
    pub fn with_signature(self, chain_id: u64, signature: &RecoverableSignature) -> Self {
        let v = U256::from(chain_id) * 2u64 + 35u64 + u64::from(signature.recovery_id);
        Self {
            v,
            r: signature.r,
            s: signature.s,
            ..self
        }
    }

    pub fn is_signed(&self) -> bool {
        !self.r.is_zero() && !self.s.is_zero()
    }

    /// RLP encoding of all nine fields
    pub fn rlp(&self) -> Vec<u8> {
        rlp::encode(&self.rlp_item())
    }

    fn rlp_item(&self) -> RlpItem {
        let to = match self.to {
            Some(address) => RlpItem::from(address),
            None => RlpItem::Bytes(Vec::new()),
        };

        RlpItem::List(vec![
            RlpItem::Int(self.nonce),
            RlpItem::Int(self.gas_price),
            RlpItem::Int(self.gas_limit),
            to,
            RlpItem::Int(self.value),
            RlpItem::Bytes(self.data.clone()),
            RlpItem::Int(self.v),
            RlpItem::Int(self.r),
            RlpItem::Int(self.s),
        ])
    }
}
