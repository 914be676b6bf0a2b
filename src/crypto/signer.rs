//! secp256k1 signing with recovery id derivation
//!
//! Signatures are RFC 6979 deterministic and low-s normalized, which is the
//! only form consensus accepts. The recovery id is derived by reconstructing
//! the public key under the even-y assumption (id 0) and comparing it to the
//! signer's own key; any mismatch means id 1.
//!
//! Ids 2 and 3 are only needed when `r` overflows the group order. They are
//! never produced.

use super::keccak::keccak256;
use crate::codec::bytes::strip_hex_prefix;
use crate::error::{TxClientError, TxClientResult};

use ethers::types::{Address, U256};
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use std::fmt;

/// ECDSA signature split into scalars plus the recovery id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoverableSignature {
    pub r: U256,
    pub s: U256,
    pub recovery_id: u8,
}

/// Holds a private key and signs transaction digests
pub struct Signer {
    key: SigningKey,
    public_key: [u8; 64],
}

impl Signer {
    /// Parse a hex private key, with or without `0x`
    ///
    /// Short keys are left-padded, so `"1"` is the scalar one.
    pub fn from_hex(key: &str) -> TxClientResult<Self> {
        let digits = strip_hex_prefix(key.trim());
        if digits.is_empty() || digits.len() > 64 {
            return Err(TxClientError::InvalidKey);
        }

        let padded = format!("{:0>64}", digits);
        let bytes = hex::decode(padded).map_err(|_| TxClientError::InvalidKey)?;
        Self::from_bytes(&bytes)
    }

    /// Build from a big-endian scalar of at most 32 bytes
    pub fn from_bytes(bytes: &[u8]) -> TxClientResult<Self> {
        if bytes.is_empty() || bytes.len() > 32 {
            return Err(TxClientError::InvalidKey);
        }

        let mut scalar = [0u8; 32];
        scalar[32 - bytes.len()..].copy_from_slice(bytes);

        // Rejects zero and anything at or above the group order
        let key = SigningKey::from_slice(&scalar).map_err(|_| TxClientError::InvalidKey)?;
        let public_key = uncompressed(key.verifying_key());

        Ok(Self { key, public_key })
    }

    /// Uncompressed public point without the `0x04` format byte
    pub fn public_key(&self) -> [u8; 64] {
        self.public_key
    }

    /// Last 20 bytes of keccak256 of the public key
    pub fn address(&self) -> Address {
        Address::from_slice(&keccak256(&self.public_key).as_bytes()[12..])
    }

    /// Sign a 32-byte digest
    pub fn sign(&self, digest: &[u8]) -> TxClientResult<RecoverableSignature> {
        if digest.len() != 32 {
            return Err(TxClientError::InvalidInput(format!(
                "digest must be 32 bytes, got {}",
                digest.len()
            )));
        }

        let (signature, _) = self
            .key
            .sign_prehash_recoverable(digest)
            .map_err(|e| TxClientError::InvalidInput(format!("signing failed: {}", e)))?;
        let signature = signature.normalize_s().unwrap_or(signature);

        let recovery_id = self.recovery_id(digest, &signature);
        let (r, s) = signature.split_bytes();

        Ok(RecoverableSignature {
            r: U256::from_big_endian(&r),
            s: U256::from_big_endian(&s),
            recovery_id,
        })
    }

    fn recovery_id(&self, digest: &[u8], signature: &Signature) -> u8 {
        let even_y = RecoveryId::new(false, false);
        match VerifyingKey::recover_from_prehash(digest, signature, even_y) {
            Ok(recovered) if recovered == *self.key.verifying_key() => 0,
            _ => 1,
        }
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

/// Reconstruct the signer's public key from a digest and signature
pub fn recover_public_key(
    digest: &[u8],
    signature: &RecoverableSignature,
) -> TxClientResult<[u8; 64]> {
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    signature.r.to_big_endian(&mut r);
    signature.s.to_big_endian(&mut s);

    let parsed = Signature::from_scalars(r, s)
        .map_err(|e| TxClientError::InvalidInput(format!("invalid signature: {}", e)))?;
    let recovery_id = RecoveryId::from_byte(signature.recovery_id).ok_or_else(|| {
        TxClientError::InvalidInput(format!("invalid recovery id {}", signature.recovery_id))
    })?;

    let key = VerifyingKey::recover_from_prehash(digest, &parsed, recovery_id)
        .map_err(|e| TxClientError::InvalidInput(format!("recovery failed: {}", e)))?;

    Ok(uncompressed(&key))
}

fn uncompressed(key: &VerifyingKey) -> [u8; 64] {
    let point = key.to_encoded_point(false);
    let mut out = [0u8; 64];
    out.copy_from_slice(&point.as_bytes()[1..]);
    out
}
