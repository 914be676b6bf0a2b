//! Transaction sender: build, sign, submit and confirm
//!
//! Every remote round-trip is awaited before the next one starts. A sender
//! does not serialize its own callers: concurrent `send_tx` calls for the
//! same account read the same nonce, so callers that need concurrency must
//! serialize submission per account themselves.

use super::gas;
use super::nonce::fetch_nonce;
use super::transaction::LegacyTransaction;
use crate::chain::{methods, parse_quantity, HttpProvider, Receipt, RpcChannel, LATEST};
use crate::chain::rpc::parse_string;
use crate::codec::{decode_hex, to_hex};
use crate::config::{HashSource, SenderConfig, Settings};
use crate::crypto::{self, Signer};
use crate::error::{TxClientError, TxClientResult};
use crate::metrics;

use ethers::types::{Address, H256, U256};
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Per-transaction options
#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    /// Recipient; `None` deploys `data` as init code
    pub to: Option<Address>,
    pub value: U256,
    /// Receipt wait budget; the configured default when `None`
    pub timeout: Option<Duration>,
}

impl SendOptions {
    pub fn to(address: Address) -> Self {
        Self {
            to: Some(address),
            ..Self::default()
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Signs and submits transactions from one account
pub struct TransactionSender {
    /// Node connection
    rpc: Arc<dyn RpcChannel>,
    /// Account key
    signer: Signer,
    /// Chain id for EIP-155 replay protection
    chain_id: u64,
    /// Gas price fetched at connect time
    gas_price: U256,
    /// Sender address
    address: Address,
    /// Polling and hashing behaviour
    config: SenderConfig,
}

impl TransactionSender {
    /// Resolve the chain id, fetch the gas price and derive the sender address
    pub async fn connect(
        rpc: Arc<dyn RpcChannel>,
        signer: Signer,
        config: SenderConfig,
    ) -> TxClientResult<Self> {
        config.validate()?;

        let chain_id = resolve_chain_id(rpc.as_ref(), config.chain_id).await?;
        let gas_price = gas::suggested_gas_price(rpc.as_ref()).await?;

        let public_key = signer.public_key();
        let key_hash = hash(rpc.as_ref(), config.hash_source, &public_key).await?;
        let address = Address::from_slice(&key_hash.as_bytes()[12..]);

        info!(
            "Transaction sender initialized for {} on chain {} (gas price {})",
            to_hex(address.as_bytes()),
            chain_id,
            gas_price
        );

        Ok(Self {
            rpc,
            signer,
            chain_id,
            gas_price,
            address,
            config,
        })
    }

    /// Connect over HTTP using a loaded configuration
    pub async fn from_settings(settings: &Settings) -> TxClientResult<Self> {
        let provider = HttpProvider::new(&settings.rpc)?;
        let signer = settings.signer()?;
        Self::connect(Arc::new(provider), signer, settings.sender.clone()).await
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn gas_price(&self) -> U256 {
        self.gas_price
    }

    /// Send a transaction and wait for its receipt
    ///
    /// Fails with `Reverted` when gas estimation fails with a decodable
    /// reason, `Timeout` when no receipt shows up in time and
    /// `TransactionFailed` when the receipt reports a failed execution.
    pub async fn send_tx(&self, data: &[u8], options: SendOptions) -> TxClientResult<Receipt> {
        let rpc = self.rpc.as_ref();

        let nonce = fetch_nonce(rpc, self.address, LATEST).await?;
        let gas_limit = gas::estimate_gas_limit(rpc, options.to, data).await?;

        let tx = LegacyTransaction::new(
            self.chain_id,
            nonce,
            self.gas_price,
            gas_limit,
            options.to,
            options.value,
            data.to_vec(),
        );

        let digest = self.keccak256(&tx.rlp()).await?;
        let signature = self.signer.sign(digest.as_bytes())?;
        let tx = tx.with_signature(self.chain_id, &signature);

        let raw = to_hex(&tx.rlp());
        let tx_hash = self
            .rpc
            .invoke(methods::SEND_RAW_TRANSACTION, vec![json!(raw)])
            .await?;
        let tx_hash = parse_string(tx_hash, "transaction hash")?;

        info!(
            "Transaction sent: {} (nonce {}, gas limit {})",
            tx_hash, nonce, gas_limit
        );
        metrics::record_tx_submitted();

        let timeout = options
            .timeout
            .unwrap_or_else(|| self.config.receipt_timeout());
        let started = Instant::now();
        let receipt = match self.wait_for_receipt(&tx_hash, timeout).await {
            Ok(receipt) => receipt,
            Err(e) => {
                metrics::record_tx_failed(wait_failure_label(&e));
                return Err(e);
            }
        };
        metrics::record_receipt_wait(started.elapsed());

        if !receipt.succeeded() {
            warn!("Transaction {} failed on chain", tx_hash);
            metrics::record_tx_failed("status");
            return Err(TxClientError::TransactionFailed { tx_hash });
        }

        info!("Transaction {} confirmed", tx_hash);
        metrics::record_tx_confirmed();
        Ok(receipt)
    }

    /// `send_tx` with a hex payload, `0x` optional
    pub async fn send_tx_hex(
        &self,
        data_hex: &str,
        options: SendOptions,
    ) -> TxClientResult<Receipt> {
        let data = decode_hex(data_hex)?;
        self.send_tx(&data, options).await
    }

    /// Call a no-argument function, e.g. `call(address, "hello")`
    pub async fn call(&self, address: Address, function: &str) -> TxClientResult<Receipt> {
        let signature = format!("{}()", function);
        let selector = self.keccak256(signature.as_bytes()).await?;

        debug!("Calling {} on {}", signature, to_hex(address.as_bytes()));
        self.send_tx(&selector.as_bytes()[..4], SendOptions::to(address))
            .await
    }

    async fn keccak256(&self, data: &[u8]) -> TxClientResult<H256> {
        hash(self.rpc.as_ref(), self.config.hash_source, data).await
    }

    /// Poll for a receipt at a fixed interval until `timeout` has elapsed
    async fn wait_for_receipt(&self, tx_hash: &str, timeout: Duration) -> TxClientResult<Receipt> {
        let poll_interval = self.config.poll_interval();
        let mut elapsed = Duration::ZERO;

        loop {
            let receipt = self
                .rpc
                .invoke(methods::TRANSACTION_RECEIPT, vec![json!(tx_hash)])
                .await?;

            if let Some(receipt) = Receipt::from_value(receipt) {
                return Ok(receipt);
            }

            if elapsed >= timeout {
                warn!("No receipt for {} after {:?}", tx_hash, elapsed);
                return Err(TxClientError::Timeout {
                    tx_hash: tx_hash.to_string(),
                    waited: elapsed,
                });
            }

            debug!("Receipt for {} pending ({:?} elapsed)", tx_hash, elapsed);
            tokio::time::sleep(poll_interval).await;
            elapsed += poll_interval;
        }
    }
}

/// Metrics label for an error raised while waiting for a receipt
fn wait_failure_label(error: &TxClientError) -> &'static str {
    match error {
        TxClientError::Timeout { .. } => "timeout",
        e if e.is_transport() => "transport",
        _ => "rpc",
    }
}

/// Parse a textual chain id, e.g. from the environment
pub fn parse_chain_id(value: &str) -> TxClientResult<i64> {
    let chain_id: i64 = value
        .trim()
        .parse()
        .map_err(|_| TxClientError::InvalidChainId(format!("{:?}", value)))?;

    if chain_id <= 0 {
        return Err(TxClientError::InvalidChainId(format!("{:?}", value)));
    }
    Ok(chain_id)
}

async fn resolve_chain_id(rpc: &dyn RpcChannel, explicit: Option<i64>) -> TxClientResult<u64> {
    match explicit {
        Some(chain_id) if chain_id > 0 => Ok(chain_id as u64),
        Some(chain_id) => Err(TxClientError::InvalidChainId(chain_id.to_string())),
        None => {
            let value = rpc.invoke(methods::CHAIN_ID, vec![]).await?;
            let chain_id = parse_quantity(&value, "chain id")
                .map_err(|_| TxClientError::InvalidChainId(value.to_string()))?;

            if chain_id.is_zero() || chain_id > U256::from(u64::MAX) {
                return Err(TxClientError::InvalidChainId(value.to_string()));
            }
            Ok(chain_id.as_u64())
        }
    }
}

async fn hash(rpc: &dyn RpcChannel, source: HashSource, data: &[u8]) -> TxClientResult<H256> {
    match source {
        HashSource::Local => Ok(crypto::keccak256(data)),
        HashSource::Remote => {
            let digest = rpc.invoke(methods::SHA3, vec![json!(to_hex(data))]).await?;
            let digest = parse_string(digest, "sha3 digest")?;
            let bytes = decode_hex(&digest)
                .map_err(|_| TxClientError::Protocol(format!("invalid digest {:?}", digest)))?;

            if bytes.len() != 32 {
                return Err(TxClientError::Protocol(format!(
                    "digest must be 32 bytes, got {}",
                    bytes.len()
                )));
            }
            Ok(H256::from_slice(&bytes))
        }
    }
}
