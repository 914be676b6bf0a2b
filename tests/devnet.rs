//! Live tests against a development node
//!
//! Run with:
//! TXCLIENT_RPC_URL=http://127.0.0.1:8545 TXCLIENT_PRIVATE_KEY=0x... cargo test -- --ignored

use evm_txclient::config::{RpcConfig, SenderConfig};
use evm_txclient::{HttpProvider, SendOptions, Signer, TransactionSender, TxClientError};
use std::env;
use std::sync::Arc;
use std::time::Duration;

/// Runtime code that returns 42 for every call
const ANSWER_INIT_CODE: &str = "0x600a600c600039600a6000f3602a60805260206080f3";

async fn devnet_sender() -> TransactionSender {
    evm_txclient::logging::init_logging();

    let url = env::var("TXCLIENT_RPC_URL").unwrap_or_else(|_| "http://127.0.0.1:8545".to_string());
    let key = env::var("TXCLIENT_PRIVATE_KEY").expect("TXCLIENT_PRIVATE_KEY must be set");

    let provider = HttpProvider::new(&RpcConfig::new(url)).unwrap();
    let signer = Signer::from_hex(&key).unwrap();
    let config = SenderConfig {
        poll_interval_ms: 500,
        ..SenderConfig::default()
    };

    TransactionSender::connect(Arc::new(provider), signer, config)
        .await
        .unwrap()
}

#[tokio::test]
#[ignore]
async fn test_deploy_and_call() {
    let sender = devnet_sender().await;

    let receipt = sender
        .send_tx_hex(ANSWER_INIT_CODE, SendOptions::default())
        .await
        .unwrap();
    assert!(receipt.succeeded());
    let contract = receipt.contract_address().expect("deployment without contract address");

    let receipt = sender.call(contract, "answer").await.unwrap();
    assert!(receipt.succeeded());
    assert!(receipt.contract_address().is_none());
}

#[tokio::test]
#[ignore]
async fn test_invalid_init_code_is_rejected() {
    // ADD on an empty stack fails gas estimation, so nothing is submitted
    let sender = devnet_sender().await;

    let err = sender
        .send_tx(&[0x01], SendOptions::default().with_timeout(Duration::from_secs(10)))
        .await
        .unwrap_err();
    assert!(
        matches!(
            err,
            TxClientError::Reverted(_) | TxClientError::Remote { .. }
        ),
        "unexpected error: {:?}",
        err
    );
}

#[tokio::test]
#[ignore]
async fn test_connect_resolves_account() {
    let sender = devnet_sender().await;
    let key = env::var("TXCLIENT_PRIVATE_KEY").unwrap();

    assert!(sender.chain_id() > 0);
    assert_eq!(sender.address(), Signer::from_hex(&key).unwrap().address());
}
