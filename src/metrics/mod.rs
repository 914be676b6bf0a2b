//! Prometheus metrics for monitoring
//!
//! Exposes metrics for:
//! - RPC requests and errors per method
//! - Transaction submission and outcome
//! - Receipt wait latency
//!
//! Metrics live in the default registry; `gather` renders them in the text
//! exposition format for whatever endpoint the embedding service runs.

use lazy_static::lazy_static;
use prometheus::{
    register_counter, register_counter_vec, register_histogram, Counter, CounterVec, Encoder,
    Histogram, TextEncoder,
};
use std::time::Duration;
use tracing::warn;

lazy_static! {
    // RPC metrics
    pub static ref RPC_REQUESTS: CounterVec = register_counter_vec!(
        "txclient_rpc_requests_total",
        "Total JSON-RPC requests by method",
        &["method"]
    ).unwrap();

    pub static ref RPC_ERRORS: CounterVec = register_counter_vec!(
        "txclient_rpc_errors_total",
        "Total failed JSON-RPC requests by method",
        &["method"]
    ).unwrap();

    // Transaction metrics
    pub static ref TX_SUBMITTED: Counter = register_counter!(
        "txclient_transactions_submitted_total",
        "Total transactions submitted"
    ).unwrap();

    pub static ref TX_CONFIRMED: Counter = register_counter!(
        "txclient_transactions_confirmed_total",
        "Total transactions confirmed with a successful status"
    ).unwrap();

    pub static ref TX_FAILED: CounterVec = register_counter_vec!(
        "txclient_transactions_failed_total",
        "Total submitted transactions that failed, by reason",
        &["reason"]
    ).unwrap();

    pub static ref RECEIPT_WAIT: Histogram = register_histogram!(
        "txclient_receipt_wait_seconds",
        "Time from submission until a receipt was observed",
        vec![0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0]
    ).unwrap();
}

/// Render all registered metrics
pub fn gather() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        warn!("Failed to encode metrics: {}", e);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

// Helper functions to record metrics

pub fn record_rpc_request(method: &str) {
    RPC_REQUESTS.with_label_values(&[method]).inc();
}

pub fn record_rpc_error(method: &str) {
    RPC_ERRORS.with_label_values(&[method]).inc();
}

pub fn record_tx_submitted() {
    TX_SUBMITTED.inc();
}

pub fn record_tx_confirmed() {
    TX_CONFIRMED.inc();
}

pub fn record_tx_failed(reason: &str) {
    TX_FAILED.with_label_values(&[reason]).inc();
}

pub fn record_receipt_wait(waited: Duration) {
    RECEIPT_WAIT.observe(waited.as_secs_f64());
}
