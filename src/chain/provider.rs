//! HTTP JSON-RPC provider

use super::rpc::{JsonRpcRequest, JsonRpcResponse, RpcChannel};
use crate::config::RpcConfig;
use crate::error::{TxClientError, TxClientResult};
use crate::metrics;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// Longest response excerpt quoted in protocol errors
const EXCERPT_LEN: usize = 64;

/// JSON-RPC 2.0 over HTTP(S)
///
/// Request ids start at 1 and increase by one per request. The counter is
/// atomic, so a provider may be shared between tasks.
pub struct HttpProvider {
    url: Url,
    client: Client,
    next_id: AtomicU64,
}

impl HttpProvider {
    /// Create a provider; no connection is opened until the first request
    pub fn new(config: &RpcConfig) -> TxClientResult<Self> {
        let url = parse_url(&config.url)?;
        config.validate()?;

        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(config.open_timeout())
            .read_timeout(config.read_timeout())
            .pool_idle_timeout(config.keep_alive_timeout())
            .build()
            .map_err(|e| TxClientError::Config(format!("Failed to build HTTP client: {}", e)))?;

        debug!("Created HTTP provider for {}", url);

        Ok(Self {
            url,
            client,
            next_id: AtomicU64::new(0),
        })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn send(&self, request: &JsonRpcRequest<'_>) -> TxClientResult<Value> {
        let response = self
            .client
            .post(self.url.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        let envelope: JsonRpcResponse = serde_json::from_slice(&body).map_err(|e| {
            let excerpt: String = String::from_utf8_lossy(&body)
                .chars()
                .take(EXCERPT_LEN)
                .collect();
            TxClientError::Protocol(format!(
                "cannot parse response (HTTP {}): {}: {:?}",
                status, e, excerpt
            ))
        })?;

        envelope.into_result(request.id)
    }

    fn transport_error(&self, error: reqwest::Error) -> TxClientError {
        if error.is_connect() {
            TxClientError::Connection {
                url: self.url.to_string(),
                message: error.to_string(),
            }
        } else if error.is_timeout() {
            TxClientError::ReadTimeout {
                url: self.url.to_string(),
            }
        } else if error.is_request() {
            TxClientError::Connection {
                url: self.url.to_string(),
                message: error.to_string(),
            }
        } else {
            TxClientError::Protocol(format!("{}: {}", self.url, error))
        }
    }
}

#[async_trait]
impl RpcChannel for HttpProvider {
    async fn invoke(&self, method: &str, params: Vec<Value>) -> TxClientResult<Value> {
        let id = self.next_id();
        let request = JsonRpcRequest::new(method, &params, id);

        debug!("RPC request #{} {} {:?}", id, method, params);
        metrics::record_rpc_request(method);

        let result = self.send(&request).await;

        if let Err(ref e) = result {
            if e.is_transport() {
                warn!("RPC {} to {} failed: {}", method, self.url, e);
            } else {
                debug!("RPC {} returned error: {}", method, e);
            }
            metrics::record_rpc_error(method);
        }

        result
    }
}

fn parse_url(value: &str) -> TxClientResult<Url> {
    let url = Url::parse(value).map_err(|_| TxClientError::InvalidUrl(format!("{:?}", value)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(TxClientError::InvalidUrl(format!("{:?}", value))),
    }
}
