//! Solana JSON-RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Fetch the latest blockhash for transaction freshness
//! - Handle timeouts and network errors without panicking
//! - Record per-call metrics

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::time::timeout;
use url::Url;

use crate::blockchain::types::{Blockhash, RpcError, RpcResult};
use crate::config::RpcConfig;
use crate::observability::metrics;

/// Anything that can hand out a recent blockhash.
#[async_trait]
pub trait BlockhashSource: Send + Sync {
    async fn latest_blockhash(&self) -> RpcResult<Blockhash>;
}

/// Minimal JSON-RPC client for a single Solana endpoint.
#[derive(Debug, Clone)]
pub struct SolanaRpcClient {
    http: reqwest::Client,
    url: Url,
    commitment: String,
    timeout_duration: Duration,
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    result: Option<Value>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlockhashValue {
    blockhash: String,
    last_valid_block_height: u64,
}

#[derive(Debug, Deserialize)]
struct WithContext<T> {
    value: T,
}

impl SolanaRpcClient {
    /// Create a client for `url`.
    pub fn new(url: Url, config: &RpcConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            url,
            commitment: config.commitment.clone(),
            timeout_duration: Duration::from_secs(config.timeout_secs),
        }
    }

    /// The endpoint this client talks to.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Issue one JSON-RPC call and return its `result` member.
    async fn call(&self, method: &'static str, params: Value) -> RpcResult<Value> {
        let start = Instant::now();
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let request = self.http.post(self.url.clone()).json(&body).send();
        let result = match timeout(self.timeout_duration, request).await {
            Ok(Ok(response)) => Self::decode(response).await,
            Ok(Err(e)) => Err(RpcError::Http(e.to_string())),
            Err(_) => Err(RpcError::Timeout(self.timeout_duration.as_secs())),
        };

        let status = match &result {
            Ok(_) => "ok",
            Err(RpcError::Timeout(_)) => "timeout",
            Err(_) => "error",
        };
        metrics::record_rpc(method, status, start);

        if let Err(e) = &result {
            tracing::warn!(method, rpc_url = %self.url, error = %e, "RPC call failed");
        }
        result
    }

    async fn decode(response: reqwest::Response) -> RpcResult<Value> {
        let status = response.status();
        if !status.is_success() {
            return Err(RpcError::Http(format!("endpoint returned status {}", status)));
        }

        let envelope: RpcEnvelope = response
            .json()
            .await
            .map_err(|e| RpcError::Malformed(e.to_string()))?;

        if let Some(err) = envelope.error {
            return Err(RpcError::Node {
                code: err.code,
                message: err.message,
            });
        }
        envelope
            .result
            .ok_or_else(|| RpcError::Malformed("missing result".to_string()))
    }
}

#[async_trait]
impl BlockhashSource for SolanaRpcClient {
    async fn latest_blockhash(&self) -> RpcResult<Blockhash> {
        let result = self
            .call(
                "getLatestBlockhash",
                json!([{ "commitment": self.commitment }]),
            )
            .await?;

        let parsed: WithContext<BlockhashValue> = serde_json::from_value(result)
            .map_err(|e| RpcError::Malformed(format!("missing blockhash: {}", e)))?;

        tracing::debug!(
            blockhash = %parsed.value.blockhash,
            last_valid_block_height = parsed.value.last_valid_block_height,
            "Fetched latest blockhash"
        );

        Ok(Blockhash {
            blockhash: parsed.value.blockhash,
            last_valid_block_height: parsed.value.last_valid_block_height,
        })
    }
}
