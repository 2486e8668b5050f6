//! JSON-RPC client for a NEAR node.

use crate::errors::ClientError;
use serde_json::{json, Value};
use tracing::{debug, trace};

/// A JSON-RPC 2.0 client bound to one node URL.
#[derive(Debug, Clone)]
pub struct JsonRpcClient {
    url: String,
    http: reqwest::Client,
}

impl JsonRpcClient {
    /// Creates a client for the node at `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Gets the node URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Calls `method` with `params` and returns the `result` member.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value, ClientError> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": "dontcare",
            "method": method,
            "params": params,
        });
        debug!("RPC {} -> {}", method, self.url);

        let response = self.http.post(&self.url).json(&request).send().await?;
        let response_text = response.text().await?;
        trace!("RPC {} raw response: {}", method, response_text);

        if response_text.is_empty() {
            return Err(ClientError::InvalidResponse("empty response from node".to_string()));
        }

        let response: Value = serde_json::from_str(&response_text)
            .map_err(|e| ClientError::InvalidResponse(format!("failed to parse response: {}", e)))?;

        if let Some(error) = response.get("error") {
            if !error.is_null() {
                return Err(rpc_error(error));
            }
        }

        response
            .get("result")
            .cloned()
            .ok_or_else(|| ClientError::InvalidResponse(format!("no result in response: {}", response_text)))
    }

    /// Runs a `query` request.
    ///
    /// Older nodes report view failures inside `result.error` instead of the
    /// JSON-RPC error member, so both are treated as errors.
    pub async fn query(&self, request: Value) -> Result<Value, ClientError> {
        let result = self.call("query", request).await?;
        if let Some(message) = result.get("error").and_then(Value::as_str) {
            return Err(ClientError::Rpc {
                code: -32000,
                message: message.to_string(),
            });
        }
        Ok(result)
    }

    /// Gets the base58 hash of the latest final block.
    pub async fn final_block_hash(&self) -> Result<String, ClientError> {
        let block = self.call("block", json!({ "finality": "final" })).await?;
        block
            .pointer("/header/hash")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ClientError::InvalidResponse("block without header hash".to_string()))
    }

    /// Submits a base64 encoded signed transaction and waits for the outcome.
    pub async fn broadcast_tx_commit(&self, signed_tx_base64: String) -> Result<Value, ClientError> {
        self.call("broadcast_tx_commit", json!([signed_tx_base64])).await
    }
}

/// Turns a JSON-RPC error object into a `ClientError`, keeping any detail
/// the node put in `data`.
fn rpc_error(error: &Value) -> ClientError {
    let code = error.get("code").and_then(Value::as_i64).unwrap_or(-32000);
    let message = error
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("unknown error")
        .to_string();
    let message = match error.get("data") {
        Some(Value::String(data)) => format!("{}: {}", message, data),
        Some(data) if !data.is_null() => format!("{}: {}", message, data),
        _ => message,
    };
    ClientError::Rpc { code, message }
}
