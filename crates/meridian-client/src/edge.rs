// crates/meridian-client/src/edge.rs
//
// JSON-RPC 2.0 client for the edge daemon. The daemon exposes a small
// remote service (`MeridianEdge.Start` / `.Stop` / `.Status`) over HTTP
// POST; each call returns a human-readable reply string.

use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::Method;
use serde::{Deserialize, Serialize};

use meridian_core::Error;

use crate::transport::RequestSender;

/// Default edge daemon JSON-RPC endpoint.
pub const DEFAULT_EDGE_URL: &str = "http://localhost:5000/rpc";

/// A JSON-RPC 2.0 request envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
    pub id: u64,
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

/// A JSON-RPC 2.0 response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub result: Option<serde_json::Value>,
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC client for the edge daemon.
pub struct EdgeClient<T: RequestSender> {
    transport: T,
    url: String,
    next_id: AtomicU64,
}

impl<T: RequestSender> std::fmt::Debug for EdgeClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdgeClient")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl<T: RequestSender> EdgeClient<T> {
    /// Create a client that POSTs to the given JSON-RPC endpoint.
    pub fn new(transport: T, url: impl Into<String>) -> Self {
        Self {
            transport,
            url: url.into(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Invoke one remote method and return its result value.
    async fn call(&self, method: &str) -> Result<serde_json::Value, Error> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params: serde_json::Value::Null,
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
        };
        let body = serde_json::to_value(&request)?;

        let raw = self
            .transport
            .send(Method::POST, &self.url, Some(&body), None)
            .await?;

        let response: JsonRpcResponse = serde_json::from_slice(&raw.body)?;

        if let Some(error) = response.error {
            return Err(Error::Api(format!(
                "rpc error ({}): {}",
                error.code, error.message
            )));
        }

        response
            .result
            .ok_or_else(|| Error::Decode("rpc response has no result".to_string()))
    }

    /// Invoke a remote method whose result is a plain string reply.
    async fn call_for_reply(&self, method: &str) -> Result<String, Error> {
        let result = self.call(method).await?;
        serde_json::from_value(result).map_err(Into::into)
    }

    /// Start the edge daemon's serving process.
    pub async fn start(&self) -> Result<String, Error> {
        self.call_for_reply("MeridianEdge.Start").await
    }

    /// Stop the edge daemon's serving process.
    pub async fn stop(&self) -> Result<String, Error> {
        self.call_for_reply("MeridianEdge.Stop").await
    }

    /// Query the edge daemon's serving state.
    pub async fn status(&self) -> Result<String, Error> {
        self.call_for_reply("MeridianEdge.Status").await
    }
}
