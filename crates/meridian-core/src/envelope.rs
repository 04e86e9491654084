// crates/meridian-core/src/envelope.rs
//
// The standard response envelope returned by the control daemon and the
// network gateway. Every endpoint wraps its payload in this shape; the
// `response` and `txHash` fields are only meaningful when `success` is true.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Standard response envelope from the control daemon API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope {
    /// Human-readable status message.
    #[serde(default)]
    pub message: String,
    /// Whether the request succeeded.
    #[serde(default)]
    pub success: bool,
    /// Error detail (daemon-side), often empty even on failure.
    #[serde(default)]
    pub error: String,
    /// Endpoint-specific payload. Only valid when `success` is true.
    #[serde(default)]
    pub response: Option<serde_json::Value>,
    /// Transaction receipt payload for write operations.
    #[serde(rename = "txHash", default)]
    pub tx_hash: Option<serde_json::Value>,
}

impl ApiEnvelope {
    /// Decode raw response bytes into an envelope.
    ///
    /// Returns `Error::Decode` if the bytes are not a valid envelope, and
    /// `Error::Api` carrying the daemon's message when `success` is false,
    /// so callers can only ever observe the payload of a successful reply.
    pub fn decode(bytes: &[u8]) -> Result<Self, Error> {
        let envelope: ApiEnvelope = serde_json::from_slice(bytes)?;

        if !envelope.success {
            let message = if envelope.message.is_empty() {
                envelope.error.clone()
            } else {
                envelope.message.clone()
            };
            return Err(Error::Api(message));
        }

        Ok(envelope)
    }

    /// Deserialize the `response` payload into an endpoint-specific type.
    pub fn response_as<T: DeserializeOwned>(&self) -> Result<T, Error> {
        let value = self
            .response
            .clone()
            .ok_or_else(|| Error::Decode("envelope has no response payload".to_string()))?;
        serde_json::from_value(value).map_err(Into::into)
    }

}
