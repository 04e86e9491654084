// crates/meridian-client/src/transport.rs
//
// Request transport: builds and sends a single HTTP request with a JSON
// body, fixed headers, and a whole-round-trip timeout. Retry and
// authorization policy live above this layer in the control client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;

use meridian_core::Error;

/// Client identifier sent on every request.
pub const USER_AGENT: &str = "meridian-cli";

/// Header carrying the keystore passphrase on mutating requests.
pub const AUTHORIZATION_HEADER: &str = "X-Authorization";

/// Default whole-round-trip timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A raw HTTP response: status code plus body bytes.
///
/// Envelope decoding is deliberately left to the caller so the auth layer
/// can inspect the status code before anything is interpreted.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body bytes.
    pub body: Vec<u8>,
}

/// The outbound-request seam.
///
/// `HttpTransport` is the production implementation; tests script a fake.
#[async_trait]
pub trait RequestSender: Send + Sync {
    /// Send one request. A timeout or connection failure is a transport
    /// error surfaced to the caller, never retried here.
    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
        credential: Option<&str>,
    ) -> Result<RawResponse, Error>;
}

/// Shared reqwest-backed transport for all daemon calls.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with the given round-trip timeout.
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl RequestSender for HttpTransport {
    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
        credential: Option<&str>,
    ) -> Result<RawResponse, Error> {
        let mut request = self
            .client
            .request(method.clone(), url)
            .header(reqwest::header::USER_AGENT, USER_AGENT);

        if let Some(payload) = body {
            request = request.json(payload);
        }
        if let Some(secret) = credential {
            request = request.header(AUTHORIZATION_HEADER, secret);
        }

        tracing::debug!("{} {}", method, url);

        let response = request
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?
            .to_vec();

        tracing::trace!("{} {} -> {} ({} bytes)", method, url, status, body.len());

        Ok(RawResponse { status, body })
    }
}

/// Plain-text IP echo services, tried in order.
const IP_SERVICES: [&str; 4] = [
    "https://ipv4.myexternalip.com/raw",
    "https://api.ipify.org/?format=text",
    "https://ident.me/",
    "https://ipv4bot.whatismyipaddress.com",
];

/// Determine this machine's external IP address.
///
/// Tries each echo service in order and returns the first successful
/// answer, trimmed. Individual failures are logged and skipped.
pub async fn external_ip<T: RequestSender + ?Sized>(transport: &T) -> Result<String, Error> {
    for url in IP_SERVICES {
        match transport.send(Method::GET, url, None, None).await {
            Ok(response) if (200..300).contains(&response.status) => {
                return Ok(String::from_utf8_lossy(&response.body).trim().to_string());
            }
            Ok(response) => {
                tracing::debug!("{} answered {}", url, response.status);
            }
            Err(e) => {
                tracing::debug!("{} unreachable: {}", url, e);
            }
        }
    }

    Err(Error::Transport(
        "could not determine this machine's external IP address".to_string(),
    ))
}
