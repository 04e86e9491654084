// crates/meridian-client/src/control.rs
//
// Client for the control daemon and network gateway HTTP APIs. Wraps the
// request transport with credential attachment, the bounded re-auth retry,
// and typed decoding of the standard response envelope.

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use meridian_core::{ApiEnvelope, Error, NodeData};

use crate::credentials::CredentialCache;
use crate::poller::TxStatusSource;
use crate::transport::RequestSender;

/// Total attempts allowed for a mutating request before the credential is
/// declared bad. Each attempt after the first re-prompts the operator.
const AUTH_ATTEMPTS: u32 = 3;

/// Base URLs for the two local daemon APIs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlEndpoints {
    /// Control daemon (node data, applications, settings).
    pub control_url: String,
    /// Network gateway (contract creation, tx status, keystore, pools).
    pub gateway_url: String,
}

impl Default for ControlEndpoints {
    fn default() -> Self {
        Self {
            control_url: "http://localhost:3000".to_string(),
            gateway_url: "http://localhost:3001".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Typed envelope payloads
// ---------------------------------------------------------------------------

/// A transaction receipt inside a write response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxReceipt {
    /// The transaction hash.
    pub value: String,
}

/// Response payload of tx-bearing writes: `{"txHash": {"value": "0x..."}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxHashResponse {
    #[serde(rename = "txHash")]
    pub tx_hash: TxReceipt,
}

/// Response payload carrying a single address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressResponse {
    pub address: String,
}

/// Response payload of the pool application status lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationStatusResponse {
    pub status: String,
}

/// Response payload of the tx status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxCompleteResponse {
    pub complete: bool,
}

/// One entry in a pool's application listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationEntry {
    pub address: String,
}

// ---------------------------------------------------------------------------
// ControlClient
// ---------------------------------------------------------------------------

/// HTTP client for the control daemon and network gateway.
pub struct ControlClient<T: RequestSender> {
    transport: T,
    credentials: CredentialCache,
    endpoints: ControlEndpoints,
}

impl<T: RequestSender> std::fmt::Debug for ControlClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlClient")
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

impl<T: RequestSender> ControlClient<T> {
    /// Create a client over the given transport and credential cache.
    pub fn new(transport: T, credentials: CredentialCache, endpoints: ControlEndpoints) -> Self {
        Self {
            transport,
            credentials,
            endpoints,
        }
    }

    /// Seed the credential cache, e.g. with a passphrase the operator just
    /// chose during account creation.
    pub fn cache_credential(&self, secret: &str) {
        self.credentials.store(secret);
    }

    /// Send one logical request and decode the response envelope.
    ///
    /// Mutating requests carry the cached (or freshly prompted) credential.
    /// HTTP 403/405 marks the credential stale: it is dropped, the operator
    /// re-prompted, and the request resent, at most `AUTH_ATTEMPTS` times
    /// total. HTTP 400 means the daemon could not perform the operation at
    /// all and fails immediately with its message.
    async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<ApiEnvelope, Error> {
        let mutating = method != Method::GET;

        for attempt in 1..=AUTH_ATTEMPTS {
            let credential = if mutating {
                Some(self.credentials.get()?)
            } else {
                None
            };

            let raw = self
                .transport
                .send(method.clone(), url, body, credential.as_deref())
                .await?;

            match raw.status {
                403 | 405 if mutating => {
                    tracing::warn!(
                        "daemon rejected credential (attempt {}/{})",
                        attempt,
                        AUTH_ATTEMPTS
                    );
                    self.credentials.invalidate();
                }
                400 => {
                    return match ApiEnvelope::decode(&raw.body) {
                        Err(Error::Api(message)) if !message.is_empty() => {
                            Err(Error::Api(message))
                        }
                        _ => Err(Error::Api(
                            "daemon rejected the request (HTTP 400)".to_string(),
                        )),
                    };
                }
                _ => return ApiEnvelope::decode(&raw.body),
            }
        }

        Err(Error::Auth(format!(
            "authorization rejected after {} attempts",
            AUTH_ATTEMPTS
        )))
    }

    // -----------------------------------------------------------------------
    // Node operations
    // -----------------------------------------------------------------------

    /// Deploy a new node contract. Returns the creation tx hash.
    pub async fn create_node(&self) -> Result<String, Error> {
        let url = format!("{}/api/node/create", self.endpoints.gateway_url);
        let envelope = self.request(Method::POST, &url, None).await?;
        let receipt: TxHashResponse = envelope.response_as()?;
        Ok(receipt.tx_hash.value)
    }

    /// Look up the caller's node contract address.
    pub async fn node_address(&self) -> Result<String, Error> {
        let url = format!("{}/api/node", self.endpoints.control_url);
        let envelope = self.request(Method::GET, &url, None).await?;
        let payload: AddressResponse = envelope.response_as()?;
        Ok(payload.address)
    }

    /// Set the data fields on a node contract. Returns the tx hash.
    pub async fn set_node_data(&self, node_address: &str, data: &NodeData) -> Result<String, Error> {
        let url = format!(
            "{}/api/node/{}/data",
            self.endpoints.control_url, node_address
        );
        let body = serde_json::to_value(data)?;
        let envelope = self.request(Method::POST, &url, Some(&body)).await?;
        let receipt: TxHashResponse = envelope.response_as()?;
        Ok(receipt.tx_hash.value)
    }

    /// Send the node's (encrypted) data to a pool as an application.
    /// Returns the tx hash.
    pub async fn apply_to_pool(&self, node_address: &str, pool_address: &str) -> Result<String, Error> {
        let url = format!(
            "{}/api/node/{}/apply/{}",
            self.endpoints.control_url, node_address, pool_address
        );
        let envelope = self.request(Method::POST, &url, None).await?;
        let receipt: TxHashResponse = envelope.response_as()?;
        Ok(receipt.tx_hash.value)
    }

    /// Check the status of a submitted pool application.
    pub async fn pool_application(
        &self,
        node_address: &str,
        pool_address: &str,
    ) -> Result<String, Error> {
        let url = format!(
            "{}/api/node/{}/status/{}",
            self.endpoints.control_url, node_address, pool_address
        );
        let envelope = self.request(Method::GET, &url, None).await?;
        let payload: ApplicationStatusResponse = envelope.response_as()?;
        Ok(payload.status)
    }

    /// Fetch the daemon's settings as raw JSON for display.
    pub async fn settings(&self) -> Result<serde_json::Value, Error> {
        let url = format!("{}/api/settings", self.endpoints.control_url);
        let envelope = self.request(Method::GET, &url, None).await?;
        Ok(envelope.response.unwrap_or(serde_json::Value::Null))
    }

    // -----------------------------------------------------------------------
    // Keystore operations
    // -----------------------------------------------------------------------

    /// Create a keystore account protected by the given passphrase.
    /// Returns the new account address.
    pub async fn create_account(&self, passphrase: &str) -> Result<String, Error> {
        let url = format!(
            "{}/api/keystore/account/create",
            self.endpoints.gateway_url
        );
        let body = serde_json::json!({ "passphrase": passphrase });
        let envelope = self.request(Method::POST, &url, Some(&body)).await?;
        let payload: AddressResponse = envelope.response_as()?;
        Ok(payload.address)
    }

    /// Return the keystore account address, or `None` if no account exists.
    pub async fn account_address(&self) -> Result<Option<String>, Error> {
        let url = format!("{}/api/keystore/account", self.endpoints.gateway_url);
        let envelope = self.request(Method::GET, &url, None).await?;

        // An empty keystore answers success with no address field.
        match envelope.response_as::<AddressResponse>() {
            Ok(payload) => Ok(Some(payload.address)),
            Err(Error::Decode(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Generate the node's PGP key pair from operator identity fields.
    pub async fn create_pgp_pair(&self, name: &str, email: &str) -> Result<(), Error> {
        let url = format!("{}/api/keystore/pgp/create", self.endpoints.gateway_url);
        let body = serde_json::json!({ "name": name, "email": email });
        self.request(Method::POST, &url, Some(&body)).await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Pool-owner operations
    // -----------------------------------------------------------------------

    /// List pool contracts owned by the caller.
    pub async fn owned_pools(&self) -> Result<Vec<String>, Error> {
        let url = format!(
            "{}/api/market/pools/owned",
            self.endpoints.gateway_url
        );
        let envelope = self.request(Method::GET, &url, None).await?;
        envelope.response_as()
    }

    /// List node addresses that applied to a pool with the given
    /// application status (e.g. "pending", "approved", "rejected").
    pub async fn pool_applications(
        &self,
        pool_address: &str,
        status: &str,
    ) -> Result<Vec<String>, Error> {
        let url = format!(
            "{}/api/pool/{}/nodes/{}",
            self.endpoints.gateway_url, pool_address, status
        );
        let envelope = self.request(Method::GET, &url, None).await?;
        let entries: Vec<ApplicationEntry> = envelope.response_as()?;
        Ok(entries.into_iter().map(|e| e.address).collect())
    }

    /// Accept or reject a node's application to an owned pool.
    /// Returns the tx hash.
    pub async fn set_application_status(
        &self,
        pool_address: &str,
        node_address: &str,
        status: &str,
    ) -> Result<String, Error> {
        let url = format!(
            "{}/api/pool/{}/node/{}/{}",
            self.endpoints.gateway_url, pool_address, node_address, status
        );
        let envelope = self.request(Method::PUT, &url, None).await?;
        let receipt: TxHashResponse = envelope.response_as()?;
        Ok(receipt.tx_hash.value)
    }
}

#[async_trait]
impl<T: RequestSender> TxStatusSource for ControlClient<T> {
    /// Check whether a transaction has completed on chain.
    async fn tx_complete(&self, tx: &str) -> Result<bool, Error> {
        let url = format!("{}/api/status/tx/{}", self.endpoints.gateway_url, tx);
        let envelope = self.request(Method::GET, &url, None).await?;
        let payload: TxCompleteResponse = envelope.response_as()?;
        Ok(payload.complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::CredentialSource;
    use crate::transport::RawResponse;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone)]
    struct SentRequest {
        method: Method,
        url: String,
        body: Option<serde_json::Value>,
        credential: Option<String>,
    }

    struct FakeTransport {
        sent: Mutex<Vec<SentRequest>>,
        responses: Mutex<VecDeque<RawResponse>>,
    }

    impl FakeTransport {
        fn scripted(responses: Vec<RawResponse>) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                responses: Mutex::new(responses.into()),
            }
        }

        fn sent(&self) -> Vec<SentRequest> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RequestSender for &FakeTransport {
        async fn send(
            &self,
            method: Method,
            url: &str,
            body: Option<&serde_json::Value>,
            credential: Option<&str>,
        ) -> Result<RawResponse, Error> {
            self.sent.lock().unwrap().push(SentRequest {
                method,
                url: url.to_string(),
                body: body.cloned(),
                credential: credential.map(str::to_string),
            });
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| Error::Transport("no scripted response left".to_string()))
        }
    }

    struct CountingSource {
        prompts: Arc<AtomicU32>,
    }

    impl CredentialSource for CountingSource {
        fn passphrase(&self) -> Result<String, Error> {
            self.prompts.fetch_add(1, Ordering::SeqCst);
            Ok("hunter2".to_string())
        }
    }

    fn client_over(
        transport: &FakeTransport,
    ) -> (ControlClient<&FakeTransport>, Arc<AtomicU32>) {
        let prompts = Arc::new(AtomicU32::new(0));
        let cache = CredentialCache::new(Box::new(CountingSource {
            prompts: prompts.clone(),
        }));
        (
            ControlClient::new(transport, cache, ControlEndpoints::default()),
            prompts,
        )
    }

    fn ok_response(body: serde_json::Value) -> RawResponse {
        RawResponse {
            status: 200,
            body: serde_json::to_vec(&body).unwrap(),
        }
    }

    fn tx_envelope(tx: &str) -> RawResponse {
        ok_response(json!({
            "message": "tx submitted",
            "success": true,
            "response": {"txHash": {"value": tx}},
        }))
    }

    fn forbidden() -> RawResponse {
        RawResponse {
            status: 403,
            body: b"{}".to_vec(),
        }
    }

    #[tokio::test]
    async fn create_node_returns_the_tx_hash() {
        let transport = FakeTransport::scripted(vec![tx_envelope("0xdeadbeef")]);
        let (client, _) = client_over(&transport);

        let tx = client.create_node().await.unwrap();
        assert_eq!(tx, "0xdeadbeef");

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, Method::POST);
        assert_eq!(sent[0].url, "http://localhost:3001/api/node/create");
    }

    #[tokio::test]
    async fn mutating_requests_prompt_once_then_reuse_the_cache() {
        let transport =
            FakeTransport::scripted(vec![tx_envelope("0x01"), tx_envelope("0x02")]);
        let (client, prompts) = client_over(&transport);

        client.create_node().await.unwrap();
        client.create_node().await.unwrap();

        assert_eq!(prompts.load(Ordering::SeqCst), 1);
        for request in transport.sent() {
            assert_eq!(request.credential.as_deref(), Some("hunter2"));
        }
    }

    #[tokio::test]
    async fn get_requests_never_consult_the_credential_source() {
        let transport = FakeTransport::scripted(vec![ok_response(json!({
            "message": "ok",
            "success": true,
            "response": {"address": "0xnode"},
        }))]);
        let (client, prompts) = client_over(&transport);

        let address = client.node_address().await.unwrap();
        assert_eq!(address, "0xnode");
        assert_eq!(prompts.load(Ordering::SeqCst), 0);
        assert_eq!(transport.sent()[0].credential, None);
    }

    #[tokio::test]
    async fn three_consecutive_403s_fail_permanently_after_the_third_attempt() {
        let transport = FakeTransport::scripted(vec![forbidden(), forbidden(), forbidden()]);
        let (client, prompts) = client_over(&transport);

        let err = client.create_node().await.unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
        assert_eq!(transport.sent().len(), 3);
        assert_eq!(prompts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn a_stale_credential_recovers_on_the_second_attempt() {
        let transport = FakeTransport::scripted(vec![forbidden(), tx_envelope("0x99")]);
        let (client, prompts) = client_over(&transport);

        let tx = client.create_node().await.unwrap();
        assert_eq!(tx, "0x99");
        assert_eq!(transport.sent().len(), 2);
        assert_eq!(prompts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn http_400_is_fatal_with_the_daemon_message_and_no_retry() {
        let transport = FakeTransport::scripted(vec![RawResponse {
            status: 400,
            body: serde_json::to_vec(&json!({
                "message": "node data missing required fields",
                "success": false,
            }))
            .unwrap(),
        }]);
        let (client, _) = client_over(&transport);

        let err = client.create_node().await.unwrap_err();
        match err {
            Error::Api(message) => assert_eq!(message, "node data missing required fields"),
            other => panic!("expected Api error, got {:?}", other),
        }
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test]
    async fn set_node_data_posts_camel_case_fields() {
        let transport = FakeTransport::scripted(vec![tx_envelope("0x42")]);
        let (client, _) = client_over(&transport);

        let data = NodeData {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            ip_address: "203.0.113.7".to_string(),
            status: "active".to_string(),
        };
        client.set_node_data("0xnode", &data).await.unwrap();

        let sent = transport.sent();
        assert_eq!(sent[0].url, "http://localhost:3000/api/node/0xnode/data");
        let body = sent[0].body.as_ref().unwrap();
        assert_eq!(body["ipAddress"], "203.0.113.7");
    }

    #[tokio::test]
    async fn pool_applications_collects_the_applicant_addresses() {
        let transport = FakeTransport::scripted(vec![ok_response(json!({
            "message": "ok",
            "success": true,
            "response": [{"address": "0xaaa"}, {"address": "0xbbb"}],
        }))]);
        let (client, _) = client_over(&transport);

        let nodes = client.pool_applications("0xpool", "pending").await.unwrap();
        assert_eq!(nodes, vec!["0xaaa".to_string(), "0xbbb".to_string()]);
    }

    #[tokio::test]
    async fn account_address_maps_an_empty_keystore_to_none() {
        let transport = FakeTransport::scripted(vec![ok_response(json!({
            "message": "ok",
            "success": true,
            "response": {},
        }))]);
        let (client, _) = client_over(&transport);

        assert_eq!(client.account_address().await.unwrap(), None);
    }

    #[tokio::test]
    async fn tx_complete_reads_the_complete_flag() {
        let transport = FakeTransport::scripted(vec![ok_response(json!({
            "message": "ok",
            "success": true,
            "response": {"complete": false},
        }))]);
        let (client, _) = client_over(&transport);

        assert!(!client.tx_complete("0xdead").await.unwrap());
        assert_eq!(
            transport.sent()[0].url,
            "http://localhost:3001/api/status/tx/0xdead"
        );
    }
}
