// crates/meridian-client/src/lib.rs
//
// meridian-client: HTTP and JSON-RPC clients for the local Meridian daemons.
//
// The control daemon and network gateway speak HTTP with a standard JSON
// envelope; the edge daemon speaks JSON-RPC 2.0. All outbound calls go
// through the `RequestSender` seam so commands and tests can share one
// transport or substitute a scripted fake.

pub mod control;
pub mod credentials;
pub mod edge;
pub mod poller;
pub mod transport;

// Re-export the types commands work with day to day.

pub use control::{ControlClient, ControlEndpoints};
pub use credentials::{CredentialCache, CredentialSource};
pub use edge::EdgeClient;
pub use poller::{wait_for_tx, PollConfig, TxStatusSource};
pub use transport::{external_ip, HttpTransport, RawResponse, RequestSender};
