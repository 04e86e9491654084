use thiserror::Error as ThisError;

/// Error taxonomy for the Meridian client.
///
/// Every layer returns `Result<_, Error>`; only the binary's top level
/// prints and decides the exit code.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Network-level failure (connect, send, timeout). Never retried by
    /// the transport itself.
    #[error("transport error: {0}")]
    Transport(String),

    /// Response bytes did not match the expected envelope or payload shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// The daemon answered with `success: false`; carries its message.
    #[error("{0}")]
    Api(String),

    /// Re-authentication attempts exhausted on a mutating request.
    #[error("authorization error: {0}")]
    Auth(String),

    /// A bounded poll ran out of its attempt budget.
    #[error("timed out: {0}")]
    Timeout(String),

    /// The operator aborted an in-flight operation.
    #[error("aborted: {0}")]
    Aborted(String),

    /// Environment file or CLI configuration problem.
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem error.
    #[error("io error: {0}")]
    Io(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Decode(e.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}
