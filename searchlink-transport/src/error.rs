//! Transport error types.

use thiserror::Error;

/// Result type for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

/// Transport errors.
///
/// None of these are retried by the transport; the caller decides.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The structured payload could not be encoded as JSON.
    #[error("Failed to serialize request payload: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The request could not be constructed.
    #[error("Failed to build request: {0}")]
    RequestBuild(String),

    /// Connect, DNS, timeout or reset while talking to the remote service.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body did not match the requested shape.
    #[error("Failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The pool configuration was rejected.
    #[error("Invalid pool configuration: {0}")]
    InvalidConfig(String),

    /// The pool no longer hands out handles.
    #[error("Connection pool is closed")]
    PoolClosed,
}

impl TransportError {
    /// Check if this is a timeout error.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Network(e) if e.is_timeout())
    }

    /// Check if this is a connection error.
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Network(e) if e.is_connect())
    }

    /// Check if this error came from the network rather than local encoding.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

impl From<url::ParseError> for TransportError {
    fn from(err: url::ParseError) -> Self {
        Self::RequestBuild(format!("invalid URL: {}", err))
    }
}
