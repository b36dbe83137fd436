//! Error types for search service operations.

use searchlink_transport::TransportError;
use thiserror::Error;

/// Search service error type.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Connect, DNS, timeout or reset failure.
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// A payload could not be encoded as JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The request could not be constructed.
    #[error("Failed to build request: {0}")]
    RequestBuild(String),

    /// The base URL was rejected.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A response body did not have the expected shape.
    #[error("Failed to decode {operation} response: {source}")]
    Decode {
        /// Operation whose response was being decoded.
        operation: &'static str,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The service answered with a status outside the operation's success set.
    #[error("Unexpected status {status} from {operation} on {target}")]
    UnexpectedStatus {
        /// Operation name.
        operation: &'static str,
        /// Index, document path or URL the operation targeted.
        target: String,
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The connection pool could not be created or is closed.
    #[error("Connection pool error: {0}")]
    Pool(String),
}

impl SearchError {
    /// Check if this is a network-level failure.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Get the HTTP status code if this is an unexpected-status error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn decode(operation: &'static str, err: TransportError) -> Self {
        match err {
            TransportError::Decode(source) => Self::Decode { operation, source },
            other => other.into(),
        }
    }
}

impl From<TransportError> for SearchError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Network(e) => Self::Transport(e),
            TransportError::Serialization(e) => Self::Serialization(e),
            TransportError::RequestBuild(msg) => Self::RequestBuild(msg),
            TransportError::Decode(source) => Self::Decode {
                operation: "response",
                source,
            },
            TransportError::InvalidConfig(msg) => Self::Pool(msg),
            TransportError::PoolClosed => Self::Pool("pool is closed".to_string()),
        }
    }
}

/// Result type alias for search service operations.
pub type Result<T> = std::result::Result<T, SearchError>;
