//! Request payload variants.

use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;

use crate::{Result, TransportError};

/// Body of an outgoing request.
///
/// Raw bytes and text are sent unchanged; structured values are encoded as
/// JSON when the request is built.
#[derive(Debug, Clone, Default)]
pub enum Payload {
    /// No body.
    #[default]
    Empty,
    /// Pre-serialized bytes.
    Raw(Bytes),
    /// Pre-encoded text.
    Text(String),
    /// A structured value encoded as JSON.
    Json(Value),
}

impl Payload {
    /// Capture any serializable value as a structured payload.
    pub fn structured<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        serde_json::to_value(value)
            .map(Payload::Json)
            .map_err(TransportError::Serialization)
    }

    /// Whether the payload carries no body.
    pub fn is_empty(&self) -> bool {
        matches!(self, Payload::Empty)
    }

    /// Encode into the bytes that go on the wire.
    ///
    /// Returns `None` for [`Payload::Empty`].
    pub fn into_body(self) -> Result<Option<Bytes>> {
        match self {
            Payload::Empty => Ok(None),
            Payload::Raw(bytes) => Ok(Some(bytes)),
            Payload::Text(text) => Ok(Some(Bytes::from(text))),
            Payload::Json(value) => serde_json::to_vec(&value)
                .map(|encoded| Some(Bytes::from(encoded)))
                .map_err(TransportError::Serialization),
        }
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload::Raw(Bytes::from(bytes))
    }
}

impl From<Bytes> for Payload {
    fn from(bytes: Bytes) -> Self {
        Payload::Raw(bytes)
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Json(value)
    }
}

impl<T: Into<Payload>> From<Option<T>> for Payload {
    fn from(payload: Option<T>) -> Self {
        payload.map(Into::into).unwrap_or_default()
    }
}
