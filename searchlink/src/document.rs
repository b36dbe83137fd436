//! Document model and tolerant decoding.
//!
//! The service does not use one shape for stored records: a plain get returns
//! content under `_source`, a get with a field projection returns it under
//! `fields`, newer versions report existence as `found` instead of `exists`,
//! and metadata keys come and go between endpoints. Decoding first reads
//! every variant into [`RawDocument`] and then normalizes it into a single
//! [`Document`], so nothing downstream branches on the wire shape.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, SearchError};

/// One stored record.
///
/// # Example
///
/// ```rust
/// use searchlink::Document;
///
/// let doc = Document::decode(br#"{
///     "_index": "people", "_type": "person", "_id": "1",
///     "_version": 1, "exists": true,
///     "_source": { "name": "George", "age": 25 }
/// }"#).unwrap();
///
/// assert!(doc.exists);
/// assert_eq!(doc.source.unwrap()["name"], "George");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawDocument")]
pub struct Document {
    /// Index name.
    #[serde(rename = "_index")]
    pub index: String,
    /// Type name.
    #[serde(rename = "_type")]
    pub doc_type: String,
    /// Document ID.
    #[serde(rename = "_id")]
    pub id: String,
    /// Document version, zero when not reported.
    #[serde(rename = "_version")]
    pub version: i64,
    /// Whether the record exists.
    pub exists: bool,
    /// Relevance score, present on search hits.
    #[serde(rename = "_score", skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Document content.
    #[serde(rename = "_source")]
    pub source: Option<Map<String, Value>>,
}

impl Document {
    /// Create a document to be written.
    pub fn new(
        index: impl Into<String>,
        doc_type: impl Into<String>,
        id: impl Into<String>,
        source: Map<String, Value>,
    ) -> Self {
        Self {
            index: index.into(),
            doc_type: doc_type.into(),
            id: id.into(),
            source: Some(source),
            ..Default::default()
        }
    }

    /// The shape reported for a record that does not exist.
    pub fn not_found(
        index: impl Into<String>,
        doc_type: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self {
            index: index.into(),
            doc_type: doc_type.into(),
            id: id.into(),
            ..Default::default()
        }
    }

    /// Decode a document from a response body.
    pub fn decode(body: &[u8]) -> Result<Self> {
        let object: Map<String, Value> = serde_json::from_slice(body).map_err(decode_error)?;
        let raw = RawDocument::deserialize(Value::Object(object)).map_err(decode_error)?;
        Ok(raw.into())
    }

    /// Deserialize the content into a caller type.
    pub fn source_as<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        self.source
            .as_ref()
            .map(|source| serde_json::from_value(Value::Object(source.clone())))
            .transpose()
            .map_err(decode_error)
    }
}

fn decode_error(source: serde_json::Error) -> SearchError {
    SearchError::Decode {
        operation: "document",
        source,
    }
}

/// Every key a record may arrive with.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDocument {
    #[serde(rename = "_index")]
    index: Option<String>,
    #[serde(rename = "_type")]
    doc_type: Option<String>,
    #[serde(rename = "_id")]
    id: Option<String>,
    #[serde(rename = "_version")]
    version: Option<i64>,
    exists: Option<bool>,
    found: Option<bool>,
    #[serde(rename = "_score")]
    score: Option<f64>,
    #[serde(rename = "_source")]
    source: Option<Map<String, Value>>,
    fields: Option<Map<String, Value>>,
}

impl From<RawDocument> for Document {
    fn from(raw: RawDocument) -> Self {
        Self {
            index: raw.index.unwrap_or_default(),
            doc_type: raw.doc_type.unwrap_or_default(),
            id: raw.id.unwrap_or_default(),
            version: raw.version.unwrap_or_default(),
            exists: raw.exists.or(raw.found).unwrap_or_default(),
            score: raw.score,
            // `fields` stands in for `_source` only when `_source` is absent.
            source: raw.source.or(raw.fields),
        }
    }
}
