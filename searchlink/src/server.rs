//! Search service façade.

use std::sync::Arc;

use searchlink_transport::{ConnectionPool, Method, Payload, Response, Transport};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    document::Document,
    error::{Result, SearchError},
    search::SearchRequest,
};

/// Summary returned by the service root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Status {
    /// Status code echoed in the body by older service versions.
    pub status: Option<u16>,
    /// Node name.
    pub name: String,
    /// Cluster name.
    pub cluster_name: Option<String>,
    /// Tagline.
    pub tagline: Option<String>,
    /// Version details.
    pub version: Version,
}

/// Service version details.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Version {
    /// Version number.
    pub number: String,
    /// Whether this is a snapshot build.
    pub snapshot_build: bool,
    /// Bundled Lucene version.
    pub lucene_version: Option<String>,
}

/// Entry point for index, document and search operations.
///
/// Holds only the base address and a transport; cloning is cheap and clones
/// share the connection pool. Every call is an independent request.
#[derive(Debug, Clone)]
pub struct Server {
    url: String,
    transport: Transport,
}

impl Server {
    /// Connect to `http://{host}:{port}` using the default pool.
    pub fn connect(host: &str, port: u16) -> Result<Self> {
        Self::connect_url(&format!("http://{}:{}", host, port))
    }

    /// Connect to a base URL using the default pool.
    pub fn connect_url(url: &str) -> Result<Self> {
        Self::with_transport(url, Transport::shared()?)
    }

    /// Connect to a base URL using a private pool.
    pub fn with_pool(url: &str, pool: Arc<ConnectionPool>) -> Result<Self> {
        Self::with_transport(url, Transport::new(pool))
    }

    /// Connect to a base URL using an existing transport.
    pub fn with_transport(url: &str, transport: Transport) -> Result<Self> {
        let parsed =
            url::Url::parse(url).map_err(|e| SearchError::InvalidUrl(format!("{}: {}", url, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(SearchError::InvalidUrl(format!("{}: not a base URL", url)));
        }

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            transport,
        })
    }

    /// Get the base URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get the transport.
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    fn endpoint(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            self.url.clone()
        } else {
            format!("{}/{}", self.url, path)
        }
    }

    /// Address built from path segments, each percent-encoded on its own so
    /// reserved characters in names stay inside their segment.
    fn segment_url(&self, segments: &[&str]) -> Result<url::Url> {
        if let Some(segment) = segments.iter().find(|s| matches!(**s, "." | "..")) {
            return Err(SearchError::RequestBuild(format!(
                "invalid path segment {:?}",
                segment
            )));
        }

        let mut url =
            url::Url::parse(&self.url).map_err(|e| SearchError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| SearchError::InvalidUrl(format!("{}: not a base URL", self.url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // =========================================================================
    // Raw Commands
    // =========================================================================

    /// Send a request to a path relative to the base URL.
    ///
    /// The status code is returned as-is.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        payload: impl Into<Payload>,
    ) -> Result<Response> {
        Ok(self
            .transport
            .execute(method, &self.endpoint(path), payload)
            .await?)
    }

    /// GET a path.
    pub async fn get(&self, path: &str) -> Result<Response> {
        self.request(Method::GET, path, Payload::Empty).await
    }

    /// PUT a payload to a path.
    pub async fn put(&self, path: &str, payload: impl Into<Payload>) -> Result<Response> {
        self.request(Method::PUT, path, payload).await
    }

    /// POST a payload to a path.
    pub async fn post(&self, path: &str, payload: impl Into<Payload>) -> Result<Response> {
        self.request(Method::POST, path, payload).await
    }

    /// DELETE a path.
    pub async fn delete(&self, path: &str) -> Result<Response> {
        self.request(Method::DELETE, path, Payload::Empty).await
    }

    /// HEAD a path.
    pub async fn head(&self, path: &str) -> Result<Response> {
        self.request(Method::HEAD, path, Payload::Empty).await
    }

    pub(crate) async fn send(
        &self,
        method: Method,
        segments: &[&str],
        payload: impl Into<Payload>,
    ) -> Result<Response> {
        let url = self.segment_url(segments)?;
        Ok(self.transport.execute(method, url.as_str(), payload).await?)
    }

    // =========================================================================
    // Service
    // =========================================================================

    /// Fetch the service summary.
    pub async fn status(&self) -> Result<Status> {
        let response = self.get("").await?;
        if response.status_code() != 200 {
            return Err(unexpected("status", &self.url, &response));
        }
        response
            .decode()
            .map_err(|e| SearchError::decode("status", e))
    }

    // =========================================================================
    // Index Operations
    // =========================================================================

    /// Check whether an index exists.
    ///
    /// Any status other than 200 means the index does not exist.
    pub async fn has_index(&self, index: &str) -> Result<bool> {
        let response = self.send(Method::HEAD, &[index], Payload::Empty).await?;
        debug!(index, status = response.status_code(), "Checked index");
        Ok(response.status_code() == 200)
    }

    /// Create an index with default settings.
    pub async fn create_index(&self, index: &str) -> Result<()> {
        self.put_index(index, Payload::Empty).await
    }

    /// Create an index with a settings and mappings body.
    pub async fn create_index_with_settings(
        &self,
        index: &str,
        settings: impl Into<Payload>,
    ) -> Result<()> {
        self.put_index(index, settings.into()).await
    }

    async fn put_index(&self, index: &str, settings: Payload) -> Result<()> {
        debug!(index, "Creating index");
        let response = self.send(Method::PUT, &[index], settings).await?;
        if !is_2xx(&response) {
            return Err(unexpected("create_index", index, &response));
        }
        Ok(())
    }

    /// Delete an index.
    pub async fn delete_index(&self, index: &str) -> Result<()> {
        debug!(index, "Deleting index");
        let response = self.send(Method::DELETE, &[index], Payload::Empty).await?;
        if !is_2xx(&response) {
            return Err(unexpected("delete_index", index, &response));
        }
        Ok(())
    }

    // =========================================================================
    // Document Operations
    // =========================================================================

    /// Store a document under an explicit ID, replacing any previous version.
    pub async fn put_document(
        &self,
        index: &str,
        doc_type: &str,
        id: &str,
        content: impl Into<Payload>,
    ) -> Result<()> {
        let path = document_path(index, doc_type, id);
        debug!(index, id, "Putting document");

        let response = self
            .send(Method::PUT, &[index, doc_type, id], content)
            .await?;
        match response.status_code() {
            200 | 201 => Ok(()),
            _ => Err(unexpected("put_document", &path, &response)),
        }
    }

    /// Store any serializable value as a document.
    pub async fn put_json<T: Serialize + ?Sized>(
        &self,
        index: &str,
        doc_type: &str,
        id: &str,
        content: &T,
    ) -> Result<()> {
        let payload = Payload::structured(content)?;
        self.put_document(index, doc_type, id, payload).await
    }

    /// Store a caller-built document under its own index, type and ID.
    pub async fn index_document(&self, doc: &Document) -> Result<()> {
        let source = doc.source.clone().unwrap_or_default();
        self.put_document(
            &doc.index,
            &doc.doc_type,
            &doc.id,
            serde_json::Value::Object(source),
        )
        .await
    }

    /// Fetch a document.
    ///
    /// A missing document is not an error: it comes back with `exists` false.
    pub async fn get_document(&self, index: &str, doc_type: &str, id: &str) -> Result<Document> {
        self.get_document_fields(index, doc_type, id, &[]).await
    }

    /// Fetch only the given fields of a document.
    pub async fn get_document_fields(
        &self,
        index: &str,
        doc_type: &str,
        id: &str,
        fields: &[&str],
    ) -> Result<Document> {
        let path = document_path(index, doc_type, id);
        let mut url = self.segment_url(&[index, doc_type, id])?;
        if !fields.is_empty() {
            url.query_pairs_mut().append_pair("fields", &fields.join(","));
        }
        debug!(index, id, ?fields, "Getting document");

        let response = self
            .transport
            .execute(Method::GET, url.as_str(), Payload::Empty)
            .await?;

        match response.status_code() {
            200 => Document::decode(response.bytes()),
            404 => Ok(Document::not_found(index, doc_type, id)),
            _ => Err(unexpected("get_document", &path, &response)),
        }
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Start a search against this server.
    pub fn search(&self) -> SearchRequest {
        SearchRequest::new(self.clone())
    }
}

// Label used in logs and errors; never sent on the wire.
fn document_path(index: &str, doc_type: &str, id: &str) -> String {
    format!("{}/{}/{}", index, doc_type, id)
}

fn is_2xx(response: &Response) -> bool {
    (200..300).contains(&response.status_code())
}

fn unexpected(operation: &'static str, target: &str, response: &Response) -> SearchError {
    warn!(
        operation,
        target,
        status = response.status_code(),
        "Unexpected status code"
    );
    SearchError::UnexpectedStatus {
        operation,
        target: target.to_string(),
        status: response.status_code(),
        body: response.text(),
    }
}
