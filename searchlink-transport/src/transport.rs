//! Request invoker.

use std::sync::Arc;

use http::Method;
use tracing::debug;

use crate::{ConnectionPool, Payload, PoolConfig, Response, Result, TransportError};

/// Issues HTTP requests through a [`ConnectionPool`].
///
/// Cloning is cheap; clones share the pool.
#[derive(Debug, Clone)]
pub struct Transport {
    pool: Arc<ConnectionPool>,
}

impl Transport {
    /// Create a transport over an explicitly constructed pool.
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Create a transport with a private pool built from `config`.
    pub fn with_config(config: PoolConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(ConnectionPool::new(config)?)))
    }

    /// Create a transport over the process-wide default pool.
    pub fn shared() -> Result<Self> {
        Ok(Self::new(ConnectionPool::shared()?))
    }

    /// Get the pool this transport draws handles from.
    pub fn pool(&self) -> &Arc<ConnectionPool> {
        &self.pool
    }

    /// Send one request and read the full response.
    ///
    /// The status code is not interpreted here. The handle is returned to the
    /// pool whether or not the exchange succeeds.
    pub async fn execute(
        &self,
        method: Method,
        url: &str,
        payload: impl Into<Payload>,
    ) -> Result<Response> {
        let body = payload.into().into_body()?;
        let url = url::Url::parse(url)?;

        let handle = self.pool.acquire().await?;

        let mut builder = handle.client().request(method.clone(), url.clone());
        if let Some(body) = body {
            builder = builder
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(body);
        }
        let request = builder
            .build()
            .map_err(|e| TransportError::RequestBuild(e.to_string()))?;

        let response = handle.client().execute(request).await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        handle.release();

        debug!(
            method = %method,
            url = %url,
            status = status.as_u16(),
            bytes = bytes.len(),
            "Request completed"
        );

        Ok(Response::new(status, bytes))
    }

    /// Send a GET request.
    pub async fn get(&self, url: &str) -> Result<Response> {
        self.execute(Method::GET, url, Payload::Empty).await
    }

    /// Send a PUT request.
    pub async fn put(&self, url: &str, payload: impl Into<Payload>) -> Result<Response> {
        self.execute(Method::PUT, url, payload).await
    }

    /// Send a POST request.
    pub async fn post(&self, url: &str, payload: impl Into<Payload>) -> Result<Response> {
        self.execute(Method::POST, url, payload).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, url: &str) -> Result<Response> {
        self.execute(Method::DELETE, url, Payload::Empty).await
    }

    /// Send a HEAD request.
    pub async fn head(&self, url: &str) -> Result<Response> {
        self.execute(Method::HEAD, url, Payload::Empty).await
    }
}
