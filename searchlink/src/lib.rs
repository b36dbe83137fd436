//! Client for Elasticsearch-style document search services.
//!
//! This crate talks to a search service over its HTTP/JSON REST protocol:
//! - Index lifecycle (exists, create, delete)
//! - Document storage and retrieval
//! - Boolean query and filter searches with pagination and projection
//!
//! Requests go through a bounded pool of reusable connections from
//! `searchlink-transport`. Servers built with [`Server::connect`] share one
//! process-wide pool; [`Server::with_pool`] takes a private one.
//!
//! # Example
//!
//! ```rust,no_run
//! use searchlink::Server;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = Server::connect("localhost", 9200)?;
//!
//!     if !server.has_index("people").await? {
//!         server.create_index("people").await?;
//!     }
//!
//!     server
//!         .put_document("people", "person", "1", json!({"name": "George", "age": 25}))
//!         .await?;
//!
//!     let doc = server.get_document("people", "person", "1").await?;
//!     assert!(doc.exists);
//!
//!     let results = server
//!         .search()
//!         .index("people")
//!         .must(json!({"match": {"name": "george"}}))
//!         .execute()
//!         .await?;
//!
//!     println!("{} matches", results.hits.total);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod document;
mod error;
mod query;
mod search;
mod server;

pub use document::Document;
pub use error::{Result, SearchError};
pub use query::BoolClauses;
pub use search::{Hits, SearchRequest, SearchResults};
pub use server::{Server, Status, Version};

pub use searchlink_transport::{
    ConnectionPool, Method, Payload, PoolConfig, PoolConfigBuilder, Response, Transport,
};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        BoolClauses, Document, Payload, PoolConfig, Result, SearchError, SearchRequest,
        SearchResults, Server,
    };
}
