//! # searchlink transport
//!
//! A bounded pool of reusable HTTP handles and a JSON request invoker on top
//! of it.
//!
//! ## Features
//!
//! - **Fixed capacity**: all handles are created with the pool; callers wait
//!   when every handle is checked out
//! - **Scoped checkout**: handles return to the pool when their guard drops
//! - **Payload variants**: raw bytes and text pass through, structured values
//!   are encoded as JSON
//! - **Fixed timeouts**: dial and request deadlines are set once per pool
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use searchlink_transport::{Method, Payload, Transport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = Transport::shared()?;
//!
//!     let response = transport
//!         .execute(Method::GET, "http://localhost:9200", Payload::Empty)
//!         .await?;
//!
//!     println!("Status: {}", response.status());
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod payload;
mod pool;
mod response;
mod transport;

pub use config::{DEFAULT_POOL_CAPACITY, PoolConfig, PoolConfigBuilder};
pub use error::{Result, TransportError};
pub use payload::Payload;
pub use pool::{ConnectionPool, Handle, PooledHandle};
pub use response::Response;
pub use transport::Transport;

// Re-export common types
pub use bytes::Bytes;
pub use http::{Method, StatusCode};
