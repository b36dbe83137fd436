//! Fixed-capacity pool of transport handles.
//!
//! A pool creates all of its handles up front and never grows or shrinks.
//! [`ConnectionPool::acquire`] suspends the caller until a handle is idle and
//! hands it out exclusively; dropping the returned [`PooledHandle`] puts the
//! handle back, so every exit path of the caller releases it.
//!
//! ## Example
//!
//! ```rust,no_run
//! use searchlink_transport::{ConnectionPool, PoolConfig};
//!
//! # async fn run() -> searchlink_transport::Result<()> {
//! let pool = ConnectionPool::new(PoolConfig::with_capacity(4))?;
//! let handle = pool.acquire().await?;
//! assert_eq!(pool.checked_out(), 1);
//! drop(handle);
//! assert_eq!(pool.idle_count(), 4);
//! # Ok(())
//! # }
//! ```

use std::ops::Deref;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use tokio::sync::{Semaphore, SemaphorePermit};
use tracing::{debug, info};

use crate::{PoolConfig, Result, TransportError};

static DEFAULT_POOL: OnceCell<Arc<ConnectionPool>> = OnceCell::new();

/// One reusable unit of network capacity.
///
/// Handles are never cloned; the only way to use one is through the
/// [`PooledHandle`] guard that checked it out.
#[derive(Debug)]
pub struct Handle {
    id: usize,
    client: reqwest::Client,
}

impl Handle {
    /// Position of this handle in its pool, stable for the pool's lifetime.
    pub fn id(&self) -> usize {
        self.id
    }

    pub(crate) fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

/// Bounded pool of [`Handle`]s.
pub struct ConnectionPool {
    config: PoolConfig,
    idle: Mutex<Vec<Handle>>,
    // One permit per idle handle. A permit is only granted after its handle
    // has been pushed back onto `idle`.
    permits: Semaphore,
    checked_out: AtomicUsize,
}

impl ConnectionPool {
    /// Create a pool and all of its handles.
    pub fn new(config: PoolConfig) -> Result<Self> {
        if config.capacity == 0 {
            return Err(TransportError::InvalidConfig(
                "capacity must be at least 1".to_string(),
            ));
        }

        let client = build_client(&config)?;
        let idle = (0..config.capacity)
            .map(|id| Handle {
                id,
                client: client.clone(),
            })
            .collect();

        info!(
            capacity = config.capacity,
            connect_timeout = ?config.connect_timeout,
            request_timeout = ?config.request_timeout,
            "Connection pool initialized"
        );

        Ok(Self {
            permits: Semaphore::new(config.capacity),
            idle: Mutex::new(idle),
            checked_out: AtomicUsize::new(0),
            config,
        })
    }

    /// The process-wide default pool, created on first use.
    pub fn shared() -> Result<Arc<ConnectionPool>> {
        DEFAULT_POOL
            .get_or_try_init(|| ConnectionPool::new(PoolConfig::default()).map(Arc::new))
            .cloned()
    }

    /// Get the pool configuration.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Total number of handles owned by the pool.
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Handles currently checked out.
    pub fn checked_out(&self) -> usize {
        self.checked_out.load(Ordering::SeqCst)
    }

    /// Handles currently waiting in the pool.
    pub fn idle_count(&self) -> usize {
        self.idle.lock().len()
    }

    /// Wait for an idle handle and check it out.
    ///
    /// Waiters are served in arrival order.
    pub async fn acquire(&self) -> Result<PooledHandle<'_>> {
        if self.permits.available_permits() == 0 {
            debug!(capacity = self.capacity(), "Connection pool exhausted, waiting");
        }

        let permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| TransportError::PoolClosed)?;

        let handle = self.idle.lock().pop().ok_or(TransportError::PoolClosed)?;
        self.checked_out.fetch_add(1, Ordering::SeqCst);

        Ok(PooledHandle {
            pool: self,
            handle: Some(handle),
            _permit: permit,
        })
    }

    /// Check out a handle without waiting.
    pub fn try_acquire(&self) -> Option<PooledHandle<'_>> {
        let permit = self.permits.try_acquire().ok()?;
        let handle = self.idle.lock().pop()?;
        self.checked_out.fetch_add(1, Ordering::SeqCst);

        Some(PooledHandle {
            pool: self,
            handle: Some(handle),
            _permit: permit,
        })
    }

    fn restore(&self, handle: Handle) {
        self.idle.lock().push(handle);
        self.checked_out.fetch_sub(1, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for ConnectionPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionPool")
            .field("capacity", &self.capacity())
            .field("checked_out", &self.checked_out())
            .finish()
    }
}

/// A handle checked out of a [`ConnectionPool`].
///
/// The handle returns to the pool when this guard is dropped.
#[derive(Debug)]
pub struct PooledHandle<'a> {
    pool: &'a ConnectionPool,
    // `Some` until `drop` hands it back.
    handle: Option<Handle>,
    // Released after `drop` has restored the handle.
    _permit: SemaphorePermit<'a>,
}

impl PooledHandle<'_> {
    /// Return the handle to the pool now.
    pub fn release(self) {
        drop(self);
    }
}

impl Deref for PooledHandle<'_> {
    type Target = Handle;

    fn deref(&self) -> &Handle {
        self.handle
            .as_ref()
            .expect("handle is only taken when the guard drops")
    }
}

impl Drop for PooledHandle<'_> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.pool.restore(handle);
        }
    }
}

fn build_client(config: &PoolConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .pool_idle_timeout(config.pool_idle_timeout)
        .pool_max_idle_per_host(config.max_idle_per_host())
        .user_agent(&config.user_agent)
        .gzip(config.gzip)
        .build()
        .map_err(|e| TransportError::InvalidConfig(e.to_string()))
}
