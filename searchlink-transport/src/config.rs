//! Connection pool configuration.

use std::time::Duration;

/// Number of handles in the process-wide default pool.
pub const DEFAULT_POOL_CAPACITY: usize = 200;

/// Connection pool configuration.
///
/// Every handle in a pool shares the transport policy described here. Timeouts
/// are fixed once the pool is built and cannot be overridden per request.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Number of handles created at construction.
    pub capacity: usize,
    /// Dial timeout.
    pub connect_timeout: Duration,
    /// Deadline for a whole request-response exchange.
    pub request_timeout: Duration,
    /// How long an idle keep-alive connection is retained.
    pub pool_idle_timeout: Duration,
    /// Maximum idle connections per host. Twice the capacity when unset.
    pub pool_max_idle_per_host: Option<usize>,
    /// Reuse connections between requests.
    pub keep_alive: bool,
    /// User agent string.
    pub user_agent: String,
    /// Enable gzip decompression.
    pub gzip: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_POOL_CAPACITY,
            connect_timeout: Duration::from_secs(1),
            request_timeout: Duration::from_secs(1),
            pool_idle_timeout: Duration::from_secs(1),
            pool_max_idle_per_host: None,
            keep_alive: true,
            user_agent: format!("searchlink/{}", env!("CARGO_PKG_VERSION")),
            gzip: true,
        }
    }
}

impl PoolConfig {
    /// Create a configuration with the given capacity and default policy.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    /// Create a new configuration builder.
    pub fn builder() -> PoolConfigBuilder {
        PoolConfigBuilder::default()
    }

    /// Idle connections kept per destination.
    ///
    /// Zero when keep-alive is disabled.
    pub fn max_idle_per_host(&self) -> usize {
        if !self.keep_alive {
            return 0;
        }
        self.pool_max_idle_per_host
            .unwrap_or_else(|| self.capacity.saturating_mul(2))
    }
}

/// Builder for pool configuration.
#[derive(Debug, Default)]
pub struct PoolConfigBuilder {
    config: PoolConfig,
}

impl PoolConfigBuilder {
    /// Set the number of pooled handles.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    /// Set the dial timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the request deadline.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Set the idle connection timeout.
    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.pool_idle_timeout = timeout;
        self
    }

    /// Set the maximum idle connections per host.
    pub fn pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.config.pool_max_idle_per_host = Some(max);
        self
    }

    /// Enable or disable connection reuse.
    pub fn keep_alive(mut self, enable: bool) -> Self {
        self.config.keep_alive = enable;
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Enable or disable gzip decompression.
    pub fn gzip(mut self, enable: bool) -> Self {
        self.config.gzip = enable;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> PoolConfig {
        self.config
    }
}
