use crate::utils::{get_env_with_prefix, parse_env_with_prefix};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Cache backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Redis facade (requires the `redis` feature)
    #[cfg(feature = "redis")]
    Redis,
    /// In-process moka store
    Memory,
}

impl Default for CacheBackend {
    fn default() -> Self {
        #[cfg(feature = "redis")]
        {
            Self::Redis
        }
        #[cfg(not(feature = "redis"))]
        {
            Self::Memory
        }
    }
}

/// Cache connection configuration
///
/// Built once and used only to establish the connection. An empty password
/// means no authentication.
#[derive(Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub backend: CacheBackend,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub password: String,

    /// Logical database index
    #[serde(default)]
    pub db: i64,

    /// Connection timeout in seconds, covering connect and the initial PING
    #[serde(default = "default_connect_timeout_seconds")]
    pub connect_timeout_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            host: default_host(),
            port: default_port(),
            password: String::new(),
            db: 0,
            connect_timeout_seconds: default_connect_timeout_seconds(),
        }
    }
}

impl fmt::Debug for CacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let password = if self.password.is_empty() {
            ""
        } else {
            "[REDACTED]"
        };
        f.debug_struct("CacheConfig")
            .field("backend", &self.backend)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &password)
            .field("db", &self.db)
            .field("connect_timeout_seconds", &self.connect_timeout_seconds)
            .finish()
    }
}

impl CacheConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    pub fn with_db(mut self, db: i64) -> Self {
        self.db = db;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_seconds = timeout.as_secs().max(1);
        self
    }

    pub fn with_backend(mut self, backend: CacheBackend) -> Self {
        self.backend = backend;
        self
    }

    /// `host:port`, for logging
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    /// Load cache configuration from environment variables
    ///
    /// Each key is looked up as `CACHE_FACADE_{KEY}` first, then `{KEY}`.
    /// Values that fail to parse are logged and the default is kept.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(backend) = get_env_with_prefix("CACHE_BACKEND") {
            config.backend = match backend.to_lowercase().as_str() {
                "redis" => {
                    #[cfg(feature = "redis")]
                    {
                        CacheBackend::Redis
                    }
                    #[cfg(not(feature = "redis"))]
                    {
                        tracing::warn!(
                            "Redis cache requested but redis feature not enabled, using in-memory"
                        );
                        CacheBackend::Memory
                    }
                }
                "memory" | "in_memory" | "inmemory" => CacheBackend::Memory,
                other => {
                    tracing::warn!(backend = other, "unknown CACHE_BACKEND, keeping default");
                    config.backend
                }
            };
        }

        if let Some(host) = get_env_with_prefix("REDIS_HOST") {
            config.host = host;
        }

        if let Some(port) = parse_env_with_prefix("REDIS_PORT") {
            config.port = port;
        }

        if let Some(password) = get_env_with_prefix("REDIS_PASSWORD") {
            config.password = password;
        }

        if let Some(db) = parse_env_with_prefix("REDIS_DB") {
            config.db = db;
        }

        if let Some(seconds) = parse_env_with_prefix("REDIS_CONNECT_TIMEOUT_SECONDS") {
            config.connect_timeout_seconds = seconds;
        }

        config
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    6379
}

fn default_connect_timeout_seconds() -> u64 {
    5
}
