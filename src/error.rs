/// Boxed error carried by [`CacheError::Store`]
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, CacheError>;

/// The error type for every cache operation
///
/// `KeyNotFound` is a distinct variant so callers can branch on a miss with
/// `matches!` instead of inspecting messages.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("failed to connect to cache store: {0}")]
    Connection(String),

    #[error("key not found in cache")]
    KeyNotFound,

    #[error("callback function cannot be nil")]
    NilCallback,

    #[error("callback execution failed: {0}")]
    Callback(#[source] anyhow::Error),

    #[error("failed to serialize cache value: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("cache store error: {0}")]
    Store(#[source] BoxError),

    #[error("operation cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,
}

impl CacheError {
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    pub fn store(err: impl Into<BoxError>) -> Self {
        Self::Store(err.into())
    }

    /// True for a miss (absent or expired key)
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound)
    }

    /// True when the caller's context fired before the store answered
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        Self::Store(Box::new(err))
    }
}
