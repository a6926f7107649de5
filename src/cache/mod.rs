//! Cache backends behind the [`CacheStore`](crate::CacheStore) trait.
//!
//! Redis is the production backend (`redis` feature, on by default); the
//! moka-backed in-memory store implements the same contract for tests and
//! single-process use.

mod config;
mod in_memory;

#[cfg(feature = "redis")]
mod redis;

pub use config::{CacheBackend, CacheConfig};
pub use in_memory::InMemoryCache;

#[cfg(feature = "redis")]
pub use self::redis::RedisCache;

use crate::error::Result;
use crate::traits::cache::CacheStore;
use std::sync::Arc;

/// Build the backend named by `config`
///
/// Construct once at startup and pass the handle to consumers. The store
/// is released when the last `Arc` drops; use [`RedisCache::connect`] and
/// `RedisCache::close` directly when an explicit close is needed.
///
/// ```rust,ignore
/// let cache = cache_facade::cache::connect(&CacheConfig::from_env()).await?;
/// ```
pub async fn connect(config: &CacheConfig) -> Result<Arc<dyn CacheStore>> {
    match config.backend {
        #[cfg(feature = "redis")]
        CacheBackend::Redis => Ok(Arc::new(RedisCache::connect(config).await?)),
        CacheBackend::Memory => {
            tracing::info!("using in-memory cache");
            Ok(Arc::new(InMemoryCache::new()))
        }
    }
}
