//! cache-facade - a small, Laravel-style cache facade over Redis
//!
//! Exposes eight operations (`get`, `has`, `put`, `forever`, `forget`,
//! `pull`, `flush`, `remember`) over the store's native client. Everything
//! except `remember` delegates straight to a store command; `remember` adds
//! read-through memoization with JSON serialization.
//!
//! # Features
//!
//! - **Redis facade**: one multiplexed connection, PING-verified at construction
//! - **In-memory store**: moka-backed implementation of the same trait, for tests
//! - **Cancellation**: every operation takes a [`Context`] carrying a
//!   cancellation token and optional deadline
//! - **Typed errors**: misses surface as [`CacheError::KeyNotFound`]
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use cache_facade::{CacheConfig, CacheExt, CacheStore, Context};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> cache_facade::Result<()> {
//!     cache_facade::init_tracing();
//!
//!     let cache = cache_facade::cache::connect(&CacheConfig::from_env()).await?;
//!     let ctx = Context::with_timeout(Duration::from_secs(2));
//!
//!     cache.put(&ctx, "greeting", "hello", Duration::from_secs(60)).await?;
//!     let json = cache
//!         .remember(&ctx, "answer", Duration::from_secs(3600), Some(|| async {
//!             Ok::<_, anyhow::Error>(42)
//!         }))
//!         .await?;
//!     assert_eq!(json, "42");
//!     Ok(())
//! }
//! ```

#![allow(async_fn_in_trait)] // CacheExt futures carry no Send bound

pub mod cache;
mod context;
mod error;
pub mod traits;
pub mod utils;

// Re-exports for public API
#[cfg(feature = "redis")]
pub use cache::RedisCache;
pub use cache::{CacheBackend, CacheConfig, InMemoryCache};
pub use context::Context;
pub use error::{BoxError, CacheError, Result};
pub use traits::cache::{CacheExt, CacheStore};

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging with sensible defaults
///
/// # Environment Variables
///
/// - `RUST_LOG`: log filter (e.g. "info", "cache_facade=debug")
/// - `CACHE_FACADE_LOG_JSON`: set to "true" for JSON formatted logs
///
/// Does nothing if a global subscriber is already installed.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_logs = utils::get_env_with_prefix("LOG_JSON")
        .map(|v| v.parse::<bool>().unwrap_or(false))
        .unwrap_or(false);

    let result = if json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
