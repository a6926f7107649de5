//! Cache trait for string key-value storage
//!
//! This trait abstracts caching backends so the Redis facade and the
//! in-memory store are interchangeable behind an `Arc<dyn CacheStore>`.

use crate::context::Context;
use crate::error::{CacheError, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;

/// The eight facade operations plus a liveness check
///
/// Values are opaque UTF-8 strings. A `ttl` of `Duration::ZERO` means the
/// entry never expires.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Get a value from the cache
    ///
    /// Returns `Err(CacheError::KeyNotFound)` if the key doesn't exist or has expired.
    async fn get(&self, ctx: &Context, key: &str) -> Result<String>;

    /// Check whether a key currently exists
    async fn has(&self, ctx: &Context, key: &str) -> Result<bool>;

    /// Store a value, overwriting any previous one
    async fn put(&self, ctx: &Context, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Store a value with no expiration
    async fn forever(&self, ctx: &Context, key: &str, value: &str) -> Result<()>;

    /// Delete a key; succeeds when the key is absent
    async fn forget(&self, ctx: &Context, key: &str) -> Result<()>;

    /// Read a value then delete it
    ///
    /// Returns `Err(CacheError::KeyNotFound)` without deleting anything when
    /// the key is absent.
    async fn pull(&self, ctx: &Context, key: &str) -> Result<String>;

    /// Remove every key visible to this store
    async fn flush(&self, ctx: &Context) -> Result<()>;

    /// Check that the backend is reachable
    async fn ping(&self, ctx: &Context) -> Result<()>;
}

/// Generic helpers layered over [`CacheStore`]
///
/// Kept separate so `CacheStore` stays object-safe. Every `CacheStore`,
/// including `dyn CacheStore`, gets these for free.
pub trait CacheExt: CacheStore {
    /// Get an item, or compute, store and return it
    ///
    /// On a miss the producer runs under `ctx`, its result is serialized to
    /// JSON and stored with `ttl`, and the JSON text is returned. A hit returns
    /// the stored text without running the producer.
    ///
    /// There is no single-flight guarantee: concurrent misses on the same key
    /// each run their producer and the last write wins.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let json = cache
    ///     .remember(&ctx, "user:123", Duration::from_secs(3600), Some(|| async {
    ///         load_user(123).await
    ///     }))
    ///     .await?;
    /// let user: User = serde_json::from_str(&json)?;
    /// ```
    async fn remember<T, E, F, Fut>(
        &self,
        ctx: &Context,
        key: &str,
        ttl: Duration,
        producer: Option<F>,
    ) -> Result<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        T: Serialize,
        E: Into<anyhow::Error>,
    {
        match self.get(ctx, key).await {
            Ok(value) => {
                tracing::debug!(key, "remember hit");
                return Ok(value);
            }
            Err(CacheError::KeyNotFound) => {}
            Err(e) => return Err(e),
        }

        let producer = producer.ok_or(CacheError::NilCallback)?;

        tracing::debug!(key, ?ttl, "remember miss, running callback");
        let value = ctx
            .run(async { producer().await.map_err(|e| CacheError::Callback(e.into())) })
            .await?;

        let encoded = serde_json::to_string(&value)?;
        self.put(ctx, key, &encoded, ttl).await?;

        Ok(encoded)
    }

    /// [`remember`](CacheExt::remember) with no expiration
    async fn remember_forever<T, E, F, Fut>(
        &self,
        ctx: &Context,
        key: &str,
        producer: Option<F>,
    ) -> Result<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        T: Serialize,
        E: Into<anyhow::Error>,
    {
        self.remember(ctx, key, Duration::ZERO, producer).await
    }

    /// Get a value and decode it from JSON
    async fn get_json<T>(&self, ctx: &Context, key: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let raw = self.get(ctx, key).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Encode a value as JSON and store it
    async fn put_json<T>(&self, ctx: &Context, key: &str, value: &T, ttl: Duration) -> Result<()>
    where
        T: Serialize,
    {
        let encoded = serde_json::to_string(value)?;
        self.put(ctx, key, &encoded, ttl).await
    }
}

impl<S: CacheStore + ?Sized> CacheExt for S {}
