//! In-memory cache store backed by moka
//!
//! Implements the same contract as the Redis facade so it can stand in for
//! it in tests and single-process deployments:
//! - Per-entry TTL, with `Duration::ZERO` meaning no expiration
//! - No size bound or eviction: a key lives until it expires, is removed,
//!   or the store is flushed (Redis without `maxmemory`)
//! - Safe for concurrent use through shared clones

use crate::context::Context;
use crate::error::{CacheError, Result};
use crate::traits::cache::CacheStore;
use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache as MokaCache;
use std::time::{Duration, Instant};

#[derive(Clone)]
struct Entry {
    value: String,
    /// `None` never expires
    ttl: Option<Duration>,
}

impl Entry {
    fn new(value: &str, ttl: Duration) -> Self {
        Self {
            value: value.to_string(),
            ttl: (!ttl.is_zero()).then_some(ttl),
        }
    }
}

/// Expiry driven by the TTL stored on each entry
struct EntryExpiry;

impl Expiry<String, Entry> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        value.ttl
    }

    fn expire_after_read(
        &self,
        _key: &String,
        _value: &Entry,
        _read_at: Instant,
        duration_until_expiry: Option<Duration>,
        _last_modified_at: Instant,
    ) -> Option<Duration> {
        // Reads never extend a TTL
        duration_until_expiry
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        // An overwrite replaces the TTL, like SET
        value.ttl
    }
}

/// In-memory [`CacheStore`]
///
/// # Example
///
/// ```rust,ignore
/// use cache_facade::{CacheExt, CacheStore, Context, InMemoryCache};
/// use std::time::Duration;
///
/// let cache = InMemoryCache::new();
/// let ctx = Context::background();
///
/// cache.put(&ctx, "greeting", "hello", Duration::from_secs(60)).await?;
/// assert_eq!(cache.get(&ctx, "greeting").await?, "hello");
/// ```
#[derive(Clone)]
pub struct InMemoryCache {
    inner: MokaCache<String, Entry>,
}

impl InMemoryCache {
    /// Create an empty, unbounded store
    pub fn new() -> Self {
        // Unbounded: a live key is never evicted
        let inner = MokaCache::builder().expire_after(EntryExpiry).build();

        Self { inner }
    }

    /// Run pending maintenance (expiration) immediately
    pub async fn run_pending_tasks(&self) {
        self.inner.run_pending_tasks().await;
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for InMemoryCache {
    async fn get(&self, ctx: &Context, key: &str) -> Result<String> {
        ctx.run(async {
            self.inner
                .get(key)
                .await
                .map(|entry| entry.value)
                .ok_or(CacheError::KeyNotFound)
        })
        .await
    }

    async fn has(&self, ctx: &Context, key: &str) -> Result<bool> {
        ctx.run(async { Ok(self.inner.contains_key(key)) }).await
    }

    async fn put(&self, ctx: &Context, key: &str, value: &str, ttl: Duration) -> Result<()> {
        ctx.run(async {
            self.inner.insert(key.to_string(), Entry::new(value, ttl)).await;
            Ok(())
        })
        .await
    }

    async fn forever(&self, ctx: &Context, key: &str, value: &str) -> Result<()> {
        self.put(ctx, key, value, Duration::ZERO).await
    }

    async fn forget(&self, ctx: &Context, key: &str) -> Result<()> {
        ctx.run(async {
            self.inner.invalidate(key).await;
            Ok(())
        })
        .await
    }

    async fn pull(&self, ctx: &Context, key: &str) -> Result<String> {
        let value = self.get(ctx, key).await?;
        self.forget(ctx, key).await?;
        Ok(value)
    }

    async fn flush(&self, ctx: &Context) -> Result<()> {
        ctx.run(async {
            self.inner.invalidate_all();
            self.inner.run_pending_tasks().await;
            Ok(())
        })
        .await
    }

    async fn ping(&self, ctx: &Context) -> Result<()> {
        ctx.run(async { Ok(()) }).await
    }
}
