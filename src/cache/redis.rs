use crate::cache::config::CacheConfig;
use crate::context::Context;
use crate::error::{CacheError, Result};
use crate::traits::cache::CacheStore;
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{ConnectionAddr, ConnectionInfo, RedisConnectionInfo};
use std::time::Duration;

/// Redis cache facade
///
/// Owns one multiplexed connection, usable concurrently through `&self`.
/// The handle is not `Clone`: share it behind an `Arc`, or keep sole
/// ownership to release it with [`close`](Self::close). Connection
/// management, wire protocol and I/O timeouts are left to the `redis` crate.
pub struct RedisCache {
    conn: MultiplexedConnection,
    addr: String,
}

impl RedisCache {
    /// Connect to Redis and verify the connection with PING
    ///
    /// Fails with [`CacheError::Connection`] when the address does not
    /// resolve, the server is unreachable, authentication is rejected, or
    /// `connect_timeout_seconds` elapses.
    pub async fn connect(config: &CacheConfig) -> Result<Self> {
        let addr = config.address();
        let client = redis::Client::open(connection_info(config)).map_err(|e| {
            CacheError::connection(format!("invalid Redis configuration for {}: {}", addr, e))
        })?;

        let timeout = config.connect_timeout();
        let conn = tokio::time::timeout(timeout, client.get_multiplexed_async_connection())
            .await
            .map_err(|_| {
                CacheError::connection(format!(
                    "timed out after {:?} connecting to {}",
                    timeout, addr
                ))
            })?
            .map_err(|e| {
                CacheError::connection(format!("failed to connect to Redis at {}: {}", addr, e))
            })?;

        let cache = Self { conn, addr };
        cache
            .ping(&Context::with_timeout(timeout))
            .await
            .map_err(|e| {
                CacheError::connection(format!(
                    "Redis at {} did not answer PING: {}",
                    cache.addr, e
                ))
            })?;

        tracing::info!(addr = %cache.addr, db = config.db, "connected to Redis");
        Ok(cache)
    }

    /// Address this facade is connected to
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Release the connection
    ///
    /// Consumes the only handle, so the connection is released exactly once.
    /// A handle shared through `Arc` is released when the last `Arc` drops.
    pub async fn close(self) -> Result<()> {
        tracing::info!(addr = %self.addr, "closing Redis connection");
        drop(self.conn);
        Ok(())
    }

    fn connection(&self) -> MultiplexedConnection {
        self.conn.clone()
    }
}

/// Build connection info from host, port, password and database index
fn connection_info(config: &CacheConfig) -> ConnectionInfo {
    let password = (!config.password.is_empty()).then(|| config.password.clone());

    ConnectionInfo {
        addr: ConnectionAddr::Tcp(config.host.clone(), config.port),
        redis: RedisConnectionInfo {
            db: config.db,
            password,
            ..Default::default()
        },
    }
}

/// `PX` argument for a TTL, `None` for no expiration
///
/// Sub-millisecond TTLs round up since Redis rejects `PX 0`.
fn expiry_millis(ttl: Duration) -> Option<u64> {
    if ttl.is_zero() {
        return None;
    }
    Some(u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1))
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, ctx: &Context, key: &str) -> Result<String> {
        let mut conn = self.connection();

        let value = ctx
            .run(async {
                Ok(redis::cmd("GET")
                    .arg(key)
                    .query_async::<Option<String>>(&mut conn)
                    .await?)
            })
            .await?;

        value.ok_or(CacheError::KeyNotFound)
    }

    async fn has(&self, ctx: &Context, key: &str) -> Result<bool> {
        let mut conn = self.connection();

        let count = ctx
            .run(async {
                Ok(redis::cmd("EXISTS")
                    .arg(key)
                    .query_async::<i64>(&mut conn)
                    .await?)
            })
            .await?;

        Ok(count > 0)
    }

    async fn put(&self, ctx: &Context, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.connection();

        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value);
        if let Some(millis) = expiry_millis(ttl) {
            cmd.arg("PX").arg(millis);
        }

        ctx.run(async { Ok(cmd.query_async::<()>(&mut conn).await?) })
            .await
    }

    async fn forever(&self, ctx: &Context, key: &str, value: &str) -> Result<()> {
        self.put(ctx, key, value, Duration::ZERO).await
    }

    async fn forget(&self, ctx: &Context, key: &str) -> Result<()> {
        let mut conn = self.connection();

        ctx.run(async {
            Ok(redis::cmd("DEL")
                .arg(key)
                .query_async::<()>(&mut conn)
                .await?)
        })
        .await
    }

    async fn pull(&self, ctx: &Context, key: &str) -> Result<String> {
        let value = self.get(ctx, key).await?;
        self.forget(ctx, key).await?;
        Ok(value)
    }

    async fn flush(&self, ctx: &Context) -> Result<()> {
        let mut conn = self.connection();

        ctx.run(async { Ok(redis::cmd("FLUSHALL").query_async::<()>(&mut conn).await?) })
            .await?;

        tracing::debug!(addr = %self.addr, "flushed Redis");
        Ok(())
    }

    async fn ping(&self, ctx: &Context) -> Result<()> {
        let mut conn = self.connection();

        ctx.run(async {
            redis::cmd("PING").query_async::<String>(&mut conn).await?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::cache::CacheExt;

    #[test]
    fn test_connection_info_carries_db_and_password() {
        let config = CacheConfig::new("cache.internal", 6380)
            .with_password("s3cret")
            .with_db(3);

        let info = connection_info(&config);
        assert_eq!(info.redis.db, 3);
        assert_eq!(info.redis.password.as_deref(), Some("s3cret"));
        assert!(matches!(
            info.addr,
            ConnectionAddr::Tcp(ref host, 6380) if host == "cache.internal"
        ));
    }

    #[test]
    fn test_empty_password_means_no_auth() {
        let info = connection_info(&CacheConfig::new("localhost", 6379));
        assert_eq!(info.redis.password, None);
        assert_eq!(info.redis.db, 0);
    }

    #[test]
    fn test_expiry_millis() {
        assert_eq!(expiry_millis(Duration::ZERO), None);
        assert_eq!(expiry_millis(Duration::from_millis(10)), Some(10));
        assert_eq!(expiry_millis(Duration::from_secs(3600)), Some(3_600_000));
        assert_eq!(expiry_millis(Duration::from_micros(300)), Some(1));
    }

    #[tokio::test]
    async fn test_connect_unreachable_fails() {
        // Nothing listens on port 1 locally
        let config = CacheConfig::new("127.0.0.1", 1).with_connect_timeout(Duration::from_secs(1));

        let result = RedisCache::connect(&config).await;
        assert!(matches!(result, Err(CacheError::Connection(_))));
    }

    // Note: These tests require a running Redis instance on 127.0.0.1:6379

    #[tokio::test]
    #[ignore] // Requires Redis
    async fn test_redis_cache() {
        let cache = RedisCache::connect(&CacheConfig::new("127.0.0.1", 6379)).await.unwrap();
        let ctx = Context::background();

        cache.put(&ctx, "test_key", "test_value", Duration::from_secs(60)).await.unwrap();
        assert_eq!(cache.get(&ctx, "test_key").await.unwrap(), "test_value");

        cache.forget(&ctx, "test_key").await.unwrap();
        let result = cache.get(&ctx, "test_key").await;
        assert!(matches!(result, Err(CacheError::KeyNotFound)));

        let json = cache
            .remember(&ctx, "test_remember", Duration::from_secs(60), Some(|| async {
                Ok::<_, anyhow::Error>(vec!["a", "b"])
            }))
            .await
            .unwrap();
        assert_eq!(json, r#"["a","b"]"#);

        cache.forget(&ctx, "test_remember").await.unwrap();
        cache.close().await.unwrap();
    }
}
