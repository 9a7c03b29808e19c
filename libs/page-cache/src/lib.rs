//! Rendered-page cache over Redis
//!
//! Holds one entry per listing scope (home, group, author, following) with a
//! short TTL. The cache is an optimization only: callers must treat every
//! error as a miss and rebuild from the store. Writers call [`PageCache::invalidate`]
//! (or `invalidate_many`) right after committing, so a fresh post is visible
//! on the next read rather than after TTL expiry.

mod error;
mod keys;

pub use error::{CacheError, CacheResult};
pub use keys::{PageKey, CACHE_VERSION};

use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default TTL for cached listing pages (seconds)
pub const DEFAULT_PAGE_TTL_SECS: u64 = 20;

/// Redis-backed cache of serialized listing pages
#[derive(Clone)]
pub struct PageCache {
    redis: ConnectionManager,
    default_ttl: Duration,
}

impl PageCache {
    pub fn new(redis: ConnectionManager, default_ttl_secs: u64) -> Self {
        Self {
            redis,
            default_ttl: Duration::from_secs(default_ttl_secs),
        }
    }

    /// Open a connection manager against `url`
    pub async fn connect(url: &str, default_ttl_secs: u64) -> CacheResult<Self> {
        let client = redis::Client::open(url)?;
        let manager = ConnectionManager::new(client).await?;
        Ok(Self::new(manager, default_ttl_secs))
    }

    /// Add up to 10% jitter so entries written together do not expire together
    fn jittered(ttl: Duration) -> Duration {
        let jitter = (rand::random::<u32>() % 10) as f64 / 100.0;
        let extra = (ttl.as_secs_f64() * jitter).round() as u64;
        ttl + Duration::from_secs(extra)
    }

    /// Fetch a cached page. A corrupted entry is deleted and reported as a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> CacheResult<Option<T>> {
        let mut conn = self.redis.clone();

        match conn.get::<_, Option<String>>(key).await? {
            Some(data) => match serde_json::from_str::<T>(&data) {
                Ok(value) => {
                    debug!(key = %key, "page cache hit");
                    Ok(Some(value))
                }
                Err(e) => {
                    debug!(key = %key, error = %e, "page cache entry corrupt, dropping");
                    let _ = conn.del::<_, ()>(key).await;
                    Ok(None)
                }
            },
            None => {
                debug!(key = %key, "page cache miss");
                Ok(None)
            }
        }
    }

    /// Store a page under `key` with the default TTL
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> CacheResult<()> {
        self.set_with_ttl(key, value, self.default_ttl).await
    }

    pub async fn set_with_ttl<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> CacheResult<()> {
        let data = serde_json::to_string(value)?;
        let ttl = Self::jittered(ttl);

        let mut conn = self.redis.clone();
        conn.set_ex::<_, _, ()>(key, data, ttl.as_secs()).await?;

        debug!(key = %key, ttl_secs = ttl.as_secs(), "page cache write");
        Ok(())
    }

    /// Drop a single scope's entry
    pub async fn invalidate(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.redis.clone();
        conn.del::<_, ()>(key).await?;

        debug!(key = %key, "page cache invalidate");
        Ok(())
    }

    /// Drop several scopes' entries in one round trip
    pub async fn invalidate_many(&self, keys: &[String]) -> CacheResult<()> {
        if keys.is_empty() {
            return Ok(());
        }

        let mut pipe = redis::pipe();
        for key in keys {
            pipe.del(key).ignore();
        }

        let mut conn = self.redis.clone();
        pipe.query_async::<_, ()>(&mut conn).await?;

        debug!(count = keys.len(), "page cache batch invalidate");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jitter_stays_within_ten_percent() {
        let base = Duration::from_secs(100);
        for _ in 0..50 {
            let jittered = PageCache::jittered(base);
            assert!(jittered >= base);
            assert!(jittered <= base + Duration::from_secs(10));
        }
    }

    #[test]
    fn jitter_on_default_ttl_never_doubles_it() {
        let base = Duration::from_secs(DEFAULT_PAGE_TTL_SECS);
        for _ in 0..50 {
            assert!(PageCache::jittered(base) < base * 2);
        }
    }
}
