//! Key-value storage for wishes and rate-limit counters.
//!
//! The store is an opaque service offering get, set-with-expiry and the two
//! atomic counter updates the rate limiters need. [`KvStore`] captures
//! exactly that surface; Redis backs it in production and [`MemoryStore`]
//! in development and tests.
//! A store is built once at startup with [`create_store`] and shared.

use std::sync::Arc;

use async_trait::async_trait;

pub mod error;
pub mod memory;
pub mod rate_limit;
pub mod redis_store;
pub mod repositories;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use rate_limit::{
    build_rate_limiter, FixedWindowLimiter, RateLimiter, SlidingWindow, SlidingWindowLimiter,
};
pub use redis_store::RedisStore;

/// Shared handle to the process-wide store.
pub type SharedStore = Arc<dyn KvStore>;

/// Operations the application needs from a key-value store.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Fetch the value at `key`, or `None` if it is missing or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` at `key`, expiring after `ttl_secs` seconds.
    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), StoreError>;

    /// Increment the counter at `key` and, if it carries no TTL yet, expire
    /// it after `ttl_secs` seconds, as one atomic step. Returns the new
    /// count.
    async fn incr_with_expiry(&self, key: &str, ttl_secs: u64) -> Result<i64, StoreError>;

    /// Check the weighted count of `window` against its quota and, if one
    /// more request fits, record it in the current window. Check and
    /// increment are one atomic step. Returns whether the request was
    /// recorded.
    async fn incr_sliding(&self, window: &SlidingWindow<'_>) -> Result<bool, StoreError>;

    /// Round-trip to the store to check it is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Connect to the store named by `url`.
///
/// | URL scheme            | Backend        |
/// |-----------------------|----------------|
/// | `redis://`, `rediss://` | [`RedisStore`] |
/// | `memory://`           | [`MemoryStore`] |
pub async fn create_store(url: &str) -> Result<SharedStore, StoreError> {
    if url.starts_with("redis://") || url.starts_with("rediss://") {
        let store = RedisStore::connect(url).await?;
        return Ok(Arc::new(store));
    }
    if url.starts_with("memory://") {
        return Ok(Arc::new(MemoryStore::new()));
    }
    Err(StoreError::UnsupportedUrl(url.to_string()))
}

/// Check that the store answers.
pub async fn health_check(store: &dyn KvStore) -> Result<(), StoreError> {
    store.ping().await
}
