//! Store-backed rate limiters.
//!
//! Both limiters keep their counters in the shared [`KvStore`](crate::KvStore), so limits
//! hold across processes when the store is Redis.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use wishlink_core::rate_limit::{
    rate_limit_key, sliding_window_allows, window_key, window_position, RateLimitConfig,
    RateLimitPolicy,
};

use crate::error::StoreError;
use crate::SharedStore;

/// Decides whether a client may perform one more request.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Record one request for `key` and report whether it is allowed.
    async fn consume(&self, key: &str) -> Result<bool, StoreError>;
}

/// Build the limiter selected by `config`.
pub fn build_rate_limiter(store: SharedStore, config: RateLimitConfig) -> Arc<dyn RateLimiter> {
    match config.policy {
        RateLimitPolicy::FixedWindow => Arc::new(FixedWindowLimiter::new(
            store,
            config.max_requests,
            config.window_secs,
        )),
        RateLimitPolicy::SlidingWindow => Arc::new(SlidingWindowLimiter::new(
            store,
            config.max_requests,
            config.window_secs,
        )),
    }
}

// ---------------------------------------------------------------------------
// Fixed window
// ---------------------------------------------------------------------------

/// One counter per client, expired by the store at the end of the window
/// that the client's first request opened.
pub struct FixedWindowLimiter {
    store: SharedStore,
    max_requests: u64,
    window_secs: u64,
}

impl FixedWindowLimiter {
    pub fn new(store: SharedStore, max_requests: u64, window_secs: u64) -> Self {
        Self {
            store,
            max_requests,
            window_secs,
        }
    }
}

#[async_trait]
impl RateLimiter for FixedWindowLimiter {
    async fn consume(&self, key: &str) -> Result<bool, StoreError> {
        let counter_key = rate_limit_key(key);
        let count = self
            .store
            .incr_with_expiry(&counter_key, self.window_secs)
            .await?;

        let allowed = u64::try_from(count).is_ok_and(|c| c <= self.max_requests);
        if !allowed {
            tracing::debug!(client = %key, count, max = self.max_requests, "Fixed window exhausted");
        }
        Ok(allowed)
    }
}

// ---------------------------------------------------------------------------
// Sliding window
// ---------------------------------------------------------------------------

/// One sliding-window check-and-increment, as handed to
/// [`KvStore::incr_sliding`](crate::KvStore::incr_sliding).
#[derive(Debug, Clone, Copy)]
pub struct SlidingWindow<'a> {
    /// Counter of the window containing now.
    pub current_key: &'a str,
    /// Counter of the window before it.
    pub previous_key: &'a str,
    /// Fraction of the current window already elapsed, in `[0, 1)`.
    pub elapsed: f64,
    pub max_requests: u64,
    /// Expiry given to the current counter when it has none.
    pub ttl_secs: u64,
}

impl SlidingWindow<'_> {
    /// Whether one more request fits on top of the given counts.
    pub fn allows(&self, previous: u64, current: u64) -> bool {
        sliding_window_allows(previous, current, self.elapsed, self.max_requests)
    }
}

/// Approximate sliding window over two epoch-aligned fixed windows.
///
/// Denied requests are not counted.
pub struct SlidingWindowLimiter {
    store: SharedStore,
    max_requests: u64,
    window_secs: u64,
}

impl SlidingWindowLimiter {
    pub fn new(store: SharedStore, max_requests: u64, window_secs: u64) -> Self {
        Self {
            store,
            max_requests,
            window_secs,
        }
    }

    /// [`RateLimiter::consume`] evaluated at an explicit instant.
    pub async fn consume_at(&self, key: &str, now: DateTime<Utc>) -> Result<bool, StoreError> {
        let position = window_position(now, self.window_secs);
        let current_key = window_key(key, position.index);
        let previous_key = window_key(key, position.index - 1);

        let window = SlidingWindow {
            current_key: &current_key,
            previous_key: &previous_key,
            elapsed: position.elapsed,
            max_requests: self.max_requests,
            // A counter must outlive its own window to serve as "previous".
            ttl_secs: self.window_secs.saturating_mul(2),
        };

        let allowed = self.store.incr_sliding(&window).await?;
        if !allowed {
            tracing::debug!(client = %key, max = self.max_requests, "Sliding window exhausted");
        }
        Ok(allowed)
    }
}

#[async_trait]
impl RateLimiter for SlidingWindowLimiter {
    async fn consume(&self, key: &str) -> Result<bool, StoreError> {
        self.consume_at(key, Utc::now()).await
    }
}
