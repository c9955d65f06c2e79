//! In-process [`KvStore`] with per-key expiry.
//!
//! Mirrors the Redis semantics the application relies on: expired keys read
//! as missing, counters start from zero and keep an existing TTL, and each
//! counter update is atomic. Expiry uses [`tokio::time::Instant`] so tests
//! can drive it with a paused clock.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::error::StoreError;
use crate::rate_limit::SlidingWindow;
use crate::KvStore;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

/// Store kept in a mutex-guarded map. Every operation holds the lock for
/// its whole read-modify-write, which makes counter updates atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.lock().await;
        entries.values().filter(|e| e.is_live(now)).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn live<'a>(entries: &'a HashMap<String, Entry>, key: &str, now: Instant) -> Option<&'a Entry> {
    entries.get(key).filter(|e| e.is_live(now))
}

fn count_of(entry: Option<&Entry>, key: &str) -> Result<i64, StoreError> {
    match entry {
        Some(entry) => entry
            .value
            .parse()
            .map_err(|_| StoreError::NotAnInteger(key.to_string())),
        None => Ok(0),
    }
}

/// Bump the counter at `key`, giving it `ttl_secs` if it has no expiry.
/// The caller holds the lock.
fn bump(
    entries: &mut HashMap<String, Entry>,
    key: &str,
    ttl_secs: u64,
    now: Instant,
) -> Result<i64, StoreError> {
    let current = live(entries, key, now);
    let count = count_of(current, key)? + 1;
    let expires_at = current
        .and_then(|e| e.expires_at)
        .unwrap_or(now + Duration::from_secs(ttl_secs));

    entries.insert(
        key.to_string(),
        Entry {
            value: count.to_string(),
            expires_at: Some(expires_at),
        },
    );
    Ok(count)
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if entry.is_live(now) => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), StoreError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        entries.retain(|_, e| e.is_live(now));
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Some(now + Duration::from_secs(ttl_secs)),
            },
        );
        Ok(())
    }

    async fn incr_with_expiry(&self, key: &str, ttl_secs: u64) -> Result<i64, StoreError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        bump(&mut entries, key, ttl_secs, now)
    }

    async fn incr_sliding(&self, window: &SlidingWindow<'_>) -> Result<bool, StoreError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;

        let current = count_of(live(&entries, window.current_key, now), window.current_key)?;
        let previous = count_of(live(&entries, window.previous_key, now), window.previous_key)?;

        // Counters never go below zero.
        if !window.allows(previous.max(0) as u64, current.max(0) as u64) {
            return Ok(false);
        }

        bump(&mut entries, window.current_key, window.ttl_secs, now)?;
        Ok(true)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
