//! Redis-backed [`KvStore`].

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Script};

use crate::error::StoreError;
use crate::rate_limit::SlidingWindow;
use crate::KvStore;

/// INCR, then EXPIRE only if the key has no TTL (`TTL` answers -1).
const INCR_WITH_EXPIRY: &str = r"
local count = redis.call('INCR', KEYS[1])
if redis.call('TTL', KEYS[1]) < 0 then
    redis.call('EXPIRE', KEYS[1], ARGV[1])
end
return count
";

/// Weighted check over current (KEYS[1]) and previous (KEYS[2]) windows;
/// records the request only if it fits. ARGV: elapsed, max, ttl.
const INCR_SLIDING: &str = r"
local current = tonumber(redis.call('GET', KEYS[1]) or '0')
local previous = tonumber(redis.call('GET', KEYS[2]) or '0')
local elapsed = tonumber(ARGV[1])
if previous * (1 - elapsed) + current >= tonumber(ARGV[2]) then
    return 0
end
redis.call('INCR', KEYS[1])
if redis.call('TTL', KEYS[1]) < 0 then
    redis.call('EXPIRE', KEYS[1], ARGV[3])
end
return 1
";

/// Store backed by a Redis server.
///
/// Holds a [`ConnectionManager`], which multiplexes commands over one
/// connection and reconnects on failure. Cloning it is cheap, so every call
/// works on its own clone. Counter updates run as Lua scripts so each one is
/// atomic on the server.
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
    incr_with_expiry: Script,
    incr_sliding: Script,
}

impl RedisStore {
    /// Open a managed connection to the server at `url`.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)?;
        let connection = client.get_connection_manager().await?;
        tracing::info!("Redis connection manager created");
        Ok(Self {
            connection,
            incr_with_expiry: Script::new(INCR_WITH_EXPIRY),
            incr_sliding: Script::new(INCR_SLIDING),
        })
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), StoreError> {
        let mut conn = self.connection.clone();
        let () = conn.set_ex(key, value, ttl_secs).await?;
        Ok(())
    }

    async fn incr_with_expiry(&self, key: &str, ttl_secs: u64) -> Result<i64, StoreError> {
        let mut conn = self.connection.clone();
        let count: i64 = self
            .incr_with_expiry
            .key(key)
            .arg(ttl_secs)
            .invoke_async(&mut conn)
            .await?;
        Ok(count)
    }

    async fn incr_sliding(&self, window: &SlidingWindow<'_>) -> Result<bool, StoreError> {
        let mut conn = self.connection.clone();
        let recorded: i64 = self
            .incr_sliding
            .key(window.current_key)
            .key(window.previous_key)
            .arg(window.elapsed)
            .arg(window.max_requests)
            .arg(window.ttl_secs)
            .invoke_async(&mut conn)
            .await?;
        Ok(recorded == 1)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.connection.clone();
        let _pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
