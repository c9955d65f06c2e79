/// Errors raised while talking to the key-value store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The Redis server failed or could not be reached.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// A stored value could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// `INCR` was applied to a key holding something other than an integer.
    #[error("Value at key '{0}' is not an integer")]
    NotAnInteger(String),

    /// The store URL names a backend this build does not know.
    #[error("Unsupported store URL '{0}'. Expected redis://, rediss:// or memory://")]
    UnsupportedUrl(String),
}
