use wishlink_core::rate_limit::{RateLimitConfig, RateLimitPolicy, DEFAULT_WINDOW_SECS};
use wishlink_core::wish::DEFAULT_WISH_TTL_SECS;

/// A configuration variable held a value that could not be used.
#[derive(Debug, thiserror::Error)]
#[error("{var} has invalid value '{value}': {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development: an in-memory
/// store and the fixed-window rate limit of 3 wishes per hour.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Key-value store URL (default: `memory://`).
    pub store_url: String,
    /// Retention window for stored wishes in seconds (default: `259200`).
    pub wish_ttl_secs: u64,
    /// Rate limit applied to wish creation.
    pub rate_limit: RateLimitConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `3000`                     |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                       |
    /// | `STORE_URL`             | `memory://`                |
    /// | `WISH_TTL_SECS`         | `259200`                   |
    /// | `RATE_LIMIT_POLICY`     | `fixed`                    |
    /// | `RATE_LIMIT_MAX`        | `3` (fixed) / `5` (sliding)|
    /// | `RATE_LIMIT_WINDOW_SECS`| `3600`                     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = parse_or(&lookup, "PORT", 3000)?;

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?;
        let store_url = lookup("STORE_URL").unwrap_or_else(|| "memory://".into());

        let wish_ttl_secs: u64 = parse_or(&lookup, "WISH_TTL_SECS", DEFAULT_WISH_TTL_SECS)?;
        if wish_ttl_secs == 0 {
            return Err(invalid("WISH_TTL_SECS", "0", "must be greater than zero"));
        }

        let policy = match lookup("RATE_LIMIT_POLICY") {
            Some(raw) => RateLimitPolicy::parse(&raw)
                .map_err(|e| invalid("RATE_LIMIT_POLICY", &raw, &e.to_string()))?,
            None => RateLimitPolicy::FixedWindow,
        };
        let max_requests: u64 =
            parse_or(&lookup, "RATE_LIMIT_MAX", policy.default_max_requests())?;
        let window_secs: u64 = parse_or(&lookup, "RATE_LIMIT_WINDOW_SECS", DEFAULT_WINDOW_SECS)?;
        if window_secs == 0 {
            return Err(invalid("RATE_LIMIT_WINDOW_SECS", "0", "must be greater than zero"));
        }

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            store_url,
            wish_ttl_secs,
            rate_limit: RateLimitConfig {
                policy,
                max_requests,
                window_secs,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| invalid(var, &raw, &e.to_string())),
        None => Ok(default),
    }
}

fn invalid(var: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
