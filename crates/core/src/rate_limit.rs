//! Rate-limit policies, key layout and window arithmetic.
//!
//! Two policies are supported. The fixed window keeps one counter per
//! client that the store expires at the end of the window. The sliding
//! window keeps one counter per client and window, and estimates the rate
//! by weighting the previous window's count by how much of it still
//! overlaps the trailing window.

use chrono::{DateTime, Utc};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Namespace prefix for rate-limit counters in the store.
pub const RATE_LIMIT_KEY_PREFIX: &str = "ratelimit:";

/// Default window length (1 hour).
pub const DEFAULT_WINDOW_SECS: u64 = 3600;

/// Default quota for the fixed-window policy.
pub const FIXED_WINDOW_DEFAULT_MAX: u64 = 3;

/// Default quota for the sliding-window policy.
pub const SLIDING_WINDOW_DEFAULT_MAX: u64 = 5;

/// Client key used when no forwarded address is available.
pub const FALLBACK_CLIENT_KEY: &str = "127.0.0.1";

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Rate-limiting strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitPolicy {
    FixedWindow,
    SlidingWindow,
}

const VALID_POLICY_STRINGS: &[&str] = &["fixed", "sliding"];

impl RateLimitPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FixedWindow => "fixed",
            Self::SlidingWindow => "sliding",
        }
    }

    /// Parse a policy name as used in configuration.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::FixedWindow),
            "sliding" => Ok(Self::SlidingWindow),
            _ => Err(CoreError::Validation(format!(
                "Invalid rate limit policy '{s}'. Must be one of: {}",
                VALID_POLICY_STRINGS.join(", ")
            ))),
        }
    }

    /// Quota used when none is configured explicitly.
    pub fn default_max_requests(&self) -> u64 {
        match self {
            Self::FixedWindow => FIXED_WINDOW_DEFAULT_MAX,
            Self::SlidingWindow => SLIDING_WINDOW_DEFAULT_MAX,
        }
    }
}

/// A complete rate-limit configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub policy: RateLimitPolicy,
    /// Requests allowed per window.
    pub max_requests: u64,
    /// Window length in seconds.
    pub window_secs: u64,
}

impl RateLimitConfig {
    /// The policy's default quota over the default window.
    pub fn for_policy(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            max_requests: policy.default_max_requests(),
            window_secs: DEFAULT_WINDOW_SECS,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::for_policy(RateLimitPolicy::FixedWindow)
    }
}

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// Fixed-window counter key for a client.
pub fn rate_limit_key(client: &str) -> String {
    format!("{RATE_LIMIT_KEY_PREFIX}{client}")
}

/// Sliding-window counter key for a client in a given window.
pub fn window_key(client: &str, window_index: i64) -> String {
    format!("{RATE_LIMIT_KEY_PREFIX}{client}:{window_index}")
}

// ---------------------------------------------------------------------------
// Sliding window arithmetic
// ---------------------------------------------------------------------------

/// Where an instant falls relative to consecutive windows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowPosition {
    /// Index of the window containing the instant.
    pub index: i64,
    /// Fraction of the current window already elapsed, in `[0, 1)`.
    pub elapsed: f64,
}

/// Locate `now` among windows of `window_secs` aligned to the Unix epoch.
pub fn window_position(now: DateTime<Utc>, window_secs: u64) -> WindowPosition {
    let window_ms = (window_secs.max(1) * 1000) as i64;
    let now_ms = now.timestamp_millis();
    WindowPosition {
        index: now_ms.div_euclid(window_ms),
        elapsed: now_ms.rem_euclid(window_ms) as f64 / window_ms as f64,
    }
}

/// Estimated number of requests in the trailing window.
pub fn weighted_count(previous: u64, current: u64, elapsed: f64) -> f64 {
    previous as f64 * (1.0 - elapsed) + current as f64
}

/// Whether one more request fits, given the counts already recorded.
pub fn sliding_window_allows(previous: u64, current: u64, elapsed: f64, max_requests: u64) -> bool {
    weighted_count(previous, current, elapsed) < max_requests as f64
}

// ---------------------------------------------------------------------------
// Client keys
// ---------------------------------------------------------------------------

/// Reduce an `x-forwarded-for` value to the originating client address.
///
/// The first comma-separated entry is the client; later entries are
/// proxies. Missing or blank headers fall back to [`FALLBACK_CLIENT_KEY`].
pub fn client_key(forwarded_for: Option<&str>) -> String {
    forwarded_for
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(FALLBACK_CLIENT_KEY)
        .to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn policy_round_trips_through_strings() {
        for policy in [RateLimitPolicy::FixedWindow, RateLimitPolicy::SlidingWindow] {
            assert_eq!(RateLimitPolicy::parse(policy.as_str()).unwrap(), policy);
        }
    }

    #[test]
    fn policy_parse_is_case_insensitive() {
        assert_eq!(
            RateLimitPolicy::parse(" Sliding ").unwrap(),
            RateLimitPolicy::SlidingWindow
        );
    }

    #[test]
    fn unknown_policy_is_rejected() {
        assert_matches!(
            RateLimitPolicy::parse("token-bucket"),
            Err(CoreError::Validation(msg)) if msg.contains("fixed, sliding")
        );
    }

    #[test]
    fn default_config_is_three_per_hour() {
        let cfg = RateLimitConfig::default();
        assert_eq!(cfg.policy, RateLimitPolicy::FixedWindow);
        assert_eq!(cfg.max_requests, 3);
        assert_eq!(cfg.window_secs, 3600);
    }

    #[test]
    fn sliding_default_is_five_per_hour() {
        let cfg = RateLimitConfig::for_policy(RateLimitPolicy::SlidingWindow);
        assert_eq!(cfg.max_requests, 5);
    }

    #[test]
    fn keys_are_namespaced() {
        assert_eq!(rate_limit_key("10.0.0.1"), "ratelimit:10.0.0.1");
        assert_eq!(window_key("10.0.0.1", 42), "ratelimit:10.0.0.1:42");
    }

    #[test]
    fn window_position_at_boundary() {
        let now = Utc.timestamp_opt(7200, 0).unwrap();
        let pos = window_position(now, 3600);
        assert_eq!(pos.index, 2);
        assert_eq!(pos.elapsed, 0.0);
    }

    #[test]
    fn window_position_mid_window() {
        let now = Utc.timestamp_opt(3600 + 900, 0).unwrap();
        let pos = window_position(now, 3600);
        assert_eq!(pos.index, 1);
        assert!((pos.elapsed - 0.25).abs() < 1e-9);
    }

    #[test]
    fn previous_window_weight_decays() {
        assert_eq!(weighted_count(4, 0, 0.0), 4.0);
        assert_eq!(weighted_count(4, 0, 0.5), 2.0);
        assert_eq!(weighted_count(4, 1, 0.75), 2.0);
    }

    #[test]
    fn sliding_window_blocks_at_quota() {
        assert!(sliding_window_allows(0, 4, 0.0, 5));
        assert!(!sliding_window_allows(0, 5, 0.0, 5));
        // Half of the previous window's five requests still count.
        assert!(!sliding_window_allows(5, 3, 0.5, 5));
        assert!(sliding_window_allows(5, 2, 0.5, 5));
    }

    #[test]
    fn client_key_uses_first_forwarded_entry() {
        assert_eq!(client_key(Some("203.0.113.7, 10.0.0.1")), "203.0.113.7");
    }

    #[test]
    fn client_key_falls_back_when_missing() {
        assert_eq!(client_key(None), FALLBACK_CLIENT_KEY);
        assert_eq!(client_key(Some("  ")), FALLBACK_CLIENT_KEY);
    }
}
