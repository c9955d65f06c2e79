use std::sync::Arc;

use wishlink_store::{RateLimiter, SharedStore};

use crate::config::ServerConfig;
use crate::render::PageRenderer;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`). The store is
/// connected once at startup and injected here; handlers never open their
/// own connections.
#[derive(Clone)]
pub struct AppState {
    /// Key-value store holding wishes and rate-limit counters.
    pub store: SharedStore,
    /// Limiter guarding wish creation.
    pub rate_limiter: Arc<dyn RateLimiter>,
    /// Page templates, compiled once.
    pub renderer: Arc<PageRenderer>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
