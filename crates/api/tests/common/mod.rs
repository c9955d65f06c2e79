#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use wishlink_api::config::ServerConfig;
use wishlink_api::render::PageRenderer;
use wishlink_api::router::build_app_router;
use wishlink_api::state::AppState;
use wishlink_core::rate_limit::RateLimitConfig;
use wishlink_store::{
    build_rate_limiter, KvStore, MemoryStore, SharedStore, SlidingWindow, StoreError,
};

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// an in-memory store and the default fixed-window rate limit.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        store_url: "memory://".to_string(),
        wish_ttl_secs: 259_200,
        rate_limit: RateLimitConfig::default(),
    }
}

/// A fresh in-memory store, shareable with the app under test.
pub fn memory_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

/// Build the full application router over `store` with the default config.
pub fn build_test_app(store: Arc<MemoryStore>) -> Router {
    build_test_app_with(store, test_config())
}

/// Build the full application router over `store` with a custom config.
pub fn build_test_app_with(store: Arc<MemoryStore>, config: ServerConfig) -> Router {
    build_test_app_over(store, config)
}

/// Build the full application router over any store.
///
/// Goes through `build_app_router`, so tests exercise the same middleware
/// stack (CORS, request ID, timeout, tracing, panic recovery) as production.
pub fn build_test_app_over(store: SharedStore, config: ServerConfig) -> Router {
    let rate_limiter = build_rate_limiter(Arc::clone(&store), config.rate_limit);

    let state = AppState {
        store,
        rate_limiter,
        renderer: Arc::new(PageRenderer::new().unwrap()),
        config: Arc::new(config.clone()),
    };

    build_app_router(state, &config)
}

/// Detail carried by every [`UnreachableStore`] failure. Must never reach a
/// response body.
pub const STORE_FAILURE_DETAIL: &str = "redis-primary.internal:6379";

/// Store whose reads, writes and pings fail as if Redis went away.
///
/// Rate-limit counters still work (kept in memory), so requests get past
/// the limiter and fail on the wish read or write itself.
#[derive(Default)]
pub struct UnreachableStore {
    counters: MemoryStore,
}

fn unreachable() -> StoreError {
    StoreError::Redis(
        (
            redis::ErrorKind::IoError,
            "connection refused",
            STORE_FAILURE_DETAIL.to_string(),
        )
            .into(),
    )
}

#[async_trait]
impl KvStore for UnreachableStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(unreachable())
    }

    async fn set_ex(&self, _key: &str, _value: &str, _ttl_secs: u64) -> Result<(), StoreError> {
        Err(unreachable())
    }

    async fn incr_with_expiry(&self, key: &str, ttl_secs: u64) -> Result<i64, StoreError> {
        self.counters.incr_with_expiry(key, ttl_secs).await
    }

    async fn incr_sliding(&self, window: &SlidingWindow<'_>) -> Result<bool, StoreError> {
        self.counters.incr_sliding(window).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(unreachable())
    }
}

/// Build the full application router over an [`UnreachableStore`].
pub fn build_unreachable_store_app() -> Router {
    build_test_app_over(Arc::new(UnreachableStore::default()), test_config())
}

/// Send a request through the router.
pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

/// Issue a GET request.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Issue a POST with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    post_json_from(app, uri, body, None).await
}

/// Issue a POST with a JSON body, optionally as a given forwarded client.
pub async fn post_json_from(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    client: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(client) = client {
        builder = builder.header("x-forwarded-for", client);
    }
    let request = builder
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    send(app, request).await
}

/// Issue a request with an arbitrary method and no body.
pub async fn request(app: Router, method: Method, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Collect a response body as text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// A valid creation payload.
pub fn wish_payload(name: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "description": "Wishing you a wonderful year ahead.",
        "sender": "Morty",
    })
}
