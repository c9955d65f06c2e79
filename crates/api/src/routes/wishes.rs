//! Route definitions for the wish endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{method_not_allowed, wishes};
use crate::state::AppState;

/// Wish routes mounted under `/api`.
///
/// ```text
/// POST /create-wish  -> create_wish
/// GET  /get-wish     -> get_wish
/// ```
///
/// Any other method on these paths answers 405 with a JSON error body.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/create-wish",
            post(wishes::create_wish).fallback(method_not_allowed),
        )
        .route(
            "/get-wish",
            get(wishes::get_wish).fallback(method_not_allowed),
        )
}
