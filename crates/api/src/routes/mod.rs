pub mod health;
pub mod pages;
pub mod wishes;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /create-wish          create a wish (POST)
/// /get-wish?id=<id>     read a wish (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(wishes::router())
}
