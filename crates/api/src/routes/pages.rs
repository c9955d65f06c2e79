use axum::routing::get;
use axum::Router;

use crate::handlers::{method_not_allowed, pages};
use crate::state::AppState;

/// Front-end page route, mounted at the root.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(pages::show_page).fallback(method_not_allowed))
}
