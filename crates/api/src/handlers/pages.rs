//! Handler for the wish front-end page.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use wishlink_core::id::WishId;
use wishlink_core::page::{FetchOutcome, Page, PageErrorKind, PageQuery, PageRequest};
use wishlink_store::repositories::WishRepo;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /
///
/// Renders the create form, a stored wish (`?id=`), or a wish carried
/// inline in the query (`?name=&description=`). Lookup failures render the
/// error page with a matching status code.
pub async fn show_page(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<(StatusCode, Html<String>)> {
    let page = match PageRequest::from_query(query) {
        PageRequest::Create => Page::Create,
        PageRequest::Inline(record) => Page::View(record),
        PageRequest::Fetch(raw_id) => Page::loaded(load_wish(&state, &raw_id).await),
    };

    let status = match &page {
        Page::Error {
            kind: PageErrorKind::NotFound,
            ..
        } => StatusCode::NOT_FOUND,
        Page::Error {
            kind: PageErrorKind::LoadFailed,
            ..
        } => StatusCode::INTERNAL_SERVER_ERROR,
        Page::Create | Page::View(_) => StatusCode::OK,
    };

    let html = state.renderer.render(&page)?;
    Ok((status, Html(html)))
}

async fn load_wish(state: &AppState, raw_id: &str) -> FetchOutcome {
    let Some(id) = WishId::parse(raw_id) else {
        return FetchOutcome::NotFound;
    };

    match WishRepo::find_by_id(state.store.as_ref(), &id).await {
        Ok(Some(record)) => FetchOutcome::Found(record),
        Ok(None) => FetchOutcome::NotFound,
        Err(err) => {
            tracing::error!(error = %err, wish_id = %id, "Failed to load wish for page");
            FetchOutcome::Failed
        }
    }
}
