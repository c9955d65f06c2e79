//! Handlers for creating and reading wishes.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use wishlink_core::error::CoreError;
use wishlink_core::id::WishId;
use wishlink_core::wish::{NewWish, WishRecord};
use wishlink_store::repositories::WishRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::client_ip::ClientIp;
use crate::state::AppState;

/// Response body of a successful create.
#[derive(Debug, Serialize)]
pub struct CreateWishResponse {
    pub id: WishId,
}

/// Query parameters of the read endpoint.
#[derive(Debug, Deserialize)]
pub struct GetWishParams {
    pub id: Option<String>,
}

/// POST /api/create-wish
///
/// Rate-limits by client address, validates the submission and stores it
/// under a fresh identifier. The rate limit is charged before the body is
/// looked at, so malformed submissions count against the quota too.
pub async fn create_wish(
    State(state): State<AppState>,
    ClientIp(client): ClientIp,
    payload: Result<Json<NewWish>, JsonRejection>,
) -> AppResult<Json<CreateWishResponse>> {
    if !state.rate_limiter.consume(&client).await? {
        return Err(AppError::Core(CoreError::RateLimited(client)));
    }

    let Json(input) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let record = input.into_record()?;

    let id = WishRepo::create(state.store.as_ref(), &record, state.config.wish_ttl_secs).await?;

    tracing::info!(wish_id = %id, client = %client, "Wish created");

    Ok(Json(CreateWishResponse { id }))
}

/// GET /api/get-wish?id=<id>
///
/// Returns the stored wish, or 404 if it never existed or has expired.
pub async fn get_wish(
    State(state): State<AppState>,
    params: Result<Query<GetWishParams>, QueryRejection>,
) -> AppResult<Json<WishRecord>> {
    let Query(params) = params.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let raw_id = params
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("ID is required".into()))?;

    let not_found = || {
        AppError::Core(CoreError::NotFound {
            entity: "Wish",
            id: raw_id.clone(),
        })
    };

    let id = WishId::parse(&raw_id).ok_or_else(not_found)?;

    let record = WishRepo::find_by_id(state.store.as_ref(), &id)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(record))
}
