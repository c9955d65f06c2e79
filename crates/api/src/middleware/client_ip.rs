//! Client address extractor used as the rate-limit key.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use wishlink_core::rate_limit::client_key;

/// Header set by the fronting proxy with the originating client address.
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// The requesting client's address, taken from `x-forwarded-for`.
///
/// Never rejects: a missing or unreadable header yields the loopback
/// fallback, so all such requests share one rate-limit bucket.
///
/// ```ignore
/// async fn my_handler(ClientIp(client): ClientIp) -> AppResult<Json<()>> {
///     tracing::info!(client = %client, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let forwarded = parts
            .headers
            .get(FORWARDED_FOR_HEADER)
            .and_then(|v| v.to_str().ok());

        Ok(ClientIp(client_key(forwarded)))
    }
}
