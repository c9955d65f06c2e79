pub mod pages;
pub mod wishes;

use crate::error::AppError;

/// Fallback for routes that exist but not for the request's method.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
