//! Caller identity extractor.
//!
//! Authentication happens in the gateway in front of this service, which
//! forwards the authenticated user's ID in the `x-user-id` header.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use nutriquest_core::types::DbId;

use crate::error::AppError;

/// Header carrying the authenticated user's ID.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The user a request acts on behalf of.
///
/// ```ignore
/// async fn my_handler(user: CurrentUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub user_id: DbId,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized(format!("Missing {USER_ID_HEADER} header")))?;

        let user_id: DbId = raw
            .trim()
            .parse()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| AppError::Unauthorized(format!("Invalid {USER_ID_HEADER} header")))?;

        Ok(CurrentUser { user_id })
    }
}
