use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::auth::service::get_current_user;
use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;

/// The signed-in caller, resolved from the `session` cookie.
/// Rejects with 401 when the cookie is missing, invalid, revoked, or its
/// user record is gone.
#[derive(Debug, Clone)]
pub struct SessionUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        get_current_user(state, &parts.headers)
            .await
            .map(SessionUser)
            .ok_or(AppError::Unauthorized)
    }
}
