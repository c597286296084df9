//! Axum route handlers for the Auth API.
//!
//! These mirror form actions: failures come back as `{success: false, message}`
//! with status 200, and details are only logged.

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::error;

use crate::auth::service::{
    get_current_user, sign_in, sign_out, sign_up, ActionResult, SignInParams, SignUpOutcome,
    SignUpParams,
};
use crate::identity::cookie::{clear_session_cookie_header, session_cookie_header};
use crate::models::user::User;
use crate::state::AppState;

/// POST /api/auth/sign-up
pub async fn handle_sign_up(
    State(state): State<AppState>,
    Json(params): Json<SignUpParams>,
) -> Json<ActionResult> {
    let result = match sign_up(state.store.as_ref(), state.identity.as_ref(), &params).await {
        Ok(SignUpOutcome::Created) => {
            ActionResult::ok("Account created successfully. Please sign in.")
        }
        Ok(SignUpOutcome::UserExists) => {
            ActionResult::failed("User already exists. Please sign in.")
        }
        Ok(SignUpOutcome::EmailInUse) => ActionResult::failed("This email is already in use."),
        Err(e) => {
            error!("Error creating user: {e}");
            ActionResult::failed("Failed to create account. Please try again.")
        }
    };
    Json(result)
}

/// POST /api/auth/sign-in
///
/// Sets the `session` cookie on success.
pub async fn handle_sign_in(
    State(state): State<AppState>,
    Json(params): Json<SignInParams>,
) -> Response {
    match sign_in(state.identity.as_ref(), &params).await {
        Ok(Some(cookie)) => {
            let header = session_cookie_header(&cookie, state.config.is_production());
            (
                [(SET_COOKIE, header)],
                Json(ActionResult::ok("Signed in successfully.")),
            )
                .into_response()
        }
        Ok(None) => Json(ActionResult::failed("User does not exist. Please sign up.")).into_response(),
        Err(e) => {
            error!("Error signing in: {e}");
            Json(ActionResult::failed(
                "Failed to log into account. Please try again.",
            ))
            .into_response()
        }
    }
}

/// POST /api/auth/sign-out
pub async fn handle_sign_out(State(state): State<AppState>, headers: HeaderMap) -> Response {
    sign_out(state.identity.as_ref(), &headers).await;
    let header = clear_session_cookie_header(state.config.is_production());
    ([(SET_COOKIE, header)], StatusCode::NO_CONTENT).into_response()
}

/// GET /api/auth/me
///
/// The signed-in user, or `null`.
pub async fn handle_current_user(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<Option<User>> {
    Json(get_current_user(&state, &headers).await)
}

/// GET /api/auth/status
pub async fn handle_auth_status(State(state): State<AppState>, headers: HeaderMap) -> Json<Value> {
    let authenticated = get_current_user(&state, &headers).await.is_some();
    Json(json!({ "authenticated": authenticated }))
}
