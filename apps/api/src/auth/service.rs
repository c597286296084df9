//! Auth service: user records and session exchange, independent of HTTP.

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::identity::cookie::read_session_cookie;
use crate::identity::{session_duration, IdentityError, IdentityGateway};
use crate::models::iso_now;
use crate::models::user::{User, UserRecord, USERS_COLLECTION};
use crate::state::AppState;
use crate::store::{to_body, DocumentStore, StoreError};

#[derive(Debug, Clone, Deserialize)]
pub struct SignUpParams {
    pub uid: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInParams {
    pub email: String,
    pub id_token: String,
}

/// Result envelope returned by the auth actions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
}

impl ActionResult {
    pub fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }

    pub fn failed(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignUpOutcome {
    Created,
    UserExists,
    EmailInUse,
}

/// Creates `users/{uid}` unless the uid or the email is already taken.
pub async fn sign_up(
    store: &dyn DocumentStore,
    identity: &dyn IdentityGateway,
    params: &SignUpParams,
) -> Result<SignUpOutcome, IdentityError> {
    if store.get(USERS_COLLECTION, &params.uid).await?.is_some() {
        return Ok(SignUpOutcome::UserExists);
    }

    if identity.get_user_by_email(&params.email).await?.is_some() {
        return Ok(SignUpOutcome::EmailInUse);
    }

    let record = UserRecord {
        name: params.name.clone(),
        email: params.email.clone(),
        created_at: iso_now(),
    };
    store
        .set(USERS_COLLECTION, &params.uid, to_body(&record)?)
        .await?;

    info!("Created user {}", params.uid);
    Ok(SignUpOutcome::Created)
}

/// Exchanges the identity token for a session cookie value.
/// `None` when no user is registered under the email.
pub async fn sign_in(
    identity: &dyn IdentityGateway,
    params: &SignInParams,
) -> Result<Option<String>, IdentityError> {
    if identity.get_user_by_email(&params.email).await?.is_none() {
        return Ok(None);
    }

    let cookie = identity
        .create_session_cookie(&params.id_token, session_duration())
        .await?;
    Ok(Some(cookie))
}

/// Revokes the caller's sessions if the presented cookie is still valid.
pub async fn sign_out(identity: &dyn IdentityGateway, headers: &HeaderMap) {
    let Some(cookie) = read_session_cookie(headers) else {
        return;
    };

    match identity.verify_session_cookie(&cookie, false).await {
        Ok(claims) => {
            if let Err(e) = identity.revoke_sessions(&claims.uid).await {
                warn!("Failed to revoke sessions for {}: {e}", claims.uid);
            }
        }
        Err(e) => warn!("Sign-out with unverifiable session cookie: {e}"),
    }
}

/// Resolves the signed-in user from the request's session cookie.
/// Any verification or lookup failure yields `None`.
pub async fn get_current_user(state: &AppState, headers: &HeaderMap) -> Option<User> {
    let cookie = read_session_cookie(headers)?;

    let claims = match state.identity.verify_session_cookie(&cookie, true).await {
        Ok(claims) => claims,
        Err(e) => {
            warn!("Error verifying session cookie: {e}");
            return None;
        }
    };

    match load_user(state.store.as_ref(), &claims.uid).await {
        Ok(user) => user,
        Err(e) => {
            warn!("Error loading user {}: {e}", claims.uid);
            None
        }
    }
}

async fn load_user(store: &dyn DocumentStore, uid: &str) -> Result<Option<User>, StoreError> {
    match store.get(USERS_COLLECTION, uid).await? {
        Some(doc) => Ok(Some(doc.decode()?)),
        None => Ok(None),
    }
}
