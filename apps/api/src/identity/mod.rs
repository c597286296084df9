//! Identity Gateway: identity-token exchange, session cookies and revocation.
//!
//! `AppState` holds an `Arc<dyn IdentityGateway>`. The production backend is
//! `JwtIdentityGateway`; the revocation list behind it is Redis or in-memory.

use async_trait::async_trait;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::StoreError;

pub mod cookie;
pub mod extract;
pub mod jwt;
pub mod revocation;

pub use extract::SessionUser;
pub use jwt::JwtIdentityGateway;
pub use revocation::{MemoryRevocationStore, RedisRevocationStore, RevocationStore};

/// Session lifetime: 7 days.
pub const SESSION_DURATION_SECS: i64 = 60 * 60 * 24 * 7;

pub fn session_duration() -> Duration {
    Duration::seconds(SESSION_DURATION_SECS)
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Invalid identity token: {0}")]
    InvalidIdToken(jsonwebtoken::errors::Error),

    #[error("Invalid session cookie: {0}")]
    InvalidSession(jsonwebtoken::errors::Error),

    #[error("Session has been revoked")]
    Revoked,

    #[error("Failed to sign session cookie: {0}")]
    Signing(jsonwebtoken::errors::Error),

    #[error("Revocation list error: {0}")]
    Revocation(#[from] redis::RedisError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Claims carried by a verified session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Identity-provider uid.
    #[serde(rename = "sub")]
    pub uid: String,
    pub iat: i64,
    pub exp: i64,
    /// Revocation generation of the uid at issue time.
    #[serde(rename = "gen", default)]
    pub generation: u64,
}

/// A user as known to the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderUser {
    pub uid: String,
    pub email: String,
}

#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// Exchanges a provider-issued identity token for a signed session cookie value.
    async fn create_session_cookie(
        &self,
        id_token: &str,
        expires_in: Duration,
    ) -> Result<String, IdentityError>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<ProviderUser>, IdentityError>;

    /// Verifies signature and expiry. With `check_revoked`, also rejects
    /// cookies issued before the uid's sessions were revoked.
    async fn verify_session_cookie(
        &self,
        cookie: &str,
        check_revoked: bool,
    ) -> Result<SessionClaims, IdentityError>;

    /// Invalidates every session issued to `uid` so far.
    async fn revoke_sessions(&self, uid: &str) -> Result<(), IdentityError>;
}
