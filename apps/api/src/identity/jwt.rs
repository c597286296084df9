use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Deserialize;
use tracing::info;

use super::{IdentityError, IdentityGateway, ProviderUser, RevocationStore, SessionClaims};
use crate::models::user::USERS_COLLECTION;
use crate::store::{DocumentStore, Query};

/// Claims we read from a provider-issued identity token.
#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
}

/// HS256 identity gateway.
///
/// Identity tokens are signed by the provider with a shared secret; session
/// cookies are our own HS256 JWTs. User lookup resolves against the `users`
/// collection written at sign-up.
pub struct JwtIdentityGateway {
    id_token_key: DecodingKey,
    session_encoding_key: EncodingKey,
    session_decoding_key: DecodingKey,
    store: Arc<dyn DocumentStore>,
    revocations: Arc<dyn RevocationStore>,
}

impl JwtIdentityGateway {
    pub fn new(
        identity_jwt_secret: &str,
        session_secret: &str,
        store: Arc<dyn DocumentStore>,
        revocations: Arc<dyn RevocationStore>,
    ) -> Self {
        Self {
            id_token_key: DecodingKey::from_secret(identity_jwt_secret.as_bytes()),
            session_encoding_key: EncodingKey::from_secret(session_secret.as_bytes()),
            session_decoding_key: DecodingKey::from_secret(session_secret.as_bytes()),
            store,
            revocations,
        }
    }

    fn sign_session(&self, claims: &SessionClaims) -> Result<String, IdentityError> {
        encode(&Header::default(), claims, &self.session_encoding_key).map_err(IdentityError::Signing)
    }
}

fn strict_validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation
}

#[async_trait]
impl IdentityGateway for JwtIdentityGateway {
    async fn create_session_cookie(
        &self,
        id_token: &str,
        expires_in: Duration,
    ) -> Result<String, IdentityError> {
        let id_claims = decode::<IdTokenClaims>(id_token, &self.id_token_key, &strict_validation())
            .map_err(IdentityError::InvalidIdToken)?
            .claims;

        let generation = self.revocations.generation(&id_claims.sub).await?;
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            uid: id_claims.sub,
            iat: now,
            exp: now + expires_in.num_seconds(),
            generation,
        };

        info!("Issuing session cookie for uid {}", claims.uid);
        self.sign_session(&claims)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<ProviderUser>, IdentityError> {
        let query = Query::new().where_eq("email", email).limit(1);
        let docs = self.store.query(USERS_COLLECTION, &query).await?;

        Ok(docs.into_iter().next().map(|doc| ProviderUser {
            uid: doc.id,
            email: email.to_string(),
        }))
    }

    async fn verify_session_cookie(
        &self,
        cookie: &str,
        check_revoked: bool,
    ) -> Result<SessionClaims, IdentityError> {
        let claims = decode::<SessionClaims>(cookie, &self.session_decoding_key, &strict_validation())
            .map_err(IdentityError::InvalidSession)?
            .claims;

        if check_revoked {
            let current = self.revocations.generation(&claims.uid).await?;
            if claims.generation < current {
                return Err(IdentityError::Revoked);
            }
        }

        Ok(claims)
    }

    async fn revoke_sessions(&self, uid: &str) -> Result<(), IdentityError> {
        let generation = self.revocations.revoke(uid).await?;
        info!("Revoked sessions for uid {uid} (generation {generation})");
        Ok(())
    }
}
