use std::collections::HashMap;

use async_trait::async_trait;
use redis::Client as RedisClient;
use tokio::sync::RwLock;

use super::{IdentityError, SESSION_DURATION_SECS};

/// Per-uid session generation. A session carries the generation current when
/// it was issued and is revoked once the uid's generation moves past it.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Current generation for `uid`; 0 when sessions were never revoked.
    async fn generation(&self, uid: &str) -> Result<u64, IdentityError>;

    /// Advances the generation, revoking every session issued so far.
    /// Returns the new generation.
    async fn revoke(&self, uid: &str) -> Result<u64, IdentityError>;
}

fn revocation_key(uid: &str) -> String {
    format!("session:generation:{uid}")
}

/// Redis-backed revocation list. A counter expires once every session it
/// could affect has expired on its own; sessions issued after that carry a
/// generation no lower than the reset counter.
#[derive(Clone)]
pub struct RedisRevocationStore {
    client: RedisClient,
}

impl RedisRevocationStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RevocationStore for RedisRevocationStore {
    async fn generation(&self, uid: &str) -> Result<u64, IdentityError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let generation = redis::cmd("GET")
            .arg(revocation_key(uid))
            .query_async::<_, Option<u64>>(&mut conn)
            .await?;
        Ok(generation.unwrap_or(0))
    }

    async fn revoke(&self, uid: &str) -> Result<u64, IdentityError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = revocation_key(uid);
        let (generation,) = redis::pipe()
            .atomic()
            .cmd("INCR")
            .arg(&key)
            .cmd("EXPIRE")
            .arg(&key)
            .arg(SESSION_DURATION_SECS)
            .ignore()
            .query_async::<_, (u64,)>(&mut conn)
            .await?;
        Ok(generation)
    }
}

/// In-process revocation list. Used when Redis is not configured, and in tests.
#[derive(Default)]
pub struct MemoryRevocationStore {
    generations: RwLock<HashMap<String, u64>>,
}

impl MemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RevocationStore for MemoryRevocationStore {
    async fn generation(&self, uid: &str) -> Result<u64, IdentityError> {
        Ok(self.generations.read().await.get(uid).copied().unwrap_or(0))
    }

    async fn revoke(&self, uid: &str) -> Result<u64, IdentityError> {
        let mut generations = self.generations.write().await;
        let generation = generations.entry(uid.to_string()).or_insert(0);
        *generation += 1;
        Ok(*generation)
    }
}
