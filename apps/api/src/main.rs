mod auth;
mod config;
mod db;
mod errors;
mod feedback;
mod identity;
mod interviews;
mod llm_client;
mod models;
mod routes;
mod state;
mod store;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::identity::{
    JwtIdentityGateway, MemoryRevocationStore, RedisRevocationStore, RevocationStore,
};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{DocumentStore, MemoryDocumentStore, PgDocumentStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interview API v{}", env!("CARGO_PKG_VERSION"));

    // Document store: PostgreSQL when configured, otherwise process memory
    let store: Arc<dyn DocumentStore> = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            ensure_schema(&pool).await?;
            Arc::new(PgDocumentStore::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set; documents are kept in memory and lost on restart");
            Arc::new(MemoryDocumentStore::new())
        }
    };

    // Session revocation list
    let revocations: Arc<dyn RevocationStore> = match &config.redis_url {
        Some(url) => {
            let redis = redis::Client::open(url.as_str())?;
            info!("Redis client initialized");
            Arc::new(RedisRevocationStore::new(redis))
        }
        None => {
            warn!("REDIS_URL not set; session revocations are kept in memory");
            Arc::new(MemoryRevocationStore::new())
        }
    };

    let identity = JwtIdentityGateway::new(
        &config.identity_jwt_secret,
        &config.session_secret,
        store.clone(),
        revocations,
    );

    // Initialize LLM client
    let llm = LlmClient::new(config.gemini_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let state = AppState {
        store,
        identity: Arc::new(identity),
        llm: Arc::new(llm),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
