use std::sync::Arc;

use crate::config::Config;
use crate::identity::IdentityGateway;
use crate::llm_client::LanguageModel;
use crate::store::DocumentStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Persistence for users, interviews and feedback.
    pub store: Arc<dyn DocumentStore>,
    pub identity: Arc<dyn IdentityGateway>,
    /// Hosted model. `LlmClient` in production, a stub in tests.
    pub llm: Arc<dyn LanguageModel>,
    pub config: Config,
}
