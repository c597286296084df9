//! Shared fixtures for unit and router tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};

use crate::config::Config;
use crate::identity::{JwtIdentityGateway, MemoryRevocationStore};
use crate::llm_client::{LanguageModel, LlmError};
use crate::state::AppState;
use crate::store::MemoryDocumentStore;

enum Reply {
    Text(String),
    Object(Value),
    Unavailable,
}

/// Canned `LanguageModel` that counts calls and remembers the last prompt.
pub struct StubModel {
    reply: Reply,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl StubModel {
    fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn with_text(text: &str) -> Self {
        Self::new(Reply::Text(text.to_string()))
    }

    pub fn with_object(object: Value) -> Self {
        Self::new(Reply::Object(object))
    }

    /// Every call fails as if the upstream were unavailable.
    pub fn failing() -> Self {
        Self::new(Reply::Unavailable)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }

    fn record(&self, prompt: &str) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
    }

    fn unavailable() -> LlmError {
        LlmError::Api {
            status: 503,
            message: "model unavailable".to_string(),
        }
    }
}

#[async_trait]
impl LanguageModel for StubModel {
    async fn generate_text(&self, prompt: &str, _system: Option<&str>) -> Result<String, LlmError> {
        self.record(prompt);
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Object(object) => Ok(object.to_string()),
            Reply::Unavailable => Err(Self::unavailable()),
        }
    }

    async fn generate_object(
        &self,
        prompt: &str,
        _system: &str,
        _schema: &Value,
    ) -> Result<Value, LlmError> {
        self.record(prompt);
        match &self.reply {
            Reply::Object(object) => Ok(object.clone()),
            Reply::Text(text) => serde_json::from_str(text).map_err(LlmError::Parse),
            Reply::Unavailable => Err(Self::unavailable()),
        }
    }
}

/// Concrete handles behind a test `AppState`.
pub struct Harness {
    pub store: Arc<MemoryDocumentStore>,
    pub llm: Arc<StubModel>,
}

pub fn test_state() -> (AppState, Harness) {
    test_state_with(StubModel::with_text("[]"))
}

pub fn test_state_with(model: StubModel) -> (AppState, Harness) {
    let config = Config::for_tests();
    let store = Arc::new(MemoryDocumentStore::new());
    let llm = Arc::new(model);
    let identity = JwtIdentityGateway::new(
        &config.identity_jwt_secret,
        &config.session_secret,
        store.clone(),
        Arc::new(MemoryRevocationStore::new()),
    );

    let state = AppState {
        store: store.clone(),
        identity: Arc::new(identity),
        llm: llm.clone(),
        config,
    };
    (state, Harness { store, llm })
}

/// Provider identity token for `uid`, valid for an hour.
pub fn id_token(uid: &str) -> String {
    let exp = Utc::now().timestamp() + 3600;
    encode(
        &Header::default(),
        &json!({"sub": uid, "exp": exp}),
        &EncodingKey::from_secret(Config::for_tests().identity_jwt_secret.as_bytes()),
    )
    .unwrap()
}
