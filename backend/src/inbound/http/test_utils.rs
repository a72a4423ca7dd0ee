//! Test helpers for inbound HTTP components.

use std::sync::{Arc, Mutex};

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use async_trait::async_trait;
use mockable::DefaultClock;

use crate::domain::assistant::{AssistantService, IntentDispatcher};
use crate::domain::ports::{
    IntentClassifier, IntentClassifierError, MediaAsset, MediaStore, MediaStoreError, MediaUpload,
    PasswordHashError, PasswordHasher,
};
use crate::domain::{AccountService, DEFAULT_HISTORY_LIMIT, HistoryService};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryStore;

/// Session middleware with a fresh key and an insecure `session` cookie.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Classifier answering every prompt with the same canned reply.
pub struct StubClassifier {
    reply: Result<String, IntentClassifierError>,
    prompts: Mutex<Vec<String>>,
}

impl StubClassifier {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_owned()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: IntentClassifierError) -> Self {
        Self {
            reply: Err(error),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompt log lock").clone()
    }
}

#[async_trait]
impl IntentClassifier for StubClassifier {
    async fn classify(&self, prompt: &str) -> Result<String, IntentClassifierError> {
        self.prompts
            .lock()
            .expect("prompt log lock")
            .push(prompt.to_owned());
        self.reply.clone()
    }
}

/// Media store returning a fixed URL and remembering uploaded paths.
#[derive(Default)]
pub struct StubMediaStore {
    pub uploads: Mutex<Vec<MediaUpload>>,
}

pub const STUB_IMAGE_URL: &str = "https://res.cloudinary.com/demo/image/upload/avatar.png";

#[async_trait]
impl MediaStore for StubMediaStore {
    async fn upload(&self, upload: &MediaUpload) -> Result<MediaAsset, MediaStoreError> {
        if !upload.path.exists() {
            return Err(MediaStoreError::io("spooled file missing"));
        }
        self.uploads.lock().expect("upload log lock").push(upload.clone());
        Ok(MediaAsset {
            secure_url: STUB_IMAGE_URL.to_owned(),
        })
    }
}

/// Reversible "hash" so HTTP tests avoid Argon2's cost.
pub struct PlainHasher;

#[async_trait]
impl PasswordHasher for PlainHasher {
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        Ok(format!("plain${password}"))
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        Ok(hash.strip_prefix("plain$") == Some(password))
    }
}

/// State backed by the in-memory store and the given classifier.
pub fn test_state(classifier: Arc<dyn IntentClassifier>) -> HttpState {
    let store = Arc::new(InMemoryStore::new());
    let clock = Arc::new(DefaultClock);
    let history = HistoryService::new(store.clone(), DEFAULT_HISTORY_LIMIT);
    let accounts = AccountService::new(
        store.clone(),
        Arc::new(PlainHasher),
        Arc::new(StubMediaStore::default()),
        clock.clone(),
    );
    let assistant = AssistantService::new(
        classifier,
        IntentDispatcher::new(clock),
        store,
        history.clone(),
    );
    HttpState::new(accounts, assistant, history)
}
