//! Shared harness for HTTP integration tests.
//!
//! Builds the full routing table over the in-memory store with stub
//! collaborators, so tests exercise real handlers and domain services
//! without a database or network.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use async_trait::async_trait;
use mockable::DefaultClock;

use assistant_backend::Trace;
use assistant_backend::domain::assistant::{AssistantService, IntentDispatcher};
use assistant_backend::domain::ports::{
    IntentClassifier, IntentClassifierError, MediaAsset, MediaStore, MediaStoreError, MediaUpload,
    PasswordHashError, PasswordHasher,
};
use assistant_backend::domain::{AccountService, DEFAULT_HISTORY_LIMIT, HistoryService};
use assistant_backend::inbound::http::configure;
use assistant_backend::inbound::http::health::HealthState;
use assistant_backend::inbound::http::state::HttpState;
use assistant_backend::outbound::memory::InMemoryStore;

pub const UPLOADED_IMAGE_URL: &str = "https://media.example/avatars/uploaded.png";

/// Classifier replaying queued delegate texts; an empty queue behaves like
/// an unreachable delegate.
#[derive(Default)]
pub struct ScriptedClassifier {
    replies: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClassifier {
    pub fn push_reply(&self, text: &str) {
        self.replies
            .lock()
            .expect("reply queue lock")
            .push_back(text.to_owned());
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompt log lock").clone()
    }
}

#[async_trait]
impl IntentClassifier for ScriptedClassifier {
    async fn classify(&self, prompt: &str) -> Result<String, IntentClassifierError> {
        self.prompts
            .lock()
            .expect("prompt log lock")
            .push(prompt.to_owned());
        self.replies
            .lock()
            .expect("reply queue lock")
            .pop_front()
            .ok_or_else(|| IntentClassifierError::status(503_u16, "scripted outage"))
    }
}

/// Media store that accepts any spooled file.
#[derive(Default)]
pub struct AcceptingMediaStore {
    pub uploads: Mutex<Vec<MediaUpload>>,
}

#[async_trait]
impl MediaStore for AcceptingMediaStore {
    async fn upload(&self, upload: &MediaUpload) -> Result<MediaAsset, MediaStoreError> {
        if !upload.path.exists() {
            return Err(MediaStoreError::io("spooled file missing"));
        }
        self.uploads
            .lock()
            .expect("upload log lock")
            .push(upload.clone());
        Ok(MediaAsset {
            secure_url: UPLOADED_IMAGE_URL.to_owned(),
        })
    }
}

/// Cheap reversible hasher so tests avoid Argon2's cost.
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

/// Everything a test needs to build the app and inspect collaborators.
#[derive(Clone)]
pub struct Harness {
    pub state: web::Data<HttpState>,
    pub health: web::Data<HealthState>,
    pub classifier: Arc<ScriptedClassifier>,
    pub media: Arc<AcceptingMediaStore>,
    pub key: Key,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_history_limit(limit: usize) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let classifier = Arc::new(ScriptedClassifier::default());
        let media = Arc::new(AcceptingMediaStore::default());
        let clock = Arc::new(DefaultClock);
        let history = HistoryService::new(store.clone(), limit);
        let accounts = AccountService::new(
            store.clone(),
            Arc::new(PlainHasher),
            media.clone(),
            clock.clone(),
        );
        let assistant = AssistantService::new(
            classifier.clone(),
            IntentDispatcher::new(clock),
            store,
            history.clone(),
        );
        let health = web::Data::new(HealthState::new());
        health.mark_ready();
        Self {
            state: web::Data::new(HttpState::new(accounts, assistant, history)),
            health,
            classifier,
            media,
            key: Key::generate(),
        }
    }

    /// The production routing table behind test-friendly middleware.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl actix_web::body::MessageBody + use<>>,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), self.key.clone())
            .cookie_name("session".to_owned())
            .cookie_secure(false)
            .build();
        App::new()
            .app_data(self.state.clone())
            .app_data(self.health.clone())
            .configure(configure)
            .wrap(session)
            .wrap(Trace)
    }
}

/// The `session` cookie set by a response, if any.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}
