//! Builders selecting the adapter behind each port.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use assistant_backend::domain::assistant::{AssistantService, IntentDispatcher};
use assistant_backend::domain::ports::{
    HistoryRepository, IntentClassifier, MediaStore, UserRepository,
};
use assistant_backend::domain::{AccountService, HistoryService};
use assistant_backend::inbound::http::state::HttpState;
use assistant_backend::outbound::gemini::{GeminiHttpClassifier, UnconfiguredClassifier};
use assistant_backend::outbound::media::{CloudinaryMediaStore, UnconfiguredMediaStore};
use assistant_backend::outbound::memory::InMemoryStore;
use assistant_backend::outbound::password::Argon2PasswordHasher;
use assistant_backend::outbound::persistence::{DieselHistoryRepository, DieselUserRepository};

use super::ServerConfig;

type Repositories = (Arc<dyn UserRepository>, Arc<dyn HistoryRepository>);

fn build_repositories(config: &ServerConfig) -> Repositories {
    match &config.db_pool {
        Some(pool) => (
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselHistoryRepository::new(pool.clone())),
        ),
        None => {
            warn!("no database configured; accounts and history live in memory");
            let store = Arc::new(InMemoryStore::new());
            (store.clone(), store)
        }
    }
}

fn build_classifier(config: &ServerConfig) -> std::io::Result<Arc<dyn IntentClassifier>> {
    let Some(delegate) = &config.delegate else {
        warn!("no language model endpoint configured; every ask degrades to the no-answer reply");
        return Ok(Arc::new(UnconfiguredClassifier));
    };
    let classifier = GeminiHttpClassifier::new(
        delegate.url.clone(),
        delegate.api_key.clone(),
        config.outbound_timeout,
    )
    .map_err(|err| std::io::Error::other(format!("failed to build classifier client: {err}")))?;
    info!(host = delegate.url.host_str().unwrap_or_default(), "language model endpoint configured");
    Ok(Arc::new(classifier))
}

fn build_media_store(
    config: &ServerConfig,
    clock: Arc<dyn Clock>,
) -> std::io::Result<Arc<dyn MediaStore>> {
    let Some(media) = &config.media else {
        warn!("no media store configured; assistant image uploads are disabled");
        return Ok(Arc::new(UnconfiguredMediaStore));
    };
    let store = CloudinaryMediaStore::new(media.clone(), clock, config.outbound_timeout)
        .map_err(|err| std::io::Error::other(format!("failed to build media client: {err}")))?;
    Ok(Arc::new(store))
}

/// Assemble the domain services behind the HTTP handlers.
///
/// # Errors
/// Returns [`std::io::Error`] when an outbound HTTP client cannot be built.
pub(crate) fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let (users, history_repo) = build_repositories(config);
    let history = HistoryService::new(history_repo, config.history_limit);
    let accounts = AccountService::new(
        users.clone(),
        Arc::new(Argon2PasswordHasher),
        build_media_store(config, clock.clone())?,
        clock.clone(),
    );
    let assistant = AssistantService::new(
        build_classifier(config)?,
        IntentDispatcher::new(clock),
        users,
        history.clone(),
    );
    Ok(HttpState::new(accounts, assistant, history))
}
