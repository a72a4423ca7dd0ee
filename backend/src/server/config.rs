//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use assistant_backend::domain::DEFAULT_HISTORY_LIMIT;
use assistant_backend::outbound::media::CloudinaryConfig;
use assistant_backend::outbound::persistence::DbPool;
use url::Url;

/// Where the intent classifier sends prompts.
#[derive(Clone, Debug)]
pub struct DelegateEndpoint {
    pub url: Url,
    pub api_key: Option<String>,
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) delegate: Option<DelegateEndpoint>,
    pub(crate) media: Option<CloudinaryConfig>,
    pub(crate) outbound_timeout: Duration,
    pub(crate) history_limit: usize,
    pub(crate) cors_origin: Option<String>,
}

impl ServerConfig {
    /// Configuration with in-memory storage and no outbound collaborators.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            delegate: None,
            media: None,
            outbound_timeout: Duration::from_secs(15),
            history_limit: DEFAULT_HISTORY_LIMIT,
            cors_origin: None,
        }
    }

    /// Persist accounts and history in PostgreSQL instead of memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_delegate(mut self, delegate: Option<DelegateEndpoint>) -> Self {
        self.delegate = delegate;
        self
    }

    #[must_use]
    pub fn with_media(mut self, media: Option<CloudinaryConfig>) -> Self {
        self.media = media;
        self
    }

    /// Timeout applied to each delegate and upload call.
    #[must_use]
    pub fn with_outbound_timeout(mut self, timeout: Duration) -> Self {
        self.outbound_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    #[must_use]
    pub fn with_cors_origin(mut self, origin: Option<String>) -> Self {
        self.cors_origin = origin;
        self
    }
}
