//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `ASSISTANT_*` environment variables and an
//! optional configuration file, in increasing precedence order of the
//! library's defaults. Session cookie settings are loaded separately; see
//! [`crate::inbound::http::session_config`].

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::DEFAULT_HISTORY_LIMIT;

const DEFAULT_DELEGATE_TIMEOUT_SECS: u64 = 15;
const DEFAULT_CLOUDINARY_FOLDER: &str = "virtual_assistant";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind host {value:?}: {source}")]
    BindHost {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("invalid gemini_api_url {value:?}: {source}")]
    GeminiUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
}

/// Runtime configuration for the assistant backend.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ASSISTANT")]
pub struct AppSettings {
    /// Interface to bind; defaults to all interfaces.
    pub bind_host: Option<String>,
    #[ortho_config(default = 8000)]
    pub port: u16,
    /// PostgreSQL URL. Without one the in-memory store is used.
    pub database_url: Option<String>,
    /// Full `generateContent` endpoint of the language model.
    pub gemini_api_url: Option<String>,
    pub gemini_api_key: Option<String>,
    #[ortho_config(default = 15)]
    pub delegate_timeout_secs: u64,
    #[ortho_config(default = 200)]
    pub history_limit: usize,
    /// Single browser origin allowed to call the API with credentials.
    pub cors_origin: Option<String>,
    pub cloudinary_cloud_name: Option<String>,
    pub cloudinary_api_key: Option<String>,
    pub cloudinary_api_secret: Option<String>,
    pub cloudinary_folder: Option<String>,
}

impl std::fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppSettings")
            .field("bind_host", &self.bind_host)
            .field("port", &self.port)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("gemini_api_url", &self.gemini_api_url)
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "<redacted>"))
            .field("delegate_timeout_secs", &self.delegate_timeout_secs)
            .field("history_limit", &self.history_limit)
            .field("cors_origin", &self.cors_origin)
            .field("cloudinary_cloud_name", &self.cloudinary_cloud_name)
            .field("cloudinary_api_key", &self.cloudinary_api_key)
            .field(
                "cloudinary_api_secret",
                &self.cloudinary_api_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("cloudinary_folder", &self.cloudinary_folder)
            .finish()
    }
}

/// Cloudinary credentials, present only when all three are set.
#[derive(Clone)]
pub struct CloudinaryCredentials<'a> {
    pub cloud_name: &'a str,
    pub api_key: &'a str,
    pub api_secret: &'a str,
    pub folder: &'a str,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|raw| raw.trim()).filter(|raw| !raw.is_empty())
}

impl AppSettings {
    /// Socket address the server binds.
    ///
    /// # Errors
    /// Returns [`SettingsError::BindHost`] for an unparsable host.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let ip = match non_blank(self.bind_host.as_ref()) {
            Some(host) => host
                .parse::<IpAddr>()
                .map_err(|source| SettingsError::BindHost {
                    value: host.to_owned(),
                    source,
                })?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn database_url(&self) -> Option<&str> {
        non_blank(self.database_url.as_ref())
    }

    /// Parsed delegate endpoint, if configured.
    ///
    /// # Errors
    /// Returns [`SettingsError::GeminiUrl`] when the value is not a URL.
    pub fn gemini_endpoint(&self) -> Result<Option<Url>, SettingsError> {
        non_blank(self.gemini_api_url.as_ref())
            .map(|raw| {
                Url::parse(raw).map_err(|source| SettingsError::GeminiUrl {
                    value: raw.to_owned(),
                    source,
                })
            })
            .transpose()
    }

    pub fn gemini_api_key(&self) -> Option<&str> {
        non_blank(self.gemini_api_key.as_ref())
    }

    /// Upper bound on a single delegate or upload call. Zero falls back to
    /// the default.
    pub fn delegate_timeout(&self) -> Duration {
        let secs = if self.delegate_timeout_secs == 0 {
            DEFAULT_DELEGATE_TIMEOUT_SECS
        } else {
            self.delegate_timeout_secs
        };
        Duration::from_secs(secs)
    }

    /// History cap; zero falls back to the default.
    pub fn history_limit(&self) -> usize {
        if self.history_limit == 0 {
            DEFAULT_HISTORY_LIMIT
        } else {
            self.history_limit
        }
    }

    pub fn cors_origin(&self) -> Option<&str> {
        non_blank(self.cors_origin.as_ref())
    }

    /// Upload credentials when the cloud name, key and secret are all set.
    pub fn cloudinary(&self) -> Option<CloudinaryCredentials<'_>> {
        Some(CloudinaryCredentials {
            cloud_name: non_blank(self.cloudinary_cloud_name.as_ref())?,
            api_key: non_blank(self.cloudinary_api_key.as_ref())?,
            api_secret: non_blank(self.cloudinary_api_secret.as_ref())?,
            folder: non_blank(self.cloudinary_folder.as_ref()).unwrap_or(DEFAULT_CLOUDINARY_FOLDER),
        })
    }
}
