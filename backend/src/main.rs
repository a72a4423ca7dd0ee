//! Backend entry-point: loads settings, prepares storage and serves the API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;
use zeroize::Zeroizing;

use assistant_backend::inbound::http::health::HealthState;
use assistant_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use assistant_backend::outbound::media::{CloudinaryConfig, DEFAULT_API_BASE};
use assistant_backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use assistant_backend::settings::AppSettings;
use server::{DelegateEndpoint, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("failed to load settings")?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("invalid session configuration")?;
    let bind_addr = settings.bind_addr()?;

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
    )
    .with_delegate(delegate_endpoint(&settings)?)
    .with_media(media_config(&settings)?)
    .with_outbound_timeout(settings.delegate_timeout())
    .with_history_limit(settings.history_limit())
    .with_cors_origin(settings.cors_origin().map(str::to_owned));

    if let Some(database_url) = settings.database_url() {
        config = config.with_db_pool(prepare_database(database_url).await?);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "server listening");
    server.await.wrap_err("server terminated abnormally")
}

async fn prepare_database(database_url: &str) -> Result<DbPool> {
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || run_migrations(&url))
        .await
        .map_err(|err| eyre!("migration task failed: {err}"))?
        .wrap_err("failed to apply database migrations")?;
    DbPool::new(PoolConfig::new(database_url))
        .await
        .wrap_err("failed to build database pool")
}

fn delegate_endpoint(settings: &AppSettings) -> Result<Option<DelegateEndpoint>> {
    Ok(settings.gemini_endpoint()?.map(|url| DelegateEndpoint {
        url,
        api_key: settings.gemini_api_key().map(str::to_owned),
    }))
}

fn media_config(settings: &AppSettings) -> Result<Option<CloudinaryConfig>> {
    let Some(credentials) = settings.cloudinary() else {
        return Ok(None);
    };
    let api_base = Url::parse(DEFAULT_API_BASE).wrap_err("invalid media API base")?;
    Ok(Some(CloudinaryConfig {
        cloud_name: credentials.cloud_name.to_owned(),
        api_key: credentials.api_key.to_owned(),
        api_secret: Zeroizing::new(credentials.api_secret.to_owned()),
        folder: credentials.folder.to_owned(),
        api_base,
    }))
}
