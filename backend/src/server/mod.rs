//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{DelegateEndpoint, ServerConfig};

use state_builders::build_http_state;

use actix_cors::Cors;
use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::middleware::Condition;
use actix_web::{App, HttpServer, web};

use assistant_backend::Trace;
#[cfg(debug_assertions)]
use assistant_backend::doc::ApiDoc;
use assistant_backend::inbound::http::configure;
use assistant_backend::inbound::http::health::HealthState;
use assistant_backend::inbound::http::session_config::SESSION_TTL;
use assistant_backend::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

const CORS_MAX_AGE_SECS: usize = 3600;

/// Credentialed CORS for the browser client's origin. Requests from other
/// origins pass through without CORS headers.
fn cors_policy(origin: Option<&str>) -> Cors {
    let cors = Cors::default()
        .allowed_methods(["GET", "POST"])
        .allowed_header(header::CONTENT_TYPE)
        .supports_credentials()
        .block_on_origin_mismatch(false)
        .max_age(CORS_MAX_AGE_SECS);
    match origin {
        Some(origin) => cors.allowed_origin(origin.trim_end_matches('/')),
        None => cors,
    }
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
    cors_origin: Option<String>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
        cors_origin,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(PersistentSession::default().session_ttl(SESSION_TTL))
        .build();

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .configure(configure);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app.wrap(session)
        .wrap(Condition::new(
            cors_origin.is_some(),
            cors_policy(cors_origin.as_deref()),
        ))
        .wrap(Trace)
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when an outbound client cannot be built or
/// binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config)?);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        cors_origin,
        ..
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
            cors_origin: cors_origin.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
