//! HTTP inbound adapter exposing REST endpoints.

pub mod assistant;
pub mod auth;
pub mod error;
pub mod health;
pub mod history;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

use self::error::{json_error_handler, query_error_handler};

/// Register the API routes and extractor configuration.
///
/// Session middleware and shared state are supplied by the caller so the
/// same routing serves the server and integration tests.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use assistant_backend::inbound::http::configure;
///
/// let _app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(
            web::scope("/api/auth")
                .service(auth::signup)
                .service(auth::signin)
                .service(auth::logout)
                .service(auth::check_email),
        )
        .service(
            web::scope("/api/user")
                .service(users::current_user)
                .service(users::update_assistant)
                .service(assistant::ask)
                .service(history::push_history)
                .service(history::clear_history)
                .service(history::get_history),
        )
        .service(health::ready)
        .service(health::live)
        .service(assistant::proxy);
}
