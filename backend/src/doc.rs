//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint, the request/response DTOs and
//! the adapter-layer mirrors of domain types ([`ErrorSchema`],
//! [`ErrorCodeSchema`], [`IntentSchema`]). Swagger UI serves it in debug
//! builds.

use crate::inbound::http::assistant::{AskRequest, AskResponse};
use crate::inbound::http::auth::{EmailExistsResponse, SigninRequest, SignupRequest};
use crate::inbound::http::history::{
    ClearHistoryRequest, HistoryResponse, PushHistoryRequest, SuccessResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema, IntentSchema};
use crate::inbound::http::users::UserResponse;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/auth/signup or /api/auth/signin.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Voice assistant backend API",
        description = "Accounts, command history and intent dispatch for a voice assistant."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::signup,
        crate::inbound::http::auth::signin,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::check_email,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::update_assistant,
        crate::inbound::http::assistant::ask,
        crate::inbound::http::assistant::proxy,
        crate::inbound::http::history::push_history,
        crate::inbound::http::history::get_history,
        crate::inbound::http::history::clear_history,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        IntentSchema,
        SignupRequest,
        SigninRequest,
        EmailExistsResponse,
        UserResponse,
        AskRequest,
        AskResponse,
        PushHistoryRequest,
        ClearHistoryRequest,
        SuccessResponse,
        HistoryResponse,
    )),
    tags(
        (name = "auth", description = "Signup, signin and logout"),
        (name = "users", description = "Profile and assistant settings"),
        (name = "assistant", description = "Intent classification and dispatch"),
        (name = "history", description = "Per-user command history"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
