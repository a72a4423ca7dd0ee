//! Assistant endpoints: the signed-in `ask` pipeline and the public proxy.
//!
//! ```text
//! POST /api/user/ask {"transcript":"jarvis open youtube"}
//! GET  /?prompt=what+time+is+it&userName=Ada&assistantName=Jarvis
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::Error;
use crate::domain::assistant::{AskInput, AskOutcome, Dispatch, Intent, Persona};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_value_error};

/// Body of `POST /api/user/ask`. Exactly one field must be set.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AskRequest {
    /// Clean command text.
    pub command: Option<String>,
    /// Older spelling of `command`.
    pub prompt: Option<String>,
    /// Raw speech transcript; must contain the assistant's name.
    pub transcript: Option<String>,
}

impl TryFrom<AskRequest> for AskInput {
    type Error = Error;

    fn try_from(value: AskRequest) -> Result<Self, Self::Error> {
        let candidates = [
            value.command.map(Self::Command),
            value.prompt.map(Self::Prompt),
            value.transcript.map(Self::Transcript),
        ];
        let mut supplied = candidates.into_iter().flatten();
        match (supplied.next(), supplied.next()) {
            (Some(input), None) => Ok(input),
            (None, _) => Err(Error::invalid_request("No command provided")),
            (Some(_), Some(_)) => Err(invalid_value_error(
                FieldName::new("command"),
                "Provide only one of command, prompt or transcript",
            )),
        }
    }
}

/// Reply of the assistant endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AskResponse {
    pub ok: bool,
    /// False when a transcript did not contain the wake word.
    pub dispatched: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<crate::inbound::http::schemas::IntentSchema>)]
    pub intent: Option<Intent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    /// Page the client should open, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl AskResponse {
    fn ignored() -> Self {
        Self {
            ok: true,
            dispatched: false,
            intent: None,
            user_input: None,
            response: None,
            url: None,
        }
    }
}

impl From<Dispatch> for AskResponse {
    fn from(dispatch: Dispatch) -> Self {
        Self {
            ok: true,
            dispatched: true,
            intent: Some(dispatch.intent),
            user_input: Some(dispatch.user_input),
            response: Some(dispatch.response),
            url: dispatch.url,
        }
    }
}

/// Classify and dispatch a command for the signed-in user.
///
/// Delegate failures still answer 200 with the fallback reply.
#[utoipa::path(
    post,
    path = "/api/user/ask",
    request_body = AskRequest,
    responses(
        (status = 200, description = "Dispatched (or ignored) command", body = AskResponse),
        (status = 400, description = "No command provided", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["assistant"],
    operation_id = "ask"
)]
#[post("/ask")]
pub async fn ask(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AskRequest>,
) -> ApiResult<web::Json<AskResponse>> {
    let id = session.require_user_id()?;
    let input = AskInput::try_from(payload.into_inner())?;
    let reply = match state.assistant.ask(&id, input).await? {
        AskOutcome::Ignored => AskResponse::ignored(),
        AskOutcome::Dispatched(dispatch) => dispatch.into(),
    };
    Ok(web::Json(reply))
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ProxyQuery {
    pub prompt: Option<String>,
    pub user_name: Option<String>,
    pub assistant_name: Option<String>,
}

/// Run the pipeline for an anonymous caller without recording history.
#[utoipa::path(
    get,
    path = "/",
    params(ProxyQuery),
    responses(
        (status = 200, description = "Dispatched command", body = AskResponse),
        (status = 400, description = "prompt is required", body = ErrorSchema)
    ),
    tags = ["assistant"],
    operation_id = "proxy",
    security([])
)]
#[get("/")]
pub async fn proxy(
    state: web::Data<HttpState>,
    query: web::Query<ProxyQuery>,
) -> ApiResult<web::Json<AskResponse>> {
    let ProxyQuery {
        prompt,
        user_name,
        assistant_name,
    } = query.into_inner();
    let persona = Persona::new(user_name.as_deref(), assistant_name.as_deref());
    let dispatch = state
        .assistant
        .proxy(prompt.as_deref().unwrap_or_default(), &persona)
        .await?;
    Ok(web::Json(dispatch.into()))
}
