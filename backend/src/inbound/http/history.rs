//! Command history endpoints.
//!
//! Requests name the user explicitly; the session principal must match.
//!
//! ```text
//! POST /api/user/history        {"userId":"…","command":"turn on lights"}
//! GET  /api/user/history/{userId}
//! POST /api/user/history/clear  {"userId":"…"}
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{Error, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error, parse_user_id};

const USER_ID: FieldName = FieldName::new("userId");
const COMMAND: FieldName = FieldName::new("command");

#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PushHistoryRequest {
    pub user_id: Option<String>,
    pub command: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClearHistoryRequest {
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Entries latest first.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HistoryResponse {
    pub history: Vec<String>,
}

fn authorise(session: &SessionContext, raw_user_id: Option<&str>) -> Result<UserId, Error> {
    session.require_user_id()?;
    let claimed = parse_user_id(raw_user_id, USER_ID)?;
    session.require_principal(&claimed)
}

/// Append a command to the caller's history.
#[utoipa::path(
    post,
    path = "/api/user/history",
    request_body = PushHistoryRequest,
    responses(
        (status = 200, description = "Recorded", body = SuccessResponse),
        (status = 400, description = "userId or command missing", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 403, description = "userId is not the caller", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["history"],
    operation_id = "pushHistory"
)]
#[post("/history")]
pub async fn push_history(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PushHistoryRequest>,
) -> ApiResult<web::Json<SuccessResponse>> {
    let PushHistoryRequest { user_id, command } = payload.into_inner();
    let id = authorise(&session, user_id.as_deref())?;
    let command = command
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| missing_field_error(COMMAND))?;
    state.history.record(&id, &command).await?;
    Ok(web::Json(SuccessResponse { success: true }))
}

/// Read the caller's history, latest first.
#[utoipa::path(
    get,
    path = "/api/user/history/{userId}",
    params(("userId" = String, Path, description = "Caller's user id")),
    responses(
        (status = 200, description = "History", body = HistoryResponse),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 403, description = "userId is not the caller", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["history"],
    operation_id = "getHistory"
)]
#[get("/history/{userId}")]
pub async fn get_history(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<HistoryResponse>> {
    let id = authorise(&session, Some(path.as_str()))?;
    let history = state.history.latest_first(&id).await?;
    Ok(web::Json(HistoryResponse { history }))
}

/// Delete every history entry for the caller.
#[utoipa::path(
    post,
    path = "/api/user/history/clear",
    request_body = ClearHistoryRequest,
    responses(
        (status = 200, description = "Cleared", body = SuccessResponse),
        (status = 400, description = "userId missing", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 403, description = "userId is not the caller", body = ErrorSchema)
    ),
    tags = ["history"],
    operation_id = "clearHistory"
)]
#[post("/history/clear")]
pub async fn clear_history(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ClearHistoryRequest>,
) -> ApiResult<web::Json<SuccessResponse>> {
    let id = authorise(&session, payload.user_id.as_deref())?;
    state.history.clear(&id).await?;
    Ok(web::Json(SuccessResponse { success: true }))
}

#[cfg(test)]
mod tests;
