//! OpenAPI schemas for domain types.
//!
//! Domain types do not derive `ToSchema`; these mirrors register them with
//! utoipa from the adapter layer.

use utoipa::ToSchema;

/// Stable machine-readable error codes.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    #[schema(rename = "unauthorized")]
    Unauthorized,
    #[schema(rename = "forbidden")]
    Forbidden,
    #[schema(rename = "not_found")]
    NotFound,
    #[schema(rename = "conflict")]
    Conflict,
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// Error payload returned by every endpoint.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ErrorSchema {
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    #[schema(example = "Password must be at least 6 characters")]
    message: String,
    /// Correlates with the `trace-id` response header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// `{field, code}` for validation failures.
    details: Option<serde_json::Value>,
}

/// Intent tags the dispatcher understands.
#[derive(ToSchema)]
#[schema(as = crate::domain::assistant::Intent)]
pub enum IntentSchema {
    #[schema(rename = "general")]
    General,
    #[schema(rename = "google_search")]
    GoogleSearch,
    #[schema(rename = "youtube_search")]
    YoutubeSearch,
    #[schema(rename = "youtube_play")]
    YoutubePlay,
    #[schema(rename = "calculator_open")]
    CalculatorOpen,
    #[schema(rename = "open_instagram")]
    OpenInstagram,
    #[schema(rename = "open_facebook")]
    OpenFacebook,
    #[schema(rename = "show_weather")]
    ShowWeather,
    #[schema(rename = "get_time")]
    GetTime,
    #[schema(rename = "get_date")]
    GetDate,
    #[schema(rename = "get_day")]
    GetDay,
    #[schema(rename = "get_month")]
    GetMonth,
    #[schema(rename = "get_year")]
    GetYear,
}
