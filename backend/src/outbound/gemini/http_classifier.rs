//! Reqwest-backed Gemini classifier.
//!
//! Owns transport only: request serialisation, the client timeout, status
//! mapping and extraction of the reply text. Interpreting the text is the
//! domain's job.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::dto::{GenerateRequestDto, GenerateResponseDto};
use crate::domain::ports::{IntentClassifier, IntentClassifierError};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Classifier that POSTs prompts to one `generateContent` endpoint.
pub struct GeminiHttpClassifier {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl GeminiHttpClassifier {
    /// Build a classifier whose requests give up after `timeout`.
    ///
    /// # Errors
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }
}

#[async_trait]
impl IntentClassifier for GeminiHttpClassifier {
    async fn classify(&self, prompt: &str) -> Result<String, IntentClassifierError> {
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&GenerateRequestDto::user_turn(prompt));
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key.as_str());
        }

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        debug!(bytes = body.len(), "intent classifier replied");
        parse_text(body.as_ref())
    }
}

fn parse_text(body: &[u8]) -> Result<String, IntentClassifierError> {
    let decoded: GenerateResponseDto = serde_json::from_slice(body).map_err(|error| {
        IntentClassifierError::decode(format!("invalid generateContent payload: {error}"))
    })?;
    decoded
        .into_text()
        .ok_or_else(|| IntentClassifierError::decode("response carried no candidate text"))
}

fn map_transport_error(error: reqwest::Error) -> IntentClassifierError {
    if error.is_timeout() {
        IntentClassifierError::timeout(error.to_string())
    } else {
        IntentClassifierError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> IntentClassifierError {
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            IntentClassifierError::timeout(format!("status {}", status.as_u16()))
        }
        _ => IntentClassifierError::status(status.as_u16(), body_preview(body)),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
