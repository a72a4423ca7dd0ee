//! Gemini outbound adapters for the intent classifier port.

mod dto;
mod http_classifier;

use async_trait::async_trait;

use crate::domain::ports::{IntentClassifier, IntentClassifierError};

pub use http_classifier::GeminiHttpClassifier;

/// Stand-in used when no endpoint is configured; every call reports
/// `NotConfigured` so asks degrade to the no-answer reply.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredClassifier;

#[async_trait]
impl IntentClassifier for UnconfiguredClassifier {
    async fn classify(&self, _prompt: &str) -> Result<String, IntentClassifierError> {
        Err(IntentClassifierError::not_configured())
    }
}
