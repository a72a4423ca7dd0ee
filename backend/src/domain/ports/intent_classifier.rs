//! Port for the hosted language model that classifies commands.
//!
//! The adapter receives a fully rendered prompt and returns the model's raw
//! text. Nothing about the text is trusted: structure is recovered by
//! [`crate::domain::assistant::parse_reply`].
use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Failures talking to the classification delegate.
    pub enum IntentClassifierError {
        /// No endpoint was configured.
        NotConfigured => "intent classifier endpoint is not configured",
        /// The request never produced a response.
        Transport { message: String } => "intent classifier transport failed: {message}",
        /// The request exceeded the configured deadline.
        Timeout { message: String } => "intent classifier timed out: {message}",
        /// The delegate answered with a non-success status.
        Status { status: u16, message: String } => "intent classifier returned status {status}: {message}",
        /// The response body did not contain reply text.
        Decode { message: String } => "intent classifier response could not be decoded: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    /// Send `prompt` to the delegate and return its free-text reply.
    async fn classify(&self, prompt: &str) -> Result<String, IntentClassifierError>;
}
