//! End-to-end command handling: normalise, classify, parse, dispatch, record.

use std::sync::Arc;

use tracing::{debug, warn};

use super::{
    ClassificationPrompt, DEFAULT_ASSISTANT_NAME, DEFAULT_USER_NAME, Dispatch, IntentDispatcher,
    ParsedReply, normalize_transcript, parse_reply,
};
use crate::domain::accounts::map_user_error;
use crate::domain::ports::{IntentClassifier, IntentClassifierError, UserRepository};
use crate::domain::{Error, HistoryService, UserId};

/// Command as submitted by the client. Exactly one form is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskInput {
    /// Already-clean command text.
    Command(String),
    /// Same as [`AskInput::Command`]; kept for older clients.
    Prompt(String),
    /// Raw speech transcript that must contain the wake word.
    Transcript(String),
}

/// Result of an ask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskOutcome {
    /// The transcript lacked the wake word; nothing ran.
    Ignored,
    /// The command was classified and dispatched.
    Dispatched(Dispatch),
}

/// Names fed to the classifier prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    pub user_name: String,
    pub assistant_name: String,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            user_name: DEFAULT_USER_NAME.to_owned(),
            assistant_name: DEFAULT_ASSISTANT_NAME.to_owned(),
        }
    }
}

impl Persona {
    /// Build a persona, substituting defaults for blank names.
    pub fn new(user_name: Option<&str>, assistant_name: Option<&str>) -> Self {
        let pick = |value: Option<&str>, fallback: &str| {
            value
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .unwrap_or(fallback)
                .to_owned()
        };
        Self {
            user_name: pick(user_name, DEFAULT_USER_NAME),
            assistant_name: pick(assistant_name, DEFAULT_ASSISTANT_NAME),
        }
    }
}

fn log_classifier_failure(error: &IntentClassifierError) {
    match error {
        IntentClassifierError::Status { status, .. } => {
            warn!(status, "intent classifier returned an error status");
        }
        IntentClassifierError::Timeout { .. } => warn!("intent classifier timed out"),
        IntentClassifierError::NotConfigured => debug!("intent classifier not configured"),
        IntentClassifierError::Transport { .. } | IntentClassifierError::Decode { .. } => {
            warn!(%error, "intent classifier unavailable");
        }
    }
}

/// Runs the assistant pipeline for signed-in users and the public proxy.
#[derive(Clone)]
pub struct AssistantService {
    classifier: Arc<dyn IntentClassifier>,
    dispatcher: IntentDispatcher,
    users: Arc<dyn UserRepository>,
    history: HistoryService,
}

impl AssistantService {
    pub fn new(
        classifier: Arc<dyn IntentClassifier>,
        dispatcher: IntentDispatcher,
        users: Arc<dyn UserRepository>,
        history: HistoryService,
    ) -> Self {
        Self {
            classifier,
            dispatcher,
            users,
            history,
        }
    }

    /// Classify and dispatch `command` without touching any account.
    ///
    /// Delegate failures never surface as errors: they resolve to
    /// [`Dispatch::no_answer`].
    pub async fn answer(&self, command: &str, persona: &Persona) -> Dispatch {
        let prompt = ClassificationPrompt {
            command,
            user_name: &persona.user_name,
            assistant_name: &persona.assistant_name,
        }
        .render();
        let reply = match self.classifier.classify(&prompt).await {
            Ok(text) => parse_reply(&text),
            Err(error) => {
                log_classifier_failure(&error);
                ParsedReply::Unavailable
            }
        };
        self.dispatcher.dispatch(reply, command)
    }

    /// Public proxy: run the pipeline for an anonymous caller.
    ///
    /// # Errors
    /// `invalid_request` when `prompt` is blank.
    pub async fn proxy(&self, prompt: &str, persona: &Persona) -> Result<Dispatch, Error> {
        let command = prompt.trim();
        if command.is_empty() {
            return Err(Error::invalid_request("prompt is required"));
        }
        Ok(self.answer(command, persona).await)
    }

    /// Handle a signed-in user's command and record it in their history.
    ///
    /// # Errors
    /// `invalid_request` "No command provided" for blank input and
    /// `not_found` when the account no longer exists.
    pub async fn ask(&self, user_id: &UserId, input: AskInput) -> Result<AskOutcome, Error> {
        let (raw, is_transcript) = match input {
            AskInput::Transcript(text) => (text, true),
            AskInput::Command(text) | AskInput::Prompt(text) => (text, false),
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(Error::invalid_request("No command provided"));
        }

        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("User not found"))?;
        let persona = Persona::new(
            Some(user.name().as_ref()),
            user.assistant_name().map(AsRef::as_ref),
        );

        let command = if is_transcript {
            match normalize_transcript(raw, &persona.assistant_name) {
                Some(command) => command,
                None => return Ok(AskOutcome::Ignored),
            }
        } else {
            raw.to_owned()
        };

        let dispatch = self.answer(&command, &persona).await;
        if let Err(error) = self.history.record(user_id, &command).await {
            warn!(%error, user_id = %user_id, "failed to record command history");
        }
        Ok(AskOutcome::Dispatched(dispatch))
    }
}
