//! Command classification and dispatch pipeline.
//!
//! A command flows through [`normalize_transcript`] (speech input only), the
//! [`ClassificationPrompt`] sent to the delegate, [`parse_reply`] and finally
//! the [`IntentDispatcher`]. [`AssistantService`] wires the stages together
//! and records history.

mod dispatcher;
mod intent;
mod normalizer;
mod parser;
mod prompt;
mod service;

pub use dispatcher::{Dispatch, IntentDispatcher, NO_ANSWER, search_query};
pub use intent::Intent;
pub use normalizer::normalize_transcript;
pub use parser::{ParsedReply, RawClassification, parse_reply};
pub use prompt::{ClassificationPrompt, DEFAULT_ASSISTANT_NAME, DEFAULT_USER_NAME};
pub use service::{AskInput, AskOutcome, AssistantService, Persona};
