//! Recovery of structured classifications from the delegate's free text.
//!
//! The delegate is asked for a bare JSON object but routinely wraps it in
//! prose or Markdown fences, and occasionally emits nothing parseable. Parsing
//! never fails: the worst case is [`ParsedReply::Unstructured`].

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

static FENCE: OnceLock<Regex> = OnceLock::new();

fn fence() -> &'static Regex {
    FENCE.get_or_init(|| {
        Regex::new(r"```(?:\w*\n)?([\s\S]*?)```")
            .unwrap_or_else(|error| panic!("fence regex failed to compile: {error}"))
    })
}

/// Fields recovered from a JSON reply. Blank or non-string values are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawClassification {
    pub kind: Option<String>,
    pub user_input: Option<String>,
    pub response: Option<String>,
}

impl RawClassification {
    fn from_object(object: &Map<String, Value>) -> Self {
        let field = |key: &str| {
            object
                .get(key)
                .and_then(Value::as_str)
                .filter(|value| !value.trim().is_empty())
                .map(str::to_owned)
        };
        Self {
            kind: field("type"),
            user_input: field("userInput"),
            response: field("response"),
        }
    }
}

/// Outcome of asking the delegate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedReply {
    /// A JSON object was recovered. `raw` keeps the full reply text.
    Structured { fields: RawClassification, raw: String },
    /// No JSON could be recovered; `text` is the cleaned reply.
    Unstructured { text: String },
    /// The delegate could not be reached or returned nothing.
    Unavailable,
}

/// Parse the delegate's reply.
///
/// 1. The span from the first `{` to the last `}` is parsed as a JSON object.
/// 2. Otherwise the first fenced code block is parsed directly, then via its
///    own first-brace-to-last-brace span.
/// 3. Otherwise the whole reply becomes unstructured text: every fenced
///    block is replaced by its body and stray backticks are trimmed.
///
/// # Examples
/// ```
/// use assistant_backend::domain::assistant::{parse_reply, ParsedReply};
///
/// let reply = parse_reply("Sure! here's your answer: the sky is blue");
/// assert_eq!(
///     reply,
///     ParsedReply::Unstructured { text: "Sure! here's your answer: the sky is blue".into() },
/// );
/// ```
pub fn parse_reply(raw: &str) -> ParsedReply {
    if raw.trim().is_empty() {
        return ParsedReply::Unavailable;
    }

    let fenced = fence()
        .captures(raw)
        .and_then(|captures| captures.get(1))
        .map(|body| body.as_str().trim());

    let object = brace_span(raw)
        .and_then(parse_object)
        .or_else(|| fenced.and_then(parse_object))
        .or_else(|| fenced.and_then(brace_span).and_then(parse_object));

    match object {
        Some(object) => ParsedReply::Structured {
            fields: RawClassification::from_object(&object),
            raw: raw.trim().to_owned(),
        },
        None => ParsedReply::Unstructured {
            text: strip_fences(raw),
        },
    }
}

fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    text.get(start..=end)
}

fn parse_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}

fn strip_fences(text: &str) -> String {
    fence()
        .replace_all(text, "${1}")
        .trim_matches(|c: char| c.is_whitespace() || c == '`')
        .to_owned()
}
