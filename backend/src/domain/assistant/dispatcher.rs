//! Maps a parsed reply onto the action the client performs.

use std::sync::{Arc, OnceLock};

use mockable::Clock;
use regex::Regex;
use serde::Serialize;

use super::{Intent, ParsedReply};

/// Spoken when the delegate produced nothing usable.
pub const NO_ANSWER: &str = "Sorry, I couldn't find the answer.";

const GOOGLE_SEARCH: &str = "https://www.google.com/search?q=";
const CALCULATOR: &str = "https://www.google.com/search?q=calculator";
const INSTAGRAM: &str = "https://www.instagram.com";
const FACEBOOK: &str = "https://www.facebook.com";
const YOUTUBE: &str = "https://www.youtube.com";
const YOUTUBE_SEARCH: &str = "https://www.youtube.com/results?search_query=";
const DEFAULT_WEATHER_QUERY: &str = "current weather";

static QUERY_PREFIX: OnceLock<Regex> = OnceLock::new();

fn query_prefix() -> &'static Regex {
    QUERY_PREFIX.get_or_init(|| {
        Regex::new(r"(?i)^(search for|search|play|open)\s*")
            .unwrap_or_else(|error| panic!("query prefix regex failed to compile: {error}"))
    })
}

/// Action resolved for one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dispatch {
    #[serde(rename = "type")]
    pub intent: Intent,
    pub user_input: String,
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Dispatch {
    /// Reply used when the delegate is unreachable or silent.
    pub fn no_answer(command: &str) -> Self {
        Self {
            intent: Intent::General,
            user_input: command.to_owned(),
            response: NO_ANSWER.to_owned(),
            url: None,
        }
    }
}

/// Search text for URL intents.
///
/// A leading `search for`, `search`, `play` or `open` is dropped from
/// `user_input`; when nothing remains the same is tried on `command`.
///
/// # Examples
/// ```
/// use assistant_backend::domain::assistant::search_query;
///
/// assert_eq!(search_query("search for lofi beats", "x"), "lofi beats");
/// assert_eq!(search_query("play", "play despacito"), "despacito");
/// ```
pub fn search_query(user_input: &str, command: &str) -> String {
    let strip = |text: &str| query_prefix().replace(text, "").trim().to_owned();
    let query = strip(user_input);
    if query.is_empty() { strip(command) } else { query }
}

fn target_url(intent: Intent, query: &str) -> Option<String> {
    let encoded = || urlencoding::encode(query).into_owned();
    match intent {
        Intent::GoogleSearch => Some(format!("{GOOGLE_SEARCH}{}", encoded())),
        Intent::CalculatorOpen => Some(CALCULATOR.to_owned()),
        Intent::OpenInstagram => Some(INSTAGRAM.to_owned()),
        Intent::OpenFacebook => Some(FACEBOOK.to_owned()),
        Intent::ShowWeather => {
            let query = if query.is_empty() { DEFAULT_WEATHER_QUERY } else { query };
            Some(format!("{GOOGLE_SEARCH}{}", urlencoding::encode(query)))
        }
        Intent::YoutubeSearch | Intent::YoutubePlay => Some(if query.is_empty() {
            YOUTUBE.to_owned()
        } else {
            format!("{YOUTUBE_SEARCH}{}", encoded())
        }),
        Intent::General
        | Intent::GetTime
        | Intent::GetDate
        | Intent::GetDay
        | Intent::GetMonth
        | Intent::GetYear => None,
    }
}

/// Turns parsed replies into [`Dispatch`] values.
///
/// Clock intents are answered from the local clock so the delegate can never
/// supply a stale or invented time.
#[derive(Clone)]
pub struct IntentDispatcher {
    clock: Arc<dyn Clock>,
}

impl IntentDispatcher {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Resolve `reply` for the cleaned `command`.
    pub fn dispatch(&self, reply: ParsedReply, command: &str) -> Dispatch {
        match reply {
            ParsedReply::Unavailable => Dispatch::no_answer(command),
            ParsedReply::Unstructured { text } => Dispatch {
                intent: Intent::General,
                user_input: command.to_owned(),
                response: text,
                url: None,
            },
            ParsedReply::Structured { fields, raw } => {
                let intent = fields
                    .kind
                    .as_deref()
                    .map_or(Intent::General, Intent::resolve);
                let user_input = fields.user_input.unwrap_or_else(|| command.to_owned());
                let response = match self.clock_answer(intent) {
                    Some(answer) => answer,
                    None => fields.response.unwrap_or(raw),
                };
                let url = target_url(intent, &search_query(&user_input, command));
                Dispatch {
                    intent,
                    user_input,
                    response,
                    url,
                }
            }
        }
    }

    fn clock_answer(&self, intent: Intent) -> Option<String> {
        let format = match intent {
            Intent::GetTime => "%H:%M:%S",
            Intent::GetDate => "%Y-%m-%d",
            Intent::GetDay => "%A",
            Intent::GetMonth => "%B",
            Intent::GetYear => "%Y",
            _ => return None,
        };
        Some(self.clock.local().format(format).to_string())
    }
}
