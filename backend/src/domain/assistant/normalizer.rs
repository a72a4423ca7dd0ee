//! Wake-word handling for raw speech transcripts.

use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};

static LEADING_SEPARATORS: OnceLock<Regex> = OnceLock::new();

fn leading_separators() -> &'static Regex {
    LEADING_SEPARATORS.get_or_init(|| {
        Regex::new(r"^[:,\-\s]+")
            .unwrap_or_else(|error| panic!("separator regex failed to compile: {error}"))
    })
}

/// Strip the wake word from a transcript.
///
/// Returns `None` when the transcript should not be dispatched: the wake word
/// is blank or absent (case-insensitive), or nothing remains once every
/// occurrence and any leading `:`, `,`, `-` or whitespace is removed.
///
/// # Examples
/// ```
/// use assistant_backend::domain::assistant::normalize_transcript;
///
/// assert_eq!(
///     normalize_transcript("Jarvis, what time is it", "jarvis").as_deref(),
///     Some("what time is it"),
/// );
/// assert_eq!(normalize_transcript("what time is it", "Jarvis"), None);
/// ```
pub fn normalize_transcript(transcript: &str, wake_word: &str) -> Option<String> {
    let wake_word = wake_word.trim();
    if wake_word.is_empty() {
        return None;
    }

    let pattern = RegexBuilder::new(&regex::escape(wake_word))
        .case_insensitive(true)
        .build()
        .ok()?;
    if !pattern.is_match(transcript) {
        return None;
    }

    let without_wake_word = pattern.replace_all(transcript, "");
    let command = leading_separators().replace(without_wake_word.trim(), "");
    let command = command.trim();
    (!command.is_empty()).then(|| command.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Jarvis open youtube", "Jarvis", Some("open youtube"))]
    #[case("hey JARVIS: play lofi", "jarvis", Some("hey : play lofi"))]
    #[case("jarvis, - search for cats", "Jarvis", Some("search for cats"))]
    #[case("what is the time jarvis", "Jarvis", Some("what is the time"))]
    #[case("jarvis jarvis tell me a joke", "Jarvis", Some("tell me a joke"))]
    #[case("J.A.R.V.I.S open google", "J.A.R.V.I.S", Some("open google"))]
    fn strips_wake_word(
        #[case] transcript: &str,
        #[case] wake_word: &str,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(normalize_transcript(transcript, wake_word).as_deref(), expected);
    }

    #[rstest]
    #[case("open youtube", "Jarvis")]
    #[case("Jarvis", "Jarvis")]
    #[case("Jarvis , - ", "Jarvis")]
    #[case("open youtube", "   ")]
    #[case("JXrvis open google", "J.rvis")]
    fn declines_to_dispatch(#[case] transcript: &str, #[case] wake_word: &str) {
        assert_eq!(normalize_transcript(transcript, wake_word), None);
    }
}
