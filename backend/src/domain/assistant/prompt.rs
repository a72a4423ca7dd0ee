//! Prompt sent to the classification delegate.

use super::Intent;

/// Names substituted when the account has not set them.
pub const DEFAULT_USER_NAME: &str = "User";
pub const DEFAULT_ASSISTANT_NAME: &str = "Assistant";

/// Inputs for one classification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationPrompt<'a> {
    pub command: &'a str,
    pub user_name: &'a str,
    pub assistant_name: &'a str,
}

fn describe(intent: Intent) -> &'static str {
    match intent {
        Intent::General => {
            "general conversation, and questions you can answer yourself with a short answer"
        }
        Intent::GoogleSearch => "the user wants to search something on Google",
        Intent::YoutubeSearch => "the user wants to search something on YouTube",
        Intent::YoutubePlay => "the user wants to play a specific video on YouTube",
        Intent::CalculatorOpen => "the user wants to open the calculator",
        Intent::OpenInstagram => "the user wants to open Instagram",
        Intent::OpenFacebook => "the user wants to open Facebook",
        Intent::ShowWeather => "the user wants to know the weather forecast",
        Intent::GetTime => "the user wants to know the current time",
        Intent::GetDate => "the user wants to know today's date",
        Intent::GetDay => "the user wants to know the current day of the week",
        Intent::GetMonth => "the user wants to know the current month",
        Intent::GetYear => "the user wants to know the current year",
    }
}

impl ClassificationPrompt<'_> {
    /// Render the instruction text.
    ///
    /// # Examples
    /// ```
    /// use assistant_backend::domain::assistant::ClassificationPrompt;
    ///
    /// let text = ClassificationPrompt {
    ///     command: "open youtube",
    ///     user_name: "Ada",
    ///     assistant_name: "Jarvis",
    /// }
    /// .render();
    /// assert!(text.ends_with("The user said: open youtube"));
    /// ```
    pub fn render(&self) -> String {
        let user_name = non_blank(self.user_name, DEFAULT_USER_NAME);
        let assistant_name = non_blank(self.assistant_name, DEFAULT_ASSISTANT_NAME);
        let tags = Intent::ALL
            .iter()
            .map(|intent| format!("\"{}\"", intent.tag()))
            .collect::<Vec<_>>()
            .join(" | ");

        let mut lines = vec![
            format!("You are a virtual assistant named {assistant_name}, created by {user_name}."),
            "You are not Google. Behave like a voice assistant: understand the user's \
             natural-language input and reply with a JSON object of this shape:"
                .to_owned(),
            "{".to_owned(),
            format!("  \"type\": {tags},"),
            "  \"userInput\": \"<the user's sentence with your name removed; for searches, \
             only the text to search for>\","
                .to_owned(),
            "  \"response\": \"<a short, voice-friendly reply to read out loud>\"".to_owned(),
            "}".to_owned(),
            "Intent meanings:".to_owned(),
        ];
        lines.extend(
            Intent::ALL
                .into_iter()
                .map(|intent| format!("- \"{}\": {}.", intent.tag(), describe(intent))),
        );
        lines.push(format!(
            "If asked who created you, say {user_name}. Address the user as {user_name}."
        ));
        lines.push("Reply with the JSON object only and nothing else.".to_owned());
        lines.push(format!("The user said: {}", self.command.trim()));
        lines.join("\n")
    }
}

fn non_blank<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() { fallback } else { trimmed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn lists_every_intent_tag() {
        let text = ClassificationPrompt {
            command: "hello",
            user_name: "Ada",
            assistant_name: "Jarvis",
        }
        .render();
        for intent in Intent::ALL {
            assert!(text.contains(&format!("\"{}\"", intent.tag())), "{intent} missing");
        }
        assert!(text.contains("named Jarvis, created by Ada"));
    }

    #[rstest]
    fn blank_names_fall_back_to_defaults() {
        let text = ClassificationPrompt {
            command: "  hello  ",
            user_name: " ",
            assistant_name: "",
        }
        .render();
        assert!(text.starts_with("You are a virtual assistant named Assistant, created by User."));
        assert!(text.ends_with("The user said: hello"));
    }
}
