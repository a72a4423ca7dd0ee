//! Closed set of intents the assistant can act on.

use serde::{Deserialize, Serialize};

/// Intent tag understood by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    General,
    GoogleSearch,
    YoutubeSearch,
    YoutubePlay,
    CalculatorOpen,
    OpenInstagram,
    OpenFacebook,
    ShowWeather,
    GetTime,
    GetDate,
    GetDay,
    GetMonth,
    GetYear,
}

impl Intent {
    /// Every intent, in the order advertised to the classifier.
    pub const ALL: [Self; 13] = [
        Self::General,
        Self::GoogleSearch,
        Self::YoutubeSearch,
        Self::YoutubePlay,
        Self::CalculatorOpen,
        Self::OpenInstagram,
        Self::OpenFacebook,
        Self::ShowWeather,
        Self::GetTime,
        Self::GetDate,
        Self::GetDay,
        Self::GetMonth,
        Self::GetYear,
    ];

    /// Canonical wire tag.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::GoogleSearch => "google_search",
            Self::YoutubeSearch => "youtube_search",
            Self::YoutubePlay => "youtube_play",
            Self::CalculatorOpen => "calculator_open",
            Self::OpenInstagram => "open_instagram",
            Self::OpenFacebook => "open_facebook",
            Self::ShowWeather => "show_weather",
            Self::GetTime => "get_time",
            Self::GetDate => "get_date",
            Self::GetDay => "get_day",
            Self::GetMonth => "get_month",
            Self::GetYear => "get_year",
        }
    }

    /// Resolve a tag emitted by the classifier.
    ///
    /// Canonical tags and the known swapped spellings (`open_calculator`,
    /// `instagram_open`, `facebook_open`, `weather_show`, `open_youtube`)
    /// match exactly. Anything else is routed by keyword in the order google,
    /// calculator, instagram, facebook, weather, youtube; a tag containing
    /// none of them is [`Intent::General`].
    ///
    /// Keyword routing can misfire on tags mentioning two destinations: the
    /// first keyword in that order wins.
    ///
    /// # Examples
    /// ```
    /// use assistant_backend::domain::assistant::Intent;
    ///
    /// assert_eq!(Intent::resolve("YouTube_Play"), Intent::YoutubePlay);
    /// assert_eq!(Intent::resolve("play_on_youtube"), Intent::YoutubePlay);
    /// assert_eq!(Intent::resolve("tell_joke"), Intent::General);
    /// ```
    pub fn resolve(raw: &str) -> Self {
        let tag = raw.trim().to_lowercase();
        if let Some(intent) = Self::ALL.into_iter().find(|intent| intent.tag() == tag) {
            return intent;
        }

        match tag.as_str() {
            "open_calculator" => return Self::CalculatorOpen,
            "instagram_open" => return Self::OpenInstagram,
            "facebook_open" => return Self::OpenFacebook,
            "weather_show" => return Self::ShowWeather,
            "open_youtube" => return Self::YoutubeSearch,
            _ => {}
        }

        if tag.contains("google") {
            Self::GoogleSearch
        } else if tag.contains("calculator") {
            Self::CalculatorOpen
        } else if tag.contains("instagram") {
            Self::OpenInstagram
        } else if tag.contains("facebook") {
            Self::OpenFacebook
        } else if tag.contains("weather") {
            Self::ShowWeather
        } else if tag.contains("youtube") {
            if tag.contains("play") {
                Self::YoutubePlay
            } else {
                Self::YoutubeSearch
            }
        } else {
            Self::General
        }
    }

    /// Intents answered from the local clock instead of the classifier's text.
    pub const fn is_clock_query(self) -> bool {
        matches!(
            self,
            Self::GetTime | Self::GetDate | Self::GetDay | Self::GetMonth | Self::GetYear
        )
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}
