//! Wire types for the `generateContent` endpoint.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(super) struct GenerateRequestDto<'a> {
    pub(super) contents: [ContentDto<'a>; 1],
}

#[derive(Debug, Serialize)]
pub(super) struct ContentDto<'a> {
    pub(super) role: &'static str,
    pub(super) parts: [PartDto<'a>; 1],
}

#[derive(Debug, Serialize)]
pub(super) struct PartDto<'a> {
    pub(super) text: &'a str,
}

impl<'a> GenerateRequestDto<'a> {
    pub(super) fn user_turn(text: &'a str) -> Self {
        Self {
            contents: [ContentDto {
                role: "user",
                parts: [PartDto { text }],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct GenerateResponseDto {
    #[serde(default)]
    candidates: Vec<CandidateDto>,
}

#[derive(Debug, Deserialize)]
struct CandidateDto {
    content: Option<CandidateContentDto>,
}

#[derive(Debug, Deserialize)]
struct CandidateContentDto {
    #[serde(default)]
    parts: Vec<CandidatePartDto>,
}

#[derive(Debug, Deserialize)]
struct CandidatePartDto {
    text: Option<String>,
}

impl GenerateResponseDto {
    /// Text of the first part of the first candidate.
    pub(super) fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}
