//! Wire types for the generateContent API family.
//!
//! Streaming and one-shot calls share the same response shape; a
//! streamed chunk is just a response whose candidates carry the next
//! text parts.

use serde::Deserialize;

/// Reply used when a completed response carries no usable text part.
pub const FALLBACK_REPLY: &str = "Sorry, I don't have an answer for that right now.";

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// First non-empty text part, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|content| content.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .find(|t| !t.is_empty())
    }

    /// All non-empty text parts in arrival order.
    pub fn texts(&self) -> Vec<String> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|content| content.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_string())
            .collect()
    }
}
