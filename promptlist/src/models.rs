//! Request, guess, and track types

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PlaylistError, Result};

/// Body of `POST /generate`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptRequest {
    pub prompt: Option<String>,
}

impl PromptRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
        }
    }

    /// Build from a raw request body
    ///
    /// Anything that is not a JSON object with a string `prompt` yields a
    /// request without a prompt, which validation then rejects.
    pub fn from_json_body(body: &[u8]) -> Self {
        let prompt = serde_json::from_slice::<Value>(body)
            .ok()
            .and_then(|value| match value.get("prompt") {
                Some(Value::String(prompt)) => Some(prompt.clone()),
                _ => None,
            });

        Self { prompt }
    }

    /// Prompt as submitted, provided it is non-blank
    pub fn validated_prompt(&self) -> Result<&str> {
        match self.prompt.as_deref() {
            Some(prompt) if !prompt.trim().is_empty() => Ok(prompt),
            _ => Err(PlaylistError::MissingInput),
        }
    }
}

/// A (title, artist) pair invented by the language model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongGuess {
    pub title: String,
    /// Primary artist only
    pub artist: String,
}

impl SongGuess {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
        }
    }
}

impl fmt::Display for SongGuess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" by {}", self.title, self.artist)
    }
}

/// Catalog entry a guess resolved to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTrack {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub artwork_url: String,
}

/// Matched tracks in guess order
pub type Playlist = Vec<ResolvedTrack>;

/// Catalog bearer credential, scoped to a single request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSession {
    pub access_token: String,
    /// Lifetime reported by the token endpoint, in seconds (informational)
    pub expires_in: Option<u64>,
}

impl CatalogSession {
    pub fn new(access_token: impl Into<String>, expires_in: Option<u64>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_in,
        }
    }

    /// Session used after a failed token exchange; catalog calls made with it
    /// are rejected by the service
    pub fn anonymous() -> Self {
        Self::new(String::new(), None)
    }

    pub fn is_anonymous(&self) -> bool {
        self.access_token.is_empty()
    }
}
