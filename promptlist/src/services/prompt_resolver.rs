//! Prompt Resolver
//!
//! Asks the language model for a themed list and parses its reply into
//! [`SongGuess`] values. The reply must be a JSON array of `[title, artist]`
//! string pairs and nothing else; any other shape fails the whole resolution.

use std::sync::Arc;

use serde_json::Value;

use crate::error::{PlaylistError, Result};
use crate::models::SongGuess;
use crate::services::CompletionClient;

/// Output contract given to the model ahead of every prompt
pub const SYSTEM_INSTRUCTION: &str = "You are a playlist curator with a gift for turning a short \
description into a set of songs that is inventive yet faithful to what was asked. You reply only \
with a bracketed JSON array of two-element string arrays, song title first and artist second, \
for example [\"Dreams\", \"Fleetwood Mac\"] or [\"Redbone\", \"Childish Gambino\"]. Give only the \
primary artist of each song: no featured, guest or secondary artists. Never add commentary, \
headings or code fences. Example output:\n\
[[\"Song 1\", \"Artist\"],[\"Song 2\", \"Artist\"],[\"Song 3\", \"Artist\"]]";

pub struct PromptResolver {
    client: Arc<dyn CompletionClient>,
}

impl PromptResolver {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Resolve a prompt into guesses, in the model's order
    pub async fn resolve(&self, prompt: &str) -> Result<Vec<SongGuess>> {
        let reply = self.client.complete(SYSTEM_INSTRUCTION, prompt).await?;
        tracing::debug!(reply = %reply, "Model reply received");

        parse_guesses(&reply)
    }
}

/// Parse a model reply strictly as `[[title, artist], ...]`
pub fn parse_guesses(reply: &str) -> Result<Vec<SongGuess>> {
    let value: Value = serde_json::from_str(reply)
        .map_err(|e| PlaylistError::MalformedResponse(format!("reply is not JSON: {}", e)))?;

    let entries = value.as_array().ok_or_else(|| {
        PlaylistError::MalformedResponse(format!("expected a top-level array, got {}", value))
    })?;

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_pair(index, entry))
        .collect()
}

fn parse_pair(index: usize, entry: &Value) -> Result<SongGuess> {
    match entry.as_array().map(Vec::as_slice) {
        Some([Value::String(title), Value::String(artist)]) => {
            Ok(SongGuess::new(title.as_str(), artist.as_str()))
        }
        _ => Err(PlaylistError::MalformedResponse(format!(
            "entry {} is not a [title, artist] pair: {}",
            index, entry
        ))),
    }
}
