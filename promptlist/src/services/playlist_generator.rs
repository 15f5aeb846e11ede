//! Request Coordinator
//!
//! Validates the prompt, refreshes the catalog session, resolves the prompt
//! once, then matches every guess with bounded concurrency.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::info;

use crate::error::Result;
use crate::models::{Playlist, PromptRequest, ResolvedTrack};
use crate::services::{CatalogClient, CatalogMatcher, CompletionClient, PromptResolver};

pub struct PlaylistGenerator {
    resolver: PromptResolver,
    matcher: CatalogMatcher,
    match_concurrency: usize,
}

impl PlaylistGenerator {
    /// `match_concurrency` caps catalog searches in flight per request (minimum 1)
    pub fn new(
        completion: Arc<dyn CompletionClient>,
        catalog: Arc<dyn CatalogClient>,
        match_concurrency: usize,
    ) -> Self {
        Self {
            resolver: PromptResolver::new(completion),
            matcher: CatalogMatcher::new(catalog),
            match_concurrency: match_concurrency.max(1),
        }
    }

    /// Generate a playlist for one request
    ///
    /// Every match runs to completion even if another fails. If any failed,
    /// the first failure in guess order is returned instead of a playlist.
    pub async fn generate(&self, request: &PromptRequest) -> Result<Playlist> {
        let prompt = request.validated_prompt()?;

        let session = self.matcher.refresh_session().await;

        info!("Resolving prompt");
        let guesses = self.resolver.resolve(prompt).await?;

        info!(guesses = guesses.len(), "Searching catalog for guesses");
        let matcher = &self.matcher;
        let session = &session;
        let results: Vec<Result<Option<ResolvedTrack>>> = stream::iter(guesses)
            .map(|guess| async move { matcher.match_track(session, &guess).await })
            .buffered(self.match_concurrency)
            .collect()
            .await;

        let mut playlist = Playlist::with_capacity(results.len());
        for result in results {
            if let Some(track) = result? {
                playlist.push(track);
            }
        }

        info!(tracks = playlist.len(), "Returning playlist");
        Ok(playlist)
    }
}
