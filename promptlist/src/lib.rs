//! promptlist library interface
//!
//! Turns a free-text prompt into a playlist: a language model invents
//! (title, artist) guesses and the Spotify catalog resolves each one.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult, PlaylistError};

use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, Utc};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::services::{OpenAiClient, PlaylistGenerator, SpotifyClient};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<PlaylistGenerator>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(generator: PlaylistGenerator) -> Self {
        Self {
            generator: Arc::new(generator),
            startup_time: Utc::now(),
        }
    }

    /// Wire the production OpenAI and Spotify clients from configuration
    pub fn from_config(config: &Config) -> error::Result<Self> {
        let completion = OpenAiClient::new(
            config.credentials.openai_api_key.clone(),
            &config.openai_base_url,
            config.completion.clone(),
            config.http_timeout,
        )?;
        let catalog = SpotifyClient::new(
            config.credentials.spotify_client_id.clone(),
            config.credentials.spotify_client_secret.clone(),
            &config.spotify_accounts_url,
            &config.spotify_api_url,
            config.http_timeout,
        )?;

        Ok(Self::new(PlaylistGenerator::new(
            Arc::new(completion),
            Arc::new(catalog),
            config.match_concurrency,
        )))
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::generate_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
