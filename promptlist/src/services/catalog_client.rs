//! Spotify Web API client
//!
//! Client-credentials token exchange and track search. Both calls are single
//! shot; failures become [`PlaylistError::Upstream`].

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{PlaylistError, Result};
use crate::models::CatalogSession;

/// Catalog service seam
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Exchange the configured client credentials for a bearer token
    async fn request_token(&self) -> Result<CatalogSession>;

    /// Run a track search, returning hits in the service's ranking order
    async fn search_tracks(&self, session: &CatalogSession, query: &str)
        -> Result<Vec<CatalogTrack>>;
}

/// Track object from a search response (fields used here only)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogTrack {
    pub id: String,
    pub name: String,
    /// Credited artists, primary first
    #[serde(default)]
    pub artists: Vec<CatalogArtist>,
    pub album: CatalogAlbum,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogArtist {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogAlbum {
    #[serde(default)]
    pub images: Vec<CatalogImage>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogImage {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    tracks: TrackPage,
}

#[derive(Debug, Deserialize)]
struct TrackPage {
    #[serde(default)]
    items: Vec<CatalogTrack>,
}

/// Spotify Web API client
pub struct SpotifyClient {
    http_client: reqwest::Client,
    client_id: String,
    client_secret: String,
    token_url: String,
    search_url: String,
}

impl SpotifyClient {
    /// `accounts_url` hosts `/api/token`; `api_url` hosts `/v1/search`
    pub fn new(
        client_id: String,
        client_secret: String,
        accounts_url: &str,
        api_url: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PlaylistError::Internal(format!("HTTP client build failed: {}", e)))?;

        Ok(Self {
            http_client,
            client_id,
            client_secret,
            token_url: format!("{}/api/token", accounts_url.trim_end_matches('/')),
            search_url: format!("{}/v1/search", api_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl CatalogClient for SpotifyClient {
    async fn request_token(&self) -> Result<CatalogSession> {
        let response = self
            .http_client
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| PlaylistError::Upstream(format!("Token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PlaylistError::Upstream(format!(
                "Token endpoint error {}: {}",
                status.as_u16(),
                error_text
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| PlaylistError::Upstream(format!("Token response parse failed: {}", e)))?;

        Ok(CatalogSession::new(token.access_token, token.expires_in))
    }

    async fn search_tracks(
        &self,
        session: &CatalogSession,
        query: &str,
    ) -> Result<Vec<CatalogTrack>> {
        tracing::debug!(query = %query, "Searching catalog");

        let response = self
            .http_client
            .get(&self.search_url)
            .bearer_auth(&session.access_token)
            .query(&[("q", query), ("type", "track"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| PlaylistError::Upstream(format!("Search request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PlaylistError::Upstream(format!(
                "Search API error {}: {}",
                status.as_u16(),
                error_text
            )));
        }

        let search: SearchResponse = response
            .json()
            .await
            .map_err(|e| PlaylistError::Upstream(format!("Search response parse failed: {}", e)))?;

        Ok(search.tracks.items)
    }
}
