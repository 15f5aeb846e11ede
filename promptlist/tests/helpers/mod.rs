//! Test helpers: recording doubles for the completion and catalog clients

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use promptlist::error::{PlaylistError, Result};
use promptlist::models::CatalogSession;
use promptlist::services::{
    CatalogAlbum, CatalogArtist, CatalogClient, CatalogImage, CatalogTrack, CompletionClient,
    PlaylistGenerator,
};
use promptlist::{build_router, AppState};

/// Completion double returning a canned reply
pub struct MockCompletion {
    reply: std::result::Result<String, String>,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl MockCompletion {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionClient for MockCompletion {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((system.to_string(), user.to_string()));
        self.reply.clone().map_err(PlaylistError::Upstream)
    }
}

type SearchFn = dyn Fn(&str) -> std::result::Result<Vec<CatalogTrack>, String> + Send + Sync;

/// Catalog double with a scripted search function
///
/// Searches with an anonymous session fail the way the real service rejects
/// a missing bearer token.
pub struct MockCatalog {
    token_succeeds: bool,
    search: Box<SearchFn>,
    pub token_requests: AtomicUsize,
    pub queries: Mutex<Vec<String>>,
    pub tokens_seen: Mutex<Vec<String>>,
}

impl MockCatalog {
    pub fn new<F>(search: F) -> Arc<Self>
    where
        F: Fn(&str) -> std::result::Result<Vec<CatalogTrack>, String> + Send + Sync + 'static,
    {
        Arc::new(Self {
            token_succeeds: true,
            search: Box::new(search),
            token_requests: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
            tokens_seen: Mutex::new(Vec::new()),
        })
    }

    pub fn with_failing_token<F>(search: F) -> Arc<Self>
    where
        F: Fn(&str) -> std::result::Result<Vec<CatalogTrack>, String> + Send + Sync + 'static,
    {
        Arc::new(Self {
            token_succeeds: false,
            search: Box::new(search),
            token_requests: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
            tokens_seen: Mutex::new(Vec::new()),
        })
    }

    /// Every query hits the same track
    pub fn always(track: CatalogTrack) -> Arc<Self> {
        Self::new(move |_| Ok(vec![track.clone()]))
    }

    /// Every query comes back empty
    pub fn empty() -> Arc<Self> {
        Self::new(|_| Ok(Vec::new()))
    }

    pub fn token_request_count(&self) -> usize {
        self.token_requests.load(Ordering::SeqCst)
    }

    pub fn recorded_queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogClient for MockCatalog {
    async fn request_token(&self) -> Result<CatalogSession> {
        self.token_requests.fetch_add(1, Ordering::SeqCst);
        if self.token_succeeds {
            Ok(CatalogSession::new("mock-token", Some(3600)))
        } else {
            Err(PlaylistError::Upstream(
                "Token endpoint error 400: invalid_client".to_string(),
            ))
        }
    }

    async fn search_tracks(
        &self,
        session: &CatalogSession,
        query: &str,
    ) -> Result<Vec<CatalogTrack>> {
        self.queries.lock().unwrap().push(query.to_string());
        self.tokens_seen
            .lock()
            .unwrap()
            .push(session.access_token.clone());

        if session.is_anonymous() {
            return Err(PlaylistError::Upstream(
                "Search API error 401: No token provided".to_string(),
            ));
        }

        (self.search)(query).map_err(PlaylistError::Upstream)
    }
}

/// Build a catalog track with one artist and one image
pub fn catalog_track(id: &str, name: &str, artist: &str, artwork: &str) -> CatalogTrack {
    CatalogTrack {
        id: id.to_string(),
        name: name.to_string(),
        artists: vec![CatalogArtist {
            name: artist.to_string(),
        }],
        album: CatalogAlbum {
            images: vec![CatalogImage {
                url: artwork.to_string(),
                height: Some(640),
                width: Some(640),
            }],
        },
    }
}

/// Router wired to the given doubles
pub fn test_app(
    completion: Arc<MockCompletion>,
    catalog: Arc<MockCatalog>,
    match_concurrency: usize,
) -> axum::Router {
    let generator = PlaylistGenerator::new(completion, catalog, match_concurrency);
    build_router(AppState::new(generator))
}

/// POST /generate with a raw body
pub async fn post_generate(app: axum::Router, body: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri("/generate")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
