//! Catalog Matcher
//!
//! Resolves one guess to the catalog's top search hit, and obtains the
//! per-request catalog session.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{PlaylistError, Result};
use crate::models::{CatalogSession, ResolvedTrack, SongGuess};
use crate::services::{CatalogClient, CatalogTrack};

pub struct CatalogMatcher {
    client: Arc<dyn CatalogClient>,
}

impl CatalogMatcher {
    pub fn new(client: Arc<dyn CatalogClient>) -> Self {
        Self { client }
    }

    /// Obtain a fresh session for this request
    ///
    /// A failed exchange is logged and yields an anonymous session; the
    /// request carries on and its catalog searches fail instead.
    pub async fn refresh_session(&self) -> CatalogSession {
        match self.client.request_token().await {
            Ok(session) => {
                info!(expires_in = ?session.expires_in, "Authenticated with catalog service");
                session
            }
            Err(e) => {
                warn!(error = %e, "Catalog token exchange failed, continuing without a session");
                CatalogSession::anonymous()
            }
        }
    }

    /// Find the top catalog hit for a guess
    ///
    /// `Ok(None)` means the search came back empty.
    pub async fn match_track(
        &self,
        session: &CatalogSession,
        guess: &SongGuess,
    ) -> Result<Option<ResolvedTrack>> {
        let query = search_query(guess);
        let tracks = self.client.search_tracks(session, &query).await?;

        match tracks.into_iter().next() {
            Some(top) => project(top).map(Some),
            None => {
                debug!(guess = %guess, query = %query, "No catalog match");
                Ok(None)
            }
        }
    }
}

/// Field-filtered search query with both values quoted
pub fn search_query(guess: &SongGuess) -> String {
    format!("track:\"{}\" artist:\"{}\"", guess.title, guess.artist)
}

/// Reduce a catalog hit to id, name, first artist and first album image
pub fn project(track: CatalogTrack) -> Result<ResolvedTrack> {
    let CatalogTrack {
        id,
        name,
        artists,
        album,
    } = track;

    let artist = artists.into_iter().next().ok_or_else(|| {
        PlaylistError::Upstream(format!("catalog track {} has no artists", id))
    })?;
    let image = album.images.into_iter().next().ok_or_else(|| {
        PlaylistError::Upstream(format!("catalog track {} has no album artwork", id))
    })?;

    Ok(ResolvedTrack {
        id,
        name,
        artist: artist.name,
        artwork_url: image.url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{CatalogAlbum, CatalogArtist, CatalogImage};

    fn track(artists: &[&str], images: &[&str]) -> CatalogTrack {
        CatalogTrack {
            id: "7qiZfU4dY1lWllzX7mPBI3".to_string(),
            name: "Shape of You".to_string(),
            artists: artists
                .iter()
                .map(|name| CatalogArtist {
                    name: name.to_string(),
                })
                .collect(),
            album: CatalogAlbum {
                images: images
                    .iter()
                    .map(|url| CatalogImage {
                        url: url.to_string(),
                        height: None,
                        width: None,
                    })
                    .collect(),
            },
        }
    }

    #[test]
    fn test_search_query_quotes_both_fields() {
        let guess = SongGuess::new("God's Plan", "Drake");
        assert_eq!(search_query(&guess), r#"track:"God's Plan" artist:"Drake""#);
    }

    #[test]
    fn test_projection_takes_first_artist_and_image() {
        let resolved = project(track(
            &["Ed Sheeran", "Stormzy"],
            &["https://img/640", "https://img/64"],
        ))
        .unwrap();

        assert_eq!(
            resolved,
            ResolvedTrack {
                id: "7qiZfU4dY1lWllzX7mPBI3".to_string(),
                name: "Shape of You".to_string(),
                artist: "Ed Sheeran".to_string(),
                artwork_url: "https://img/640".to_string(),
            }
        );
    }

    #[test]
    fn test_projection_requires_artist_and_artwork() {
        assert!(matches!(
            project(track(&[], &["https://img/640"])),
            Err(PlaylistError::Upstream(_))
        ));
        assert!(matches!(
            project(track(&["Ed Sheeran"], &[])),
            Err(PlaylistError::Upstream(_))
        ));
    }
}
