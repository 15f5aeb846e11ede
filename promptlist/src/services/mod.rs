//! Service modules for playlist generation
//!
//! Upstream clients sit behind traits so the coordinator can be driven by
//! test doubles.

pub mod catalog_client;
pub mod catalog_matcher;
pub mod completion_client;
pub mod playlist_generator;
pub mod prompt_resolver;

pub use catalog_client::{
    CatalogAlbum, CatalogArtist, CatalogClient, CatalogImage, CatalogTrack, SpotifyClient,
};
pub use catalog_matcher::CatalogMatcher;
pub use completion_client::{CompletionClient, OpenAiClient};
pub use playlist_generator::PlaylistGenerator;
pub use prompt_resolver::{PromptResolver, SYSTEM_INSTRUCTION};
