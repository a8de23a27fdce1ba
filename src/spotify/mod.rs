//! # Spotify Integration Module
//!
//! This module talks to the Spotify Web API. It provides the catalog side of
//! similarity search (recommendations, track lookup, search, playlist
//! contents) and an alternative audio-feature provider.
//!
//! ## Architecture
//!
//! ```text
//! Application Layer (CLI)
//!          ↓
//! Analysis Layer (enrichment, ranking)
//!          ↓
//! Spotify Integration Layer
//!     ├── Catalog (recommendations, tracks, search, playlists)
//!     └── Audio Features (batch endpoint)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## API Coverage
//!
//! - `GET /recommendations` - Candidate pool seeded by a track
//! - `GET /tracks` - Display metadata for up to 50 tracks per call
//! - `GET /search` - Track search for ad-hoc candidate pools
//! - `GET /playlists/{id}/tracks` - Playlist contents
//! - `GET /audio-features` - Batch audio features
//!
//! ## Error Handling
//!
//! Every request goes through the same fetch policy as feature lookups:
//! bounded retries with a fixed backoff, honoring `Retry-After` on 429
//! responses. Failures surface as [`crate::error::AnalysisError::Upstream`]
//! with Spotify's own error message.
//!
//! Authentication is not handled here; callers pass a valid access token
//! (see [`crate::management::TokenManager`]).

pub mod catalog;
pub mod features;

pub use catalog::SpotifyCatalog;
pub use features::SpotifyFeatureSource;
