//! # Analysis Module
//!
//! The algorithmic core: music-theory helpers, the similarity score, and the
//! two orchestrators built on top of [`crate::features::FeatureClient`].
//!
//! - [`key`] - Key names, Camelot codes and harmonic compatibility
//! - [`similarity`] - Weighted 0..=100 similarity between two feature vectors
//! - [`enrich`] - Best-effort feature badges for track lists
//! - [`recommend`] - Seed-based candidate scoring and ranking
//!
//! `key` and `similarity` are pure and synchronous. `enrich` and `recommend`
//! only suspend on provider I/O.

pub mod enrich;
pub mod key;
pub mod recommend;
pub mod similarity;

pub use enrich::TrackEnricher;
pub use key::{are_keys_compatible, camelot_key, key_name};
pub use recommend::{
    CandidatePool, CatalogSource, DEFAULT_LIMIT, DEFAULT_POOL_SIZE, RecommendationEngine,
    SimilarityFilter, SimilarityReport,
};
pub use similarity::{BPM_TOLERANCE, score};
