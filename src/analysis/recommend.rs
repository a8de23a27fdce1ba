use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    analysis::{key::key_name, similarity},
    error::AnalysisError,
    features::FeatureClient,
    types::{AudioFeatureVector, RecommendationTargets, ScoredCandidate, TrackSummary},
};

pub const DEFAULT_POOL_SIZE: usize = 20;
pub const DEFAULT_LIMIT: usize = 20;

/// Catalog endpoints the engine needs to build a candidate pool.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Tracks the provider recommends for `seed_id`.
    async fn recommend(
        &self,
        seed_id: &str,
        limit: usize,
        targets: &RecommendationTargets,
    ) -> Result<Vec<TrackSummary>, AnalysisError>;

    /// Display metadata for bare ids. Unknown ids are skipped.
    async fn tracks_by_ids(&self, ids: &[String]) -> Result<Vec<TrackSummary>, AnalysisError>;
}

/// Where the tracks to score against the seed come from.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidatePool {
    Supplied(Vec<TrackSummary>),
    Ids(Vec<String>),
    Recommended {
        size: usize,
        targets: RecommendationTargets,
    },
}

impl Default for CandidatePool {
    fn default() -> Self {
        CandidatePool::Recommended {
            size: DEFAULT_POOL_SIZE,
            targets: RecommendationTargets::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimilarityFilter {
    #[default]
    All,
    /// Rounded tempo within [`similarity::BPM_TOLERANCE`] of the seed's.
    Bpm,
    /// Same key name as the seed.
    Key,
}

impl SimilarityFilter {
    pub fn matches(&self, seed: &AudioFeatureVector, candidate: &ScoredCandidate) -> bool {
        match self {
            SimilarityFilter::All => true,
            SimilarityFilter::Bpm => candidate
                .features
                .as_ref()
                .and_then(|f| f.tempo_bpm.zip(seed.tempo_bpm))
                .is_some_and(|(a, b)| {
                    (a.round() - b.round()).abs() <= similarity::BPM_TOLERANCE
                }),
            SimilarityFilter::Key => candidate.features.as_ref().is_some_and(|f| {
                f.pitch_class.is_some()
                    && key_name(f.pitch_class.map(i32::from), f.mode)
                        == key_name(seed.pitch_class.map(i32::from), seed.mode)
            }),
        }
    }

    pub fn apply(
        &self,
        seed: &AudioFeatureVector,
        candidates: Vec<ScoredCandidate>,
    ) -> Vec<ScoredCandidate> {
        candidates
            .into_iter()
            .filter(|c| self.matches(seed, c))
            .collect()
    }
}

/// Ranked candidates together with the seed's features.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityReport {
    pub seed: AudioFeatureVector,
    pub candidates: Vec<ScoredCandidate>,
}

/// Ranks candidate tracks by how similar they sound to a seed track.
///
/// Holds no mutable state; concurrent calls for different seeds are
/// independent.
#[derive(Clone)]
pub struct RecommendationEngine {
    features: FeatureClient,
    catalog: Arc<dyn CatalogSource>,
}

impl RecommendationEngine {
    pub fn new(features: FeatureClient, catalog: Arc<dyn CatalogSource>) -> Self {
        Self { features, catalog }
    }

    /// Candidates most similar to `seed_track_id`, best first, at most `limit`.
    ///
    /// Fails with `SeedFeaturesUnavailable` when the seed cannot be analyzed
    /// and with `Upstream` when the candidate pool cannot be obtained.
    /// Candidates without features are kept with a score of 0.
    pub async fn find_similar(
        &self,
        seed_track_id: &str,
        pool: CandidatePool,
        limit: usize,
    ) -> Result<Vec<ScoredCandidate>, AnalysisError> {
        self.similar_to_seed(seed_track_id, pool, limit)
            .await
            .map(|report| report.candidates)
    }

    /// Same as [`Self::find_similar`] but also hands back the seed's features.
    pub async fn similar_to_seed(
        &self,
        seed_track_id: &str,
        pool: CandidatePool,
        limit: usize,
    ) -> Result<SimilarityReport, AnalysisError> {
        let seed = self.features.fetch_one(seed_track_id).await.map_err(|e| {
            AnalysisError::SeedFeaturesUnavailable {
                track_id: seed_track_id.to_string(),
                reason: e.to_string(),
            }
        })?;

        let candidates = self.candidate_pool(seed_track_id, pool).await?;
        let ids: Vec<String> = candidates.iter().map(|t| t.id.clone()).collect();
        let features = self.features.fetch_many(&ids).await;

        let mut scored: Vec<ScoredCandidate> = candidates
            .into_iter()
            .zip(features)
            .map(|(track, features)| {
                let similarity_score = features
                    .as_ref()
                    .map_or(0, |f| similarity::score(&seed, f));
                ScoredCandidate {
                    track,
                    features,
                    similarity_score,
                }
            })
            .collect();

        // stable: equal scores keep their pool order
        scored.sort_by(|a, b| b.similarity_score.cmp(&a.similarity_score));
        scored.truncate(limit);

        Ok(SimilarityReport {
            seed,
            candidates: scored,
        })
    }

    async fn candidate_pool(
        &self,
        seed_track_id: &str,
        pool: CandidatePool,
    ) -> Result<Vec<TrackSummary>, AnalysisError> {
        match pool {
            CandidatePool::Supplied(tracks) => Ok(tracks),
            CandidatePool::Ids(ids) if ids.is_empty() => Ok(Vec::new()),
            CandidatePool::Ids(ids) => self.catalog.tracks_by_ids(&ids).await,
            CandidatePool::Recommended { size, targets } => {
                self.catalog.recommend(seed_track_id, size, &targets).await
            }
        }
    }
}
