use thiserror::Error;

/// Failures surfaced by feature retrieval, enrichment and ranking.
///
/// `NotFound` and `Upstream` are recovered locally wherever a degraded result
/// still makes sense (batch lookups, enrichment). Only a failed seed lookup
/// escapes as `SeedFeaturesUnavailable`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("no audio features available for track {0}")]
    NotFound(String),

    #[error("upstream request failed: {message}")]
    Upstream {
        message: String,
        status: Option<u16>,
        retry_after: Option<u64>,
    },

    #[error("cannot analyze seed track {track_id}: {reason}")]
    SeedFeaturesUnavailable { track_id: String, reason: String },
}

impl AnalysisError {
    /// Seconds the provider asked us to wait before the next attempt.
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            AnalysisError::Upstream { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        AnalysisError::Upstream {
            message: err.to_string(),
            status: err.status().map(|s| s.as_u16()),
            retry_after: None,
        }
    }
}
