//! # Audio Feature Retrieval
//!
//! Fetches [`AudioFeatureVector`]s for catalog track ids from an analysis
//! provider while hiding batching, rate limiting and transient failures.
//!
//! ## Behaviour
//!
//! - Ids are split into batches of at most [`FetchPolicy::max_batch_size`]
//!   (40 by default), one network round trip per batch.
//! - Batches run **sequentially** with [`FetchPolicy::batch_delay`] between
//!   them. The delay is the rate limiter, so batches must not be spawned
//!   concurrently.
//! - Every request is retried up to [`FetchPolicy::max_retries`] times,
//!   waiting [`FetchPolicy::retry_delay`] (or the provider's `Retry-After`
//!   when it is at most 120 seconds) between attempts.
//! - A batch that still fails is reported and contributes `None` for each of
//!   its ids. Remaining batches are still fetched.
//!
//! Results are matched to ids by key, never by position in the provider's
//! response.

use std::{collections::HashMap, env, future::Future, sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::time::sleep;

use crate::{error::AnalysisError, types::AudioFeatureVector, warning};

pub const DEFAULT_MAX_BATCH_SIZE: usize = 40;
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(300);
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

const MAX_RETRY_AFTER_SECS: u64 = 120;

/// A provider that resolves one batch of track ids in a single request.
///
/// Ids the provider has no analysis for are simply absent from the map.
#[async_trait]
pub trait FeatureSource: Send + Sync {
    async fn fetch_features_by_ids(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, AudioFeatureVector>, AnalysisError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchPolicy {
    pub max_batch_size: usize,
    pub batch_delay: Duration,
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            batch_delay: DEFAULT_BATCH_DELAY,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl FetchPolicy {
    /// Builds a policy from the environment.
    ///
    /// Reads these variables:
    /// - `FEATURE_BATCH_SIZE` - ids per request (must be positive)
    /// - `FEATURE_BATCH_DELAY_MS` - pause between consecutive batches
    /// - `FEATURE_MAX_RETRIES` - retries after the first failed attempt
    /// - `FEATURE_RETRY_DELAY_MS` - backoff between attempts
    ///
    /// # Returns
    ///
    /// A policy where every unset, unparseable or (for the batch size) zero
    /// value keeps its [`FetchPolicy::default`]. This never fails.
    pub fn from_env() -> Self {
        fn read<T: std::str::FromStr>(name: &str) -> Option<T> {
            env::var(name).ok().and_then(|v| v.trim().parse().ok())
        }

        let defaults = Self::default();
        Self {
            max_batch_size: read::<usize>("FEATURE_BATCH_SIZE")
                .filter(|s| *s > 0)
                .unwrap_or(defaults.max_batch_size),
            batch_delay: read::<u64>("FEATURE_BATCH_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.batch_delay),
            max_retries: read("FEATURE_MAX_RETRIES").unwrap_or(defaults.max_retries),
            retry_delay: read::<u64>("FEATURE_RETRY_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry_delay),
        }
    }

    /// No waiting at all. Meant for tests and local mocks.
    pub fn immediate() -> Self {
        Self {
            batch_delay: Duration::ZERO,
            retry_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Runs `op` until it succeeds or the retry budget is spent.
    ///
    /// `NotFound` is final and returned without retrying.
    pub async fn retry<T, F, Fut>(&self, mut op: F) -> Result<T, AnalysisError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AnalysisError>>,
    {
        let mut attempt = 0;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err @ AnalysisError::NotFound(_)) => return Err(err),
                Err(err) => {
                    if attempt >= self.max_retries {
                        return Err(err);
                    }
                    attempt += 1;

                    let delay = match err.retry_after() {
                        Some(secs) if secs <= MAX_RETRY_AFTER_SECS => Duration::from_secs(secs),
                        Some(secs) => {
                            warning!(
                                "Provider asked to retry after {} seconds, using the default backoff instead.",
                                secs
                            );
                            self.retry_delay
                        }
                        None => self.retry_delay,
                    };

                    if !delay.is_zero() {
                        sleep(delay).await;
                    }
                }
            }
        }
    }
}

/// Batched, retrying front end over a [`FeatureSource`].
///
/// Holds no state between calls, so a single client can serve concurrent
/// lookups.
#[derive(Clone)]
pub struct FeatureClient {
    source: Arc<dyn FeatureSource>,
    policy: FetchPolicy,
}

impl FeatureClient {
    pub fn new(source: Arc<dyn FeatureSource>, policy: FetchPolicy) -> Self {
        Self { source, policy }
    }

    /// Features for a single track.
    ///
    /// Fails with `NotFound` when the provider has no analysis for the id and
    /// with `Upstream` once the retry budget is exhausted.
    pub async fn fetch_one(&self, track_id: &str) -> Result<AudioFeatureVector, AnalysisError> {
        let ids = vec![track_id.to_string()];
        let mut features = self
            .policy
            .retry(|| self.source.fetch_features_by_ids(&ids))
            .await?;

        features
            .remove(track_id)
            .ok_or_else(|| AnalysisError::NotFound(track_id.to_string()))
    }

    /// Features for many tracks, aligned with `track_ids`.
    ///
    /// Unknown ids and ids from failed batches are `None`; this call itself
    /// never fails.
    pub async fn fetch_many(&self, track_ids: &[String]) -> Vec<Option<AudioFeatureVector>> {
        let mut resolved: HashMap<String, AudioFeatureVector> = HashMap::new();
        let batches: Vec<&[String]> = track_ids.chunks(self.policy.max_batch_size.max(1)).collect();
        let batch_count = batches.len();

        for (index, batch) in batches.into_iter().enumerate() {
            if index > 0 && !self.policy.batch_delay.is_zero() {
                sleep(self.policy.batch_delay).await;
            }

            match self
                .policy
                .retry(|| self.source.fetch_features_by_ids(batch))
                .await
            {
                Ok(features) => resolved.extend(features),
                Err(e) => warning!(
                    "Failed to fetch audio features for batch {}/{} ({} tracks): {}",
                    index + 1,
                    batch_count,
                    batch.len(),
                    e
                ),
            }
        }

        track_ids.iter().map(|id| resolved.get(id).cloned()).collect()
    }
}
