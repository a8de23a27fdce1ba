#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc, Mutex,
        atomic::{AtomicU32, Ordering},
    },
};

use async_trait::async_trait;
use trackmatch::{
    analysis::CatalogSource,
    error::AnalysisError,
    features::{FeatureClient, FeatureSource, FetchPolicy},
    types::{AudioFeatureVector, Mode, RecommendationTargets, TrackSummary},
};

// Helper function to create a feature vector with the dimensions used in most tests
pub fn features(
    id: &str,
    tempo: f64,
    pitch_class: u8,
    mode: Mode,
    energy: f64,
) -> AudioFeatureVector {
    AudioFeatureVector {
        track_id: id.to_string(),
        tempo_bpm: Some(tempo),
        pitch_class: Some(pitch_class),
        mode,
        energy: Some(energy),
        ..Default::default()
    }
}

// Helper function to create a feature vector with every scored dimension set
pub fn full_features(id: &str, tempo: f64, pitch_class: u8, mode: Mode, value: f64) -> AudioFeatureVector {
    AudioFeatureVector {
        track_id: id.to_string(),
        tempo_bpm: Some(tempo),
        pitch_class: Some(pitch_class),
        mode,
        energy: Some(value),
        danceability: Some(value),
        valence: Some(value),
        acousticness: Some(value),
        instrumentalness: Some(value),
        speechiness: Some(value),
        liveness: Some(value),
        loudness: Some(-6.0),
        time_signature: Some(4),
    }
}

pub fn track(id: &str) -> TrackSummary {
    TrackSummary {
        id: id.to_string(),
        name: format!("Track {}", id),
        artists: vec![format!("Artist {}", id)],
        album: format!("Album {}", id),
        album_art: None,
        duration_ms: 180_000,
        uri: format!("spotify:track:{}", id),
        preview_url: None,
    }
}

pub fn upstream_error(message: &str) -> AnalysisError {
    AnalysisError::Upstream {
        message: message.to_string(),
        status: Some(503),
        retry_after: None,
    }
}

pub fn ids(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("id{}", i)).collect()
}

/// In-memory feature provider recording every batch it is asked for.
#[derive(Default)]
pub struct MockFeatureSource {
    pub features: HashMap<String, AudioFeatureVector>,
    /// A batch containing any of these ids always fails.
    pub failing_ids: HashSet<String>,
    pub fail_all: bool,
    /// Number of leading calls that fail before the source recovers.
    pub transient_failures: AtomicU32,
    pub calls: Mutex<Vec<Vec<String>>>,
}

impl MockFeatureSource {
    pub fn with_features(features: Vec<AudioFeatureVector>) -> Self {
        Self {
            features: features
                .into_iter()
                .map(|f| (f.track_id.clone(), f))
                .collect(),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.calls().iter().map(Vec::len).collect()
    }
}

#[async_trait]
impl FeatureSource for MockFeatureSource {
    async fn fetch_features_by_ids(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, AudioFeatureVector>, AnalysisError> {
        self.calls.lock().unwrap().push(ids.to_vec());

        if self.fail_all || ids.iter().any(|id| self.failing_ids.contains(id)) {
            return Err(upstream_error("provider unavailable"));
        }

        if self
            .transient_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(upstream_error("temporarily unavailable"));
        }

        Ok(ids
            .iter()
            .filter_map(|id| self.features.get(id).map(|f| (id.clone(), f.clone())))
            .collect())
    }
}

pub fn client(source: Arc<MockFeatureSource>) -> FeatureClient {
    FeatureClient::new(source, FetchPolicy::immediate())
}

/// In-memory catalog.
#[derive(Default)]
pub struct MockCatalog {
    pub recommended: Vec<TrackSummary>,
    pub tracks: HashMap<String, TrackSummary>,
    pub fail: bool,
    pub recommend_calls: Mutex<Vec<(String, usize, RecommendationTargets)>>,
    pub lookup_calls: Mutex<Vec<Vec<String>>>,
}

impl MockCatalog {
    pub fn recommending(tracks: Vec<TrackSummary>) -> Self {
        Self {
            recommended: tracks,
            ..Default::default()
        }
    }

    pub fn knowing(tracks: Vec<TrackSummary>) -> Self {
        Self {
            tracks: tracks.into_iter().map(|t| (t.id.clone(), t)).collect(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl CatalogSource for MockCatalog {
    async fn recommend(
        &self,
        seed_id: &str,
        limit: usize,
        targets: &RecommendationTargets,
    ) -> Result<Vec<TrackSummary>, AnalysisError> {
        self.recommend_calls
            .lock()
            .unwrap()
            .push((seed_id.to_string(), limit, targets.clone()));

        if self.fail {
            return Err(upstream_error("recommendations unavailable"));
        }

        Ok(self.recommended.iter().take(limit).cloned().collect())
    }

    async fn tracks_by_ids(&self, ids: &[String]) -> Result<Vec<TrackSummary>, AnalysisError> {
        self.lookup_calls.lock().unwrap().push(ids.to_vec());

        if self.fail {
            return Err(upstream_error("tracks unavailable"));
        }

        Ok(ids.iter().filter_map(|id| self.tracks.get(id).cloned()).collect())
    }
}
