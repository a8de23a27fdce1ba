//! ReccoBeats audio-feature provider.
//!
//! ReccoBeats identifies tracks by its own ids; the Spotify id of a record
//! is the last path segment of its `href`
//! (`https://open.spotify.com/track/<id>`).

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;

use crate::{
    config,
    error::AnalysisError,
    features::FeatureSource,
    http,
    types::{AudioFeatureVector, RawAudioFeatures, ReccoBeatsFeaturesResponse},
    utils,
};

const SPOTIFY_TRACK_URL: &str = "open.spotify.com/track/";

pub struct ReccoBeatsFeatureSource {
    client: Client,
    api_url: String,
}

impl ReccoBeatsFeatureSource {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(config::reccobeats_apiurl())
    }
}

/// Catalog id a ReccoBeats record describes.
pub fn catalog_id(raw: &RawAudioFeatures) -> Option<String> {
    raw.href
        .as_deref()
        .filter(|href| href.contains(SPOTIFY_TRACK_URL))
        .and_then(utils::extract_track_id)
        .or_else(|| raw.id.clone())
}

#[async_trait]
impl FeatureSource for ReccoBeatsFeatureSource {
    async fn fetch_features_by_ids(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, AudioFeatureVector>, AnalysisError> {
        let api_url = format!("{uri}/audio-features", uri = self.api_url);
        let request = self
            .client
            .get(&api_url)
            .query(&[("ids", ids.join(","))]);

        let response: ReccoBeatsFeaturesResponse = http::send_json(request).await?;

        Ok(response
            .content
            .iter()
            .filter_map(|raw| {
                let id = catalog_id(raw)?;
                let features = AudioFeatureVector::from_raw(id.clone(), raw);
                Some((id, features))
            })
            .collect())
    }
}
