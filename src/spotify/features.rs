use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;

use crate::{
    config,
    error::AnalysisError,
    features::FeatureSource,
    http,
    types::{AudioFeatureVector, AudioFeaturesResponse},
};

/// Audio features from Spotify's batch endpoint.
///
/// Unknown ids come back as `null` entries and are left out of the result.
pub struct SpotifyFeatureSource {
    client: Client,
    api_url: String,
    token: String,
}

impl SpotifyFeatureSource {
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into(),
            token: token.into(),
        }
    }

    pub fn from_env(token: impl Into<String>) -> Self {
        Self::new(config::spotify_apiurl(), token)
    }
}

#[async_trait]
impl FeatureSource for SpotifyFeatureSource {
    async fn fetch_features_by_ids(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, AudioFeatureVector>, AnalysisError> {
        let api_url = format!("{uri}/audio-features", uri = self.api_url);
        let request = self
            .client
            .get(&api_url)
            .bearer_auth(&self.token)
            .query(&[("ids", ids.join(","))]);

        let response: AudioFeaturesResponse = http::send_json(request).await?;

        Ok(response
            .audio_features
            .into_iter()
            .flatten()
            .filter_map(|raw| {
                let id = raw.id.clone()?;
                let features = AudioFeatureVector::from_raw(id.clone(), &raw);
                Some((id, features))
            })
            .collect())
    }
}
