use async_trait::async_trait;
use reqwest::Client;

use crate::{
    analysis::CatalogSource,
    config,
    error::AnalysisError,
    features::FetchPolicy,
    http,
    types::{
        PlaylistTracksResponse, RecommendationTargets, RecommendationsResponse,
        SearchTracksResponse, SeveralTracksResponse, SpotifyTrack, TrackRef, TrackSummary,
    },
    utils,
};

/// Spotify caps `GET /tracks` at 50 ids per request.
const MAX_TRACKS_PER_REQUEST: usize = 50;
/// Spotify caps recommendations at 100 tracks.
const MAX_RECOMMENDATIONS: usize = 100;

pub struct SpotifyCatalog {
    client: Client,
    api_url: String,
    token: String,
    policy: FetchPolicy,
}

impl SpotifyCatalog {
    pub fn new(api_url: impl Into<String>, token: impl Into<String>, policy: FetchPolicy) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into(),
            token: token.into(),
            policy,
        }
    }

    pub fn from_env(token: impl Into<String>) -> Self {
        Self::new(config::spotify_apiurl(), token, FetchPolicy::from_env())
    }

    /// Tracks matching a free-text query.
    ///
    /// # Example
    ///
    /// ```
    /// let pool = catalog.search_tracks("daft punk", 20).await?;
    /// ```
    pub async fn search_tracks(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<TrackSummary>, AnalysisError> {
        let api_url = format!("{uri}/search", uri = self.api_url);
        let params = [
            ("q", query.to_string()),
            ("type", "track".to_string()),
            ("limit", limit.clamp(1, 50).to_string()),
        ];

        let response: SearchTracksResponse = self
            .policy
            .retry(|| {
                http::send_json(
                    self.client
                        .get(&api_url)
                        .bearer_auth(&self.token)
                        .query(&params),
                )
            })
            .await?;

        Ok(summaries(response.tracks.items))
    }

    /// Playlist contents as wrapped references; removed or local tracks come
    /// back as `Wrapped { track: None }`.
    pub async fn playlist_tracks(
        &self,
        playlist_id: &str,
        limit: usize,
    ) -> Result<Vec<TrackRef>, AnalysisError> {
        let api_url = format!(
            "{uri}/playlists/{id}/tracks",
            uri = self.api_url,
            id = playlist_id
        );
        let params = [("limit", limit.clamp(1, 100).to_string())];

        let response: PlaylistTracksResponse = self
            .policy
            .retry(|| {
                http::send_json(
                    self.client
                        .get(&api_url)
                        .bearer_auth(&self.token)
                        .query(&params),
                )
            })
            .await?;

        Ok(response
            .items
            .into_iter()
            .map(|item| TrackRef::Wrapped {
                track: item.track.and_then(SpotifyTrack::into_summary),
            })
            .collect())
    }
}

fn summaries(tracks: Vec<SpotifyTrack>) -> Vec<TrackSummary> {
    tracks
        .into_iter()
        .filter_map(SpotifyTrack::into_summary)
        .collect()
}

#[async_trait]
impl CatalogSource for SpotifyCatalog {
    async fn recommend(
        &self,
        seed_id: &str,
        limit: usize,
        targets: &RecommendationTargets,
    ) -> Result<Vec<TrackSummary>, AnalysisError> {
        let api_url = format!("{uri}/recommendations", uri = self.api_url);
        let mut params = vec![
            ("seed_tracks", seed_id.to_string()),
            ("limit", limit.clamp(1, MAX_RECOMMENDATIONS).to_string()),
        ];
        params.extend(targets.query_pairs());

        let response: RecommendationsResponse = self
            .policy
            .retry(|| {
                http::send_json(
                    self.client
                        .get(&api_url)
                        .bearer_auth(&self.token)
                        .query(&params),
                )
            })
            .await?;

        Ok(summaries(response.tracks))
    }

    async fn tracks_by_ids(&self, ids: &[String]) -> Result<Vec<TrackSummary>, AnalysisError> {
        let api_url = format!("{uri}/tracks", uri = self.api_url);
        let mut tracks = Vec::with_capacity(ids.len());

        for chunk in utils::chunk_ids(ids, MAX_TRACKS_PER_REQUEST) {
            let params = [("ids", chunk)];
            let response: SeveralTracksResponse = self
                .policy
                .retry(|| {
                    http::send_json(
                        self.client
                            .get(&api_url)
                            .bearer_auth(&self.token)
                            .query(&params),
                    )
                })
                .await?;

            tracks.extend(summaries(response.tracks.into_iter().flatten().collect()));
        }

        Ok(tracks)
    }
}
