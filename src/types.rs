use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::utils;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Major,
    Minor,
    #[default]
    Unknown,
}

impl Mode {
    /// Provider encoding: 1 is major, 0 is minor.
    pub fn from_raw(mode: Option<i64>) -> Self {
        match mode {
            Some(1) => Mode::Major,
            Some(0) => Mode::Minor,
            _ => Mode::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeySignature {
    pub pitch_class: u8,
    pub mode: Mode,
}

/// Audio-feature record as delivered by either analysis provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawAudioFeatures {
    pub id: Option<String>,
    pub href: Option<String>,
    pub tempo: Option<f64>,
    pub key: Option<i64>,
    pub mode: Option<i64>,
    pub energy: Option<f64>,
    pub danceability: Option<f64>,
    pub valence: Option<f64>,
    pub acousticness: Option<f64>,
    pub instrumentalness: Option<f64>,
    pub speechiness: Option<f64>,
    pub liveness: Option<f64>,
    pub loudness: Option<f64>,
    pub time_signature: Option<i64>,
}

/// One track's analyzed musical attributes.
///
/// Normalized fields are clamped to `[0, 1]` on construction. Missing values
/// stay `None` and simply contribute nothing when scoring.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AudioFeatureVector {
    pub track_id: String,
    pub tempo_bpm: Option<f64>,
    pub pitch_class: Option<u8>,
    pub mode: Mode,
    pub energy: Option<f64>,
    pub danceability: Option<f64>,
    pub valence: Option<f64>,
    pub acousticness: Option<f64>,
    pub instrumentalness: Option<f64>,
    pub speechiness: Option<f64>,
    pub liveness: Option<f64>,
    pub loudness: Option<f64>,
    pub time_signature: Option<u8>,
}

impl AudioFeatureVector {
    pub fn from_raw(track_id: impl Into<String>, raw: &RawAudioFeatures) -> Self {
        Self {
            track_id: track_id.into(),
            tempo_bpm: raw.tempo.filter(|t| t.is_finite() && *t > 0.0),
            pitch_class: raw
                .key
                .filter(|k| (0..12).contains(k))
                .map(|k| k as u8),
            mode: Mode::from_raw(raw.mode),
            energy: raw.energy.and_then(utils::clamp_unit),
            danceability: raw.danceability.and_then(utils::clamp_unit),
            valence: raw.valence.and_then(utils::clamp_unit),
            acousticness: raw.acousticness.and_then(utils::clamp_unit),
            instrumentalness: raw.instrumentalness.and_then(utils::clamp_unit),
            speechiness: raw.speechiness.and_then(utils::clamp_unit),
            liveness: raw.liveness.and_then(utils::clamp_unit),
            loudness: raw.loudness.filter(|l| l.is_finite()),
            time_signature: raw
                .time_signature
                .filter(|t| (1..=u8::MAX as i64).contains(t))
                .map(|t| t as u8),
        }
    }

    pub fn key_signature(&self) -> Option<KeySignature> {
        self.pitch_class.map(|pitch_class| KeySignature {
            pitch_class,
            mode: self.mode,
        })
    }
}

/// Catalog track as shown to the user.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackSummary {
    pub id: String,
    pub name: String,
    pub artists: Vec<String>,
    pub album: String,
    pub album_art: Option<String>,
    pub duration_ms: u64,
    pub uri: String,
    pub preview_url: Option<String>,
}

impl TrackSummary {
    pub fn artist_line(&self) -> String {
        if self.artists.is_empty() {
            "Unknown Artist".to_string()
        } else {
            self.artists.join(", ")
        }
    }
}

/// Any shape a track can be handed to the enricher in.
///
/// Playlist endpoints wrap tracks as `{ "track": ... }` and may return `null`
/// for removed or local tracks; callers also pass plain URIs or ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrackRef {
    Uri(String),
    Summary(TrackSummary),
    Wrapped { track: Option<TrackSummary> },
}

impl TrackRef {
    pub fn track_id(&self) -> Option<String> {
        match self {
            TrackRef::Uri(uri) => utils::extract_track_id(uri),
            TrackRef::Summary(track) => utils::extract_track_id(&track.id),
            TrackRef::Wrapped { track } => track
                .as_ref()
                .and_then(|t| utils::extract_track_id(&t.id)),
        }
    }

    pub fn summary(&self) -> Option<&TrackSummary> {
        match self {
            TrackRef::Summary(track) => Some(track),
            TrackRef::Wrapped { track } => track.as_ref(),
            TrackRef::Uri(_) => None,
        }
    }
}

/// Display-ready feature values attached to an enriched track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureBadges {
    pub bpm: Option<u32>,
    pub key: String,
    pub camelot: Option<String>,
    pub energy: Option<f64>,
    pub danceability: Option<f64>,
    pub valence: Option<f64>,
    pub acousticness: Option<f64>,
    pub instrumentalness: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedTrack {
    pub item: TrackRef,
    pub features: Option<FeatureBadges>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub track: TrackSummary,
    pub features: Option<AudioFeatureVector>,
    pub similarity_score: u8,
}

/// Optional tuning targets forwarded to the recommendations endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationTargets {
    pub key: Option<u8>,
    pub tempo: Option<f64>,
    pub energy: Option<f64>,
    pub danceability: Option<f64>,
    pub valence: Option<f64>,
}

impl RecommendationTargets {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(key) = self.key {
            pairs.push(("target_key", key.to_string()));
        }
        if let Some(tempo) = self.tempo {
            pairs.push(("target_tempo", tempo.to_string()));
        }
        if let Some(energy) = self.energy {
            pairs.push(("target_energy", energy.to_string()));
        }
        if let Some(danceability) = self.danceability {
            pairs.push(("target_danceability", danceability.to_string()));
        }
        if let Some(valence) = self.valence {
            pairs.push(("target_valence", valence.to_string()));
        }
        pairs
    }
}

// Spotify Web API payloads

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyTrack {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SpotifyArtistRef>,
    pub album: Option<SpotifyAlbumRef>,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub uri: String,
    pub preview_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyArtistRef {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyAlbumRef {
    pub name: String,
    #[serde(default)]
    pub images: Vec<SpotifyImage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyImage {
    pub url: String,
}

impl SpotifyTrack {
    /// Formats a catalog track for display. Tracks without an id (local
    /// files) cannot be analyzed and yield `None`.
    pub fn into_summary(self) -> Option<TrackSummary> {
        let id = self.id?;
        let (album, album_art) = match self.album {
            Some(album) => {
                let art = album.images.into_iter().next().map(|i| i.url);
                (album.name, art)
            }
            None => ("Unknown Album".to_string(), None),
        };

        Some(TrackSummary {
            id: id.clone(),
            name: self.name,
            artists: self.artists.into_iter().map(|a| a.name).collect(),
            album,
            album_art,
            duration_ms: self.duration_ms,
            uri: if self.uri.is_empty() {
                utils::to_catalog_uri(&id, "track")
            } else {
                self.uri
            },
            preview_url: self.preview_url,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeveralTracksResponse {
    pub tracks: Vec<Option<SpotifyTrack>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub tracks: Vec<SpotifyTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchTracksResponse {
    pub tracks: TracksPage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracksPage {
    pub items: Vec<SpotifyTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksResponse {
    pub items: Vec<PlaylistItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub track: Option<SpotifyTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioFeaturesResponse {
    pub audio_features: Vec<Option<RawAudioFeatures>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReccoBeatsFeaturesResponse {
    #[serde(default)]
    pub content: Vec<RawAudioFeatures>,
}

#[derive(Tabled)]
pub struct SimilarTableRow {
    pub score: u8,
    pub name: String,
    pub artists: String,
    pub bpm: String,
    pub key: String,
    pub camelot: String,
    pub energy: String,
}

#[derive(Tabled)]
pub struct FeatureTableRow {
    pub name: String,
    pub artists: String,
    pub duration: String,
    pub bpm: String,
    pub key: String,
    pub camelot: String,
    pub energy: String,
    pub valence: String,
}
