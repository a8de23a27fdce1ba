use std::collections::{HashMap, HashSet};

use crate::{
    analysis::key::{camelot_key, key_name},
    features::FeatureClient,
    types::{AudioFeatureVector, EnrichedTrack, FeatureBadges, TrackRef},
};

impl From<&AudioFeatureVector> for FeatureBadges {
    fn from(features: &AudioFeatureVector) -> Self {
        let pitch_class = features.pitch_class.map(i32::from);
        Self {
            bpm: features.tempo_bpm.map(|t| t.round() as u32),
            key: key_name(pitch_class, features.mode),
            camelot: camelot_key(pitch_class, features.mode).map(str::to_string),
            energy: features.energy,
            danceability: features.danceability,
            valence: features.valence,
            acousticness: features.acousticness,
            instrumentalness: features.instrumentalness,
        }
    }
}

/// Attaches audio-feature badges to track lists, best effort.
///
/// Tracks are never dropped or reordered. A track whose features cannot be
/// resolved, including every track of a batch that failed upstream, comes
/// back exactly as it went in.
#[derive(Clone)]
pub struct TrackEnricher {
    features: FeatureClient,
}

impl TrackEnricher {
    pub fn new(features: FeatureClient) -> Self {
        Self { features }
    }

    pub async fn enrich(&self, tracks: Vec<TrackRef>) -> Vec<EnrichedTrack> {
        let mut seen_ids = HashSet::new();
        let ids: Vec<String> = tracks
            .iter()
            .filter_map(TrackRef::track_id)
            .filter(|id| seen_ids.insert(id.clone()))
            .collect();

        if ids.is_empty() {
            return tracks.into_iter().map(unenriched).collect();
        }

        let lookup: HashMap<String, AudioFeatureVector> = ids
            .iter()
            .cloned()
            .zip(self.features.fetch_many(&ids).await)
            .filter_map(|(id, features)| features.map(|f| (id, f)))
            .collect();

        tracks
            .into_iter()
            .map(|item| {
                let features = item
                    .track_id()
                    .and_then(|id| lookup.get(&id))
                    .map(FeatureBadges::from);
                EnrichedTrack { item, features }
            })
            .collect()
    }
}

fn unenriched(item: TrackRef) -> EnrichedTrack {
    EnrichedTrack {
        item,
        features: None,
    }
}
