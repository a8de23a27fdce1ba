use crate::{analysis::key::are_keys_compatible, types::AudioFeatureVector};

const TEMPO_POINTS: f64 = 30.0;
const KEY_POINTS: f64 = 25.0;
const ENERGY_POINTS: f64 = 15.0;
const DANCEABILITY_POINTS: f64 = 10.0;
const VALENCE_POINTS: f64 = 10.0;
const ACOUSTICNESS_POINTS: f64 = 5.0;
const INSTRUMENTALNESS_POINTS: f64 = 5.0;

/// Tempo difference (bpm) within which two tracks count as matching.
pub const BPM_TOLERANCE: f64 = 5.0;

fn tempo_points(a: Option<f64>, b: Option<f64>) -> f64 {
    let (Some(a), Some(b)) = (a, b) else {
        return 0.0;
    };

    match (a - b).abs() {
        diff if diff <= BPM_TOLERANCE => TEMPO_POINTS,
        diff if diff <= 10.0 => 20.0,
        diff if diff <= 20.0 => 10.0,
        _ => 0.0,
    }
}

fn key_points(a: &AudioFeatureVector, b: &AudioFeatureVector) -> f64 {
    match (a.key_signature(), b.key_signature()) {
        (Some(key_a), Some(key_b))
            if are_keys_compatible(
                key_a.pitch_class.into(),
                key_a.mode,
                key_b.pitch_class.into(),
                key_b.mode,
            ) =>
        {
            KEY_POINTS
        }
        _ => 0.0,
    }
}

fn closeness_points(a: Option<f64>, b: Option<f64>, max_points: f64) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => (1.0 - (a - b).abs()).max(0.0) * max_points,
        _ => 0.0,
    }
}

/// Similarity of two tracks as an integer in `0..=100`.
///
/// Weighted sub-scores: tempo 30, key compatibility 25, energy 15,
/// danceability 10, valence 10, acousticness 5, instrumentalness 5. A
/// dimension missing on either side contributes nothing.
pub fn score(a: &AudioFeatureVector, b: &AudioFeatureVector) -> u8 {
    let total = tempo_points(a.tempo_bpm, b.tempo_bpm)
        + key_points(a, b)
        + closeness_points(a.energy, b.energy, ENERGY_POINTS)
        + closeness_points(a.danceability, b.danceability, DANCEABILITY_POINTS)
        + closeness_points(a.valence, b.valence, VALENCE_POINTS)
        + closeness_points(a.acousticness, b.acousticness, ACOUSTICNESS_POINTS)
        + closeness_points(a.instrumentalness, b.instrumentalness, INSTRUMENTALNESS_POINTS);

    // strip float noise from the weighted differences so 4.5 rounds like 4.5
    let total = (total * 1e9).round() / 1e9;
    total.clamp(0.0, 100.0).round() as u8
}
