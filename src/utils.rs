use crate::{analysis::SimilarityFilter, types::Mode};

const TRACK_URI_PREFIX: &str = "spotify:track:";
const TRACK_URL_MARKER: &str = "open.spotify.com/track/";

/// Clamps a normalized audio feature into `[0, 1]`; non-finite values are dropped.
pub fn clamp_unit(value: f64) -> Option<f64> {
    if value.is_finite() {
        Some(value.clamp(0.0, 1.0))
    } else {
        None
    }
}

/// Extracts a bare catalog track id from an id, a `spotify:track:` URI or an
/// `open.spotify.com/track/` URL.
pub fn extract_track_id(reference: &str) -> Option<String> {
    let reference = reference.trim();

    let id = if let Some(rest) = reference.strip_prefix(TRACK_URI_PREFIX) {
        rest
    } else if let Some(pos) = reference.find(TRACK_URL_MARKER) {
        let rest = &reference[pos + TRACK_URL_MARKER.len()..];
        rest.split(['?', '/', '#']).next().unwrap_or_default()
    } else {
        reference
    };

    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

pub fn to_catalog_uri(id: &str, kind: &str) -> String {
    format!("spotify:{kind}:{id}")
}

/// Formats a duration in milliseconds as `M:SS`.
pub fn format_duration(ms: u64) -> String {
    if ms == 0 {
        return "0:00".to_string();
    }

    let total_seconds = (ms as f64 / 1000.0).round() as u64;
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

pub fn format_unit(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string())
}

/// Splits `ids` into comma-joined query values of at most `size` ids.
pub fn chunk_ids(ids: &[String], size: usize) -> Vec<String> {
    ids.chunks(size.max(1)).map(|chunk| chunk.join(",")).collect()
}

/// Parses `major`/`minor` (or `1`/`0`) for the command line.
pub fn parse_mode(s: &str) -> Result<Mode, String> {
    match s.trim().to_lowercase().as_str() {
        "major" | "maj" | "1" => Ok(Mode::Major),
        "minor" | "min" | "0" => Ok(Mode::Minor),
        other => Err(format!("invalid mode '{}': expected major or minor", other)),
    }
}

pub fn parse_filter(s: &str) -> Result<SimilarityFilter, String> {
    match s.trim().to_lowercase().as_str() {
        "all" => Ok(SimilarityFilter::All),
        "bpm" => Ok(SimilarityFilter::Bpm),
        "key" => Ok(SimilarityFilter::Key),
        other => Err(format!("invalid filter '{}': expected all, bpm or key", other)),
    }
}
