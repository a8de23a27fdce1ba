use tabled::Table;

use crate::{
    analysis::{CatalogSource, TrackEnricher},
    error, success,
    types::{EnrichedTrack, FeatureTableRow, TrackRef},
    utils, warning,
};

pub async fn features(tracks: Vec<String>, playlist: Option<String>, json: bool) {
    let token = super::access_token().await;
    let catalog = super::catalog(&token);
    let enricher = TrackEnricher::new(super::feature_client(&token));

    let mut items: Vec<TrackRef> = Vec::new();

    if let Some(playlist_id) = &playlist {
        match catalog.playlist_tracks(playlist_id, 100).await {
            Ok(playlist_items) => items.extend(playlist_items),
            Err(e) => error!("Failed to load playlist {}: {}", playlist_id, e),
        }
    }

    let ids: Vec<String> = tracks
        .iter()
        .filter_map(|t| utils::extract_track_id(t))
        .collect();
    if !ids.is_empty() {
        match catalog.tracks_by_ids(&ids).await {
            Ok(summaries) => items.extend(summaries.into_iter().map(TrackRef::Summary)),
            Err(e) => {
                warning!("Cannot load track details, showing ids only: {}", e);
                items.extend(ids.into_iter().map(TrackRef::Uri));
            }
        }
    }

    if items.is_empty() {
        warning!("No tracks given. Pass track ids/URIs or --playlist.");
        return;
    }

    let pb = super::spinner("Fetching audio features...");
    let enriched = enricher.enrich(items).await;
    pb.finish_and_clear();

    if json {
        match serde_json::to_string_pretty(&enriched) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Cannot serialize results: {}", e),
        }
        return;
    }

    let analyzed = enriched.iter().filter(|t| t.features.is_some()).count();
    let rows: Vec<FeatureTableRow> = enriched.iter().map(table_row).collect();
    println!("{}", Table::new(rows));
    success!("Audio features found for {}/{} tracks.", analyzed, enriched.len());
}

fn table_row(track: &EnrichedTrack) -> FeatureTableRow {
    let (name, artists, duration) = match (&track.item, track.item.summary()) {
        (_, Some(summary)) => (
            summary.name.clone(),
            summary.artist_line(),
            utils::format_duration(summary.duration_ms),
        ),
        (TrackRef::Uri(uri), None) => (uri.clone(), "-".to_string(), "-".to_string()),
        _ => ("(unavailable)".to_string(), "-".to_string(), "-".to_string()),
    };

    let badges = track.features.as_ref();
    FeatureTableRow {
        name,
        artists,
        duration,
        bpm: badges
            .and_then(|b| b.bpm)
            .map(|b| b.to_string())
            .unwrap_or_else(|| "-".to_string()),
        key: badges
            .map(|b| b.key.clone())
            .unwrap_or_else(|| "-".to_string()),
        camelot: badges
            .and_then(|b| b.camelot.clone())
            .unwrap_or_else(|| "-".to_string()),
        energy: utils::format_unit(badges.and_then(|b| b.energy)),
        valence: utils::format_unit(badges.and_then(|b| b.valence)),
    }
}
