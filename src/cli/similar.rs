use std::sync::Arc;

use tabled::Table;

use crate::{
    analysis::{CandidatePool, RecommendationEngine, SimilarityFilter},
    error, info, success,
    types::{FeatureBadges, RecommendationTargets, ScoredCandidate, SimilarTableRow, TrackRef},
    utils, warning,
};

#[derive(Debug, Clone, Default)]
pub struct SimilarRequest {
    pub track: String,
    pub limit: usize,
    pub pool_size: usize,
    pub candidates: Vec<String>,
    pub playlist: Option<String>,
    pub search: Option<String>,
    pub filter: SimilarityFilter,
    pub targets: RecommendationTargets,
    pub json: bool,
}

pub async fn similar(request: SimilarRequest) {
    let Some(seed_id) = utils::extract_track_id(&request.track) else {
        error!("Invalid track reference: {}", request.track);
    };

    let token = super::access_token().await;
    let catalog = Arc::new(super::catalog(&token));
    let engine = RecommendationEngine::new(super::feature_client(&token), catalog.clone());

    let pool = if !request.candidates.is_empty() {
        CandidatePool::Ids(
            request
                .candidates
                .iter()
                .filter_map(|c| utils::extract_track_id(c))
                .collect(),
        )
    } else if let Some(playlist_id) = &request.playlist {
        match catalog.playlist_tracks(playlist_id, 100).await {
            Ok(items) => CandidatePool::Supplied(
                items
                    .iter()
                    .filter_map(TrackRef::summary)
                    .cloned()
                    .collect(),
            ),
            Err(e) => error!("Failed to load playlist {}: {}", playlist_id, e),
        }
    } else if let Some(query) = &request.search {
        match catalog.search_tracks(query, request.pool_size).await {
            Ok(tracks) => CandidatePool::Supplied(tracks),
            Err(e) => error!("Search for \"{}\" failed: {}", query, e),
        }
    } else {
        CandidatePool::Recommended {
            size: request.pool_size,
            targets: request.targets.clone(),
        }
    };

    let pb = super::spinner("Scoring candidates against seed track...");
    let report = match engine.similar_to_seed(&seed_id, pool, request.limit).await {
        Ok(report) => report,
        Err(e) => {
            pb.finish_and_clear();
            error!("{}", e);
        }
    };
    pb.finish_and_clear();

    let candidates = request.filter.apply(&report.seed, report.candidates);

    if request.json {
        match serde_json::to_string_pretty(&candidates) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Cannot serialize results: {}", e),
        }
        return;
    }

    let seed_badges = FeatureBadges::from(&report.seed);
    info!(
        "Seed {}: {} bpm, {} ({})",
        seed_id,
        seed_badges
            .bpm
            .map(|b| b.to_string())
            .unwrap_or_else(|| "?".to_string()),
        seed_badges.key,
        seed_badges.camelot.as_deref().unwrap_or("-")
    );

    if candidates.is_empty() {
        warning!("No similar tracks found.");
        return;
    }

    let rows: Vec<SimilarTableRow> = candidates.iter().map(table_row).collect();
    println!("{}", Table::new(rows));
    success!("Ranked {} similar tracks.", candidates.len());
}

fn table_row(candidate: &ScoredCandidate) -> SimilarTableRow {
    let badges = candidate
        .features
        .as_ref()
        .map(FeatureBadges::from);

    SimilarTableRow {
        score: candidate.similarity_score,
        name: candidate.track.name.clone(),
        artists: candidate.track.artist_line(),
        bpm: badges
            .as_ref()
            .and_then(|b| b.bpm)
            .map(|b| b.to_string())
            .unwrap_or_else(|| "-".to_string()),
        key: badges
            .as_ref()
            .map(|b| b.key.clone())
            .unwrap_or_else(|| "-".to_string()),
        camelot: badges
            .as_ref()
            .and_then(|b| b.camelot.clone())
            .unwrap_or_else(|| "-".to_string()),
        energy: utils::format_unit(candidate.features.as_ref().and_then(|f| f.energy)),
    }
}
