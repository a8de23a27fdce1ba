mod common;

use std::sync::Arc;

use common::{MockCatalog, MockFeatureSource, client, features, full_features, track};
use trackmatch::{
    analysis::{CandidatePool, RecommendationEngine, SimilarityFilter},
    error::AnalysisError,
    types::{AudioFeatureVector, Mode, RecommendationTargets, ScoredCandidate},
};

// Helper function to wire an engine over mocks that the test keeps handles to
fn engine(source: &Arc<MockFeatureSource>, catalog: &Arc<MockCatalog>) -> RecommendationEngine {
    RecommendationEngine::new(client(source.clone()), catalog.clone())
}

fn seed() -> AudioFeatureVector {
    features("seed", 120.0, 0, Mode::Major, 0.8)
}

fn ranked_ids(candidates: &[ScoredCandidate]) -> Vec<&str> {
    candidates.iter().map(|c| c.track.id.as_str()).collect()
}

fn scores(candidates: &[ScoredCandidate]) -> Vec<u8> {
    candidates.iter().map(|c| c.similarity_score).collect()
}

#[tokio::test]
async fn test_ranks_candidates_by_similarity() {
    let source = Arc::new(MockFeatureSource::with_features(vec![
        seed(),
        features("a", 122.0, 0, Mode::Major, 0.8),
        features("b", 160.0, 1, Mode::Major, 0.1),
    ]));
    let catalog = Arc::new(MockCatalog::default());

    let result = engine(&source, &catalog)
        .find_similar(
            "seed",
            CandidatePool::Supplied(vec![track("b"), track("a")]),
            10,
        )
        .await
        .unwrap();

    assert_eq!(ranked_ids(&result), vec!["a", "b"]);
    assert_eq!(scores(&result), vec![70, 5]);
    assert_eq!(result[0].track, track("a"));
    assert!(result[0].features.is_some());
}

#[tokio::test]
async fn test_seed_without_features_fails() {
    let source = Arc::new(MockFeatureSource::with_features(vec![features(
        "a", 122.0, 0, Mode::Major, 0.8,
    )]));
    let catalog = Arc::new(MockCatalog::recommending(vec![track("a")]));

    let result = engine(&source, &catalog)
        .find_similar("seed", CandidatePool::default(), 10)
        .await;

    match result {
        Err(AnalysisError::SeedFeaturesUnavailable { track_id, reason }) => {
            assert_eq!(track_id, "seed");
            assert!(reason.contains("no audio features"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
    // the pool is never requested for an unusable seed
    assert!(catalog.recommend_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_seed_provider_failure_fails() {
    let source = Arc::new(MockFeatureSource::failing());
    let catalog = Arc::new(MockCatalog::default());

    let result = engine(&source, &catalog)
        .find_similar("seed", CandidatePool::Supplied(vec![track("a")]), 10)
        .await;

    assert!(matches!(
        result,
        Err(AnalysisError::SeedFeaturesUnavailable { .. })
    ));
}

#[tokio::test]
async fn test_candidates_without_features_score_zero() {
    let mut source = MockFeatureSource::with_features(vec![seed()]);
    source.failing_ids.insert("a".to_string());
    let source = Arc::new(source);
    let catalog = Arc::new(MockCatalog::default());

    let result = engine(&source, &catalog)
        .find_similar(
            "seed",
            CandidatePool::Supplied(vec![track("c"), track("a"), track("b")]),
            10,
        )
        .await
        .unwrap();

    assert_eq!(ranked_ids(&result), vec!["c", "a", "b"]);
    assert_eq!(scores(&result), vec![0, 0, 0]);
    assert!(result.iter().all(|c| c.features.is_none()));
}

#[tokio::test]
async fn test_recommended_pool_uses_defaults() {
    let source = Arc::new(MockFeatureSource::with_features(vec![
        seed(),
        features("a", 121.0, 0, Mode::Major, 0.8),
    ]));
    let catalog = Arc::new(MockCatalog::recommending(vec![track("a"), track("z")]));

    let result = engine(&source, &catalog)
        .find_similar("seed", CandidatePool::default(), 20)
        .await
        .unwrap();

    assert_eq!(
        *catalog.recommend_calls.lock().unwrap(),
        vec![("seed".to_string(), 20, RecommendationTargets::default())]
    );
    assert_eq!(ranked_ids(&result), vec!["a", "z"]);
    assert_eq!(scores(&result), vec![70, 0]);
}

#[tokio::test]
async fn test_recommended_pool_forwards_targets() {
    let source = Arc::new(MockFeatureSource::with_features(vec![seed()]));
    let catalog = Arc::new(MockCatalog::recommending(Vec::new()));
    let targets = RecommendationTargets {
        key: Some(9),
        tempo: Some(124.0),
        ..Default::default()
    };

    let result = engine(&source, &catalog)
        .find_similar(
            "seed",
            CandidatePool::Recommended {
                size: 50,
                targets: targets.clone(),
            },
            20,
        )
        .await
        .unwrap();

    assert!(result.is_empty());
    assert_eq!(
        *catalog.recommend_calls.lock().unwrap(),
        vec![("seed".to_string(), 50, targets)]
    );
}

#[tokio::test]
async fn test_id_pool_is_hydrated_from_catalog() {
    let source = Arc::new(MockFeatureSource::with_features(vec![
        seed(),
        features("a", 120.0, 0, Mode::Major, 0.8),
        features("b", 125.0, 0, Mode::Major, 0.8),
    ]));
    let catalog = Arc::new(MockCatalog::knowing(vec![track("a"), track("b")]));

    let result = engine(&source, &catalog)
        .find_similar(
            "seed",
            CandidatePool::Ids(vec!["b".to_string(), "a".to_string()]),
            10,
        )
        .await
        .unwrap();

    assert_eq!(
        *catalog.lookup_calls.lock().unwrap(),
        vec![vec!["b".to_string(), "a".to_string()]]
    );
    assert_eq!(ranked_ids(&result), vec!["b", "a"]);
    assert_eq!(result[0].track.name, "Track b");
}

#[tokio::test]
async fn test_empty_id_pool() {
    let source = Arc::new(MockFeatureSource::with_features(vec![seed()]));
    let catalog = Arc::new(MockCatalog::default());

    let result = engine(&source, &catalog)
        .find_similar("seed", CandidatePool::Ids(Vec::new()), 10)
        .await
        .unwrap();

    assert!(result.is_empty());
    assert!(catalog.lookup_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_limit_truncates_and_ties_keep_pool_order() {
    let seed = full_features("seed", 120.0, 0, Mode::Major, 0.5);
    let source = Arc::new(MockFeatureSource::with_features(vec![
        seed.clone(),
        full_features("c1", 130.0, 0, Mode::Major, 0.5),
        full_features("c2", 130.0, 0, Mode::Major, 0.5),
        full_features("c3", 120.0, 0, Mode::Major, 0.5),
        full_features("c4", 130.0, 0, Mode::Major, 0.5),
    ]));
    let catalog = Arc::new(MockCatalog::default());
    let pool = CandidatePool::Supplied(vec![track("c1"), track("c2"), track("c3"), track("c4")]);

    let result = engine(&source, &catalog)
        .find_similar("seed", pool, 3)
        .await
        .unwrap();

    assert_eq!(ranked_ids(&result), vec!["c3", "c1", "c2"]);
    assert_eq!(scores(&result), vec![100, 90, 90]);
}

#[tokio::test]
async fn test_zero_limit() {
    let source = Arc::new(MockFeatureSource::with_features(vec![seed()]));
    let catalog = Arc::new(MockCatalog::default());

    let result = engine(&source, &catalog)
        .find_similar("seed", CandidatePool::Supplied(vec![track("a")]), 0)
        .await
        .unwrap();

    assert!(result.is_empty());
}

#[tokio::test]
async fn test_catalog_failure_is_upstream() {
    let source = Arc::new(MockFeatureSource::with_features(vec![seed()]));
    let catalog = Arc::new(MockCatalog {
        fail: true,
        ..Default::default()
    });

    let result = engine(&source, &catalog)
        .find_similar("seed", CandidatePool::default(), 10)
        .await;

    assert!(matches!(result, Err(AnalysisError::Upstream { .. })));
}

#[tokio::test]
async fn test_report_carries_seed_features() {
    let source = Arc::new(MockFeatureSource::with_features(vec![seed()]));
    let catalog = Arc::new(MockCatalog::default());

    let report = engine(&source, &catalog)
        .similar_to_seed("seed", CandidatePool::Supplied(Vec::new()), 10)
        .await
        .unwrap();

    assert_eq!(report.seed, seed());
    assert!(report.candidates.is_empty());
}

#[test]
fn test_bpm_filter() {
    let seed = seed();
    let candidate = |id: &str, features: Option<AudioFeatureVector>| ScoredCandidate {
        track: track(id),
        features,
        similarity_score: 50,
    };
    let candidates = vec![
        candidate("near", Some(features("near", 124.0, 3, Mode::Minor, 0.2))),
        candidate("far", Some(features("far", 126.0, 0, Mode::Major, 0.8))),
        candidate("unknown", None),
        // compared as displayed: 124.6 shows as 125, 125.6 as 126
        candidate("rounds-in", Some(features("rounds-in", 124.6, 0, Mode::Major, 0.8))),
        candidate("rounds-out", Some(features("rounds-out", 125.6, 0, Mode::Major, 0.8))),
        candidate("slower", Some(features("slower", 115.4, 0, Mode::Major, 0.8))),
    ];

    let kept = SimilarityFilter::Bpm.apply(&seed, candidates.clone());
    assert_eq!(ranked_ids(&kept), vec!["near", "rounds-in", "slower"]);

    let all = SimilarityFilter::All.apply(&seed, candidates);
    assert_eq!(all.len(), 6);
}

#[test]
fn test_key_filter() {
    let seed = seed();
    let candidate = |id: &str, pitch_class: u8, mode: Mode| ScoredCandidate {
        track: track(id),
        features: Some(features(id, 90.0, pitch_class, mode, 0.1)),
        similarity_score: 10,
    };
    let candidates = vec![
        candidate("same", 0, Mode::Major),
        candidate("relative", 9, Mode::Minor),
        candidate("parallel", 0, Mode::Minor),
    ];

    let kept = SimilarityFilter::Key.apply(&seed, candidates);
    assert_eq!(ranked_ids(&kept), vec!["same"]);
}
