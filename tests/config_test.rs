use std::time::Duration;

use trackmatch::{
    config::{self, FeatureProvider},
    features::FetchPolicy,
};

#[test]
fn test_feature_provider_from_str() {
    assert_eq!(
        "reccobeats".parse::<FeatureProvider>(),
        Ok(FeatureProvider::ReccoBeats)
    );
    assert_eq!(
        " Spotify ".parse::<FeatureProvider>(),
        Ok(FeatureProvider::Spotify)
    );
    assert!("lastfm".parse::<FeatureProvider>().is_err());
    assert_eq!(FeatureProvider::default(), FeatureProvider::ReccoBeats);
}

// All environment mutations live in this one test so parallel tests never race on them.
#[test]
fn test_settings_from_environment() {
    unsafe {
        std::env::remove_var("FEATURE_PROVIDER");
        std::env::set_var("RECCOBEATS_API_URL", " https://recco.example/v2/ ");
        std::env::set_var("FEATURE_BATCH_SIZE", "0");
        std::env::set_var("FEATURE_BATCH_DELAY_MS", "1000");
        std::env::set_var("FEATURE_MAX_RETRIES", "five");
        std::env::remove_var("FEATURE_RETRY_DELAY_MS");
    }

    assert_eq!(config::feature_provider(), Ok(FeatureProvider::ReccoBeats));
    assert_eq!(config::reccobeats_apiurl(), "https://recco.example/v2");

    let policy = FetchPolicy::from_env();
    assert_eq!(policy.max_batch_size, 40);
    assert_eq!(policy.batch_delay, Duration::from_millis(1000));
    assert_eq!(policy.max_retries, 2);
    assert_eq!(policy.retry_delay, Duration::from_millis(500));

    unsafe {
        std::env::set_var("FEATURE_PROVIDER", "SPOTIFY");
        std::env::set_var("FEATURE_BATCH_SIZE", "10");
    }
    assert_eq!(config::feature_provider(), Ok(FeatureProvider::Spotify));
    assert_eq!(FetchPolicy::from_env().max_batch_size, 10);

    unsafe {
        std::env::set_var("FEATURE_PROVIDER", "lastfm");
    }
    assert!(config::feature_provider().is_err());
}
