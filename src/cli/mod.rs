//! # CLI Module
//!
//! User-facing commands of trackmatch. Each command resolves its providers
//! from the configuration, delegates to the analysis layer and renders the
//! result as a table or JSON.
//!
//! ## Commands
//!
//! - [`similar`] - Rank tracks that sound like a seed track
//! - [`features`] - Show BPM, key and mood badges for tracks or a playlist
//! - [`key`] - Key name, Camelot code and compatibility of two keys
//!
//! ## Providers
//!
//! Audio features come from ReccoBeats unless `FEATURE_PROVIDER=spotify` is
//! set. The catalog (recommendations, track lookup, search, playlists) is
//! always Spotify and needs an access token, see
//! [`crate::management::TokenManager`].
//!
//! ## Usage Patterns
//!
//! ```bash
//! trackmatch similar spotify:track:4uLU6hMCjMI75M1A2tKUQC --limit 10
//! trackmatch similar 4uLU6hMCjMI75M1A2tKUQC --playlist 37i9dQZF1DXcBWIGoYBM5M --filter key
//! trackmatch features --playlist 37i9dQZF1DXcBWIGoYBM5M
//! trackmatch key 9 minor --with-key 0 --with-mode major
//! ```

mod features;
mod key;
mod similar;

use std::{sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    config::{self, FeatureProvider},
    error,
    features::{FeatureClient, FeatureSource, FetchPolicy},
    management::TokenManager,
    reccobeats::ReccoBeatsFeatureSource,
    spotify::{SpotifyCatalog, SpotifyFeatureSource},
};

pub use features::features;
pub use key::key;
pub use similar::{SimilarRequest, similar};

async fn access_token() -> String {
    let mut token_mgr = match TokenManager::load().await {
        Ok(t) => t,
        Err(e) => {
            error!(
                "Failed to load Spotify access token. Set SPOTIFY_ACCESS_TOKEN or cache a token first.\n Error: {}",
                e
            );
        }
    };

    token_mgr.get_valid_token().await
}

fn feature_client(token: &str) -> FeatureClient {
    let provider = match config::feature_provider() {
        Ok(p) => p,
        Err(e) => error!("Invalid configuration: {}", e),
    };

    let source: Arc<dyn FeatureSource> = match provider {
        FeatureProvider::ReccoBeats => Arc::new(ReccoBeatsFeatureSource::from_env()),
        FeatureProvider::Spotify => Arc::new(SpotifyFeatureSource::from_env(token)),
    };

    FeatureClient::new(source, FetchPolicy::from_env())
}

fn catalog(token: &str) -> SpotifyCatalog {
    SpotifyCatalog::from_env(token)
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
