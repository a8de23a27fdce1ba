//! Configuration management for trackmatch.
//!
//! Configuration comes from environment variables, optionally seeded from a
//! `.env` file in the local data directory:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults
//!
//! Only the Spotify client id has no default; it is needed solely to refresh
//! a cached access token.

use std::{env, path::PathBuf, str::FromStr};

const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_SPOTIFY_API_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_RECCOBEATS_API_URL: &str = "https://api.reccobeats.com/v1";

/// Which service answers audio-feature lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeatureProvider {
    #[default]
    ReccoBeats,
    Spotify,
}

impl FromStr for FeatureProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reccobeats" => Ok(FeatureProvider::ReccoBeats),
            "spotify" => Ok(FeatureProvider::Spotify),
            other => Err(format!("unknown feature provider: {}", other)),
        }
    }
}

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The file lives under `trackmatch/.env` in the platform-specific local data
/// directory:
/// - Linux: `~/.local/share/trackmatch/.env`
/// - macOS: `~/Library/Application Support/trackmatch/.env`
/// - Windows: `%LOCALAPPDATA%/trackmatch/.env`
///
/// A missing file is fine; variables already set in the environment are never
/// overridden.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or an existing `.env`
/// file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| e.to_string())
}

fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("trackmatch/.env");
    path
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|v| v.trim().trim_end_matches('/').to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Returns the base URL of the Spotify Web API.
///
/// Reads `SPOTIFY_API_URL`, trimming whitespace and any trailing slash so
/// endpoint paths can be appended directly.
///
/// # Returns
///
/// The configured URL, or `https://api.spotify.com/v1` when unset or empty.
///
/// # Example
///
/// ```
/// let url = format!("{}/tracks", spotify_apiurl());
/// ```
pub fn spotify_apiurl() -> String {
    var_or("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL)
}

/// Returns the Spotify token endpoint used to refresh access tokens.
///
/// Reads `SPOTIFY_API_TOKEN_URL`.
///
/// # Returns
///
/// The configured URL, or `https://accounts.spotify.com/api/token` when unset
/// or empty.
pub fn spotify_apitoken_url() -> String {
    var_or("SPOTIFY_API_TOKEN_URL", DEFAULT_SPOTIFY_API_TOKEN_URL)
}

/// Returns the Spotify application client id.
///
/// Retrieves `SPOTIFY_API_AUTH_CLIENT_ID`, the id obtained when registering
/// the application with Spotify's developer platform. It is only needed to
/// refresh a cached access token.
///
/// # Errors
///
/// Returns an error message if `SPOTIFY_API_AUTH_CLIENT_ID` is not set.
///
/// # Example
///
/// ```
/// let client_id = spotify_client_id()?; // e.g., "abc123..."
/// ```
pub fn spotify_client_id() -> Result<String, String> {
    env::var("SPOTIFY_API_AUTH_CLIENT_ID")
        .map_err(|_| "SPOTIFY_API_AUTH_CLIENT_ID must be set".to_string())
}

/// Returns an access token supplied through the environment.
///
/// When `SPOTIFY_ACCESS_TOKEN` is set, the token cache is bypassed and the
/// token is used as-is without refreshing.
///
/// # Returns
///
/// `Some(token)` if the variable is set and not blank, `None` otherwise.
pub fn spotify_access_token() -> Option<String> {
    env::var("SPOTIFY_ACCESS_TOKEN")
        .ok()
        .filter(|t| !t.trim().is_empty())
}

/// Returns the base URL of the ReccoBeats API.
///
/// Reads `RECCOBEATS_API_URL`, trimming whitespace and any trailing slash.
///
/// # Returns
///
/// The configured URL, or `https://api.reccobeats.com/v1` when unset or empty.
pub fn reccobeats_apiurl() -> String {
    var_or("RECCOBEATS_API_URL", DEFAULT_RECCOBEATS_API_URL)
}

/// Returns the provider that answers audio-feature lookups.
///
/// Reads `FEATURE_PROVIDER` (`reccobeats` or `spotify`, case-insensitive).
///
/// # Returns
///
/// The configured provider, or [`FeatureProvider::ReccoBeats`] when the
/// variable is unset or blank.
///
/// # Errors
///
/// Returns an error message if the variable names an unknown provider.
///
/// # Example
///
/// ```
/// match feature_provider()? {
///     FeatureProvider::ReccoBeats => { /* no token needed for features */ }
///     FeatureProvider::Spotify => { /* bearer token required */ }
/// }
/// ```
pub fn feature_provider() -> Result<FeatureProvider, String> {
    match env::var("FEATURE_PROVIDER") {
        Ok(value) if !value.trim().is_empty() => value.parse(),
        _ => Ok(FeatureProvider::default()),
    }
}
