use std::path::{Path, PathBuf};

use chrono::Utc;
use reqwest::Client;

use crate::{config, types::Token, warning};

/// Seconds before expiry at which a token is already treated as expired.
const EXPIRY_MARGIN: u64 = 240;

/// Provides a usable Spotify access token.
///
/// Tokens are obtained elsewhere; this manager reads the cached token (or
/// `SPOTIFY_ACCESS_TOKEN`), refreshes it once expired and writes the refreshed
/// token back to the cache.
pub struct TokenManager {
    token: Token,
    cached: bool,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        TokenManager {
            token,
            cached: true,
        }
    }

    pub async fn load() -> Result<Self, String> {
        if let Some(access_token) = config::spotify_access_token() {
            return Ok(Self {
                token: Token {
                    access_token,
                    refresh_token: String::new(),
                    scope: String::new(),
                    expires_in: 3600,
                    obtained_at: Utc::now().timestamp() as u64,
                },
                cached: false,
            });
        }

        let path = Self::token_path();
        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|e| format!("{} ({})", e, path.display()))?;
        let token: Token = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        Ok(Self::new(token))
    }

    pub async fn persist(&self) -> Result<(), String> {
        self.persist_to(&Self::token_path()).await
    }

    /// Writes the current token as JSON to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file cannot
    /// be written.
    pub async fn persist_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(&self.token).map_err(|e| e.to_string())?;
        async_fs::write(path, json).await.map_err(|e| e.to_string())
    }

    pub async fn get_valid_token(&mut self) -> String {
        if self.cached && self.is_expired() && !self.token.refresh_token.is_empty() {
            match self.refresh_token().await {
                Ok(new_token) => {
                    self.token = new_token;
                    if let Err(e) = self.persist().await {
                        warning!("Failed to cache refreshed access token: {}", e);
                    }
                }
                Err(e) => warning!("Failed to refresh access token: {}", e),
            }
        }

        self.token.access_token.clone()
    }

    fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now + EXPIRY_MARGIN >= self.token.obtained_at + self.token.expires_in
    }

    async fn refresh_token(&self) -> Result<Token, String> {
        let client_id = config::spotify_client_id()?;
        let client = Client::new();
        let res = client
            .post(config::spotify_apitoken_url())
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", self.token.refresh_token.as_str()),
                ("client_id", client_id.as_str()),
            ])
            .send()
            .await
            .map_err(|e| e.to_string())?
            .error_for_status()
            .map_err(|e| e.to_string())?;

        let json: serde_json::Value = res.json().await.map_err(|e| e.to_string())?;
        let access_token = json["access_token"]
            .as_str()
            .ok_or_else(|| "token response without access_token".to_string())?;

        Ok(Token {
            access_token: access_token.to_string(),
            // Spotify only sometimes rotates the refresh token
            refresh_token: json["refresh_token"]
                .as_str()
                .unwrap_or(&self.token.refresh_token)
                .to_string(),
            scope: json["scope"].as_str().unwrap_or_default().to_string(),
            expires_in: json["expires_in"].as_i64().unwrap_or(3600) as u64,
            obtained_at: Utc::now().timestamp() as u64,
        })
    }

    fn token_path() -> PathBuf {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("trackmatch/cache/token.json");
        path
    }
}
