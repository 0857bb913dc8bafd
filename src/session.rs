use crate::config::SessionConfig;
use crate::error::SessionError;
use std::path::Path;
use tracing::info;
use yt_data_client::{Auth, YouTubeClient};
use yt_oauth::OAuthManager;

/// An authenticated handle to the YouTube Data API
pub struct Session {
    client: YouTubeClient,
}

impl Session {
    /// Authorize with OAuth.
    ///
    /// Reuses or refreshes the stored credentials and runs the browser consent
    /// flow when they are missing or no longer accepted. The client secret is
    /// only read when a refresh or the consent flow needs it. Failure is fatal
    /// to the run.
    pub async fn authorize(config: &SessionConfig) -> Result<Self, SessionError> {
        let mut manager =
            OAuthManager::new(&config.client_secret_path, &config.credentials_path);

        let access_token = manager.authorize().await?;
        info!("Successfully retrieved credentials");

        Ok(Self {
            client: YouTubeClient::new(
                config.rest_api_address.clone(),
                Auth::Bearer(access_token),
            ),
        })
    }

    /// Authenticate with an API key read from `api_key_path`
    pub fn from_api_key(config: &SessionConfig, api_key_path: &Path) -> Result<Self, SessionError> {
        info!("Reading API key from: {}", api_key_path.display());
        let key = std::fs::read_to_string(api_key_path)
            .map_err(|source| SessionError::ApiKey {
                path: api_key_path.to_path_buf(),
                source,
            })?
            .trim()
            .to_string();

        if key.is_empty() {
            return Err(SessionError::EmptyApiKey(api_key_path.to_path_buf()));
        }

        Ok(Self {
            client: YouTubeClient::new(config.rest_api_address.clone(), Auth::ApiKey(key)),
        })
    }

    pub fn client(&self) -> &YouTubeClient {
        &self.client
    }
}
