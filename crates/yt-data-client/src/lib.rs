pub mod models;

pub use models::*;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Default REST endpoint of the YouTube Data API
pub const DEFAULT_REST_API_ADDRESS: &str = "https://www.googleapis.com";

/// Largest page the playlistItems endpoint will serve
pub const MAX_RESULTS_PER_PAGE: u32 = 50;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("YouTube API returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("failed to decode {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        source: serde_json::Error,
    },
}

/// The calls the collector needs from the YouTube Data API
#[async_trait]
pub trait YouTubeApi: Send + Sync {
    /// One page of `playlistItems.list` (part=snippet, maxResults=50)
    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistItemListResponse, ApiError>;

    /// First page of `commentThreads.list` (part=snippet) for a video
    async fn list_comment_threads(
        &self,
        video_id: &str,
    ) -> Result<CommentThreadListResponse, ApiError>;
}

/// How requests are authenticated
#[derive(Debug, Clone)]
pub enum Auth {
    /// `key` query parameter
    ApiKey(String),
    /// OAuth access token sent as `Authorization: Bearer`
    Bearer(String),
}

pub struct YouTubeClient {
    http: reqwest::Client,
    base_url: String,
    auth: Auth,
}

impl YouTubeClient {
    pub fn new(base_url: impl Into<String>, auth: Auth) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            auth,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, resource: &str) -> String {
        format!(
            "{}/youtube/v3/{}",
            self.base_url.trim_end_matches('/'),
            resource
        )
    }

    async fn get<T: DeserializeOwned>(
        &self,
        resource: &'static str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(resource);
        debug!("GET {} {:?}", url, query);

        let request = self.http.get(&url).query(query);
        let request = match &self.auth {
            Auth::ApiKey(key) => request.query(&[("key", key.as_str())]),
            Auth::Bearer(token) => request.bearer_auth(token),
        };

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            endpoint: resource,
            source,
        })
    }
}

/// Pull `error.message` out of a Google API error body, falling back to the raw body
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(|message| message.as_str())
                .map(|message| message.to_string())
        })
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl YouTubeApi for YouTubeClient {
    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistItemListResponse, ApiError> {
        let max_results = MAX_RESULTS_PER_PAGE.to_string();
        let mut query = vec![
            ("part", "snippet"),
            ("maxResults", max_results.as_str()),
            ("playlistId", playlist_id),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        self.get("playlistItems", &query).await
    }

    async fn list_comment_threads(
        &self,
        video_id: &str,
    ) -> Result<CommentThreadListResponse, ApiError> {
        self.get("commentThreads", &[("part", "snippet"), ("videoId", video_id)])
            .await
    }
}
