use std::path::PathBuf;
use yt_data_client::ApiError;
use yt_oauth::OAuthError;

#[derive(Debug, thiserror::Error)]
pub enum CollectorError {
    #[error("YouTube API error: {0}")]
    Api(#[from] ApiError),

    #[error("malformed playlist item at index {index}: missing {field}")]
    MalformedItem { index: usize, field: &'static str },

    #[error("first page of playlist {0} has no pageInfo.totalResults")]
    MissingTotalResults(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize records for '{}': {source}", .path.display())]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to parse '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("authorization failed: {0}")]
    OAuth(#[from] OAuthError),

    #[error("failed to read API key file '{}': {source}", .path.display())]
    ApiKey {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("API key file '{}' is empty", .0.display())]
    EmptyApiKey(PathBuf),
}
