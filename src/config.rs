use std::path::PathBuf;
use yt_data_client::DEFAULT_REST_API_ADDRESS;

/// Credential store written after the first authorization
pub const DEFAULT_CREDENTIALS_PATH: &str = "credentials.json";

/// Client secret descriptor downloaded from the Google Cloud console
pub const DEFAULT_CLIENT_SECRET_PATH: &str = "client_secret_file.json";

/// Environment variable overriding the REST endpoint (e.g. a local mock)
pub const REST_API_ADDRESS_ENV: &str = "REST_API_ADDRESS";

/// Where the session finds its credentials and which endpoint it talks to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub credentials_path: PathBuf,
    pub client_secret_path: PathBuf,
    pub rest_api_address: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_PATH),
            client_secret_path: PathBuf::from(DEFAULT_CLIENT_SECRET_PATH),
            rest_api_address: DEFAULT_REST_API_ADDRESS.to_string(),
        }
    }
}

impl SessionConfig {
    /// Defaults with the endpoint taken from `REST_API_ADDRESS` when set
    pub fn from_env() -> Self {
        Self {
            rest_api_address: rest_api_address(std::env::var(REST_API_ADDRESS_ENV).ok()),
            ..Self::default()
        }
    }
}

fn rest_api_address(from_env: Option<String>) -> String {
    from_env
        .map(|address| address.trim().to_string())
        .filter(|address| !address.is_empty())
        .unwrap_or_else(|| DEFAULT_REST_API_ADDRESS.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_conventional_files() {
        let config = SessionConfig::default();
        assert_eq!(config.credentials_path, PathBuf::from("credentials.json"));
        assert_eq!(config.client_secret_path, PathBuf::from("client_secret_file.json"));
        assert_eq!(config.rest_api_address, "https://www.googleapis.com");
    }

    #[test]
    fn blank_override_falls_back_to_default_endpoint() {
        assert_eq!(rest_api_address(None), DEFAULT_REST_API_ADDRESS);
        assert_eq!(rest_api_address(Some("  ".to_string())), DEFAULT_REST_API_ADDRESS);
        assert_eq!(
            rest_api_address(Some("http://localhost:8080".to_string())),
            "http://localhost:8080"
        );
    }
}
