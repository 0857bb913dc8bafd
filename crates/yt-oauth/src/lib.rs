use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// Default OAuth callback port
pub const OAUTH_CALLBACK_PORT: u16 = 8080;

/// Seconds to wait for the user to finish the consent screen
pub const AUTHORIZATION_TIMEOUT_SECS: u64 = 300;

pub const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Scopes requested for playlist and comment access
pub const YOUTUBE_SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/youtube.readonly",
    "https://www.googleapis.com/auth/youtube.force-ssl",
];

#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    #[error("failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("client secret file '{}' has neither an 'installed' nor a 'web' section", .0.display())]
    MissingClientSection(PathBuf),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("token endpoint rejected the request (status {status}): {body}")]
    TokenEndpoint { status: u16, body: String },

    #[error("missing {0} in token response")]
    MissingField(&'static str),

    #[error("authorization was denied: {0}")]
    Denied(String),

    #[error("OAuth authorization timeout ({0} seconds)")]
    Timeout(u64),

    #[error("callback server failed: {0}")]
    CallbackServer(std::io::Error),

    #[error("failed to serialize token: {0}")]
    Serialize(serde_json::Error),
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// OAuth 2.0 token information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthToken {
    /// Access token for API requests
    pub access_token: String,
    /// Refresh token for getting new access tokens
    pub refresh_token: String,
    /// Token type (usually "Bearer")
    pub token_type: String,
    /// Expiry time as Unix timestamp (seconds since epoch)
    pub expires_at: u64,
}

impl OAuthToken {
    /// Check if the token is expired or will expire soon (within 60 seconds)
    pub fn is_expired(&self) -> bool {
        now_secs() + 60 >= self.expires_at
    }

    /// Load token from the credential store
    pub fn load_from_file(path: &Path) -> Result<Self, OAuthError> {
        let content = std::fs::read_to_string(path).map_err(|source| OAuthError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| OAuthError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save token to the credential store with secure permissions
    pub fn save_to_file(&self, path: &Path) -> Result<(), OAuthError> {
        let content = serde_json::to_string_pretty(self).map_err(OAuthError::Serialize)?;

        std::fs::write(path, content).map_err(|source| OAuthError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        // Owner read/write only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(path, permissions).map_err(|source| OAuthError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }

        Ok(())
    }
}

/// Client credentials as downloaded from the Google Cloud console
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecret {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Deserialize)]
struct ClientSecretFile {
    installed: Option<ClientSecret>,
    web: Option<ClientSecret>,
}

impl ClientSecret {
    /// Load the client secret descriptor, accepting both "installed" and "web" applications
    pub fn load_from_file(path: &Path) -> Result<Self, OAuthError> {
        let content = std::fs::read_to_string(path).map_err(|source| OAuthError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ClientSecretFile =
            serde_json::from_str(&content).map_err(|source| OAuthError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        file.installed
            .or(file.web)
            .ok_or_else(|| OAuthError::MissingClientSection(path.to_path_buf()))
    }
}

/// OAuth configuration
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// Redirect URI for OAuth callback
    pub redirect_uri: String,
    /// OAuth scopes
    pub scopes: Vec<String>,
    pub auth_uri: String,
    pub token_uri: String,
}

impl OAuthConfig {
    /// Create new OAuth configuration with YouTube defaults
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            client_id,
            client_secret,
            redirect_uri: format!("http://localhost:{}/oauth2callback", OAUTH_CALLBACK_PORT),
            scopes: YOUTUBE_SCOPES.iter().map(|s| s.to_string()).collect(),
            auth_uri: default_auth_uri(),
            token_uri: default_token_uri(),
        }
    }

    pub fn from_client_secret(secret: ClientSecret) -> Self {
        Self {
            auth_uri: secret.auth_uri,
            token_uri: secret.token_uri,
            ..Self::new(secret.client_id, secret.client_secret)
        }
    }

    /// Space separated scope parameter
    pub fn scope(&self) -> String {
        self.scopes.join(" ")
    }
}

/// OAuth manager owns the credential store and keeps its token usable.
///
/// The client secret is read only when the stored credentials cannot be used
/// as they are, i.e. for a refresh or the browser flow.
pub struct OAuthManager {
    client_secret_path: PathBuf,
    token_path: PathBuf,
    config: Option<OAuthConfig>,
}

impl OAuthManager {
    /// Create new OAuth manager backed by the credential store at `token_path`
    pub fn new(client_secret_path: impl Into<PathBuf>, token_path: impl Into<PathBuf>) -> Self {
        Self {
            client_secret_path: client_secret_path.into(),
            token_path: token_path.into(),
            config: None,
        }
    }

    fn config(&mut self) -> Result<OAuthConfig, OAuthError> {
        if let Some(config) = &self.config {
            return Ok(config.clone());
        }
        let secret = ClientSecret::load_from_file(&self.client_secret_path)?;
        let config = OAuthConfig::from_client_secret(secret);
        self.config = Some(config.clone());
        Ok(config)
    }

    /// Produce a usable access token.
    ///
    /// Uses the stored token when it is still valid, refreshes it when it has
    /// expired, and falls back to the interactive browser flow when the store is
    /// missing, unreadable, or the refresh is rejected. Any token obtained is
    /// written back to the credential store.
    pub async fn authorize(&mut self) -> Result<String, OAuthError> {
        if let Some(access_token) = self.try_stored_credentials().await? {
            return Ok(access_token);
        }

        let config = self.config()?;
        let token = start_auth_flow(&config).await?;
        token.save_to_file(&self.token_path)?;
        info!("Credentials saved to {}", self.token_path.display());

        Ok(token.access_token)
    }

    /// Access token from the credential store, refreshed if it has expired.
    ///
    /// `Ok(None)` means the browser flow is needed: the store is missing or
    /// unreadable, or the token endpoint rejected the refresh.
    pub async fn try_stored_credentials(&mut self) -> Result<Option<String>, OAuthError> {
        let token = match OAuthToken::load_from_file(&self.token_path) {
            Ok(token) => token,
            Err(e) => {
                info!(
                    "Stored credentials unusable ({}), trying to authenticate in browser",
                    e
                );
                return Ok(None);
            }
        };

        if !token.is_expired() {
            debug!("Stored access token is still valid");
            return Ok(Some(token.access_token));
        }

        info!("Access token expired, refreshing...");
        let config = self.config()?;
        match refresh_token(&config, &token).await {
            Ok(refreshed) => {
                refreshed.save_to_file(&self.token_path)?;
                Ok(Some(refreshed.access_token))
            }
            Err(e) => {
                warn!("Token refresh failed ({}), re-authorizing in browser", e);
                Ok(None)
            }
        }
    }
}

/// Refresh the access token using the refresh token
async fn refresh_token(
    config: &OAuthConfig,
    current_token: &OAuthToken,
) -> Result<OAuthToken, OAuthError> {
    let params = [
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
        ("refresh_token", current_token.refresh_token.as_str()),
        ("grant_type", "refresh_token"),
    ];

    let response = request_token(&config.token_uri, &params).await?;

    info!("OAuth token refreshed successfully");

    Ok(OAuthToken {
        access_token: response.access_token,
        // Google omits the refresh token on refresh; keep the existing one
        refresh_token: response
            .refresh_token
            .unwrap_or_else(|| current_token.refresh_token.clone()),
        token_type: response.token_type.unwrap_or_else(|| "Bearer".to_string()),
        expires_at: now_secs() + response.expires_in,
    })
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    token_type: Option<String>,
    expires_in: u64,
}

async fn request_token(
    token_uri: &str,
    params: &[(&str, &str)],
) -> Result<TokenResponse, OAuthError> {
    let client = reqwest::Client::new();
    let response = client.post(token_uri).form(params).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await?;
        return Err(OAuthError::TokenEndpoint {
            status: status.as_u16(),
            body,
        });
    }

    Ok(response.json().await?)
}

/// Generate PKCE verifier and challenge
pub fn generate_pkce() -> (String, String) {
    use rand::Rng;
    use rand::distributions::Alphanumeric;

    // 43-128 characters from a cryptographically secure RNG
    let verifier: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();

    let challenge = pkce_challenge(&verifier);

    (verifier, challenge)
}

/// base64url(SHA256(verifier))
fn pkce_challenge(verifier: &str) -> String {
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

/// Generate authorization URL, returning it together with the PKCE verifier
pub fn generate_auth_url(config: &OAuthConfig) -> (String, String) {
    let (verifier, challenge) = generate_pkce();

    let auth_url = format!(
        "{}?\
        client_id={}&\
        redirect_uri={}&\
        response_type=code&\
        scope={}&\
        code_challenge={}&\
        code_challenge_method=S256&\
        access_type=offline&\
        prompt=consent",
        config.auth_uri,
        urlencoding::encode(&config.client_id),
        urlencoding::encode(&config.redirect_uri),
        urlencoding::encode(&config.scope()),
        urlencoding::encode(&challenge),
    );

    (auth_url, verifier)
}

/// Exchange authorization code for tokens
pub async fn exchange_code(
    config: &OAuthConfig,
    code: &str,
    verifier: &str,
) -> Result<OAuthToken, OAuthError> {
    info!("Exchanging authorization code for tokens...");

    let params = [
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
        ("code", code),
        ("code_verifier", verifier),
        ("grant_type", "authorization_code"),
        ("redirect_uri", config.redirect_uri.as_str()),
    ];

    let response = request_token(&config.token_uri, &params).await?;

    let token = OAuthToken {
        access_token: response.access_token,
        refresh_token: response
            .refresh_token
            .ok_or(OAuthError::MissingField("refresh_token"))?,
        token_type: response.token_type.unwrap_or_else(|| "Bearer".to_string()),
        expires_at: now_secs() + response.expires_in,
    };

    info!("Successfully obtained OAuth tokens");

    Ok(token)
}

/// Start OAuth flow with local callback server
pub async fn start_auth_flow(config: &OAuthConfig) -> Result<OAuthToken, OAuthError> {
    use std::sync::Arc;
    use tokio::sync::Mutex;

    let (auth_url, verifier) = generate_auth_url(config);

    eprintln!("\n=================================================");
    eprintln!("OAuth 2.0 Authorization Required");
    eprintln!("=================================================");
    eprintln!("\nPlease visit the following URL to authorize the application:\n");
    eprintln!("{}\n", auth_url);
    eprintln!("Waiting for authorization...");
    eprintln!("=================================================\n");

    // Outcome of the callback: the code, or the error reported by the consent screen
    let outcome = Arc::new(Mutex::new(None::<Result<String, String>>));
    let outcome_clone = outcome.clone();

    use axum::{
        Router,
        extract::Query,
        response::{Html, IntoResponse},
        routing::get,
    };

    #[derive(Deserialize)]
    struct AuthCallback {
        code: Option<String>,
        error: Option<String>,
    }

    let callback_handler = move |Query(params): Query<AuthCallback>| {
        let outcome = outcome_clone.clone();
        async move {
            if let Some(error) = params.error {
                let page = format!(
                    "<html><body><h1>Authorization Failed</h1><p>Error: {}</p>\
                    <p>You can close this window.</p></body></html>",
                    error
                );
                *outcome.lock().await = Some(Err(error));
                return Html(page).into_response();
            }

            if let Some(code) = params.code {
                *outcome.lock().await = Some(Ok(code));
                return Html(
                    "<html><body><h1>Authorization Successful!</h1>\
                    <p>You can close this window and return to the application.</p></body></html>",
                )
                .into_response();
            }

            Html("<html><body><h1>Authorization Failed</h1><p>No code received</p></body></html>")
                .into_response()
        }
    };

    let app = Router::new().route("/oauth2callback", get(callback_handler));

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", OAUTH_CALLBACK_PORT))
        .await
        .map_err(OAuthError::CallbackServer)?;
    let server = axum::serve(listener, app);

    let server_handle = tokio::spawn(async move {
        server.await.ok();
    });

    let timeout = tokio::time::Duration::from_secs(AUTHORIZATION_TIMEOUT_SECS);
    let start = tokio::time::Instant::now();

    let result = loop {
        if start.elapsed() > timeout {
            break Err(OAuthError::Timeout(AUTHORIZATION_TIMEOUT_SECS));
        }

        let received = outcome.lock().await.take();
        match received {
            Some(Ok(code)) => break Ok(code),
            Some(Err(error)) => break Err(OAuthError::Denied(error)),
            None => {}
        }

        tokio::time::sleep(tokio::time::Duration::from_millis(500)).await;
    };

    server_handle.abort();

    let code = result?;
    exchange_code(config, &code, &verifier).await
}
