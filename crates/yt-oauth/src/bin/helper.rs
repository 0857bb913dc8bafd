use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use yt_oauth::{ClientSecret, OAuthConfig, start_auth_flow};

/// OAuth 2.0 helper tool: authorizes once in the browser and writes the credential store
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Client secret file downloaded from the Google Cloud console
    #[arg(long, default_value = "client_secret_file.json")]
    client_secret_path: PathBuf,

    /// Path to save the OAuth token file
    #[arg(long, default_value = "credentials.json")]
    token_path: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let secret = ClientSecret::load_from_file(&args.client_secret_path)?;
    let config = OAuthConfig::from_client_secret(secret);

    let token = start_auth_flow(&config).await?;
    token.save_to_file(&args.token_path)?;

    eprintln!("\nOAuth token saved to: {}", args.token_path.display());
    eprintln!("You can now use this token with yt-playlist-collector");

    Ok(())
}
