use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use yt_playlist_collector::config::{DEFAULT_CLIENT_SECRET_PATH, DEFAULT_CREDENTIALS_PATH};
use yt_playlist_collector::{
    CommentEnricher, PlaylistCollector, Session, SessionConfig, logging, storage,
};

/// YouTube Playlist Collector - Saves the videos of a playlist as stream records
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Playlist to collect
    #[arg(long)]
    playlist_id: String,

    /// JSON file to write (default: <today>.json)
    #[arg(long)]
    output_file: Option<PathBuf>,

    /// Attach the top-level comment written by this channel to every stream
    #[arg(long)]
    comment_author_channel_id: Option<String>,

    /// OAuth credential store, created on first authorization
    #[arg(long, default_value = DEFAULT_CREDENTIALS_PATH)]
    credentials_path: PathBuf,

    /// Client secret file downloaded from the Google Cloud console
    #[arg(long, default_value = DEFAULT_CLIENT_SECRET_PATH)]
    client_secret_path: PathBuf,

    /// Path to file containing an API key, used instead of OAuth
    #[arg(long)]
    api_key_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    let args = Args::parse();

    let config = SessionConfig {
        credentials_path: args.credentials_path,
        client_secret_path: args.client_secret_path,
        ..SessionConfig::from_env()
    };
    info!("Using REST API at: {}", config.rest_api_address);

    let session = match &args.api_key_path {
        Some(path) => Session::from_api_key(&config, path)?,
        None => Session::authorize(&config).await?,
    };
    let client = session.client();

    let report = PlaylistCollector::new(client)
        .collect(&args.playlist_id)
        .await?;
    let total_results = report.total_results;
    let mut streams = report.streams;

    if let Some(author) = args.comment_author_channel_id {
        CommentEnricher::new(client, author)
            .enrich_all(&mut streams)
            .await;
    }

    let path = storage::to_json(&streams, args.output_file.as_deref())?;
    eprintln!(
        "Wrote {} of {} streams to {}",
        streams.len(),
        total_results,
        path.display()
    );

    Ok(())
}
