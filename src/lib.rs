//! Collects the entries of a YouTube playlist as flat stream records.
//!
//! A [`Session`] produces an authenticated [`YouTubeClient`], the
//! [`PlaylistCollector`] pages through the playlist, the
//! [`CommentEnricher`] optionally attaches a comment from a chosen author
//! channel, and [`storage`] persists the result as JSON.

pub mod collector;
pub mod config;
pub mod enrich;
pub mod error;
pub mod logging;
pub mod normalize;
pub mod record;
pub mod session;
pub mod storage;

pub use collector::{CollectionReport, PlaylistCollector};
pub use config::SessionConfig;
pub use enrich::CommentEnricher;
pub use error::{CollectorError, SessionError, StorageError};
pub use normalize::process_response;
pub use record::StreamRecord;
pub use session::Session;
pub use yt_data_client::{YouTubeApi, YouTubeClient};

#[cfg(test)]
pub(crate) mod testing;
