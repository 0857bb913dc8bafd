use serde::{Deserialize, Serialize};

/// Number of trailing title characters holding the date stamp
pub const DATE_STAMP_LEN: usize = 8;

/// One playlist entry, flattened for storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamRecord {
    #[serde(rename = "youtube_id")]
    pub video_id: String,
    #[serde(rename = "stream_name")]
    pub title: String,
    /// Trailing date stamp of the title, taken as-is
    #[serde(rename = "stream_date")]
    pub captured_date: String,
    pub thumbnail_url: String,
    /// Absent until enrichment runs; empty when no matching comment was found
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl StreamRecord {
    pub fn new(video_id: String, title: String, thumbnail_url: String) -> Self {
        let captured_date = date_stamp(&title).to_string();
        Self {
            video_id,
            title,
            captured_date,
            thumbnail_url,
            comment: None,
        }
    }
}

/// Last [`DATE_STAMP_LEN`] characters of `title`, or all of it when shorter
pub fn date_stamp(title: &str) -> &str {
    match title.char_indices().rev().nth(DATE_STAMP_LEN - 1) {
        Some((start, _)) => &title[start..],
        None => title,
    }
}
