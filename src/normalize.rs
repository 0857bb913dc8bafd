use crate::error::CollectorError;
use crate::record::StreamRecord;
use tracing::info;
use yt_data_client::PlaylistItem;

/// Turn a batch of raw playlist items into stream records.
///
/// Output has the same length and order as `items`. An item missing its video
/// id, title or high-resolution thumbnail aborts the whole batch with
/// [`CollectorError::MalformedItem`].
pub fn process_response(items: &[PlaylistItem]) -> Result<Vec<StreamRecord>, CollectorError> {
    let mut processed = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let record = process_item(index, item)?;
        info!("Processed {}", record.title);
        processed.push(record);
    }

    Ok(processed)
}

fn process_item(index: usize, item: &PlaylistItem) -> Result<StreamRecord, CollectorError> {
    let missing = |field| CollectorError::MalformedItem { index, field };

    let snippet = item.snippet.as_ref().ok_or_else(|| missing("snippet"))?;

    let video_id = snippet
        .resource_id
        .as_ref()
        .and_then(|resource| resource.video_id.as_deref())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| missing("snippet.resourceId.videoId"))?;

    let title = snippet
        .title
        .as_deref()
        .filter(|title| !title.is_empty())
        .ok_or_else(|| missing("snippet.title"))?;

    let thumbnail_url = snippet
        .thumbnails
        .as_ref()
        .and_then(|thumbnails| thumbnails.high.as_ref())
        .and_then(|high| high.url.as_deref())
        .filter(|url| !url.is_empty())
        .ok_or_else(|| missing("snippet.thumbnails.high.url"))?;

    Ok(StreamRecord::new(
        video_id.to_string(),
        title.to_string(),
        thumbnail_url.to_string(),
    ))
}
