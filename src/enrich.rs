use crate::record::StreamRecord;
use tracing::{debug, info, warn};
use yt_data_client::{CommentSnippet, CommentThreadListResponse, YouTubeApi};

/// Attaches a comment written by one author channel to stream records.
///
/// Best effort: a failed lookup leaves an empty comment and never fails the caller.
pub struct CommentEnricher<'a, A: YouTubeApi + ?Sized> {
    api: &'a A,
    author_channel_id: String,
}

impl<'a, A: YouTubeApi + ?Sized> CommentEnricher<'a, A> {
    pub fn new(api: &'a A, author_channel_id: impl Into<String>) -> Self {
        Self {
            api,
            author_channel_id: author_channel_id.into(),
        }
    }

    /// Look up the author's comment on `stream` and store it in `stream.comment`.
    ///
    /// Only the first page of comment threads is scanned. When the author left
    /// several top-level comments there, the last one in response order wins.
    pub async fn get_comment_for_stream<'s>(
        &self,
        stream: &'s mut StreamRecord,
    ) -> &'s mut StreamRecord {
        let comment = match self.api.list_comment_threads(&stream.video_id).await {
            Ok(threads) => match self.find_comment(&threads) {
                Some(snippet) => {
                    debug!("Found comment on {}", stream.video_id);
                    snippet.text_display.clone()
                }
                None => String::new(),
            },
            Err(e) => {
                warn!("Comment lookup for {} failed: {}", stream.video_id, e);
                String::new()
            }
        };

        stream.comment = Some(comment);
        stream
    }

    /// Enrich every record in place, in playlist order. Returns how many got a comment.
    pub async fn enrich_all(&self, streams: &mut [StreamRecord]) -> usize {
        let mut found = 0;
        for stream in streams.iter_mut() {
            let stream = self.get_comment_for_stream(stream).await;
            if stream.comment.as_deref().is_some_and(|c| !c.is_empty()) {
                found += 1;
            }
        }

        info!(
            "Found comments by {} on {} of {} streams",
            self.author_channel_id,
            found,
            streams.len()
        );
        found
    }

    fn find_comment<'t>(
        &self,
        threads: &'t CommentThreadListResponse,
    ) -> Option<&'t CommentSnippet> {
        threads
            .items
            .iter()
            .rev()
            .map(|thread| &thread.snippet.top_level_comment.snippet)
            .find(|snippet| {
                snippet
                    .author_channel_id
                    .as_ref()
                    .is_some_and(|id| id.value == self.author_channel_id)
            })
    }
}
