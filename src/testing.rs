//! Fixtures and an in-memory `YouTubeApi` shared by the unit tests.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use yt_data_client::{
    ApiError, AuthorChannelId, Comment, CommentSnippet, CommentThread, CommentThreadListResponse,
    CommentThreadSnippet, PageInfo, PlaylistItem, PlaylistItemListResponse, PlaylistItemSnippet,
    ResourceId, Thumbnail, Thumbnails, YouTubeApi,
};

pub(crate) fn playlist_item(video_id: &str, title: &str) -> PlaylistItem {
    PlaylistItem {
        id: None,
        snippet: Some(PlaylistItemSnippet {
            title: Some(title.to_string()),
            resource_id: Some(ResourceId {
                kind: Some("youtube#video".to_string()),
                video_id: Some(video_id.to_string()),
            }),
            thumbnails: Some(Thumbnails {
                high: Some(Thumbnail {
                    url: Some(format!("https://i.ytimg.com/vi/{video_id}/hqdefault.jpg")),
                    width: Some(480),
                    height: Some(360),
                }),
                ..Default::default()
            }),
            ..Default::default()
        }),
    }
}

pub(crate) fn comment_thread(author_channel_id: &str, text: &str) -> CommentThread {
    CommentThread {
        id: format!("thread-{author_channel_id}"),
        snippet: CommentThreadSnippet {
            video_id: None,
            top_level_comment: Comment {
                id: String::new(),
                snippet: CommentSnippet {
                    author_display_name: author_channel_id.to_string(),
                    author_channel_id: Some(AuthorChannelId {
                        value: author_channel_id.to_string(),
                    }),
                    text_display: text.to_string(),
                    text_original: Some(text.to_string()),
                },
            },
            total_reply_count: 0,
        },
    }
}

/// Log lines written by a scoped subscriber from [`capture_logs`]
#[derive(Clone, Default)]
pub(crate) struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Send this thread's `tracing` output to a buffer until the guard drops
pub(crate) fn capture_logs() -> (LogCapture, tracing::subscriber::DefaultGuard) {
    let capture = LogCapture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(move || writer.clone())
        .finish();
    (capture, tracing::subscriber::set_default(subscriber))
}

#[derive(Default)]
pub(crate) struct FakeApi {
    pages: HashMap<Option<String>, PlaylistItemListResponse>,
    comments: HashMap<String, Vec<CommentThread>>,
    failing_videos: HashSet<String>,
    playlist_requests: Mutex<Vec<Option<String>>>,
    comment_requests: Mutex<Vec<String>>,
}

impl FakeApi {
    /// A playlist reporting `total_results`, served in pages of the given sizes.
    /// Every page but the last links to the next one.
    pub(crate) fn paged(total_results: u32, page_sizes: &[usize]) -> Self {
        let mut api = Self::default();
        let mut next_video = 0;

        for (page, &size) in page_sizes.iter().enumerate() {
            let items = (next_video..next_video + size)
                .map(|i| {
                    let title = format!("Stream {i} 202401{:02}", i % 31 + 1);
                    playlist_item(&format!("vid{i}"), &title)
                })
                .collect();
            next_video += size;

            let token = (page > 0).then(|| format!("PAGE{page}"));
            let next_page_token =
                (page + 1 < page_sizes.len()).then(|| format!("PAGE{}", page + 1));

            api.pages.insert(
                token,
                PlaylistItemListResponse {
                    next_page_token,
                    prev_page_token: None,
                    page_info: PageInfo {
                        total_results: Some(total_results),
                        results_per_page: 50,
                    },
                    items,
                },
            );
        }

        api
    }

    /// Replace the page served for `token`
    pub(crate) fn with_page(
        mut self,
        token: Option<&str>,
        page: PlaylistItemListResponse,
    ) -> Self {
        self.pages.insert(token.map(str::to_string), page);
        self
    }

    pub(crate) fn with_comments(mut self, video_id: &str, threads: Vec<CommentThread>) -> Self {
        self.comments.insert(video_id.to_string(), threads);
        self
    }

    pub(crate) fn with_failing_comments(mut self, video_id: &str) -> Self {
        self.failing_videos.insert(video_id.to_string());
        self
    }

    pub(crate) fn playlist_requests(&self) -> Vec<Option<String>> {
        self.playlist_requests.lock().unwrap().clone()
    }

    pub(crate) fn comment_requests(&self) -> Vec<String> {
        self.comment_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl YouTubeApi for FakeApi {
    async fn list_playlist_items(
        &self,
        _playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistItemListResponse, ApiError> {
        let token = page_token.map(str::to_string);
        self.playlist_requests.lock().unwrap().push(token.clone());

        self.pages
            .get(&token)
            .cloned()
            .ok_or_else(|| ApiError::Status {
                status: 400,
                message: "Invalid page token".to_string(),
            })
    }

    async fn list_comment_threads(
        &self,
        video_id: &str,
    ) -> Result<CommentThreadListResponse, ApiError> {
        self.comment_requests
            .lock()
            .unwrap()
            .push(video_id.to_string());

        if self.failing_videos.contains(video_id) {
            return Err(ApiError::Status {
                status: 403,
                message: "The video has disabled comments.".to_string(),
            });
        }

        Ok(CommentThreadListResponse {
            items: self.comments.get(video_id).cloned().unwrap_or_default(),
            ..Default::default()
        })
    }
}
