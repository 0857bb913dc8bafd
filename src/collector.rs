use crate::error::CollectorError;
use crate::normalize::process_response;
use crate::record::StreamRecord;
use tracing::{debug, info, warn};
use yt_data_client::YouTubeApi;

/// Outcome of one playlist traversal
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionReport {
    /// Records in the order the API yielded them
    pub streams: Vec<StreamRecord>,
    /// Item count promised by the first page
    pub total_results: u32,
    pub pages_fetched: usize,
}

impl CollectionReport {
    /// Whether every promised item was collected
    pub fn is_complete(&self) -> bool {
        self.streams.len() == self.total_results as usize
    }
}

/// Pages through a playlist and normalizes every item
pub struct PlaylistCollector<'a, A: YouTubeApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: YouTubeApi + ?Sized> PlaylistCollector<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// All items of `playlist_id` as stream records.
    ///
    /// A short result (fewer records than the API promised) is logged, not
    /// raised; API failures and malformed items are.
    pub async fn get_streams_from_playlist(
        &self,
        playlist_id: &str,
    ) -> Result<Vec<StreamRecord>, CollectorError> {
        Ok(self.collect(playlist_id).await?.streams)
    }

    /// Like [`get_streams_from_playlist`](Self::get_streams_from_playlist), keeping the accounting
    pub async fn collect(&self, playlist_id: &str) -> Result<CollectionReport, CollectorError> {
        info!("Fetching items of playlist {}", playlist_id);

        let first = self.api.list_playlist_items(playlist_id, None).await?;
        let total_results = first
            .page_info
            .total_results
            .ok_or_else(|| CollectorError::MissingTotalResults(playlist_id.to_string()))?;
        let mut remaining = i64::from(total_results);
        let mut pages_fetched = 1;

        let mut streams = process_response(&first.items)?;
        remaining -= streams.len() as i64;
        let mut next_page_token = first.next_page_token;

        while remaining > 0 {
            let Some(token) = next_page_token.take() else {
                debug!("No continuation token with {} items outstanding", remaining);
                break;
            };

            debug!("Fetching page {} ({} items outstanding)", pages_fetched + 1, remaining);
            let page = self.api.list_playlist_items(playlist_id, Some(&token)).await?;
            pages_fetched += 1;

            let processed = process_response(&page.items)?;
            if processed.is_empty() {
                // A token that keeps yielding nothing would never drain `remaining`
                warn!("Page {} of playlist {} was empty, stopping", pages_fetched, playlist_id);
                break;
            }

            remaining -= processed.len() as i64;
            streams.extend(processed);
            next_page_token = page.next_page_token;
        }

        let report = CollectionReport {
            streams,
            total_results,
            pages_fetched,
        };

        if report.is_complete() {
            info!(
                "Collected {} items from playlist {} in {} page(s)",
                report.streams.len(),
                playlist_id,
                pages_fetched
            );
        } else {
            warn!(
                "Playlist {} reported {} items but {} were collected",
                playlist_id,
                total_results,
                report.streams.len()
            );
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeApi, capture_logs, playlist_item};
    use yt_data_client::{PageInfo, PlaylistItemListResponse};

    #[tokio::test]
    async fn follows_tokens_until_every_item_is_collected() {
        let api = FakeApi::paged(120, &[50, 50, 20]);
        let collector = PlaylistCollector::new(&api);

        let (logs, _guard) = capture_logs();
        let report = collector.collect("PL").await.unwrap();
        assert!(!logs.contents().contains("WARN"));
        assert_eq!(report.streams.len(), 120);
        assert_eq!(report.pages_fetched, 3);
        assert!(report.is_complete());
        assert_eq!(
            api.playlist_requests(),
            vec![None, Some("PAGE1".to_string()), Some("PAGE2".to_string())]
        );

        let ids: Vec<_> = report.streams.iter().map(|s| s.video_id.clone()).collect();
        let expected: Vec<_> = (0..120).map(|i| format!("vid{i}")).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn short_page_without_token_returns_partial_list() {
        let api = FakeApi::paged(120, &[50, 50, 19]);
        let collector = PlaylistCollector::new(&api);

        let (logs, _guard) = capture_logs();
        let report = collector.collect("PL").await.unwrap();
        assert_eq!(report.streams.len(), 119);
        assert_eq!(report.total_results, 120);
        assert!(!report.is_complete());
        assert_eq!(api.playlist_requests().len(), 3);

        let logs = logs.contents();
        let warning = logs
            .lines()
            .find(|line| line.contains("WARN"))
            .expect("mismatch warning");
        assert!(warning.contains("Playlist PL reported 120 items but 119 were collected"));
    }

    #[tokio::test]
    async fn first_page_without_total_is_rejected() {
        let page = PlaylistItemListResponse {
            next_page_token: Some("PAGE1".to_string()),
            items: vec![playlist_item("a", "One 20240101")],
            ..Default::default()
        };
        let api = FakeApi::default().with_page(None, page);

        let err = PlaylistCollector::new(&api).collect("PL").await.unwrap_err();
        assert!(matches!(err, CollectorError::MissingTotalResults(ref id) if id == "PL"));
        assert_eq!(api.playlist_requests(), vec![None]);
    }

    #[tokio::test]
    async fn single_page_never_consults_the_token() {
        // The page carries a token, but nothing is outstanding
        let page = PlaylistItemListResponse {
            next_page_token: Some("PAGE1".to_string()),
            page_info: PageInfo {
                total_results: Some(2),
                results_per_page: 50,
            },
            items: vec![playlist_item("a", "One 20240101"), playlist_item("b", "Two 20240102")],
            ..Default::default()
        };
        let api = FakeApi::default().with_page(None, page);

        let streams = PlaylistCollector::new(&api)
            .get_streams_from_playlist("PL")
            .await
            .unwrap();
        assert_eq!(streams.len(), 2);
        assert_eq!(api.playlist_requests(), vec![None]);
    }

    #[tokio::test]
    async fn empty_playlist_yields_no_records() {
        let api = FakeApi::paged(0, &[0]);
        let report = PlaylistCollector::new(&api).collect("PL").await.unwrap();
        assert!(report.streams.is_empty());
        assert!(report.is_complete());
    }

    #[tokio::test]
    async fn malformed_item_aborts_the_collection() {
        let mut broken = playlist_item("x", "Broken 20240101");
        broken.snippet.as_mut().unwrap().title = None;
        let page = PlaylistItemListResponse {
            page_info: PageInfo {
                total_results: Some(51),
                results_per_page: 50,
            },
            items: vec![broken],
            ..Default::default()
        };
        let api = FakeApi::paged(51, &[50, 1]).with_page(Some("PAGE1"), page);

        let err = PlaylistCollector::new(&api)
            .get_streams_from_playlist("PL")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CollectorError::MalformedItem {
                index: 0,
                field: "snippet.title"
            }
        ));
    }

    #[tokio::test]
    async fn api_failure_on_a_later_page_propagates() {
        // Second page points at a token the fake does not serve
        let api = FakeApi::paged(100, &[50]).with_page(
            None,
            PlaylistItemListResponse {
                next_page_token: Some("GONE".to_string()),
                page_info: PageInfo {
                    total_results: Some(100),
                    results_per_page: 50,
                },
                items: (0..50)
                    .map(|i| playlist_item(&format!("v{i}"), "Stream 20240101"))
                    .collect(),
                ..Default::default()
            },
        );

        let err = PlaylistCollector::new(&api).collect("PL").await.unwrap_err();
        assert!(matches!(err, CollectorError::Api(_)));
    }

    #[tokio::test]
    async fn empty_page_with_token_stops_the_traversal() {
        let empty = PlaylistItemListResponse {
            next_page_token: Some("PAGE1".to_string()),
            page_info: PageInfo {
                total_results: Some(60),
                results_per_page: 50,
            },
            ..Default::default()
        };
        let api = FakeApi::paged(60, &[50, 0]).with_page(Some("PAGE1"), empty);

        let report = PlaylistCollector::new(&api).collect("PL").await.unwrap();
        assert_eq!(report.streams.len(), 50);
        assert_eq!(report.pages_fetched, 2);
        assert!(!report.is_complete());
    }
}
