pub mod error;
pub mod types;

pub use error::{Result, YoutubeError};
pub use types::{
    AuthorChannelId, Comment, CommentReplies, CommentSnippet, CommentThread, CommentThreadPage,
    Video, VideoListResponse, VideoSnippet,
};

use std::time::Duration;

use types::ApiErrorEnvelope;

const BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Per-request timeout for every Data API call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Largest `maxResults` the commentThreads endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

pub struct YoutubeClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl YoutubeClient {
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_base_url(BASE_URL, api_key)
    }

    /// Point the client at another host (a proxy or a test server).
    pub fn with_base_url(base_url: &str, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Look up the channel that published `video_id`.
    ///
    /// An empty item list or an error payload both yield
    /// [`YoutubeError::VideoNotFound`] carrying the raw response body.
    pub async fn video_channel_id(&self, video_id: &str) -> Result<String> {
        let url = format!("{}/videos", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("id", video_id),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if serde_json::from_str::<ApiErrorEnvelope>(&body).is_ok() {
            return Err(YoutubeError::VideoNotFound {
                video_id: video_id.to_string(),
                response: body,
            });
        }
        if !status.is_success() {
            return Err(YoutubeError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let list: VideoListResponse = serde_json::from_str(&body)?;
        match list.items.into_iter().next() {
            Some(video) => {
                tracing::debug!(video_id, channel_id = %video.snippet.channel_id, "Resolved video owner");
                Ok(video.snippet.channel_id)
            }
            None => Err(YoutubeError::VideoNotFound {
                video_id: video_id.to_string(),
                response: body,
            }),
        }
    }

    /// Fetch one page of comment threads (top-level comments with inlined replies).
    pub async fn comment_threads(
        &self,
        video_id: &str,
        page_token: Option<&str>,
        max_results: u32,
    ) -> Result<CommentThreadPage> {
        let url = format!("{}/commentThreads", self.base_url);
        let max_results = max_results.clamp(1, MAX_PAGE_SIZE).to_string();

        let mut query = vec![
            ("part", "snippet,replies"),
            ("videoId", video_id),
            ("maxResults", max_results.as_str()),
            ("key", self.api_key.as_str()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let resp = self.client.get(&url).query(&query).send().await?;

        let status = resp.status();
        let body = resp.text().await?;

        if let Ok(envelope) = serde_json::from_str::<ApiErrorEnvelope>(&body) {
            return Err(YoutubeError::Api {
                status: status.as_u16(),
                message: envelope.error.message,
            });
        }
        if !status.is_success() {
            return Err(YoutubeError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let page: CommentThreadPage = serde_json::from_str(&body)?;
        tracing::debug!(
            video_id,
            threads = page.items.len(),
            has_next = page.next_cursor().is_some(),
            "Fetched comment thread page"
        );
        Ok(page)
    }
}
