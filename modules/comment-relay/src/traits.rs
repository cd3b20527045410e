// CommentSource is the harvester's only view of YouTube. The live
// implementation is YoutubeClient; tests drive the harvester with
// in-memory pages from crate::testing.

use async_trait::async_trait;
use youtube_client::{CommentThreadPage, YoutubeClient};

#[async_trait]
pub trait CommentSource: Send + Sync {
    /// Channel id of the account that published `video_id`.
    async fn video_owner(&self, video_id: &str) -> youtube_client::Result<String>;

    /// One page of comment threads. `page_token` is `None` for the first page.
    async fn comment_threads(
        &self,
        video_id: &str,
        page_token: Option<&str>,
        page_size: u32,
    ) -> youtube_client::Result<CommentThreadPage>;
}

#[async_trait]
impl CommentSource for YoutubeClient {
    async fn video_owner(&self, video_id: &str) -> youtube_client::Result<String> {
        self.video_channel_id(video_id).await
    }

    async fn comment_threads(
        &self,
        video_id: &str,
        page_token: Option<&str>,
        page_size: u32,
    ) -> youtube_client::Result<CommentThreadPage> {
        YoutubeClient::comment_threads(self, video_id, page_token, page_size).await
    }
}
