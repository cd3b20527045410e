// Test mocks for the two trait boundaries:
// - MockSource (CommentSource): scripted owner lookup + queue of pages
// - MockChat (ChatSink): records every outgoing message and document
//
// Plus builders for comment threads and pages.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use telegram_client::{InputFile, TelegramError};
use youtube_client::types::CommentThreadSnippet;
use youtube_client::{
    AuthorChannelId, Comment, CommentReplies, CommentSnippet, CommentThread, CommentThreadPage,
    YoutubeError,
};

use crate::bot::ChatSink;
use crate::traits::CommentSource;

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// A comment whose display name and channel id are both `author`.
pub fn comment(id: &str, author: &str) -> Comment {
    Comment {
        id: id.to_string(),
        snippet: CommentSnippet {
            author_display_name: Some(author.to_string()),
            author_channel_id: Some(AuthorChannelId {
                value: author.to_string(),
            }),
            text_display: Some(format!("text of {id}")),
            published_at: Some("2024-05-01T10:00:00Z".to_string()),
        },
    }
}

/// A thread `id` by `author` with `(reply_id, reply_author)` replies.
pub fn thread(id: &str, author: &str, replies: &[(&str, &str)]) -> CommentThread {
    CommentThread {
        id: id.to_string(),
        snippet: CommentThreadSnippet {
            top_level_comment: comment(id, author),
        },
        replies: (!replies.is_empty()).then(|| CommentReplies {
            comments: replies
                .iter()
                .map(|(reply_id, reply_author)| comment(reply_id, reply_author))
                .collect(),
        }),
    }
}

pub fn page(items: Vec<CommentThread>, next: Option<&str>) -> CommentThreadPage {
    CommentThreadPage {
        items,
        next_page_token: next.map(str::to_string),
    }
}

// ---------------------------------------------------------------------------
// MockSource
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MockSourceInner {
    owner_requests: usize,
    /// (video_id, page_token, page_size) per commentThreads call.
    thread_requests: Vec<(String, Option<String>, u32)>,
    pages: VecDeque<CommentThreadPage>,
    owner_error: Option<YoutubeError>,
    page_error: Option<YoutubeError>,
}

/// Serves a fixed owner and a queue of pages. Once the queue is empty it
/// returns `page_error` if one was set, otherwise an empty final page.
pub struct MockSource {
    owner: String,
    inner: Mutex<MockSourceInner>,
}

impl MockSource {
    pub fn new(owner: &str) -> Self {
        Self {
            owner: owner.to_string(),
            inner: Mutex::new(MockSourceInner::default()),
        }
    }

    pub fn failing_owner(err: YoutubeError) -> Self {
        let source = Self::new("");
        source.inner.lock().unwrap().owner_error = Some(err);
        source
    }

    pub fn with_pages(self, pages: Vec<CommentThreadPage>) -> Self {
        self.inner.lock().unwrap().pages = pages.into();
        self
    }

    pub fn then_fail(self, err: YoutubeError) -> Self {
        self.inner.lock().unwrap().page_error = Some(err);
        self
    }

    pub fn owner_requests(&self) -> usize {
        self.inner.lock().unwrap().owner_requests
    }

    pub fn thread_requests(&self) -> usize {
        self.inner.lock().unwrap().thread_requests.len()
    }

    pub fn requested_tokens(&self) -> Vec<Option<String>> {
        self.inner
            .lock()
            .unwrap()
            .thread_requests
            .iter()
            .map(|(_, token, _)| token.clone())
            .collect()
    }

    pub fn last_request(&self) -> Option<(String, u32)> {
        self.inner
            .lock()
            .unwrap()
            .thread_requests
            .last()
            .map(|(video_id, _, size)| (video_id.clone(), *size))
    }
}

#[async_trait]
impl CommentSource for MockSource {
    async fn video_owner(&self, _video_id: &str) -> youtube_client::Result<String> {
        let mut inner = self.inner.lock().unwrap();
        inner.owner_requests += 1;
        match inner.owner_error.take() {
            Some(err) => Err(err),
            None => Ok(self.owner.clone()),
        }
    }

    async fn comment_threads(
        &self,
        video_id: &str,
        page_token: Option<&str>,
        page_size: u32,
    ) -> youtube_client::Result<CommentThreadPage> {
        let mut inner = self.inner.lock().unwrap();
        inner.thread_requests.push((
            video_id.to_string(),
            page_token.map(str::to_string),
            page_size,
        ));
        if let Some(next) = inner.pages.pop_front() {
            return Ok(next);
        }
        match inner.page_error.take() {
            Some(err) => Err(err),
            None => Ok(CommentThreadPage::default()),
        }
    }
}

// ---------------------------------------------------------------------------
// MockChat
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Text(i64, String),
    Document {
        chat_id: i64,
        file_name: String,
        caption: String,
        bytes: Vec<u8>,
    },
}

#[derive(Default)]
pub struct MockChat {
    sent: Mutex<Vec<Sent>>,
    fail_documents: bool,
}

impl MockChat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every document upload fails with a Bot API error.
    pub fn rejecting_documents() -> Self {
        Self {
            fail_documents: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text(_, text) => Some(text),
                Sent::Document { .. } => None,
            })
            .collect()
    }
}

#[async_trait]
impl ChatSink for MockChat {
    async fn send_text(&self, chat_id: i64, text: &str) -> telegram_client::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push(Sent::Text(chat_id, text.to_string()));
        Ok(())
    }

    async fn send_document(
        &self,
        chat_id: i64,
        file: InputFile,
        caption: &str,
    ) -> telegram_client::Result<()> {
        if self.fail_documents {
            return Err(TelegramError::Api {
                code: 413,
                description: "Request Entity Too Large".to_string(),
            });
        }
        self.sent.lock().unwrap().push(Sent::Document {
            chat_id,
            file_name: file.file_name,
            caption: caption.to_string(),
            bytes: file.bytes,
        });
        Ok(())
    }
}
