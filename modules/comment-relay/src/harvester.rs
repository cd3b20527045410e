//! Comment harvesting: page through a video's comment threads and flatten
//! them into [`CommentRow`]s.
//!
//! Rows are emitted thread by thread, the top-level comment first and then
//! its replies in API order. Comments written by the video owner are dropped
//! without consuming an id, so ids stay contiguous from 1. Replies always
//! point at the id reserved for their thread's top-level comment, even when
//! that comment was the owner's and was not emitted.

use chrono::Utc;
use youtube_client::{Comment, CommentThread};

use crate::error::Result;
use crate::link::extract_video_id;
use crate::owner::resolve_owner;
use crate::row::{comment_link, CommentRow};
use crate::traits::CommentSource;

/// Default `maxResults` per commentThreads request.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Fetch every comment and reply under `video_url`, excluding the owner's.
///
/// Any failure aborts the whole harvest; nothing partial is returned.
pub async fn harvest(
    source: &dyn CommentSource,
    video_url: &str,
    page_size: u32,
) -> Result<Vec<CommentRow>> {
    let video_id = extract_video_id(video_url)?;
    let owner = resolve_owner(source, &video_id).await?;

    let mut flattener = ThreadFlattener::new(&video_id, &owner);
    let mut cursor: Option<String> = None;
    let mut pages = 0u32;

    loop {
        let page = source
            .comment_threads(&video_id, cursor.as_deref(), page_size)
            .await?;
        pages += 1;

        for thread in &page.items {
            flattener.push_thread(thread);
        }

        match page.next_cursor() {
            Some(next) => cursor = Some(next.to_string()),
            None => break,
        }
    }

    let rows = flattener.finish();
    tracing::info!(video_id = %video_id, pages, rows = rows.len(), "Harvest complete");
    Ok(rows)
}

/// Turns threads into rows while tracking the next id to hand out.
struct ThreadFlattener<'a> {
    video_id: &'a str,
    owner: &'a str,
    next_id: u64,
    rows: Vec<CommentRow>,
}

impl<'a> ThreadFlattener<'a> {
    fn new(video_id: &'a str, owner: &'a str) -> Self {
        Self {
            video_id,
            owner,
            next_id: 1,
            rows: Vec::new(),
        }
    }

    fn is_owner(&self, comment: &Comment) -> bool {
        comment.snippet.author_channel() == Some(self.owner)
    }

    fn push_thread(&mut self, thread: &CommentThread) {
        let top = thread.top_level();
        let top_id = self.next_id;

        if !self.is_owner(top) {
            self.emit(&thread.id, top, None);
        }

        for reply in thread.replies() {
            if self.is_owner(reply) {
                continue;
            }
            self.emit(&reply.id, reply, Some(top_id));
        }
    }

    fn emit(&mut self, comment_id: &str, comment: &Comment, parent_id: Option<u64>) {
        let snippet = &comment.snippet;
        self.rows.push(CommentRow {
            id: self.next_id,
            link: comment_link(self.video_id, comment_id),
            username: snippet.author_display_name.clone().unwrap_or_default(),
            text: snippet.text_display.clone().unwrap_or_default(),
            parsed_at: Utc::now(),
            created_at: snippet.published_at.clone().unwrap_or_default(),
            parent_id,
        });
        self.next_id += 1;
    }

    fn finish(self) -> Vec<CommentRow> {
        self.rows
    }
}
