use chrono::{DateTime, SecondsFormat, Utc};

/// Export column order. The spreadsheet header is exactly this.
pub const COLUMNS: [&str; 7] = [
    "id",
    "link",
    "username",
    "text",
    "parsed_at",
    "created_at",
    "parent_id",
];

/// One harvested comment or reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRow {
    /// Local surrogate key, contiguous from 1 in emission order.
    pub id: u64,
    pub link: String,
    pub username: String,
    pub text: String,
    pub parsed_at: DateTime<Utc>,
    /// `publishedAt` as the API reported it.
    pub created_at: String,
    /// Id of the thread's top-level comment, `None` for top-level rows.
    pub parent_id: Option<u64>,
}

impl CommentRow {
    pub fn parsed_at_iso(&self) -> String {
        self.parsed_at.to_rfc3339_opts(SecondsFormat::Micros, true)
    }
}

/// Deep link to a single comment under a video.
pub fn comment_link(video_id: &str, comment_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}&lc={comment_id}")
}
