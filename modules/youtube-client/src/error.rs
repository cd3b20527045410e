use thiserror::Error;

pub type Result<T> = std::result::Result<T, YoutubeError>;

#[derive(Debug, Error)]
pub enum YoutubeError {
    #[error("Network error: {0}")]
    Network(String),

    /// Google error envelope; `message` is the API's own text.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Non-success status without an error envelope (proxy or gateway page).
    #[error("HTTP error (status {status}): {body}")]
    Http { status: u16, body: String },

    /// The videos endpoint returned no item for the id, or an error payload.
    /// `response` carries the raw body for diagnostics.
    #[error("Video {video_id} not found: {response}")]
    VideoNotFound { video_id: String, response: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for YoutubeError {
    fn from(err: reqwest::Error) -> Self {
        YoutubeError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for YoutubeError {
    fn from(err: serde_json::Error) -> Self {
        YoutubeError::Parse(err.to_string())
    }
}
