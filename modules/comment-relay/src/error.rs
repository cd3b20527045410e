use thiserror::Error;
use youtube_client::YoutubeError;

use crate::link::LinkError;

pub type Result<T> = std::result::Result<T, HarvestError>;

/// How a failure is surfaced to the person who sent the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input. Shown with a corrective hint, not logged as a failure.
    Validation,
    /// The API answered with a clear condition (no such video, error payload).
    Upstream,
    /// Anything else. Logged in full, the user only sees a generic message.
    Unexpected,
}

#[derive(Debug, Error)]
pub enum HarvestError {
    #[error(transparent)]
    Link(#[from] LinkError),

    #[error(transparent)]
    Youtube(#[from] YoutubeError),

    #[error("Harvest task failed: {0}")]
    Task(String),

    #[error("Export failed: {0}")]
    Export(String),
}

impl From<tokio::task::JoinError> for HarvestError {
    fn from(err: tokio::task::JoinError) -> Self {
        HarvestError::Task(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for HarvestError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        HarvestError::Export(err.to_string())
    }
}

impl HarvestError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HarvestError::Link(_) => ErrorKind::Validation,
            HarvestError::Youtube(YoutubeError::VideoNotFound { .. })
            | HarvestError::Youtube(YoutubeError::Api { .. }) => ErrorKind::Upstream,
            HarvestError::Youtube(YoutubeError::Network(_))
            | HarvestError::Youtube(YoutubeError::Http { .. })
            | HarvestError::Youtube(YoutubeError::Parse(_))
            | HarvestError::Task(_)
            | HarvestError::Export(_) => ErrorKind::Unexpected,
        }
    }

    /// Text sent back to the chat. Raw API bodies never leave the logs.
    pub fn user_message(&self) -> String {
        match self {
            HarvestError::Link(_) => {
                "Error: could not find a video id in that link. \
                 Send a link like https://www.youtube.com/watch?v=B9oIps6Cb50"
                    .to_string()
            }
            HarvestError::Youtube(YoutubeError::VideoNotFound { video_id, .. }) => {
                format!("Error: video {video_id} was not found or is unavailable.")
            }
            HarvestError::Youtube(YoutubeError::Api { message, .. }) => {
                format!("Error: YouTube API error: {message}")
            }
            _ => "An unexpected error occurred while collecting comments. \
                  Try another link or try again later."
                .to_string(),
        }
    }
}
