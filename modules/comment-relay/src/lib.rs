pub mod bot;
pub mod config;
pub mod error;
pub mod export;
pub mod harvester;
pub mod link;
pub mod owner;
pub mod row;
pub mod traits;

#[cfg(test)]
mod testing;

pub use bot::{AppContext, ChatSink};
pub use config::Config;
pub use error::{ErrorKind, HarvestError};
pub use harvester::harvest;
pub use link::{detect_platform, extract_video_id, LinkError, Platform};
pub use owner::resolve_owner;
pub use row::{CommentRow, COLUMNS};
pub use traits::CommentSource;
