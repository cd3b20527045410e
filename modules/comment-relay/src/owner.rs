use crate::error::Result;
use crate::traits::CommentSource;

/// Resolve the channel that published `video_id`.
///
/// Used only to filter the owner's own comments out of a harvest; the id is
/// never written to rows.
pub async fn resolve_owner(source: &dyn CommentSource, video_id: &str) -> Result<String> {
    let owner = source.video_owner(video_id).await?;
    tracing::debug!(video_id, owner = %owner, "Video owner resolved");
    Ok(owner)
}
