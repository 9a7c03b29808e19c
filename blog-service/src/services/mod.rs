pub mod comments;
pub mod feed;
pub mod follow;
pub mod posts;

pub use comments::CommentService;
pub use feed::{FeedPage, FeedScope, FeedService};
pub use follow::FollowService;
pub use posts::{PostDetail, PostService};

use crate::error::{AppError, Result};

/// Reject empty or whitespace-only form fields before touching the store
pub(crate) fn non_blank(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(field, "must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_blank_rejects_whitespace_only() {
        assert!(non_blank("text", "").is_err());
        assert!(non_blank("text", " \t\n").is_err());
        assert!(non_blank("text", "ok").is_ok());
    }
}
