//! Comment thread service
//!
//! Comments attach to a post addressed the way the comment route addresses
//! it, by (author username, post id). The thread reads oldest first.

use sqlx::PgPool;

use crate::domain::models::Comment;
use crate::domain::viewer::Viewer;
use crate::error::{AppError, Result};
use crate::repository::{CommentRepository, PostRepository};
use crate::services::non_blank;

pub struct CommentService {
    posts: PostRepository,
    comments: CommentRepository,
}

impl CommentService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            posts: PostRepository::new(pool.clone()),
            comments: CommentRepository::new(pool),
        }
    }

    /// Append a comment to the post. Requires a signed-in author and
    /// non-blank text; nothing is written otherwise.
    pub async fn add_comment(
        &self,
        viewer: &Viewer,
        username: &str,
        post_id: i64,
        text: &str,
    ) -> Result<Comment> {
        let author_id = viewer.require_user(format!("/{username}/{post_id}/comment/"))?;
        non_blank("text", text)?;

        let post = self
            .posts
            .get_by_author_username(username, post_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("post {post_id} by '{username}'")))?;

        self.comments.create(post.id, author_id, text).await
    }

    /// The post's thread in creation order, oldest first
    pub async fn comments_for(&self, post_id: i64) -> Result<Vec<Comment>> {
        let post = self
            .posts
            .get(post_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("post {post_id}")))?;

        self.comments.list_for_post(post.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn service() -> CommentService {
        let pool = PgPool::connect_lazy("postgres://localhost/unreachable").unwrap();
        CommentService::new(pool)
    }

    #[tokio::test]
    async fn anonymous_comment_is_rejected_before_any_io() {
        let err = service()
            .add_comment(&Viewer::Anonymous, "alice", 3, "nice post")
            .await
            .unwrap_err();
        match err {
            AppError::Unauthenticated { next } => assert_eq!(next, "/alice/3/comment/"),
            other => panic!("expected Unauthenticated, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn blank_comment_is_rejected_before_any_io() {
        let viewer = Viewer::User(Uuid::new_v4());
        let err = service()
            .add_comment(&viewer, "alice", 3, "  ")
            .await
            .unwrap_err();
        match err {
            AppError::Validation { field, .. } => assert_eq!(field, "text"),
            other => panic!("expected Validation, got {other:?}"),
        }
    }
}
