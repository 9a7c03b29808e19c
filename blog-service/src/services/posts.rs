//! Post service - the write path for posts
//!
//! Creating (or editing, or deleting) a post proactively invalidates every
//! listing the post appears in: the home page, its group page, its author's
//! profile page, and the followed feed of each of the author's followers.
//! Invalidation is fire-and-forget; a cache fault never fails the write.

use std::sync::Arc;

use page_cache::{PageCache, PageKey};
use sqlx::PgPool;
use tracing::warn;

use crate::domain::models::{Comment, Post, User};
use crate::domain::viewer::Viewer;
use crate::error::{AppError, Result};
use crate::repository::{
    CommentRepository, FollowRepository, GroupRepository, PostRepository, UserRepository,
};
use crate::services::non_blank;

/// Everything the post page shows: the post, its author, the author's post
/// count, and the comment thread.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: Post,
    pub author: User,
    pub author_post_count: u64,
    pub comments: Vec<Comment>,
}

pub struct PostService {
    posts: PostRepository,
    groups: GroupRepository,
    users: UserRepository,
    follows: FollowRepository,
    comments: CommentRepository,
    cache: Option<Arc<PageCache>>,
}

impl PostService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            posts: PostRepository::new(pool.clone()),
            groups: GroupRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            follows: FollowRepository::new(pool.clone()),
            comments: CommentRepository::new(pool),
            cache: None,
        }
    }

    pub fn with_cache(pool: PgPool, cache: Arc<PageCache>) -> Self {
        Self {
            cache: Some(cache),
            ..Self::new(pool)
        }
    }

    fn cache(&self) -> Option<&Arc<PageCache>> {
        self.cache.as_ref()
    }

    /// Create a new post for the signed-in viewer
    pub async fn create_post(
        &self,
        viewer: &Viewer,
        text: &str,
        group_slug: Option<&str>,
        image: Option<&str>,
    ) -> Result<Post> {
        let author_id = viewer.require_user("/new/")?;
        non_blank("text", text)?;

        let group_id = match group_slug {
            Some(slug) => {
                let group = self
                    .groups
                    .get_by_slug(slug)
                    .await?
                    .ok_or_else(|| AppError::not_found(format!("group '{slug}'")))?;
                Some(group.id)
            }
            None => None,
        };

        let post = self.posts.create(author_id, text, group_id, image).await?;
        self.invalidate_listings(&post).await;

        Ok(post)
    }

    /// The post page: post addressed by (author username, id), with author
    /// stats and the comment thread
    pub async fn get_post(&self, username: &str, post_id: i64) -> Result<PostDetail> {
        let post = self
            .posts
            .get_by_author_username(username, post_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("post {post_id} by '{username}'")))?;

        let author = self
            .users
            .get(post.author_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("user '{username}'")))?;

        let author_post_count = self.posts.count_by_author(author.id).await? as u64;
        let comments = self.comments.list_for_post(post.id).await?;

        Ok(PostDetail {
            post,
            author,
            author_post_count,
            comments,
        })
    }

    /// Replace a post's text/group/image. Author-only.
    pub async fn edit_post(
        &self,
        viewer: &Viewer,
        username: &str,
        post_id: i64,
        text: &str,
        group_slug: Option<&str>,
        image: Option<&str>,
    ) -> Result<Post> {
        let user_id = viewer.require_user(format!("/{username}/{post_id}/edit/"))?;
        non_blank("text", text)?;

        let post = self
            .posts
            .get_by_author_username(username, post_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("post {post_id} by '{username}'")))?;

        if post.author_id != user_id {
            return Err(AppError::Forbidden(
                "only the author can edit a post".into(),
            ));
        }

        let group_id = match group_slug {
            Some(slug) => {
                let group = self
                    .groups
                    .get_by_slug(slug)
                    .await?
                    .ok_or_else(|| AppError::not_found(format!("group '{slug}'")))?;
                Some(group.id)
            }
            None => None,
        };

        let updated = self
            .posts
            .update(post.id, text, group_id, image)
            .await?
            .ok_or_else(|| AppError::not_found(format!("post {post_id}")))?;

        // The old group's listing changes too if the post moved out of it
        self.invalidate_listings(&post).await;
        if updated.group_id != post.group_id {
            self.invalidate_listings(&updated).await;
        }

        Ok(updated)
    }

    /// Remove a post and its comment thread. Author-only.
    pub async fn delete_post(&self, viewer: &Viewer, username: &str, post_id: i64) -> Result<()> {
        let user_id = viewer.require_user(format!("/{username}/{post_id}/delete/"))?;

        let post = self
            .posts
            .get_by_author_username(username, post_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("post {post_id} by '{username}'")))?;

        if post.author_id != user_id {
            return Err(AppError::Forbidden(
                "only the author can delete a post".into(),
            ));
        }

        self.posts.delete(post.id).await?;
        self.invalidate_listings(&post).await;

        Ok(())
    }

    /// Drop every cached listing this post appears in. Best effort: faults
    /// are logged and the TTL picks up the slack.
    async fn invalidate_listings(&self, post: &Post) {
        let Some(cache) = self.cache() else {
            return;
        };

        let mut keys = vec![PageKey::index()];

        if let Some(group_id) = post.group_id {
            match self.groups.get(group_id).await {
                Ok(Some(group)) => keys.push(PageKey::group(&group.slug)),
                Ok(None) => {}
                Err(err) => warn!(%group_id, "group lookup for invalidation failed: {err}"),
            }
        }

        match self.users.get(post.author_id).await {
            Ok(Some(author)) => keys.push(PageKey::author(&author.username)),
            Ok(None) => {}
            Err(err) => {
                warn!(author_id = %post.author_id, "author lookup for invalidation failed: {err}")
            }
        }

        match self.follows.follower_ids(post.author_id).await {
            Ok(follower_ids) => {
                keys.extend(follower_ids.into_iter().map(PageKey::following));
            }
            Err(err) => {
                warn!(author_id = %post.author_id, "follower fan-out for invalidation failed: {err}")
            }
        }

        if let Err(err) = cache.invalidate_many(&keys).await {
            warn!(count = keys.len(), "page cache invalidation failed: {err}");
        }
    }
}
