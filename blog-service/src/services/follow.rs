//! Follow graph service
//!
//! Maintains the directed follower -> author relation. Both follow and
//! unfollow are idempotent; self-follows are rejected outright.

use std::sync::Arc;

use page_cache::{PageCache, PageKey};
use sqlx::PgPool;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::viewer::Viewer;
use crate::error::{AppError, Result};
use crate::repository::{FollowRepository, UserRepository};

pub struct FollowService {
    users: UserRepository,
    follows: FollowRepository,
    cache: Option<Arc<PageCache>>,
}

impl FollowService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            follows: FollowRepository::new(pool),
            cache: None,
        }
    }

    pub fn with_cache(pool: PgPool, cache: Arc<PageCache>) -> Self {
        Self {
            cache: Some(cache),
            ..Self::new(pool)
        }
    }

    /// The follower's cached followed feed is built from the edge set, so
    /// any edge change makes it stale; drop it. Best effort, the TTL picks
    /// up the slack.
    async fn invalidate_following(&self, follower_id: Uuid) {
        let Some(cache) = self.cache.as_ref() else {
            return;
        };

        let key = PageKey::following(follower_id);
        if let Err(err) = cache.invalidate(&key).await {
            warn!(key = %key, "page cache invalidation failed: {err}");
        }
    }

    /// Follow the author behind `username`. Returns true if a new edge was
    /// created; a repeat follow is a no-op returning false.
    pub async fn follow(&self, viewer: &Viewer, username: &str) -> Result<bool> {
        let follower_id = viewer.require_user(format!("/{username}/follow/"))?;

        let author = self
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| AppError::not_found(format!("user '{username}'")))?;

        if author.id == follower_id {
            return Err(AppError::SelfFollow);
        }

        let created = self.follows.create(follower_id, author.id).await?;
        if created {
            self.invalidate_following(follower_id).await;
        }
        debug!(%follower_id, author_id = %author.id, created, "follow");
        Ok(created)
    }

    /// Remove the edge to `username` if present; removing an absent edge is
    /// a no-op returning false, not an error.
    pub async fn unfollow(&self, viewer: &Viewer, username: &str) -> Result<bool> {
        let follower_id = viewer.require_user(format!("/{username}/unfollow/"))?;

        let author = self
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| AppError::not_found(format!("user '{username}'")))?;

        let removed = self.follows.delete(follower_id, author.id).await?;
        if removed {
            self.invalidate_following(follower_id).await;
        }
        debug!(%follower_id, author_id = %author.id, removed, "unfollow");
        Ok(removed)
    }

    /// Authors the user follows; the input set for the followed feed
    pub async fn following(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        self.follows.following_ids(user_id).await
    }

    pub async fn is_following(&self, follower_id: Uuid, author_id: Uuid) -> Result<bool> {
        self.follows.is_following(follower_id, author_id).await
    }

    pub async fn follower_count(&self, author_id: Uuid) -> Result<u64> {
        Ok(self.follows.follower_count(author_id).await? as u64)
    }

    pub async fn following_count(&self, user_id: Uuid) -> Result<u64> {
        Ok(self.follows.following_count(user_id).await? as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> FollowService {
        let pool = PgPool::connect_lazy("postgres://localhost/unreachable").unwrap();
        FollowService::new(pool)
    }

    #[tokio::test]
    async fn anonymous_follow_redirects_to_login_with_next() {
        let err = service()
            .follow(&Viewer::Anonymous, "alice")
            .await
            .unwrap_err();
        match err {
            AppError::Unauthenticated { next } => assert_eq!(next, "/alice/follow/"),
            other => panic!("expected Unauthenticated, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn anonymous_unfollow_redirects_to_login_with_next() {
        let err = service()
            .unfollow(&Viewer::Anonymous, "alice")
            .await
            .unwrap_err();
        match err {
            AppError::Unauthenticated { next } => assert_eq!(next, "/alice/unfollow/"),
            other => panic!("expected Unauthenticated, got {other:?}"),
        }
    }
}
