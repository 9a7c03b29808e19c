//! Feed builder
//!
//! Produces the paginated, reverse-chronological post listing for one of the
//! listing scopes. The first page of each scope can sit in the page cache;
//! every cache fault is a miss and the page is rebuilt from the store.

use std::sync::Arc;

use page_cache::{PageCache, PageKey};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::models::Post;
use crate::error::{AppError, Result};
use crate::pagination::Paginator;
use crate::repository::{GroupRepository, PostRepository, UserRepository};

/// Selection criterion for a feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedScope {
    /// All posts (the home page)
    Home,
    /// Posts filed under one group
    Group { slug: String },
    /// Posts by one author (the profile page)
    Author { username: String },
    /// Posts by authors the user follows
    Following { user_id: Uuid },
}

impl FeedScope {
    /// The scope's page-cache key; one key per scope
    pub fn cache_key(&self) -> String {
        match self {
            FeedScope::Home => PageKey::index(),
            FeedScope::Group { slug } => PageKey::group(slug),
            FeedScope::Author { username } => PageKey::author(username),
            FeedScope::Following { user_id } => PageKey::following(*user_id),
        }
    }
}

/// One rendered-ready page of a feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPage {
    pub posts: Vec<Post>,
    /// 1-based page number
    pub number: u64,
    pub total_count: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

pub struct FeedService {
    posts: PostRepository,
    groups: GroupRepository,
    users: UserRepository,
    cache: Option<Arc<PageCache>>,
}

impl FeedService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            posts: PostRepository::new(pool.clone()),
            groups: GroupRepository::new(pool.clone()),
            users: UserRepository::new(pool),
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

    /// Fetch one page of a feed. `page` is 1-based and defaults to 1; a page
    /// past the end comes back empty rather than erroring.
    pub async fn page(&self, scope: &FeedScope, page: Option<u64>) -> Result<FeedPage> {
        let number = Paginator::normalize(page);

        // Only the first page of a scope is cached; the key space is one key
        // per scope, not per (scope, page).
        if number == 1 {
            if let Some(cache) = self.cache() {
                let key = scope.cache_key();
                match cache.get::<FeedPage>(&key).await {
                    Ok(Some(cached)) => return Ok(cached),
                    Ok(None) => {}
                    Err(err) => warn!(key = %key, "page cache read failed, rebuilding: {err}"),
                }
            }
        }

        let built = self.build(scope, number).await?;

        if number == 1 {
            if let Some(cache) = self.cache() {
                let key = scope.cache_key();
                if let Err(err) = cache.set(&key, &built).await {
                    warn!(key = %key, "page cache write failed: {err}");
                }
            }
        }

        Ok(built)
    }

    async fn build(&self, scope: &FeedScope, number: u64) -> Result<FeedPage> {
        let (total_count, rows) = match scope {
            FeedScope::Home => {
                let total = self.posts.count_all().await?;
                let paginator = Paginator::new(total as u64);
                let rows = self
                    .posts
                    .list_all(paginator.limit() as i64, paginator.offset(number) as i64)
                    .await?;
                (total as u64, rows)
            }
            FeedScope::Group { slug } => {
                let group = self
                    .groups
                    .get_by_slug(slug)
                    .await?
                    .ok_or_else(|| AppError::not_found(format!("group '{slug}'")))?;
                let total = self.posts.count_by_group(group.id).await?;
                let paginator = Paginator::new(total as u64);
                let rows = self
                    .posts
                    .list_by_group(
                        group.id,
                        paginator.limit() as i64,
                        paginator.offset(number) as i64,
                    )
                    .await?;
                (total as u64, rows)
            }
            FeedScope::Author { username } => {
                let author = self
                    .users
                    .get_by_username(username)
                    .await?
                    .ok_or_else(|| AppError::not_found(format!("user '{username}'")))?;
                let total = self.posts.count_by_author(author.id).await?;
                let paginator = Paginator::new(total as u64);
                let rows = self
                    .posts
                    .list_by_author(
                        author.id,
                        paginator.limit() as i64,
                        paginator.offset(number) as i64,
                    )
                    .await?;
                (total as u64, rows)
            }
            FeedScope::Following { user_id } => {
                let total = self.posts.count_by_followed(*user_id).await?;
                let paginator = Paginator::new(total as u64);
                let rows = self
                    .posts
                    .list_by_followed(
                        *user_id,
                        paginator.limit() as i64,
                        paginator.offset(number) as i64,
                    )
                    .await?;
                (total as u64, rows)
            }
        };

        let paginator = Paginator::new(total_count);
        debug!(
            scope = %scope.cache_key(),
            page = number,
            rows = rows.len(),
            total = total_count,
            "feed page built"
        );

        Ok(FeedPage {
            posts: rows,
            number,
            total_count,
            total_pages: paginator.total_pages(),
            has_next: paginator.has_next(number),
            has_previous: paginator.has_previous(number),
        })
    }
}
