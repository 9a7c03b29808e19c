//! Repository for Post operations
//!
//! Each listing scope is its own fully-specified query: filter, order, and
//! page window are all explicit here rather than assembled by callers. Every
//! listing orders newest first with the serial id (insertion order) breaking
//! timestamp ties, so pagination is deterministic.

use crate::domain::models::Post;
use crate::error::Result;
use sqlx::PgPool;
use uuid::Uuid;

const POST_COLUMNS: &str = "id, text, author_id, group_id, image, created_at";

#[derive(Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new post
    pub async fn create(
        &self,
        author_id: Uuid,
        text: &str,
        group_id: Option<Uuid>,
        image: Option<&str>,
    ) -> Result<Post> {
        let post = sqlx::query_as::<_, Post>(&format!(
            r#"
            INSERT INTO posts (text, author_id, group_id, image)
            VALUES ($1, $2, $3, $4)
            RETURNING {POST_COLUMNS}
            "#,
        ))
        .bind(text)
        .bind(author_id)
        .bind(group_id)
        .bind(image)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    pub async fn get(&self, post_id: i64) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE id = $1
            "#,
        ))
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    /// Look a post up the way the post route addresses it: by id under its
    /// author's username. A wrong (username, id) pairing is a miss.
    pub async fn get_by_author_username(
        &self,
        username: &str,
        post_id: i64,
    ) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(&format!(
            r#"
            SELECT p.{0}
            FROM posts p
            JOIN users u ON u.id = p.author_id
            WHERE p.id = $1 AND u.username = $2
            "#,
            POST_COLUMNS.replace(", ", ", p."),
        ))
        .bind(post_id)
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    // ===== Listing scope: all posts =====

    pub async fn list_all(&self, limit: i64, offset: i64) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            ORDER BY created_at DESC, id ASC
            LIMIT $1 OFFSET $2
            "#,
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    pub async fn count_all(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // ===== Listing scope: posts in a group =====

    pub async fn list_by_group(
        &self,
        group_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE group_id = $1
            ORDER BY created_at DESC, id ASC
            LIMIT $2 OFFSET $3
            "#,
        ))
        .bind(group_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    pub async fn count_by_group(&self, group_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE group_id = $1")
            .bind(group_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // ===== Listing scope: posts by one author =====

    pub async fn list_by_author(
        &self,
        author_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE author_id = $1
            ORDER BY created_at DESC, id ASC
            LIMIT $2 OFFSET $3
            "#,
        ))
        .bind(author_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    pub async fn count_by_author(&self, author_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // ===== Listing scope: posts by authors the viewer follows =====

    pub async fn list_by_followed(
        &self,
        follower_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Post>> {
        // The (follower_id, author_id) primary key on follows guarantees at
        // most one edge per author, so the join cannot duplicate posts.
        let posts = sqlx::query_as::<_, Post>(&format!(
            r#"
            SELECT p.{0}
            FROM posts p
            JOIN follows f ON f.author_id = p.author_id
            WHERE f.follower_id = $1
            ORDER BY p.created_at DESC, p.id ASC
            LIMIT $2 OFFSET $3
            "#,
            POST_COLUMNS.replace(", ", ", p."),
        ))
        .bind(follower_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    pub async fn count_by_followed(&self, follower_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM posts p
            JOIN follows f ON f.author_id = p.author_id
            WHERE f.follower_id = $1
            "#,
        )
        .bind(follower_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    // ===== Edits (author-only, enforced by the service layer) =====

    pub async fn update(
        &self,
        post_id: i64,
        text: &str,
        group_id: Option<Uuid>,
        image: Option<&str>,
    ) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(&format!(
            r#"
            UPDATE posts
            SET text = $2, group_id = $3, image = $4
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "#,
        ))
        .bind(post_id)
        .bind(text)
        .bind(group_id)
        .bind(image)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    /// Delete a post; its comments go with it (FK cascade)
    pub async fn delete(&self, post_id: i64) -> Result<bool> {
        let affected = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(post_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(affected > 0)
    }
}
