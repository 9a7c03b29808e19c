//! Cache key schema for rendered listing pages
//!
//! One key per listing scope. Key format: v{VERSION}:page:{scope}[:identifier]

use uuid::Uuid;

/// Cache schema version - increment when changing key formats
pub const CACHE_VERSION: u32 = 1;

/// Key builder for listing-page cache entries
pub struct PageKey;

impl PageKey {
    /// Home listing (all posts).
    /// The `index_page` literal is relied on by the boundary; do not rename.
    /// Format: v1:page:index_page
    pub fn index() -> String {
        format!("v{}:page:index_page", CACHE_VERSION)
    }

    /// Listing of one group's posts
    /// Format: v1:page:group:{slug}
    pub fn group(slug: &str) -> String {
        format!("v{}:page:group:{}", CACHE_VERSION, slug)
    }

    /// Listing of one author's posts
    /// Format: v1:page:author:{username}
    pub fn author(username: &str) -> String {
        format!("v{}:page:author:{}", CACHE_VERSION, username)
    }

    /// Per-follower feed of followed authors' posts
    /// Format: v1:page:following:{user_id}
    pub fn following(user_id: Uuid) -> String {
        format!("v{}:page:following:{}", CACHE_VERSION, user_id)
    }

    /// Extract the scope segment from a page key
    pub fn scope(key: &str) -> Option<&str> {
        let mut parts = key.splitn(3, ':');
        let _version = parts.next()?;
        match parts.next()? {
            "page" => parts.next(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_key_uses_index_page_literal() {
        assert_eq!(PageKey::index(), "v1:page:index_page");
    }

    #[test]
    fn group_and_author_keys_embed_identifier() {
        assert_eq!(PageKey::group("rust-lang"), "v1:page:group:rust-lang");
        assert_eq!(PageKey::author("alice"), "v1:page:author:alice");
    }

    #[test]
    fn following_key_is_per_user() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_ne!(PageKey::following(a), PageKey::following(b));
        assert!(PageKey::following(a).starts_with("v1:page:following:"));
    }

    #[test]
    fn scope_extraction() {
        assert_eq!(PageKey::scope(&PageKey::index()), Some("index_page"));
        assert_eq!(
            PageKey::scope(&PageKey::group("books")),
            Some("group:books")
        );
        assert_eq!(PageKey::scope("v1:other:thing"), None);
    }
}
