//! Integration tests for the page cache
//!
//! These tests require a running Redis instance.
//! Run with: cargo test --test integration_test -- --ignored

use page_cache::{PageCache, PageKey, DEFAULT_PAGE_TTL_SECS};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REDIS_URL: &str = "redis://127.0.0.1:6379";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Payload {
    post_ids: Vec<i64>,
    total: u64,
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn set_get_roundtrip_and_invalidate() {
    let cache = PageCache::connect(REDIS_URL, DEFAULT_PAGE_TTL_SECS)
        .await
        .expect("Failed to connect to Redis");

    let key = PageKey::group("integration-test-group");
    let payload = Payload {
        post_ids: vec![3, 2, 1],
        total: 3,
    };

    cache.set(&key, &payload).await.expect("set failed");
    let cached: Option<Payload> = cache.get(&key).await.expect("get failed");
    assert_eq!(cached, Some(payload));

    cache.invalidate(&key).await.expect("invalidate failed");
    let cached: Option<Payload> = cache.get(&key).await.expect("get failed");
    assert_eq!(cached, None, "entry must be gone after invalidation");
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn short_ttl_expires() {
    let cache = PageCache::connect(REDIS_URL, DEFAULT_PAGE_TTL_SECS)
        .await
        .expect("Failed to connect to Redis");

    let key = PageKey::author("integration-test-author");
    let payload = Payload {
        post_ids: vec![1],
        total: 1,
    };

    cache
        .set_with_ttl(&key, &payload, Duration::from_secs(1))
        .await
        .expect("set failed");

    // Jitter can stretch a 1s TTL to at most 2s
    tokio::time::sleep(Duration::from_millis(2500)).await;

    let cached: Option<Payload> = cache.get(&key).await.expect("get failed");
    assert_eq!(cached, None, "entry must expire after its TTL");
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn batch_invalidation_clears_all_keys() {
    let cache = PageCache::connect(REDIS_URL, DEFAULT_PAGE_TTL_SECS)
        .await
        .expect("Failed to connect to Redis");

    let keys = vec![
        PageKey::index(),
        PageKey::group("batch-a"),
        PageKey::group("batch-b"),
    ];
    let payload = Payload {
        post_ids: vec![],
        total: 0,
    };

    for key in &keys {
        cache.set(key, &payload).await.expect("set failed");
    }

    cache
        .invalidate_many(&keys)
        .await
        .expect("batch invalidate failed");

    for key in &keys {
        let cached: Option<Payload> = cache.get(key).await.expect("get failed");
        assert_eq!(cached, None, "key {key} must be gone");
    }
}
