//! Container-backed integration tests for the cache-aside store.
//!
//! Requires Docker; run with `cargo test -p database -- --ignored`.

use database::redis::CacheStore;
use test_utils::TestRedis;

#[tokio::test]
#[ignore] // Requires Docker
async fn test_set_get_del_round_trip() {
    let redis = TestRedis::new().await;
    let cache = CacheStore::new(redis.connection(), 300);

    let key = CacheStore::entity_key("product", "abc");
    assert!(cache.get(&key).await.is_none());

    cache.set(&key, "{\"name\":\"Lamp\"}").await;
    assert_eq!(cache.get(&key).await.as_deref(), Some("{\"name\":\"Lamp\"}"));

    cache.del(&key).await;
    assert!(cache.get(&key).await.is_none());
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_json_round_trip() {
    let redis = TestRedis::new().await;
    let cache = CacheStore::new(redis.connection(), 300);

    #[derive(serde::Serialize, serde::Deserialize, PartialEq, Debug)]
    struct Entry {
        name: String,
        stock: i32,
    }

    let value = Entry {
        name: "Lamp".to_string(),
        stock: 7,
    };

    cache.set_json("product:json", &value).await;
    let loaded: Entry = cache.get_json("product:json").await.unwrap();
    assert_eq!(loaded, value);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_del_prefix_clears_every_page() {
    let redis = TestRedis::new().await;
    let cache = CacheStore::new(redis.connection(), 300);

    for page in 1..=5u64 {
        let key = CacheStore::list_key("orders", page, 10);
        cache.set(&key, "[]").await;
    }
    cache.set("order:abc", "{}").await;

    cache.del_prefix("orders:all:").await;

    for page in 1..=5u64 {
        let key = CacheStore::list_key("orders", page, 10);
        assert!(cache.get(&key).await.is_none(), "page {} not invalidated", page);
    }
    // Keys outside the prefix survive
    assert!(cache.get("order:abc").await.is_some());
}
