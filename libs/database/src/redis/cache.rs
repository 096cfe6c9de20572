use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

/// Redis-backed cache-aside store.
///
/// Keys follow the `<entity>:<id>` / `<entity-plural>:all:<page>:<limit>`
/// scheme used by the services. Cache failures never fail a request: reads
/// degrade to a miss and writes are logged and dropped.
#[derive(Clone)]
pub struct CacheStore {
    conn: ConnectionManager,
    default_ttl_secs: u64,
}

impl CacheStore {
    pub fn new(conn: ConnectionManager, default_ttl_secs: u64) -> Self {
        Self {
            conn,
            default_ttl_secs,
        }
    }

    /// Key for a single entity, e.g. `order:<id>`.
    pub fn entity_key(entity: &str, id: impl std::fmt::Display) -> String {
        format!("{}:{}", entity, id)
    }

    /// Key for a paginated listing, e.g. `orders:all:<page>:<limit>`.
    pub fn list_key(entity_plural: &str, page: u64, limit: u64) -> String {
        format!("{}:all:{}:{}", entity_plural, page, limit)
    }

    /// Get a raw string value. Errors degrade to a miss.
    pub async fn get(&self, key: &str) -> Option<String> {
        let mut conn = self.conn.clone();
        match conn.get::<_, Option<String>>(key).await {
            Ok(Some(value)) => {
                debug!(key, "Cache hit");
                Some(value)
            }
            Ok(None) => {
                debug!(key, "Cache miss");
                None
            }
            Err(e) => {
                warn!(key, "Cache read failed, treating as miss: {}", e);
                None
            }
        }
    }

    /// Get and deserialize a JSON value. Decode failures degrade to a miss.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key).await?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, "Cache entry failed to decode, treating as miss: {}", e);
                None
            }
        }
    }

    /// Set a raw string value with the default TTL.
    pub async fn set(&self, key: &str, value: &str) {
        self.set_with_ttl(key, value, self.default_ttl_secs).await;
    }

    /// Set a raw string value with a custom TTL.
    pub async fn set_with_ttl(&self, key: &str, value: &str, ttl_secs: u64) {
        let mut conn = self.conn.clone();
        if let Err(e) = conn.set_ex::<_, _, ()>(key, value, ttl_secs).await {
            warn!(key, "Cache write failed: {}", e);
        } else {
            debug!(key, ttl_secs, "Cache set");
        }
    }

    /// Serialize and store a JSON value with the default TTL.
    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => self.set(key, &raw).await,
            Err(e) => warn!(key, "Cache value failed to encode: {}", e),
        }
    }

    /// Delete a single key.
    pub async fn del(&self, key: &str) {
        let mut conn = self.conn.clone();
        if let Err(e) = conn.del::<_, ()>(key).await {
            warn!(key, "Cache delete failed: {}", e);
        } else {
            debug!(key, "Cache deleted");
        }
    }

    /// Delete every key matching `<prefix>*`.
    ///
    /// Listing caches are keyed per page, so write paths invalidate the whole
    /// prefix (e.g. `orders:all:`) rather than guessing page numbers.
    pub async fn del_prefix(&self, prefix: &str) {
        let mut conn = self.conn.clone();
        let pattern = format!("{}*", prefix);

        let mut keys: Vec<String> = Vec::new();
        let mut cursor: u64 = 0;
        loop {
            let (next, batch): (u64, Vec<String>) = match redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await
            {
                Ok(reply) => reply,
                Err(e) => {
                    warn!(pattern, "Cache scan failed: {}", e);
                    return;
                }
            };

            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }

        if keys.is_empty() {
            return;
        }

        if let Err(e) = conn.del::<_, ()>(&keys).await {
            warn!(pattern, "Cache prefix delete failed: {}", e);
        } else {
            debug!(pattern, count = keys.len(), "Cache prefix deleted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_key_scheme() {
        assert_eq!(CacheStore::entity_key("order", "abc"), "order:abc");
        let id = uuid::Uuid::nil();
        assert_eq!(
            CacheStore::entity_key("product", id),
            format!("product:{}", id)
        );
    }

    #[test]
    fn test_list_key_scheme() {
        assert_eq!(CacheStore::list_key("orders", 1, 10), "orders:all:1:10");
        assert_eq!(CacheStore::list_key("images", 3, 25), "images:all:3:25");
    }
}
