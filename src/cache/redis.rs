//! Redis-backed cache store.
//!
//! Values are stored as JSON strings; Redis enforces the TTL through
//! `SET key value EX seconds`. Prefix deletion walks the keyspace with
//! incremental `SCAN` so a large keyspace never blocks the server.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;
use serde_json::Value;
use tracing::warn;

use super::CacheStore;
use crate::{FutplotError, Result};

/// Keys deleted per `DEL` round trip.
const DELETE_BATCH: usize = 100;

/// Redis-backed [`CacheStore`].
///
/// Holds one multiplexed connection opened at construction; clones of it
/// share the underlying socket, so the store is cheap to use concurrently.
pub struct RedisCache {
    conn: MultiplexedConnection,
}

impl RedisCache {
    /// Connect to Redis at `url` (e.g. `redis://127.0.0.1:6379`).
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| FutplotError::Configuration(format!("invalid Redis URL: {e}")))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| FutplotError::Cache(format!("Redis connection error: {e}")))?;
        Ok(Self { conn })
    }

    /// Collect all keys matching `pattern` via incremental `SCAN`.
    async fn scan_keys(&self, pattern: &str) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        let mut keys = Vec::new();
        let mut cursor: u64 = 0;
        loop {
            let (next_cursor, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await
                .map_err(|e| FutplotError::Cache(format!("Redis SCAN error: {e}")))?;
            keys.extend(batch);
            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }
        Ok(keys)
    }
}

/// Decode a stored value. Anything that is not JSON reads as a miss so the
/// next generation overwrites it.
fn decode_entry(key: &str, json: &str) -> Option<Value> {
    match serde_json::from_str(json) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "discarding corrupt cache entry");
            None
        }
    }
}

/// Escape glob metacharacters so a literal prefix can be used in `MATCH`.
fn escape_glob(prefix: &str) -> String {
    let mut escaped = String::with_capacity(prefix.len());
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl CacheStore for RedisCache {
    fn name(&self) -> &str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| FutplotError::Cache(format!("Redis GET error: {e}")))?;
        Ok(raw.and_then(|json| decode_entry(key, &json)))
    }

    async fn set(&self, key: &str, value: &Value, ttl: Duration) -> Result<()> {
        let mut conn = self.conn.clone();
        let json = serde_json::to_string(value)?;
        // Redis rejects EX 0; sub-second TTLs round up to one second.
        let seconds = ttl.as_secs().max(1);
        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(json)
            .arg("EX")
            .arg(seconds)
            .query_async(&mut conn)
            .await
            .map_err(|e| FutplotError::Cache(format!("Redis SET error: {e}")))?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let removed: u64 = conn
            .del(key)
            .await
            .map_err(|e| FutplotError::Cache(format!("Redis DEL error: {e}")))?;
        Ok(removed > 0)
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<u64> {
        let pattern = format!("{}*", escape_glob(prefix));
        let keys = self.scan_keys(&pattern).await?;

        let mut conn = self.conn.clone();
        let mut removed = 0;
        for chunk in keys.chunks(DELETE_BATCH) {
            let n: u64 = conn
                .del(chunk)
                .await
                .map_err(|e| FutplotError::Cache(format!("Redis DEL error: {e}")))?;
            removed += n;
        }
        Ok(removed)
    }
}
