//! Caching subsystem.
//!
//! Validated insight payloads are stored as JSON under namespaced string
//! keys with a per-entry TTL. Expiry is the store's job: a read after the
//! TTL has elapsed reports a miss, and callers never compare timestamps.
//!
//! Two backends implement [`CacheStore`]:
//!
//! - [`MemoryCache`]: in-process moka cache with per-entry expiry. Good
//!   for a single process and for tests.
//! - `RedisCache` (feature `redis`): shared store for multiple processes,
//!   expiry via `SET ... EX`.
//!
//! Writes are unconditional overwrites. Two concurrent generations for the
//! same key both write, and whichever lands last wins.

pub mod keys;
pub mod memory;
#[cfg(feature = "redis")]
pub mod redis;

pub use memory::{CacheConfig, MemoryCache};
#[cfg(feature = "redis")]
pub use self::redis::RedisCache;

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::Result;

/// TTL-capable key-value store for validated payloads.
///
/// A miss is `Ok(None)`, never an error. Errors are reserved for the store
/// itself being unreachable or failing the command. A stored value that
/// cannot be decoded reads as a miss.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Backend name for logging/debugging.
    fn name(&self) -> &str;

    /// Look up a key. Expired entries are reported as absent.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Store a value, replacing any existing entry, expiring after `ttl`.
    async fn set(&self, key: &str, value: &Value, ttl: Duration) -> Result<()>;

    /// Remove a single key. Returns whether an entry was present.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Remove every key starting with `prefix`. Returns the number removed.
    async fn delete_prefix(&self, prefix: &str) -> Result<u64>;
}
