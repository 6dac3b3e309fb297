//! The get-or-generate orchestrator.
//!
//! ```text
//! caller params
//!     │ resolve (InvalidParameter / NotFound)
//!     ▼
//! cache key ──► cache.get ──► hit ──► payload
//!     │ miss
//!     ▼
//! prompt ──► FallbackInvoker ──► strip fences ──► parse ──► validate
//!                                                              │
//!                                        cache.set(key, ttl) ◄─┘
//!                                                              │
//!                                                           payload
//! ```
//!
//! Nothing is written to the cache on any failure path.

mod builder;
pub mod singleflight;

use std::sync::Arc;

use tracing::{debug, instrument, warn};

pub use builder::InsightServiceBuilder;
use singleflight::SingleFlight;

use crate::cache::CacheStore;
use crate::insight::parse::parse_json;
use crate::insight::{
    AxisInsight, AxisInsightRequest, InsightKind, PlayerInsightRequest, PlayerReport,
};
use crate::providers::FallbackInvoker;
use crate::stats::PlayerDirectory;
use crate::telemetry;
use crate::{FutplotError, Result};

/// Cached, validated access to generated insights.
///
/// Cheap to clone; clones share the cache, directory and invoker.
#[derive(Clone)]
pub struct InsightService {
    cache: Arc<dyn CacheStore>,
    players: Arc<dyn PlayerDirectory>,
    invoker: Arc<FallbackInvoker>,
    single_flight: Option<Arc<SingleFlight>>,
}

impl InsightService {
    /// Create a new builder.
    pub fn builder() -> InsightServiceBuilder {
        InsightServiceBuilder::new()
    }

    pub fn cache(&self) -> &Arc<dyn CacheStore> {
        &self.cache
    }

    pub fn players(&self) -> &Arc<dyn PlayerDirectory> {
        &self.players
    }

    pub fn invoker(&self) -> &Arc<FallbackInvoker> {
        &self.invoker
    }

    /// Whether concurrent misses on one key are coalesced.
    pub fn coalesces_misses(&self) -> bool {
        self.single_flight.is_some()
    }

    /// Labels for the `(x, y)` axis pair. Order matters.
    #[instrument(skip(self))]
    pub async fn axis_insight(&self, x: &str, y: &str) -> Result<AxisInsight> {
        let request = AxisInsightRequest::resolve(x, y)?;
        self.get_or_generate(&request).await
    }

    /// Scouting report for the player best matching `name`.
    ///
    /// The cache key uses the resolved canonical name, so "messi" and
    /// "Lionel Messi" share one entry.
    #[instrument(skip(self))]
    pub async fn player_insight(&self, name: &str) -> Result<PlayerReport> {
        let player = self
            .players
            .find_player(name)
            .await?
            .ok_or_else(|| FutplotError::NotFound(format!("player not found: {}", name.trim())))?;
        debug!(query = name, resolved = %player.name, "player resolved");
        self.get_or_generate(&PlayerInsightRequest::new(player)).await
    }

    /// Return the cached payload for `request`, generating and storing it on
    /// a miss.
    pub async fn get_or_generate<K: InsightKind>(&self, request: &K) -> Result<K::Payload> {
        let key = request.cache_key();
        if let Some(payload) = self.lookup::<K>(&key).await? {
            record_probe(K::KIND, true);
            debug!(kind = K::KIND, key = %key, "cache hit");
            return Ok(payload);
        }
        record_probe(K::KIND, false);
        debug!(kind = K::KIND, key = %key, "cache miss");

        let Some(single_flight) = &self.single_flight else {
            return self.generate_and_store(request).await;
        };

        let _guard = single_flight.acquire(&key).await;
        // Another caller may have filled the key while we waited.
        if let Some(payload) = self.lookup::<K>(&key).await? {
            debug!(kind = K::KIND, key = %key, "coalesced miss served from cache");
            return Ok(payload);
        }
        self.generate_and_store(request).await
    }

    /// Generate, validate and store the payload for `request` without
    /// probing the cache first.
    #[instrument(skip(self, request), fields(kind = K::KIND, key = %request.cache_key()))]
    pub async fn generate_and_store<K: InsightKind>(&self, request: &K) -> Result<K::Payload> {
        let generation = self.invoker.generate(&request.prompt()).await?;
        debug!(served_by = %generation.served_by, "generation succeeded");

        let payload = parse_json(&generation.raw_text)
            .and_then(|value| request.validate(&value))
            .inspect_err(|e| {
                record_rejection(K::KIND, e);
                warn!(served_by = %generation.served_by, error = %e, "model response rejected");
            })?;

        let value = serde_json::to_value(&payload)?;
        self.cache
            .set(&request.cache_key(), &value, request.ttl())
            .await?;
        metrics::counter!(telemetry::CACHE_WRITES_TOTAL, "kind" => K::KIND).increment(1);
        Ok(payload)
    }

    /// Read and decode a cached payload. An undecodable entry counts as a
    /// miss and is overwritten by the next generation.
    async fn lookup<K: InsightKind>(&self, key: &str) -> Result<Option<K::Payload>> {
        let Some(value) = self.cache.get(key).await? else {
            return Ok(None);
        };
        match serde_json::from_value::<K::Payload>(value) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) => {
                warn!(key, error = %e, "discarding undecodable cache entry");
                Ok(None)
            }
        }
    }
}

fn record_probe(kind: &'static str, hit: bool) {
    let name = if hit {
        telemetry::CACHE_HITS_TOTAL
    } else {
        telemetry::CACHE_MISSES_TOTAL
    };
    metrics::counter!(name, "kind" => kind).increment(1);
}

fn record_rejection(kind: &'static str, error: &FutplotError) {
    let reason = match error {
        FutplotError::MalformedResponse(_) => "malformed",
        _ => "invalid_shape",
    };
    metrics::counter!(telemetry::RESPONSES_REJECTED_TOTAL,
        "kind" => kind,
        "reason" => reason,
    )
    .increment(1);
}

