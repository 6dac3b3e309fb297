//! Builder for wiring an [`InsightService`].

use std::sync::Arc;

use tracing::info;

use super::InsightService;
use super::singleflight::SingleFlight;
use crate::cache::{CacheConfig, CacheStore, MemoryCache};
use crate::config::{CacheBackend, Config};
use crate::providers::FallbackInvoker;
use crate::stats::PlayerDirectory;
use crate::{FutplotError, Result};

/// Collects the injected collaborators of an [`InsightService`].
#[derive(Default)]
pub struct InsightServiceBuilder {
    cache: Option<Arc<dyn CacheStore>>,
    players: Option<Arc<dyn PlayerDirectory>>,
    invoker: Option<Arc<FallbackInvoker>>,
    coalesce_misses: bool,
}

impl InsightServiceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the cache store and generation chain described by `config`.
    ///
    /// The Gemini key is read from `GEMINI_API_KEY`. The player directory is
    /// left for the caller to set.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let cache = cache_from_config(config).await?;
        let invoker =
            FallbackInvoker::from_config(&config.generation, Config::gemini_api_key().as_deref())?;
        info!(
            backend = cache.name(),
            models = ?invoker.endpoint_names(),
            coalesce_misses = config.cache.coalesce_misses,
            "insight service configured"
        );
        Ok(Self::new()
            .cache(cache)
            .invoker(invoker)
            .coalesce_misses(config.cache.coalesce_misses))
    }

    /// Set the cache store.
    pub fn cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Use an in-memory cache with the given settings.
    pub fn memory_cache(self, config: &CacheConfig) -> Self {
        self.cache(Arc::new(MemoryCache::with_config(config)))
    }

    /// Set the player directory.
    pub fn players(mut self, players: Arc<dyn PlayerDirectory>) -> Self {
        self.players = Some(players);
        self
    }

    /// Set the fallback invoker.
    pub fn invoker(mut self, invoker: FallbackInvoker) -> Self {
        self.invoker = Some(Arc::new(invoker));
        self
    }

    /// Share an existing fallback invoker.
    pub fn shared_invoker(mut self, invoker: Arc<FallbackInvoker>) -> Self {
        self.invoker = Some(invoker);
        self
    }

    /// Coalesce concurrent misses on the same key (default: off).
    pub fn coalesce_misses(mut self, enabled: bool) -> Self {
        self.coalesce_misses = enabled;
        self
    }

    /// Build the service. Every collaborator must have been set.
    pub fn build(self) -> Result<InsightService> {
        let cache = self.cache.ok_or_else(|| missing("cache store"))?;
        let players = self.players.ok_or_else(|| missing("player directory"))?;
        let invoker = self.invoker.ok_or_else(|| missing("fallback invoker"))?;
        Ok(InsightService {
            cache,
            players,
            invoker,
            single_flight: self.coalesce_misses.then(|| Arc::new(SingleFlight::new())),
        })
    }
}

fn missing(what: &str) -> FutplotError {
    FutplotError::Configuration(format!("insight service requires a {what}"))
}

async fn cache_from_config(config: &Config) -> Result<Arc<dyn CacheStore>> {
    match config.cache.backend {
        CacheBackend::Memory => Ok(Arc::new(MemoryCache::with_config(
            &CacheConfig::new().max_entries(config.cache.max_entries),
        ))),
        #[cfg(feature = "redis")]
        CacheBackend::Redis => {
            let url = config.redis_url().ok_or_else(|| {
                FutplotError::Configuration(
                    "redis cache selected but neither REDIS_URL nor cache.url is set".to_string(),
                )
            })?;
            Ok(Arc::new(crate::cache::RedisCache::connect(&url).await?))
        }
        #[cfg(not(feature = "redis"))]
        CacheBackend::Redis => Err(FutplotError::Configuration(
            "redis cache selected but futplot was built without the `redis` feature".to_string(),
        )),
    }
}
