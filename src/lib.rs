//! futplot - cached, validated LLM insights for football statistics
//!
//! The crate sits between a player-statistics store and a rate-limited
//! generation API. Every insight request derives a cache key, probes the
//! cache, and only on a miss builds a prompt, walks the model fallback
//! chain, validates the returned JSON and stores it with a TTL.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use futplot::{CacheConfig, FallbackInvoker, GeminiClient, InMemoryPlayers, InsightService};
//!
//! #[tokio::main]
//! async fn main() -> futplot::Result<()> {
//!     let gemini = GeminiClient::new("your-gemini-key")?;
//!     let invoker = FallbackInvoker::new()
//!         .with_endpoint(Arc::new(gemini.model("gemini-2.5-flash-lite")))
//!         .with_endpoint(Arc::new(gemini.model("gemini-2.5-flash")));
//!
//!     let players = InMemoryPlayers::from_json_file("players.json".as_ref())?;
//!
//!     let service = InsightService::builder()
//!         .memory_cache(&CacheConfig::default())
//!         .players(Arc::new(players))
//!         .invoker(invoker)
//!         .build()?;
//!
//!     let labels = service.axis_insight("goals_minus_xg", "assists_minus_xa").await?;
//!     println!("x: {} / {}", labels.x_positive, labels.x_negative);
//!
//!     let report = service.player_insight("messi").await?;
//!     println!("{} ({}): {}", report.player, report.rating, report.summary);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod envelope;
pub mod error;
pub mod insight;
pub mod prewarm;
pub mod providers;
pub mod service;
pub mod stats;
pub mod telemetry;

// Re-export main types at crate root
pub use cache::{CacheConfig, CacheStore, MemoryCache};
#[cfg(feature = "redis")]
pub use cache::RedisCache;
pub use config::Config;
pub use envelope::Envelope;
pub use error::{EndpointFailure, ErrorKind, FutplotError, Result};
pub use insight::{AxisInsight, AxisInsightRequest, InsightKind, PlayerInsightRequest, PlayerReport};
pub use prewarm::{PrewarmFailure, PrewarmReport, Prewarmer};
pub use providers::{FallbackInvoker, GeminiClient, GeminiModel, GenerateProvider, GenerationResult};
pub use service::{InsightService, InsightServiceBuilder};
#[cfg(feature = "postgres")]
pub use stats::PgPlayers;
pub use stats::{InMemoryPlayers, Metric, Player, PlayerDirectory};
