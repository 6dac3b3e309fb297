//! Request kinds served by the get-or-generate path.
//!
//! Each kind supplies the four things that differ between call sites: the
//! cache key, the TTL, the prompt and the shape validator. Everything else
//! (probe, fallback, fence stripping, parse, write-back) is shared and lives
//! in [`InsightService`](crate::InsightService).

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::Result;

pub mod axis;
pub mod parse;
pub mod player;
pub mod prompts;

pub use axis::{AXIS_INSIGHT_TTL, AxisInsight, AxisInsightRequest};
pub use player::{PLAYER_INSIGHT_TTL, PREWARM_TTL, PlayerInsightRequest, PlayerReport};

/// One kind of generated insight.
pub trait InsightKind: Send + Sync {
    /// Validated payload, as returned to callers and stored in the cache.
    type Payload: Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Short name used in metric labels and logs (`"axis"`, `"player"`).
    const KIND: &'static str;

    /// Cache key, derived from canonical parameters only.
    fn cache_key(&self) -> String;

    /// Lifetime of a cached payload.
    fn ttl(&self) -> Duration;

    fn prompt(&self) -> String;

    /// Check parsed model output and build the payload.
    ///
    /// Fails with `InvalidShape` if a required field is missing or has the
    /// wrong type.
    fn validate(&self, value: &Value) -> Result<Self::Payload>;
}
