//! Telemetry metric name constants.
//!
//! Centralised metric names for futplot operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `futplot_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `kind`: request kind: "axis" or "player"
//! - `endpoint`: model endpoint that served or failed an attempt
//! - `status`: outcome: "ok" or "error"
//! - `reason`: rejection reason: "malformed" or "invalid_shape"

/// Total cache hits.
///
/// Labels: `kind`.
pub const CACHE_HITS_TOTAL: &str = "futplot_cache_hits_total";

/// Total cache misses.
///
/// Labels: `kind`.
pub const CACHE_MISSES_TOTAL: &str = "futplot_cache_misses_total";

/// Total validated payloads written to the cache.
///
/// Labels: `kind`.
pub const CACHE_WRITES_TOTAL: &str = "futplot_cache_writes_total";

/// Total generation attempts, one per endpoint tried.
///
/// Labels: `endpoint`, `status` ("ok" | "error").
pub const GENERATION_ATTEMPTS_TOTAL: &str = "futplot_generation_attempts_total";

/// Duration of a single generation attempt in seconds.
///
/// Labels: `endpoint`.
pub const GENERATION_DURATION_SECONDS: &str = "futplot_generation_duration_seconds";

/// Total invocations where every endpoint failed.
pub const FALLBACK_EXHAUSTED_TOTAL: &str = "futplot_fallback_exhausted_total";

/// Total model responses rejected before caching.
///
/// Labels: `kind`, `reason` ("malformed" | "invalid_shape").
pub const RESPONSES_REJECTED_TOTAL: &str = "futplot_responses_rejected_total";

/// Total players processed by the prewarm routine.
///
/// Labels: `status` ("ok" | "error").
pub const PREWARM_PLAYERS_TOTAL: &str = "futplot_prewarm_players_total";
