//! Ordered fallback across generation endpoints.
//!
//! The `FallbackInvoker` stores endpoints in priority order (index 0 =
//! highest). A generation request tries them in order until one produces
//! text.
//!
//! # Fallback Triggers
//!
//! Every per-endpoint failure falls through to the next endpoint: non-success
//! status, unreadable envelope, network error, empty text, or the attempt
//! exceeding its time bound. The reason is recorded, not raised.
//!
//! `Configuration` errors are terminal and stop the chain: all endpoints
//! share one credential, so the next one would fail the same way.
//!
//! # Fallback Chain Flow
//!
//! ```text
//! invoker.generate(prompt)
//!             │
//!             ▼
//!   ┌──────────────────────┐
//!   │ gemini-2.5-flash-lite│ ──► 429 rate limited ──► record, next
//!   │ (priority 0)         │
//!   └──────────┬───────────┘
//!              ▼
//!   ┌──────────────────────┐
//!   │ gemini-2.5-flash     │ ──► text ──► GenerationResult { served_by }
//!   │ (priority 1)         │
//!   └──────────────────────┘
//! ```
//!
//! There is no retry within an endpoint and no backoff between endpoints;
//! callers that want either add it above this layer.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, instrument, warn};

use super::gemini::GeminiClient;
use super::traits::GenerateProvider;
use crate::config::GenerationConfig;
use crate::error::EndpointFailure;
use crate::telemetry;
use crate::{FutplotError, Result};

/// Default upper bound for a single endpoint attempt.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(20);

/// Raw text from the endpoint that answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    /// Unparsed model output.
    pub raw_text: String,
    /// Identifier of the endpoint that produced `raw_text`.
    pub served_by: String,
}

/// Tries generation endpoints in priority order.
///
/// Stateless across invocations; safe to share behind an `Arc`.
pub struct FallbackInvoker {
    endpoints: Vec<Arc<dyn GenerateProvider>>,
    attempt_timeout: Duration,
}

impl Default for FallbackInvoker {
    fn default() -> Self {
        Self {
            endpoints: Vec::new(),
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }
}

impl FallbackInvoker {
    /// Create a new invoker with no endpoints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the Gemini model hierarchy from configuration.
    ///
    /// Fails with `Configuration` if `api_key` is absent or blank, or if the
    /// configured model list is empty.
    pub fn from_config(config: &GenerationConfig, api_key: Option<&str>) -> Result<Self> {
        let api_key = api_key.ok_or_else(|| {
            FutplotError::Configuration("Gemini API key not configured".to_string())
        })?;
        if config.models.is_empty() {
            return Err(FutplotError::Configuration(
                "generation.models must list at least one model".to_string(),
            ));
        }

        let client = GeminiClient::with_base_url(api_key, &config.base_url)?;
        let mut invoker =
            Self::new().attempt_timeout(Duration::from_secs(config.attempt_timeout_secs));
        for model in &config.models {
            invoker.add_endpoint(Arc::new(client.model(model)));
        }
        Ok(invoker)
    }

    /// Set the upper bound for a single endpoint attempt.
    pub fn attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// Add an endpoint (appended to end of chain = lowest priority).
    ///
    /// Call in priority order: first registered = highest priority.
    pub fn add_endpoint(&mut self, endpoint: Arc<dyn GenerateProvider>) {
        self.endpoints.push(endpoint);
    }

    /// Builder-style [`add_endpoint`](Self::add_endpoint).
    pub fn with_endpoint(mut self, endpoint: Arc<dyn GenerateProvider>) -> Self {
        self.add_endpoint(endpoint);
        self
    }

    /// Endpoint names in priority order.
    pub fn endpoint_names(&self) -> Vec<String> {
        self.endpoints.iter().map(|e| e.name().to_string()).collect()
    }

    /// Generate text using the fallback chain.
    ///
    /// Returns the first endpoint's successful output. Fails with
    /// `InvalidParameter` for a blank prompt, `Configuration` if no endpoint
    /// is registered or an endpoint reports misconfiguration, and
    /// `AllEndpointsExhausted` (carrying one diagnostic per endpoint) when
    /// every endpoint failed.
    #[instrument(skip(self, prompt), fields(endpoints = self.endpoints.len()))]
    pub async fn generate(&self, prompt: &str) -> Result<GenerationResult> {
        if prompt.trim().is_empty() {
            return Err(FutplotError::InvalidParameter(
                "prompt must not be empty".to_string(),
            ));
        }
        if self.endpoints.is_empty() {
            return Err(FutplotError::Configuration(
                "no generation endpoints configured".to_string(),
            ));
        }

        let mut failures = Vec::with_capacity(self.endpoints.len());
        for endpoint in &self.endpoints {
            let start = Instant::now();
            let outcome = tokio::time::timeout(self.attempt_timeout, endpoint.generate(prompt))
                .await
                .unwrap_or(Err(FutplotError::Timeout(self.attempt_timeout)));

            match outcome {
                Ok(raw_text) if raw_text.trim().is_empty() => {
                    Self::record_attempt(endpoint.name(), start, false);
                    warn!(endpoint = endpoint.name(), "endpoint returned empty text");
                    failures.push(EndpointFailure {
                        endpoint: endpoint.name().to_string(),
                        reason: FutplotError::EmptyResponse.to_string(),
                    });
                }
                Ok(raw_text) => {
                    Self::record_attempt(endpoint.name(), start, true);
                    debug!(
                        endpoint = endpoint.name(),
                        failed_before = failures.len(),
                        "generation succeeded"
                    );
                    return Ok(GenerationResult {
                        raw_text,
                        served_by: endpoint.name().to_string(),
                    });
                }
                Err(e @ FutplotError::Configuration(_)) => {
                    Self::record_attempt(endpoint.name(), start, false);
                    return Err(e);
                }
                Err(e) => {
                    Self::record_attempt(endpoint.name(), start, false);
                    warn!(endpoint = endpoint.name(), error = %e, "endpoint failed, falling back");
                    failures.push(EndpointFailure {
                        endpoint: endpoint.name().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        metrics::counter!(telemetry::FALLBACK_EXHAUSTED_TOTAL).increment(1);
        warn!(attempts = failures.len(), "all generation endpoints exhausted");
        Err(FutplotError::AllEndpointsExhausted { failures })
    }

    /// Record attempt outcome metrics (counter + histogram).
    fn record_attempt(endpoint: &str, start: Instant, ok: bool) {
        let status = if ok { "ok" } else { "error" };
        let elapsed = start.elapsed().as_secs_f64();
        metrics::counter!(telemetry::GENERATION_ATTEMPTS_TOTAL,
            "endpoint" => endpoint.to_owned(),
            "status" => status,
        )
        .increment(1);
        metrics::histogram!(telemetry::GENERATION_DURATION_SECONDS,
            "endpoint" => endpoint.to_owned(),
        )
        .record(elapsed);
    }
}

// ============================================================================
// Tests
// ============================================================================
