//! Provider trait for text generation endpoints.
//!
//! Each endpoint in the fallback hierarchy is one [`GenerateProvider`]. The
//! provider performs a single attempt and reports the outcome; it does not
//! retry and it does not know about the other endpoints. Ordering and
//! fallback belong to [`FallbackInvoker`](super::FallbackInvoker).
//!
//! # Error Semantics
//!
//! - `Configuration`: the provider cannot run at all (e.g. no API key).
//!   The invoker stops instead of trying the next endpoint.
//! - Anything else: this endpoint failed; the invoker records the reason
//!   and moves on.

use async_trait::async_trait;

use crate::Result;

/// A single text-generation endpoint.
#[async_trait]
pub trait GenerateProvider: Send + Sync {
    /// Endpoint identifier (the model id) for logging and diagnostics.
    fn name(&self) -> &str;

    /// Generate text for `prompt` in one attempt.
    ///
    /// Returns the raw model text. Blank output is an error
    /// (`EmptyResponse`), not an empty success.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
