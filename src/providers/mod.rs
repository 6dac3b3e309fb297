//! Text generation endpoints and the fallback chain over them.
//!
//! [`GenerateProvider`] is one endpoint (one model), [`GeminiClient`] is the
//! HTTP client behind the Gemini endpoints, and [`FallbackInvoker`] walks an
//! ordered list of endpoints until one answers.

pub mod fallback;
pub mod gemini;
pub mod traits;

pub use fallback::{DEFAULT_ATTEMPT_TIMEOUT, FallbackInvoker, GenerationResult};
pub use gemini::{GeminiClient, GeminiModel};
pub use traits::GenerateProvider;
