//! futplot error types

use std::fmt;
use std::time::Duration;

/// A single endpoint's failure inside the fallback chain.
///
/// Collected by [`FallbackInvoker`](crate::providers::FallbackInvoker) and
/// surfaced only through [`FutplotError::AllEndpointsExhausted`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointFailure {
    /// Endpoint (model) identifier.
    pub endpoint: String,
    /// Human-readable failure reason.
    pub reason: String,
}

impl fmt::Display for EndpointFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.endpoint, self.reason)
    }
}

/// futplot error types
#[derive(Debug, thiserror::Error)]
pub enum FutplotError {
    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    // Caller errors
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("not found: {0}")]
    NotFound(String),

    // Upstream errors (per-endpoint; never escape the fallback chain on their own)
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("empty response from model")]
    EmptyResponse,

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// Every endpoint in the fallback chain failed.
    #[error("all generation endpoints exhausted: {}", join_failures(.failures))]
    AllEndpointsExhausted { failures: Vec<EndpointFailure> },

    // Response contract violations
    #[error("malformed model response: {0}")]
    MalformedResponse(String),

    #[error("invalid response shape: {0}")]
    InvalidShape(String),

    // Infrastructure errors
    #[error("cache error: {0}")]
    Cache(String),

    #[error("data error: {0}")]
    Data(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn join_failures(failures: &[EndpointFailure]) -> String {
    if failures.is_empty() {
        return "no endpoints configured".to_string();
    }
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Stable classification of a [`FutplotError`] for the boundary layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    InvalidParameter,
    NotFound,
    /// A single upstream attempt failed. Only seen when calling a
    /// provider directly, outside the fallback chain.
    Upstream,
    AllEndpointsExhausted,
    MalformedResponse,
    InvalidShape,
    Internal,
}

impl ErrorKind {
    /// Label used in metrics and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::InvalidParameter => "invalid_parameter",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Upstream => "upstream",
            ErrorKind::AllEndpointsExhausted => "all_endpoints_exhausted",
            ErrorKind::MalformedResponse => "malformed_response",
            ErrorKind::InvalidShape => "invalid_shape",
            ErrorKind::Internal => "internal",
        }
    }
}

impl FutplotError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FutplotError::Configuration(_) => ErrorKind::Configuration,
            FutplotError::InvalidParameter(_) => ErrorKind::InvalidParameter,
            FutplotError::NotFound(_) => ErrorKind::NotFound,
            FutplotError::Http(_)
            | FutplotError::Api { .. }
            | FutplotError::RateLimited { .. }
            | FutplotError::AuthenticationFailed
            | FutplotError::EmptyResponse
            | FutplotError::Timeout(_) => ErrorKind::Upstream,
            FutplotError::AllEndpointsExhausted { .. } => ErrorKind::AllEndpointsExhausted,
            FutplotError::MalformedResponse(_) => ErrorKind::MalformedResponse,
            FutplotError::InvalidShape(_) => ErrorKind::InvalidShape,
            FutplotError::Cache(_) | FutplotError::Data(_) | FutplotError::Json(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// HTTP-equivalent status code for the boundary layer.
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::InvalidParameter => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Upstream | ErrorKind::MalformedResponse | ErrorKind::InvalidShape => 502,
            ErrorKind::AllEndpointsExhausted => 503,
            ErrorKind::Configuration | ErrorKind::Internal => 500,
        }
    }

    /// Whether repeating the same request later may succeed.
    ///
    /// Caller errors and misconfiguration need a different request or an
    /// operator; upstream failures and contract violations can clear on a
    /// fresh generation.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Upstream
                | ErrorKind::AllEndpointsExhausted
                | ErrorKind::MalformedResponse
                | ErrorKind::InvalidShape
        )
    }

    /// Per-endpoint diagnostics, if this is an exhaustion error.
    pub fn endpoint_failures(&self) -> &[EndpointFailure] {
        match self {
            FutplotError::AllEndpointsExhausted { failures } => failures,
            _ => &[],
        }
    }
}

/// Result type alias for futplot operations
pub type Result<T> = std::result::Result<T, FutplotError>;
