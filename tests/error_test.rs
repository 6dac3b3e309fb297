//! Tests for error classification and boundary status mapping.

use std::time::Duration;

use futplot::{EndpointFailure, ErrorKind, FutplotError};

#[test]
fn kinds_and_status_codes() {
    let cases = [
        (FutplotError::Configuration("no key".into()), ErrorKind::Configuration, 500),
        (FutplotError::InvalidParameter("x".into()), ErrorKind::InvalidParameter, 400),
        (FutplotError::NotFound("x".into()), ErrorKind::NotFound, 404),
        (
            FutplotError::AllEndpointsExhausted { failures: vec![] },
            ErrorKind::AllEndpointsExhausted,
            503,
        ),
        (FutplotError::MalformedResponse("x".into()), ErrorKind::MalformedResponse, 502),
        (FutplotError::InvalidShape("x".into()), ErrorKind::InvalidShape, 502),
        (FutplotError::Cache("down".into()), ErrorKind::Internal, 500),
        (FutplotError::Data("down".into()), ErrorKind::Internal, 500),
    ];
    for (err, kind, status) in cases {
        assert_eq!(err.kind(), kind, "{err}");
        assert_eq!(err.status_code(), status, "{err}");
    }
}

#[test]
fn per_attempt_errors_are_upstream() {
    let upstream = [
        FutplotError::Http("reset".into()),
        FutplotError::Api {
            status: 500,
            message: "x".into(),
        },
        FutplotError::RateLimited { retry_after: None },
        FutplotError::AuthenticationFailed,
        FutplotError::EmptyResponse,
        FutplotError::Timeout(Duration::from_secs(20)),
    ];
    for err in upstream {
        assert_eq!(err.kind(), ErrorKind::Upstream, "{err}");
        assert!(err.is_retryable());
    }
}

#[test]
fn caller_errors_are_not_retryable() {
    assert!(!FutplotError::InvalidParameter("x".into()).is_retryable());
    assert!(!FutplotError::NotFound("x".into()).is_retryable());
    assert!(!FutplotError::Configuration("x".into()).is_retryable());
    assert!(FutplotError::AllEndpointsExhausted { failures: vec![] }.is_retryable());
}

#[test]
fn exhaustion_message_lists_every_endpoint() {
    let err = FutplotError::AllEndpointsExhausted {
        failures: vec![
            EndpointFailure {
                endpoint: "gemini-2.5-flash-lite".into(),
                reason: "rate limited".into(),
            },
            EndpointFailure {
                endpoint: "gemini-2.5-flash".into(),
                reason: "timed out after 20s".into(),
            },
        ],
    };
    let message = err.to_string();
    assert!(message.contains("gemini-2.5-flash-lite: rate limited"));
    assert!(message.contains("gemini-2.5-flash: timed out after 20s"));
    assert_eq!(err.endpoint_failures().len(), 2);
    assert!(FutplotError::EmptyResponse.endpoint_failures().is_empty());
}

#[test]
fn json_errors_convert() {
    let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
    let err: FutplotError = parse.unwrap_err().into();
    assert!(matches!(err, FutplotError::Json(_)));
    assert_eq!(err.kind().as_str(), "internal");
}
