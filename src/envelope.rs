//! Uniform `{success, data?, error?}` response body.

use serde::{Deserialize, Serialize};

use crate::{FutplotError, Result};

/// Response body shared by every request kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Stable error kind, e.g. `"not_found"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    /// Per-endpoint reasons when every endpoint failed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            error_kind: None,
            details: Vec::new(),
        }
    }

    pub fn err(error: &FutplotError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
            error_kind: Some(error.kind().as_str().to_string()),
            details: error
                .endpoint_failures()
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }

    /// Envelope plus HTTP-equivalent status (200 on success).
    pub fn from_result(result: Result<T>) -> (u16, Self) {
        match result {
            Ok(data) => (200, Self::ok(data)),
            Err(e) => (e.status_code(), Self::err(&e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EndpointFailure;
    use serde_json::json;

    #[test]
    fn success_omits_error_fields() {
        let (status, envelope) = Envelope::from_result(Ok(json!({"xPositive": "Clinical"})));
        assert_eq!(status, 200);
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"success": true, "data": {"xPositive": "Clinical"}})
        );
    }

    #[test]
    fn not_found_maps_to_404() {
        let (status, envelope) =
            Envelope::<()>::from_result(Err(FutplotError::NotFound("player not found: x".into())));
        assert_eq!(status, 404);
        let wire = serde_json::to_value(&envelope).unwrap();
        assert_eq!(wire["success"], false);
        assert_eq!(wire["errorKind"], "not_found");
        assert!(wire.get("data").is_none());
        assert!(wire.get("details").is_none());
    }

    #[test]
    fn exhaustion_carries_details() {
        let err = FutplotError::AllEndpointsExhausted {
            failures: vec![
                EndpointFailure {
                    endpoint: "gemini-2.5-flash-lite".into(),
                    reason: "rate limited".into(),
                },
                EndpointFailure {
                    endpoint: "gemini-2.5-flash".into(),
                    reason: "timed out".into(),
                },
            ],
        };
        let (status, envelope) = Envelope::<()>::from_result(Err(err));
        assert_eq!(status, 503);
        assert_eq!(
            envelope.details,
            vec![
                "gemini-2.5-flash-lite: rate limited",
                "gemini-2.5-flash: timed out"
            ]
        );
    }

    #[test]
    fn status_per_kind() {
        let cases = [
            (FutplotError::Configuration("x".into()), 500),
            (FutplotError::InvalidParameter("x".into()), 400),
            (FutplotError::MalformedResponse("x".into()), 502),
            (FutplotError::InvalidShape("x".into()), 502),
        ];
        for (err, expected) in cases {
            assert_eq!(Envelope::<()>::from_result(Err(err)).0, expected);
        }
    }
}
