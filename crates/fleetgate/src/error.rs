//! Gateway-level error taxonomy and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use fleetgate_slack::SlackError;
use fleetgate_state::StateError;

pub type GateResult<T> = Result<T, GateError>;

#[derive(Debug, Error)]
pub enum GateError {
    /// The caller sent something unusable. Reported verbatim.
    #[error("{0}")]
    Validation(String),

    /// The caller failed a signature or state check. Reported with a
    /// generic message so probes learn nothing.
    #[error("{0}")]
    Authentication(String),

    /// A dependency (chat API, game API, SSO) failed.
    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("internal error")]
    Internal,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl GateError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GateError::Validation(_) | GateError::Authentication(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StateError> for GateError {
    fn from(err: StateError) -> Self {
        match err {
            StateError::StateNotFound => {
                GateError::Authentication("invalid state received".to_string())
            }
            StateError::InternalError => GateError::Internal,
        }
    }
}

impl From<SlackError> for GateError {
    fn from(err: SlackError) -> Self {
        match err {
            SlackError::MalformedEvent => {
                GateError::Validation("could not parse event payload".to_string())
            }
            SlackError::InternalError => GateError::Internal,
            // All signature failures collapse into one caller-visible
            // message; the precise reason only goes to the log.
            _ => GateError::Authentication("signature verification failed".to_string()),
        }
    }
}

impl From<reqwest::Error> for GateError {
    fn from(err: reqwest::Error) -> Self {
        GateError::Upstream(err.to_string())
    }
}

impl From<toml::de::Error> for GateError {
    fn from(err: toml::de::Error) -> Self {
        GateError::Config(format!("TOML parse error: {}", err))
    }
}

impl From<serde_json::Error> for GateError {
    fn from(err: serde_json::Error) -> Self {
        GateError::Serialization(err.to_string())
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_errors_map_to_bad_request() {
        assert_eq!(
            GateError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GateError::Authentication("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_server_errors_map_to_internal() {
        assert_eq!(
            GateError::Upstream("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            GateError::Internal.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_serialization_errors_carry_their_cause() {
        let cause = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: GateError = cause.into();
        assert!(matches!(err, GateError::Serialization(_)));
        assert!(err.to_string().starts_with("serialization error: "));
        assert!(err.to_string().len() > "serialization error: ".len());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_missing_state_reads_as_authentication() {
        let err: GateError = StateError::StateNotFound.into();
        assert!(matches!(err, GateError::Authentication(_)));
        assert_eq!(err.to_string(), "invalid state received");
    }

    #[test]
    fn test_signature_failures_collapse_to_one_message() {
        for cause in [
            SlackError::MissingTimestamp,
            SlackError::StaleTimestamp,
            SlackError::SignatureMismatch,
        ] {
            let err: GateError = cause.into();
            assert_eq!(err.to_string(), "signature verification failed");
        }
    }

    #[test]
    fn test_malformed_event_is_a_validation_error() {
        let err: GateError = SlackError::MalformedEvent.into();
        assert!(matches!(err, GateError::Validation(_)));
    }
}
