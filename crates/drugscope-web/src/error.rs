//! JSON error responses.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};

use drugscope_llm::LlmError;
use drugscope_molecules::{BindingError, EvaluationError, GenerationError};

/// Error returned by every handler, rendered as `{"detail": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self { status, detail: detail.into() }
    }

    pub fn unprocessable(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, detail)
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, detail)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, detail = %self.detail, "Request failed");
        } else {
            warn!(status = %self.status, detail = %self.detail, "Request rejected");
        }
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

impl From<EvaluationError> for ApiError {
    fn from(err: EvaluationError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, err.to_string())
    }
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, err.to_string())
    }
}

impl From<BindingError> for ApiError {
    fn from(err: BindingError) -> Self {
        let status = match &err {
            BindingError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            BindingError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            BindingError::Http(_) | BindingError::Api { .. } | BindingError::Serde(_) => StatusCode::BAD_GATEWAY,
        };
        Self::new(status, format!("Binding prediction failed: {err}"))
    }
}

impl From<LlmError> for ApiError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::ApiError { status, message } => Self::new(
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                format!("AgentAI API error: {message}"),
            ),
            LlmError::Timeout => Self::new(StatusCode::GATEWAY_TIMEOUT, "AgentAI request timed out"),
            LlmError::Http(e) => Self::internal(format!("Error connecting to AgentAI: {e}")),
            LlmError::NotConfigured(reason) => {
                Self::new(StatusCode::SERVICE_UNAVAILABLE, format!("AgentAI is not configured: {reason}"))
            }
            LlmError::Serde(e) => Self::internal(format!("Internal server error: {e}")),
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::internal(format!("Internal server error: {err}"))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::unprocessable(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_status_is_passed_through() {
        let err: ApiError = LlmError::ApiError { status: 429, message: "slow down".into() }.into();
        assert_eq!(err.status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(err.detail, "AgentAI API error: slow down");
    }

    #[test]
    fn invalid_upstream_status_becomes_bad_gateway() {
        let err: ApiError = LlmError::ApiError { status: 42, message: "odd".into() }.into();
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn binding_status_mapping() {
        assert_eq!(ApiError::from(BindingError::NotConfigured).status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(ApiError::from(BindingError::Timeout).status, StatusCode::GATEWAY_TIMEOUT);
        let api = BindingError::Api { status: 500, message: "boom".into() };
        assert_eq!(ApiError::from(api).status, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn generation_errors_are_bad_requests() {
        let err = ApiError::from(GenerationError::NoValidCandidates);
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.detail.starts_with("Failed to generate valid drug-like molecules"));
    }
}
