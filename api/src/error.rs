//! API error responses
//!
//! Every failure is answered with a JSON `{ "error": ..., "details"?: ... }`
//! body and the status carried by the underlying error.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use wescu_chat_core::{SessionError, SpeechError};

/// JSON error payload
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Speech(#[from] SpeechError),
}

impl ApiError {
    /// Response status. Anything that is not a 4xx/5xx becomes 502 so a
    /// failure is never reported as success.
    pub fn status(&self) -> StatusCode {
        let code = match self {
            ApiError::Session(e) => e.status_code(),
            ApiError::Speech(e) => e.status_code(),
        };

        StatusCode::from_u16(code)
            .ok()
            .filter(|s| s.is_client_error() || s.is_server_error())
            .unwrap_or(StatusCode::BAD_GATEWAY)
    }

    fn body(&self) -> ErrorBody {
        match self {
            ApiError::Session(e) => ErrorBody {
                error: e.public_message(),
                details: e.details().cloned(),
            },
            ApiError::Speech(SpeechError::MissingApiKey) => ErrorBody {
                error: SpeechError::MissingApiKey.to_string(),
                details: None,
            },
            ApiError::Speech(_) => ErrorBody {
                error: "Speech synthesis failed".to_string(),
                details: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_workflow_is_bad_request() {
        let err = ApiError::from(SessionError::MissingWorkflow);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.body().error, "Missing workflow ID");
    }

    #[test]
    fn test_upstream_details_are_forwarded() {
        let err = ApiError::from(SessionError::Upstream {
            status: 404,
            details: json!({"error": {"message": "workflow not found"}}),
        });
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            err.body().details.unwrap()["error"]["message"],
            "workflow not found"
        );
    }

    #[test]
    fn test_non_error_upstream_status_becomes_bad_gateway() {
        let err = ApiError::from(SessionError::Upstream {
            status: 304,
            details: Value::Null,
        });
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }
}
