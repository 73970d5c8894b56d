//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpToolError>` and use `?` on
//! anything that yields a [`ToolError`]; the wrapper renders the uniform
//! JSON envelope with the status the error taxonomy assigns.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use toolbelt_core::ToolError;

use crate::json::error_json;

/// Uniform response envelope for errors and simple successes.
#[derive(Debug, Serialize)]
pub struct JsonResponse {
    pub error: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonResponse {
    pub fn success(message: impl Into<String>, data: Option<serde_json::Value>) -> Self {
        Self {
            error: false,
            message: message.into(),
            data,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
            data: None,
        }
    }
}

/// Wrapper type for ToolError to implement IntoResponse.
/// Necessary because of the orphan rules: IntoResponse is an external trait
/// and ToolError lives in toolbelt-core.
#[derive(Debug)]
pub struct HttpToolError(pub ToolError);

impl From<ToolError> for HttpToolError {
    fn from(err: ToolError) -> Self {
        HttpToolError(err)
    }
}

impl IntoResponse for HttpToolError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(error = %self.0, status = status.as_u16(), "request failed");
        } else {
            tracing::debug!(error = %self.0, status = status.as_u16(), "request rejected");
        }

        match error_json(&self.0, Some(status)) {
            Ok(response) => response,
            Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

/// Log an unexpected error with a captured backtrace and answer with a plain
/// 500. Use when the failure is not worth a structured envelope.
pub fn server_error(err: &dyn std::error::Error) -> Response {
    let backtrace = std::backtrace::Backtrace::force_capture();
    tracing::error!(error = %err, backtrace = %backtrace, "internal server error");
    client_error(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Answer with the given status and its canonical reason phrase.
pub fn client_error(status: StatusCode) -> Response {
    let reason = status.canonical_reason().unwrap_or("");
    (status, reason.to_string()).into_response()
}

/// Convenience wrapper around [`client_error`] for 404 responses.
pub fn not_found() -> Response {
    client_error(StatusCode::NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_omits_data_when_absent() {
        let body = serde_json::to_string(&JsonResponse::failure("nope")).unwrap();
        assert_eq!(body, r#"{"error":true,"message":"nope"}"#);
    }

    #[test]
    fn envelope_keeps_data_when_present() {
        let payload = JsonResponse::success("ok", Some(serde_json::json!({"id": 7})));
        let body = serde_json::to_string(&payload).unwrap();
        assert_eq!(body, r#"{"error":false,"message":"ok","data":{"id":7}}"#);
    }

    #[test]
    fn wrapper_maps_taxonomy_to_status() {
        let response = HttpToolError(ToolError::EmptyBody).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = HttpToolError(ToolError::PayloadTooLarge(64)).into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn client_error_uses_reason_phrase() {
        let response = client_error(StatusCode::NOT_FOUND);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
