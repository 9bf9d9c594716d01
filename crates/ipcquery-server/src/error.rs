use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ipcquery_ai::GenerateError;
use ipcquery_core::RecordError;
use serde_json::json;
use thiserror::Error;

/// Every way a `/get_response` call can fail. Rendered as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("{0}")]
    Upstream(#[from] GenerateError),

    #[error("AI response is not in valid JSON format.")]
    MalformedOutput,

    #[error("Response missing required fields.")]
    IncompleteOutput,

    /// Body rejections, panics, anything else caught at the boundary.
    #[error("{0}")]
    Internal(String),
}

impl HandlerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedOutput | Self::IncompleteOutput => StatusCode::BAD_REQUEST,
            Self::Upstream(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RecordError> for HandlerError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::Malformed(_) => Self::MalformedOutput,
            RecordError::Incomplete { .. } => Self::IncompleteOutput,
        }
    }
}

impl From<JsonRejection> for HandlerError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Internal(rejection.body_text())
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
