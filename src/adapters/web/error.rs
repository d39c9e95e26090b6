//! HTTP error responses for web adapter.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::error::SignalError;

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

pub fn status_from_error(err: &SignalError) -> StatusCode {
    match err {
        SignalError::Configuration { .. }
        | SignalError::ConfigParse { .. }
        | SignalError::ConfigMissing { .. }
        | SignalError::ConfigInvalid { .. } => StatusCode::BAD_REQUEST,
        SignalError::InvalidInput { .. }
        | SignalError::MissingInput { .. }
        | SignalError::InvalidBar { .. }
        | SignalError::SeriesMismatch { .. }
        | SignalError::NoData { .. }
        | SignalError::InsufficientData { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        SignalError::Data { .. } | SignalError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<SignalError> for WebError {
    fn from(err: SignalError) -> Self {
        Self::new(status_from_error(&err), err.to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message,
            "status": self.status.as_u16(),
        }));
        (self.status, body).into_response()
    }
}
