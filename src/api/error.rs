//! HTTP error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Body of a 404 from `PUT /employee/:id`.
pub const DOCUMENT_NOT_FOUND: &str = "Document not found!";
/// Body of a 404 from `DELETE /employee/:id`.
pub const RECORD_NOT_FOUND: &str = "Record not founded.";
/// Body of a successful `DELETE /employee/:id`.
pub const RECORD_DELETED: &str = "Record deleted successfully.";

/// An error already mapped to a status code, with an optional plain-text body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: Option<String>,
}

impl ApiError {
    /// Error with a text body.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
        }
    }

    /// Error with an empty body.
    pub fn bare(status: StatusCode) -> Self {
        Self {
            status,
            message: None,
        }
    }

    /// 400 with the given text.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// 500 with the given text.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Response status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response body, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.message {
            Some(message) => (self.status, message).into_response(),
            None => self.status.into_response(),
        }
    }
}
