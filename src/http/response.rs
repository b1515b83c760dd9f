//! Response mapping.
//!
//! # Responsibilities
//! - Turn service outcomes into HTML responses and redirects
//! - Map service errors to status codes
//!
//! # Status Mapping
//! ```text
//! Rendered     → 200 text/html
//! Redirect     → 302 Location: /view/<id>
//! NotFound     → 404
//! Validation   → 400
//! Conflict     → 409
//! Storage      → 500 (cause logged, not sent)
//! Render       → 500 (cause logged, not sent)
//! ```

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::service::{Outcome, ServiceError};

const HTML: &str = "text/html; charset=utf-8";

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        match self {
            Outcome::Rendered { body, .. } => {
                (StatusCode::OK, [(header::CONTENT_TYPE, HTML)], body).into_response()
            }
            Outcome::Redirect { location } => {
                (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServiceError::NotFound(id) => (StatusCode::NOT_FOUND, format!("Page not found: {id}")),
            ServiceError::Validation(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
            ServiceError::Conflict(reason) => (StatusCode::CONFLICT, reason.clone()),
            ServiceError::Storage(_) | ServiceError::Render(_) => {
                let cause = std::error::Error::source(&self).map(ToString::to_string);
                tracing::error!(error = %self, cause = ?cause, "Page operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, message).into_response()
    }
}
