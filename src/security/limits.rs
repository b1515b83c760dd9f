//! Request size limits.
//!
//! # Responsibilities
//! - Enforce maximum request body size (edit forms)
//!
//! # Design Decisions
//! - One configured limit replaces axum's built-in extractor limit
//! - Oversized bodies are rejected with 413 Payload Too Large

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

use crate::config::SecurityConfig;

/// Apply the configured body limit.
pub fn apply(router: Router, config: &SecurityConfig) -> Router {
    router
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_body_size))
}
