//! Security response headers.
//!
//! # Responsibilities
//! - Stop MIME sniffing of page content
//! - Forbid framing of the editor
//! - Keep page URLs out of third-party referrers
//!
//! # Design Decisions
//! - Handlers may set their own value; these only fill gaps

use axum::http::{header, HeaderValue};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::SecurityConfig;

/// Add security headers to every response when enabled.
pub fn apply(router: Router, config: &SecurityConfig) -> Router {
    if !config.enable_headers {
        return router;
    }

    router
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("same-origin"),
        ))
}
