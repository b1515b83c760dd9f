//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → limits.rs (reject oversized bodies)
//!     → Pass to routing
//! Outgoing response:
//!     → headers.rs (nosniff, frame and referrer policy)
//! ```
//!
//! # Design Decisions
//! - No trust in client input: identifiers are validated by the router,
//!   form fields by the service, titles again by the file store

pub mod headers;
pub mod limits;
