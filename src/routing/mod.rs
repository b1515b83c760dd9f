//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (method table)
//!     → matcher.rs (path shape + identifier grammar)
//!     → Return: Route, MethodNotAllowed or NoMatch
//! ```
//!
//! # Design Decisions
//! - Grammar fixed at compile time, generic over the identifier scheme
//! - No regex in hot path
//! - Deterministic: same input always yields the same route

pub mod matcher;
pub mod router;

pub use matcher::{match_path, Operation, Route};
pub use router::{PageRouter, RouteMatch};
