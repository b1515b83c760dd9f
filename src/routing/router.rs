//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Match the request path via the path matcher
//! - Check the HTTP method allowed for the matched operation
//! - Return matched route, method mismatch, or explicit no-match
//!
//! # Design Decisions
//! - Stateless and immutable (thread-safe without locks)
//! - Explicit NoMatch rather than silent default
//! - HEAD is accepted wherever GET is

use std::marker::PhantomData;

use axum::http::Method;

use crate::page::PageKey;
use crate::routing::matcher::{match_path, Operation, Route};

/// Result of a route lookup.
#[derive(Debug, PartialEq, Eq)]
pub enum RouteMatch<K> {
    Matched(Route<K>),
    /// Path shape is known but the method is not allowed for it.
    MethodNotAllowed(Operation),
    NoMatch,
}

/// Router for one identifier scheme.
#[derive(Debug)]
pub struct PageRouter<K> {
    _key: PhantomData<fn() -> K>,
}

impl<K: PageKey> PageRouter<K> {
    pub fn new() -> Self {
        Self { _key: PhantomData }
    }

    /// Look up the route for a request.
    pub fn match_request(&self, method: &Method, path: &str) -> RouteMatch<K> {
        let Some(route) = match_path::<K>(path) else {
            return RouteMatch::NoMatch;
        };

        let operation = route.operation();
        if Self::is_allowed(operation, method) {
            RouteMatch::Matched(route)
        } else {
            RouteMatch::MethodNotAllowed(operation)
        }
    }

    fn is_allowed(operation: Operation, method: &Method) -> bool {
        match operation {
            Operation::Save => *method == Method::POST,
            _ => *method == Method::GET || *method == Method::HEAD,
        }
    }

    /// Value for the `Allow` header of a method mismatch.
    pub fn allow_header(operation: Operation) -> &'static str {
        match operation {
            Operation::Save => "POST",
            _ => "GET, HEAD",
        }
    }
}

impl<K: PageKey> Default for PageRouter<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::PageId;

    #[test]
    fn test_method_table() {
        let router = PageRouter::<PageId>::new();

        assert_eq!(
            router.match_request(&Method::GET, "/view/1"),
            RouteMatch::Matched(Route::View(PageId::new(1)))
        );
        assert_eq!(
            router.match_request(&Method::HEAD, "/"),
            RouteMatch::Matched(Route::Index)
        );
        assert_eq!(
            router.match_request(&Method::POST, "/save"),
            RouteMatch::Matched(Route::Save(None))
        );
        assert_eq!(
            router.match_request(&Method::GET, "/save/1"),
            RouteMatch::MethodNotAllowed(Operation::Save)
        );
        assert_eq!(
            router.match_request(&Method::POST, "/view/1"),
            RouteMatch::MethodNotAllowed(Operation::View)
        );
        assert_eq!(router.match_request(&Method::GET, "/nope"), RouteMatch::NoMatch);
        assert_eq!(PageRouter::<PageId>::allow_header(Operation::Save), "POST");
        // Bad identifiers never reach the method check
        assert_eq!(router.match_request(&Method::POST, "/view/x"), RouteMatch::NoMatch);
    }
}
