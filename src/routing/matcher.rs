//! Path matching logic.
//!
//! # Responsibilities
//! - Split a request path into its fixed shape and identifier segment
//! - Validate the identifier against the deployment's key grammar
//! - Return the typed route or an explicit no-match
//!
//! # Accepted Shapes
//! ```text
//! /              → Index
//! /view/<id>     → View(id)
//! /edit/<id>     → Edit(id)
//! /new           → New
//! /save          → Save(None)
//! /save/<id>     → Save(Some(id))
//! ```
//!
//! # Design Decisions
//! - Exact shapes only: no trailing-slash normalization, no partial matches
//! - Path matching is case-sensitive
//! - No regex; a single split on '/' keeps matching O(n)

use std::fmt;

use crate::page::PageKey;

/// The caller's requested action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Index,
    View,
    EditLoad,
    NewForm,
    Save,
}

impl Operation {
    /// Stable label for logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Index => "index",
            Operation::View => "view",
            Operation::EditLoad => "edit",
            Operation::NewForm => "new",
            Operation::Save => "save",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A matched path: operation plus identifier, where the shape carries one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route<K> {
    Index,
    View(K),
    Edit(K),
    New,
    Save(Option<K>),
}

impl<K> Route<K> {
    pub fn operation(&self) -> Operation {
        match self {
            Route::Index => Operation::Index,
            Route::View(_) => Operation::View,
            Route::Edit(_) => Operation::EditLoad,
            Route::New => Operation::NewForm,
            Route::Save(_) => Operation::Save,
        }
    }
}

/// Match a request path against the accepted shapes.
///
/// Returns `None` for anything outside the grammar, including identifiers
/// the key type refuses to parse.
pub fn match_path<K: PageKey>(path: &str) -> Option<Route<K>> {
    if path == "/" {
        return Some(Route::Index);
    }

    let rest = path.strip_prefix('/')?;
    let mut segments = rest.split('/');
    let action = segments.next()?;
    let id = segments.next();
    if segments.next().is_some() {
        return None;
    }

    match (action, id) {
        ("new", None) => Some(Route::New),
        ("save", None) => Some(Route::Save(None)),
        ("view", Some(id)) => K::from_segment(id).map(Route::View),
        ("edit", Some(id)) => K::from_segment(id).map(Route::Edit),
        ("save", Some(id)) => K::from_segment(id).map(|k| Route::Save(Some(k))),
        _ => None,
    }
}
