//! Page storage subsystem.
//!
//! # Data Flow
//! ```text
//! PageService
//!     → PageStore (get / list / create / save)
//!         → fs.rs  (one <Title>.txt per page, keyed by Title)
//!         → sql.rs (one row per page, keyed by generated PageId)
//! ```
//!
//! # Design Decisions
//! - One capability trait, two implementations; identifier type is an
//!   associated type so the schemes never mix
//! - The store exclusively owns persisted state, callers never cache
//! - No locking: file writes are whole-file renames, SQL relies on
//!   per-statement atomicity
//! - Every failure is a typed `StoreError`, nothing terminates the process

pub mod fs;
pub mod sql;

use std::future::Future;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::page::{Page, PageKey};

pub use fs::FileStore;
pub use sql::RelationalStore;

/// Errors raised by page stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Requested identifier does not exist.
    #[error("page not found: {0}")]
    NotFound(String),

    /// Title cannot be used as an identifier by this backend.
    #[error("invalid page title: {0:?}")]
    InvalidTitle(String),

    /// Create refused because the identifier is taken.
    #[error("page already exists: {0}")]
    AlreadyExists(String),

    /// Filesystem failure.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Database connection or statement failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// What `create` does when the derived identifier already exists.
///
/// Only meaningful for backends that derive identifiers from titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Last write wins, silently.
    #[default]
    Overwrite,
    /// Fail with `StoreError::AlreadyExists`.
    Reject,
}

/// Persistence capability for pages.
///
/// Implementations must be safe to share across concurrent requests.
pub trait PageStore: Send + Sync + 'static {
    /// Identifier scheme of this backend.
    type Key: PageKey;

    /// Backend label for logs and metrics.
    const BACKEND: &'static str;

    /// Fetch a page by identifier.
    fn get(
        &self,
        key: &Self::Key,
    ) -> impl Future<Output = Result<Page<Self::Key>, StoreError>> + Send;

    /// All pages in storage order. Either every page or an error, never a
    /// truncated list.
    fn list(&self) -> impl Future<Output = Result<Vec<Page<Self::Key>>, StoreError>> + Send;

    /// Store a new page and return its identifier.
    fn create(
        &self,
        title: &str,
        content: &[u8],
    ) -> impl Future<Output = Result<Self::Key, StoreError>> + Send;

    /// Store a page under an existing identifier and return the identifier
    /// the page now lives under.
    ///
    /// The returned key may differ from `key`. The file backend keys pages
    /// by title, so a save whose `title` differs from `key` writes a second
    /// page and leaves the one under `key` untouched; with
    /// `CollisionPolicy::Reject` it fails if the new title is taken. The
    /// relational backend always inserts a new row.
    fn save(
        &self,
        key: &Self::Key,
        title: &str,
        content: &[u8],
    ) -> impl Future<Output = Result<Self::Key, StoreError>> + Send;
}
