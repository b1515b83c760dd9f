//! Service error taxonomy.

use crate::render::RenderError;
use crate::store::StoreError;

/// Failure of a page operation.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Requested page does not exist.
    #[error("page not found: {0}")]
    NotFound(String),

    /// Malformed input, rejected before storage is touched.
    #[error("invalid request: {0}")]
    Validation(String),

    /// Create refused by the store's collision policy.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Storage backend failure.
    #[error("storage failure: {0}")]
    Storage(#[source] StoreError),

    /// View could not be rendered.
    #[error("render failure: {0}")]
    Render(#[from] RenderError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ServiceError::NotFound(id),
            StoreError::InvalidTitle(title) => {
                ServiceError::Validation(format!("invalid title {title:?}"))
            }
            StoreError::AlreadyExists(id) => {
                ServiceError::Conflict(format!("page {id} already exists"))
            }
            other => ServiceError::Storage(other),
        }
    }
}
