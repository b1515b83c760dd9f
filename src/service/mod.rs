//! Page service: route handling on top of a store and a renderer.
//!
//! # Data Flow
//! ```text
//! Route (from routing)
//!     → PageService operation
//!     → PageStore (get / list / create / save)
//!     → Renderer, or a redirect after save
//!     → Outcome | ServiceError
//! ```
//!
//! # Design Decisions
//! - Store and renderer are injected at construction, no globals
//! - No state shared between requests beyond the injected collaborators
//! - Missing pages: View reports NotFound, EditLoad renders a placeholder

pub mod error;
pub mod pages;

pub use error::ServiceError;
pub use pages::{Outcome, PageService, SaveForm};
