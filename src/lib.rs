//! Page editor library: path matching, page stores, page operations and the
//! HTTP front end that ties them together.

// Core domain
pub mod page;
pub mod render;
pub mod routing;
pub mod service;
pub mod store;

// Serving
pub mod config;
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use page::{Page, PageId, PageKey, Title};
pub use service::PageService;
pub use store::{FileStore, PageStore, RelationalStore};
