//! Output rendering.
//!
//! # Data Flow
//! ```text
//! PageService
//!     → RenderData (index listing or a single page)
//!     → Renderer::render(view, data)
//!     → bytes for the response body
//! ```
//!
//! # Design Decisions
//! - Renderer is a trait object so the service does not care how bytes are made
//! - Page content is rendered as text; invalid UTF-8 is replaced, not rejected

pub mod template;

use std::fmt;

use serde::Serialize;

use crate::page::{Page, PageKey};

pub use template::TemplateRenderer;

/// Named views the service can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Index,
    View,
    Edit,
}

impl View {
    pub const ALL: [View; 3] = [View::Index, View::View, View::Edit];

    pub fn as_str(self) -> &'static str {
        match self {
            View::Index => "index",
            View::View => "view",
            View::Edit => "edit",
        }
    }

    /// Template file backing this view.
    pub fn template_name(self) -> &'static str {
        match self {
            View::Index => "index.html",
            View::View => "view.html",
            View::Edit => "edit.html",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A page as templates see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageData {
    pub id: Option<String>,
    pub title: String,
    pub content: String,
}

impl<K: PageKey> From<&Page<K>> for PageData {
    fn from(page: &Page<K>) -> Self {
        Self {
            id: page.id.as_ref().map(ToString::to_string),
            title: page.title.clone(),
            content: String::from_utf8_lossy(&page.content).into_owned(),
        }
    }
}

/// Data for the index view.
#[derive(Debug, Clone, Serialize)]
pub struct IndexData {
    pub service_name: String,
    pub current_year: i32,
    pub pages: Vec<PageData>,
}

/// Everything a view can be rendered from.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RenderData {
    Index(IndexData),
    Page(PageData),
}

/// Rendering failure.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// Turns view data into response bytes.
pub trait Renderer: Send + Sync {
    fn render(&self, view: View, data: &RenderData) -> Result<Vec<u8>, RenderError>;
}
