//! Page operations.

use std::sync::Arc;

use chrono::Datelike;
use serde::Deserialize;

use crate::observability::metrics;
use crate::page::Page;
use crate::render::{IndexData, PageData, RenderData, Renderer, View};
use crate::routing::{Operation, Route};
use crate::service::ServiceError;
use crate::store::{PageStore, StoreError};

/// Submitted edit form. Fields are optional so that a missing field is
/// reported as a validation failure instead of a generic rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveForm {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Successful result of a page operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Rendered view bytes.
    Rendered { view: View, body: Vec<u8> },
    /// Send the client elsewhere (after a save).
    Redirect { location: String },
}

/// Orchestrates routes against a page store and a renderer.
pub struct PageService<S> {
    store: S,
    renderer: Arc<dyn Renderer>,
    service_name: String,
}

impl<S: PageStore> PageService<S> {
    pub fn new(store: S, renderer: Arc<dyn Renderer>, service_name: impl Into<String>) -> Self {
        Self {
            store,
            renderer,
            service_name: service_name.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run the operation for a matched route. `form` is only read for saves.
    pub async fn handle(
        &self,
        route: Route<S::Key>,
        form: Option<SaveForm>,
    ) -> Result<Outcome, ServiceError> {
        match route {
            Route::Index => self.index().await,
            Route::View(id) => self.view(&id).await,
            Route::Edit(id) => self.edit(&id).await,
            Route::New => self.new_form(),
            Route::Save(id) => self.save(id.as_ref(), form.unwrap_or_default()).await,
        }
    }

    /// Listing of all pages.
    pub async fn index(&self) -> Result<Outcome, ServiceError> {
        let pages = self.observe(Operation::Index, self.store.list().await)?;

        let data = RenderData::Index(IndexData {
            service_name: self.service_name.clone(),
            current_year: chrono::Utc::now().year(),
            pages: pages.iter().map(PageData::from).collect(),
        });
        self.render(View::Index, &data)
    }

    /// Show a page; a missing page is an explicit NotFound.
    pub async fn view(&self, id: &S::Key) -> Result<Outcome, ServiceError> {
        let page = self.observe(Operation::View, self.store.get(id).await)?;
        self.render(View::View, &RenderData::Page(PageData::from(&page)))
    }

    /// Edit form for a page. Editing a missing page renders a placeholder
    /// so that saving it creates the page.
    pub async fn edit(&self, id: &S::Key) -> Result<Outcome, ServiceError> {
        let page = match self.observe(Operation::EditLoad, self.store.get(id).await) {
            Ok(page) => page,
            Err(StoreError::NotFound(_)) => {
                tracing::debug!(id = %id, "Editing missing page");
                Page::not_found(id.clone())
            }
            Err(e) => return Err(e.into()),
        };
        self.render(View::Edit, &RenderData::Page(PageData::from(&page)))
    }

    /// Blank edit form, no store access.
    pub fn new_form(&self) -> Result<Outcome, ServiceError> {
        let page = Page::<S::Key>::empty();
        self.render(View::Edit, &RenderData::Page(PageData::from(&page)))
    }

    /// Persist a submitted form and redirect to the stored page.
    pub async fn save(&self, id: Option<&S::Key>, form: SaveForm) -> Result<Outcome, ServiceError> {
        let (title, content) = validate(form)?;

        let result = match id {
            Some(id) => self.store.save(id, &title, content.as_bytes()).await,
            None => self.store.create(&title, content.as_bytes()).await,
        };
        let saved = self.observe(Operation::Save, result)?;

        tracing::info!(
            backend = S::BACKEND,
            id = %saved,
            bytes = content.len(),
            "Page saved"
        );
        Ok(Outcome::Redirect {
            location: format!("/view/{saved}"),
        })
    }

    fn render(&self, view: View, data: &RenderData) -> Result<Outcome, ServiceError> {
        let body = self.renderer.render(view, data)?;
        Ok(Outcome::Rendered { view, body })
    }

    /// Record store failures other than a plain miss.
    fn observe<T>(&self, operation: Operation, result: Result<T, StoreError>) -> Result<T, StoreError> {
        if let Err(e) = &result {
            if !e.is_not_found() {
                metrics::record_store_error(S::BACKEND, operation.as_str());
            }
        }
        result
    }
}

fn validate(form: SaveForm) -> Result<(String, String), ServiceError> {
    let title = form
        .title
        .ok_or_else(|| ServiceError::Validation("missing form field `title`".to_string()))?;
    if title.trim().is_empty() {
        return Err(ServiceError::Validation("title must not be blank".to_string()));
    }
    let content = form
        .content
        .ok_or_else(|| ServiceError::Validation("missing form field `content`".to_string()))?;
    Ok((title, content))
}
