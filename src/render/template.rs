//! Template-backed renderer.

use std::path::PathBuf;

use minijinja::Environment;

use crate::render::{RenderData, RenderError, Renderer, View};

const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");
const VIEW_TEMPLATE: &str = include_str!("../../templates/view.html");
const EDIT_TEMPLATE: &str = include_str!("../../templates/edit.html");

/// Renders views through minijinja templates with HTML auto-escaping.
#[derive(Debug)]
pub struct TemplateRenderer {
    env: Environment<'static>,
}

impl TemplateRenderer {
    /// Renderer using the templates compiled into the binary.
    pub fn builtin() -> Result<Self, RenderError> {
        let mut env = Environment::new();
        env.add_template(View::Index.template_name(), INDEX_TEMPLATE)?;
        env.add_template(View::View.template_name(), VIEW_TEMPLATE)?;
        env.add_template(View::Edit.template_name(), EDIT_TEMPLATE)?;
        Ok(Self { env })
    }

    /// Renderer loading `index.html`, `view.html` and `edit.html` from a
    /// directory. Fails if any of them is missing or does not parse.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Result<Self, RenderError> {
        let dir = dir.into();
        let mut env = Environment::new();
        env.set_loader(minijinja::path_loader(&dir));

        for view in View::ALL {
            env.get_template(view.template_name())?;
        }

        tracing::info!(dir = %dir.display(), "Templates loaded");
        Ok(Self { env })
    }
}

impl Renderer for TemplateRenderer {
    fn render(&self, view: View, data: &RenderData) -> Result<Vec<u8>, RenderError> {
        let template = self.env.get_template(view.template_name())?;
        Ok(template.render(data)?.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{IndexData, PageData};

    fn page(id: Option<&str>, title: &str, content: &str) -> RenderData {
        RenderData::Page(PageData {
            id: id.map(str::to_string),
            title: title.to_string(),
            content: content.to_string(),
        })
    }

    fn render_str(view: View, data: &RenderData) -> String {
        let renderer = TemplateRenderer::builtin().unwrap();
        String::from_utf8(renderer.render(view, data).unwrap()).unwrap()
    }

    #[test]
    fn test_view_escapes_content() {
        let html = render_str(View::View, &page(Some("1"), "Hello", "<script>x</script>"));
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>x"));
        assert!(html.contains("/edit/1"));
    }

    #[test]
    fn test_edit_form_targets() {
        let existing = render_str(View::Edit, &page(Some("Notes"), "Notes", "body"));
        assert!(existing.contains(r#"action="/save/Notes""#));

        let blank = render_str(View::Edit, &page(None, "", ""));
        assert!(blank.contains(r#"action="/save""#));
    }

    #[test]
    fn test_index_lists_pages() {
        let data = RenderData::Index(IndexData {
            service_name: "Blog system".to_string(),
            current_year: 2026,
            pages: vec![
                PageData { id: Some("1".into()), title: "First".into(), content: String::new() },
                PageData { id: Some("2".into()), title: "Second".into(), content: String::new() },
            ],
        });
        let html = render_str(View::Index, &data);
        assert!(html.contains(r#"<a href="/view/1">First</a>"#));
        assert!(html.contains(r#"<a href="/view/2">Second</a>"#));
        assert!(html.contains("2026 Blog system"));
    }

    #[test]
    fn test_from_dir_requires_every_template() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "{{ service_name }}").unwrap();
        std::fs::write(dir.path().join("view.html"), "{{ title }}").unwrap();
        assert!(TemplateRenderer::from_dir(dir.path()).is_err());

        std::fs::write(dir.path().join("edit.html"), "edit {{ title }}").unwrap();
        let renderer = TemplateRenderer::from_dir(dir.path()).unwrap();
        let out = renderer.render(View::Edit, &page(None, "T", "")).unwrap();
        assert_eq!(out, b"edit T");
    }
}
