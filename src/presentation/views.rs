use askama::{Error as AskamaError, Template};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) origin: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(origin: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            origin,
            public_message,
            error,
        }
    }

    pub fn origin(&self) -> &'static str {
        self.origin
    }
}

pub fn render_template<T: Template>(template: T) -> Result<String, TemplateRenderError> {
    template.render().map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct ThemeToggleView {
    pub dark: bool,
    pub icon: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultsView {
    pub count: usize,
    pub label: String,
}

impl ResultsView {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            label: format!("🚀 {count} atomic post found"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchView {
    pub query: String,
    pub placeholder: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeaderView {
    pub brand_icon: &'static str,
    pub title: &'static str,
    pub results: ResultsView,
    pub search: SearchView,
    pub clear_label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormView {
    pub title: String,
    pub body: String,
    pub title_placeholder: &'static str,
    pub body_placeholder: &'static str,
    pub submit_label: &'static str,
}

/// One row of a post list. `key` is the row's position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostItemView {
    pub key: usize,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArchiveView {
    pub heading: &'static str,
    pub visible: bool,
    pub toggle_label: &'static str,
    pub add_label: &'static str,
    /// Empty while the panel is hidden.
    pub entries: Vec<PostItemView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FooterView {
    pub copy: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub theme: ThemeToggleView,
    pub header: HeaderView,
    pub form: FormView,
    pub posts: Vec<PostItemView>,
    pub archive: ArchiveView,
    pub footer: FooterView,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate<'a> {
    pub view: &'a PageView,
}
