//! The mounted display tree.

use tracing::info;

use crate::application::{
    blog::{Blog, PostContext, Theme},
    context::MissingProviderError,
    events::Observable,
};
use crate::domain::archive::ArchiveStore;

use super::components::{ArchivePanel, Footer, Header, MainSection};
use super::views::{IndexTemplate, PageView, TemplateRenderError, ThemeToggleView, render_template};

/// The root and every component built inside its provider scope.
pub struct App {
    blog: Blog,
    header: Header,
    main: MainSection,
    archive: ArchivePanel,
    footer: Footer,
}

impl App {
    /// Provide the root's context and build the tree inside that scope.
    ///
    /// The scope closes when this returns; components keep the handle they
    /// consumed, so mounting a second tree needs a fresh `provide`.
    pub fn mount(
        blog: Blog,
        archive: ArchiveStore,
        context: &PostContext,
    ) -> Result<Self, MissingProviderError> {
        let _scope = context.provide(blog.context());

        let header = Header::new(context)?;
        let main = MainSection::new(context)?;
        let archive = ArchivePanel::new(context, archive)?;

        info!(
            posts = blog.all_posts().len(),
            archive = archive.len(),
            "Display tree mounted"
        );

        Ok(Self {
            blog,
            header,
            main,
            archive,
            footer: Footer,
        })
    }

    pub fn blog(&self) -> &Blog {
        &self.blog
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn main(&self) -> &MainSection {
        &self.main
    }

    pub fn archive(&self) -> &ArchivePanel {
        &self.archive
    }

    pub fn toggle_theme(&self) -> Theme {
        self.blog.toggle_theme()
    }

    pub fn theme_toggle(&self) -> ThemeToggleView {
        let theme = self.blog.theme();
        ThemeToggleView {
            dark: theme.is_dark(),
            icon: theme.icon(),
        }
    }

    pub fn view(&self) -> PageView {
        PageView {
            theme: self.theme_toggle(),
            header: self.header.view(),
            form: self.main.form().view(),
            posts: self.main.list().view(),
            archive: self.archive.view(),
            footer: self.footer.view(),
        }
    }

    pub fn render(&self) -> Result<String, TemplateRenderError> {
        let view = self.view();
        render_template(IndexTemplate { view: &view })
    }

    /// Everything whose changes should trigger a redraw.
    pub fn sources(&self) -> [&dyn Observable; 3] {
        [&self.blog, self.main.form(), &self.archive]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::posts::{Post, PostStore};

    fn mount() -> App {
        let context = PostContext::new("PostContext");
        App::mount(
            Blog::new(PostStore::from_posts(vec![
                Post::new("a", "x"),
                Post::new("b", "y"),
            ])),
            ArchiveStore::new(vec![Post::new("old", "one")]),
            &context,
        )
        .expect("mounted inside the provider scope")
    }

    #[test]
    fn mount_closes_the_provider_scope() {
        let context = PostContext::new("PostContext");
        let _app = App::mount(Blog::new(PostStore::new()), ArchiveStore::default(), &context)
            .expect("mounted");

        assert!(!context.is_provided());
    }

    #[test]
    fn view_reflects_shared_and_local_state() {
        let app = mount();

        app.header().search().input("Y");
        app.main().form().set_title("draft");
        app.archive().toggle();
        app.toggle_theme();

        let view = app.view();
        assert!(view.theme.dark);
        assert_eq!(view.theme.icon, "🌙");
        assert_eq!(view.header.results.label, "🚀 1 atomic post found");
        assert_eq!(view.header.search.query, "Y");
        assert_eq!(view.form.title, "draft");
        assert_eq!(view.posts.len(), 1);
        assert_eq!(view.posts[0].title, "b");
        assert_eq!(view.archive.toggle_label, "Hide archive posts");
        assert_eq!(view.archive.entries.len(), 1);
    }

    #[test]
    fn render_produces_the_page() {
        let app = mount();

        let html = app.render().expect("template renders");

        assert!(html.contains("The Atomic Blog"));
        assert!(html.contains("🚀 2 atomic post found"));
        assert!(html.contains("Show archive posts"));
        assert!(!html.contains(r#"class="fake-dark-mode""#));

        app.toggle_theme();
        let html = app.render().expect("template renders");
        assert!(html.contains(r#"class="fake-dark-mode""#));
    }
}
