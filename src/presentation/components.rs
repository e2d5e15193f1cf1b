//! Display components.
//!
//! Each component takes what it needs from the [`PostContext`] when it is
//! built, so it must be constructed inside the root's provider scope. The
//! only state owned here is the add-post form's fields and the archive
//! panel's pool and visibility flag; both publish a [`StateChange`] so a
//! render surface can redraw.

use std::sync::RwLock;

use tracing::debug;

use crate::application::{
    blog::{BlogContext, PostContext},
    context::MissingProviderError,
    events::{Listener, ListenerRegistry, Observable, StateChange, Subscription},
    lock::{rw_read, rw_write},
};
use crate::domain::{archive::ArchiveStore, error::DomainError, posts::Post};

use super::views::{
    ArchiveView, FooterView, FormView, HeaderView, PostItemView, ResultsView, SearchView,
};

const SOURCE: &str = "presentation::components";

fn item_views<'a>(posts: impl IntoIterator<Item = &'a Post>) -> Vec<PostItemView> {
    posts
        .into_iter()
        .enumerate()
        .map(|(key, post)| PostItemView {
            key,
            title: post.title.clone(),
            body: post.body.clone(),
        })
        .collect()
}

/// Brand, result counter, search box and the "Clear posts" button.
pub struct Header {
    context: BlogContext,
    results: Results,
    search: SearchPosts,
}

impl Header {
    pub fn new(context: &PostContext) -> Result<Self, MissingProviderError> {
        Ok(Self {
            context: context.consume()?,
            results: Results::new(context)?,
            search: SearchPosts::new(context)?,
        })
    }

    pub fn results(&self) -> &Results {
        &self.results
    }

    pub fn search(&self) -> &SearchPosts {
        &self.search
    }

    pub fn clear_posts(&self) {
        self.context.on_clear_posts();
    }

    pub fn view(&self) -> HeaderView {
        HeaderView {
            brand_icon: "🌼",
            title: "The Atomic Blog",
            results: self.results.view(),
            search: self.search.view(),
            clear_label: "Clear posts",
        }
    }
}

pub struct Results {
    context: BlogContext,
}

impl Results {
    pub fn new(context: &PostContext) -> Result<Self, MissingProviderError> {
        Ok(Self {
            context: context.consume()?,
        })
    }

    pub fn count(&self) -> usize {
        self.context.posts().len()
    }

    pub fn view(&self) -> ResultsView {
        ResultsView::new(self.count())
    }
}

pub struct SearchPosts {
    context: BlogContext,
}

impl SearchPosts {
    pub fn new(context: &PostContext) -> Result<Self, MissingProviderError> {
        Ok(Self {
            context: context.consume()?,
        })
    }

    pub fn query(&self) -> String {
        self.context.search_query()
    }

    /// The search box's change handler.
    pub fn input(&self, value: impl Into<String>) {
        self.context.set_search_query(value);
    }

    pub fn view(&self) -> SearchView {
        SearchView {
            query: self.query(),
            placeholder: "Search posts...",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    title: String,
    body: String,
}

impl FormFields {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    fn is_complete(&self) -> bool {
        !self.title.is_empty() && !self.body.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Added(Post),
    /// A field was empty; nothing changed.
    Ignored,
}

pub struct FormAddPost {
    context: BlogContext,
    fields: RwLock<FormFields>,
    listeners: ListenerRegistry,
}

impl FormAddPost {
    pub fn new(context: &PostContext) -> Result<Self, MissingProviderError> {
        Ok(Self {
            context: context.consume()?,
            fields: RwLock::new(FormFields::default()),
            listeners: ListenerRegistry::new(),
        })
    }

    pub fn fields(&self) -> FormFields {
        rw_read(&self.fields, SOURCE, "form.fields").clone()
    }

    pub fn set_title(&self, title: impl Into<String>) {
        rw_write(&self.fields, SOURCE, "form.set_title").set_title(title);
        self.listeners.publish(StateChange::FormEdited);
    }

    pub fn set_body(&self, body: impl Into<String>) {
        rw_write(&self.fields, SOURCE, "form.set_body").set_body(body);
        self.listeners.publish(StateChange::FormEdited);
    }

    /// Add the post described by the fields and reset them.
    ///
    /// Submitting with an empty title or body is silently ignored and keeps
    /// whatever was typed.
    pub fn submit(&self) -> SubmitOutcome {
        let post = {
            let mut fields = rw_write(&self.fields, SOURCE, "form.submit");
            if !fields.is_complete() {
                debug!("Incomplete post form ignored");
                return SubmitOutcome::Ignored;
            }
            let taken = std::mem::take(&mut *fields);
            Post::new(taken.title, taken.body)
        };

        self.context.on_add_post(post.clone());
        self.listeners.publish(StateChange::FormEdited);
        SubmitOutcome::Added(post)
    }

    pub fn view(&self) -> FormView {
        let fields = self.fields();
        FormView {
            title: fields.title,
            body: fields.body,
            title_placeholder: "Post title",
            body_placeholder: "Post body",
            submit_label: "Add post",
        }
    }
}

impl Observable for FormAddPost {
    fn subscribe_listener(&self, listener: Listener) -> Subscription {
        self.listeners.subscribe_listener(listener)
    }
}

pub struct PostList {
    context: BlogContext,
}

impl PostList {
    pub fn new(context: &PostContext) -> Result<Self, MissingProviderError> {
        Ok(Self {
            context: context.consume()?,
        })
    }

    pub fn view(&self) -> Vec<PostItemView> {
        item_views(&self.context.posts())
    }
}

/// The form and the list of searched posts.
pub struct MainSection {
    form: FormAddPost,
    list: PostList,
}

impl MainSection {
    pub fn new(context: &PostContext) -> Result<Self, MissingProviderError> {
        Ok(Self {
            form: FormAddPost::new(context)?,
            list: PostList::new(context)?,
        })
    }

    pub fn form(&self) -> &FormAddPost {
        &self.form
    }

    pub fn list(&self) -> &PostList {
        &self.list
    }
}

pub struct ArchivePanel {
    context: BlogContext,
    store: RwLock<ArchiveStore>,
    listeners: ListenerRegistry,
}

impl ArchivePanel {
    pub fn new(context: &PostContext, store: ArchiveStore) -> Result<Self, MissingProviderError> {
        Ok(Self {
            context: context.consume()?,
            store: RwLock::new(store),
            listeners: ListenerRegistry::new(),
        })
    }

    pub fn is_visible(&self) -> bool {
        rw_read(&self.store, SOURCE, "archive.is_visible").is_visible()
    }

    pub fn posts(&self) -> Vec<Post> {
        rw_read(&self.store, SOURCE, "archive.posts").posts().to_vec()
    }

    pub fn len(&self) -> usize {
        rw_read(&self.store, SOURCE, "archive.len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn toggle(&self) -> bool {
        let visible = rw_write(&self.store, SOURCE, "archive.toggle").toggle_visible();
        debug!(visible, "Archive panel toggled");
        self.listeners.publish(StateChange::ArchiveToggled { visible });
        visible
    }

    /// "Add as a new post" for the entry at `position`.
    ///
    /// The buttons only exist while the panel is shown.
    pub fn add_to_active(&self, position: usize) -> Result<Post, DomainError> {
        // The archive lock must be released before the root notifies.
        let post = {
            let store = rw_read(&self.store, SOURCE, "archive.add_to_active");
            if !store.is_visible() {
                return Err(DomainError::validation("archive panel is hidden"));
            }
            store.copy_entry(position)?
        };
        self.context.on_add_post(post.clone());
        Ok(post)
    }

    pub fn view(&self) -> ArchiveView {
        let store = rw_read(&self.store, SOURCE, "archive.view");
        let visible = store.is_visible();
        ArchiveView {
            heading: "Post archive",
            visible,
            toggle_label: if visible {
                "Hide archive posts"
            } else {
                "Show archive posts"
            },
            add_label: "Add as a new post",
            entries: if visible {
                item_views(store.posts())
            } else {
                Vec::new()
            },
        }
    }
}

impl Observable for ArchivePanel {
    fn subscribe_listener(&self, listener: Listener) -> Subscription {
        self.listeners.subscribe_listener(listener)
    }
}

pub struct Footer;

impl Footer {
    pub fn view(&self) -> FooterView {
        FooterView {
            copy: "© by The Atomic Blog ✌️",
        }
    }
}
