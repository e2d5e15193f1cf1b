//! The root coordinator.
//!
//! [`Blog`] owns the active posts, the search query and the theme flag. The
//! display tree never sees it directly: it receives a [`BlogContext`] through
//! the shared context, which exposes the derived view plus the three
//! callbacks the root hands out (`on_add_post`, `on_clear_posts`,
//! `set_search_query`).

use std::sync::{Arc, RwLock};

use metrics::counter;
use serde::Serialize;
use tracing::{debug, info};

use crate::domain::{
    posts::{Post, PostStore},
    search,
};

use super::context::SharedContext;
use super::events::{Listener, ListenerRegistry, Observable, StateChange, StateEvent, Subscription};
use super::lock::{rw_read, rw_write};

/// The context the root provides to the display tree.
pub type PostContext = SharedContext<BlogContext>;

const SOURCE: &str = "application::blog";
pub(crate) const METRIC_POSTS_ADDED: &str = "atomic_blog_posts_added_total";
pub(crate) const METRIC_POSTS_CLEARED: &str = "atomic_blog_posts_cleared_total";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Default,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Default => Theme::Dark,
            Theme::Dark => Theme::Default,
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, Theme::Dark)
    }

    /// Icon shown on the toggle button.
    pub fn icon(self) -> &'static str {
        match self {
            Theme::Default => "☀️",
            Theme::Dark => "🌙",
        }
    }
}

/// What consumers render: the searched posts and the query that produced them.
///
/// Built fresh on every read and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub posts: Vec<Post>,
    pub search_query: String,
}

#[derive(Debug, Default)]
struct BlogState {
    store: PostStore,
    search_query: String,
    theme: Theme,
}

struct BlogShared {
    state: RwLock<BlogState>,
    listeners: ListenerRegistry,
}

impl BlogShared {
    fn read<R>(&self, op: &'static str, f: impl FnOnce(&BlogState) -> R) -> R {
        f(&rw_read(&self.state, SOURCE, op))
    }

    // The write guard is released before listeners run so they can read
    // the new state.
    fn mutate<R>(&self, op: &'static str, f: impl FnOnce(&mut BlogState) -> R) -> R {
        f(&mut rw_write(&self.state, SOURCE, op))
    }

    fn view(&self) -> ViewState {
        self.read("view", |state| ViewState {
            posts: search::filter(state.store.posts(), &state.search_query).into_owned(),
            search_query: state.search_query.clone(),
        })
    }

    fn add_post(&self, post: Post) {
        let title = post.title.clone();
        let total = self.mutate("add_post", |state| {
            state.store.add_post(post);
            state.store.len()
        });

        counter!(METRIC_POSTS_ADDED).increment(1);
        info!(title = %title, total, "Post added");
        self.listeners.publish(StateChange::PostAdded { title });
    }

    fn clear_posts(&self) {
        let removed = self.mutate("clear_posts", |state| state.store.clear_posts());

        counter!(METRIC_POSTS_CLEARED).increment(removed as u64);
        info!(removed, "Posts cleared");
        self.listeners.publish(StateChange::PostsCleared { removed });
    }

    fn set_search_query(&self, query: String) {
        let changed = self.mutate("set_search_query", |state| {
            if state.search_query == query {
                return false;
            }
            state.search_query.clone_from(&query);
            true
        });

        if !changed {
            debug!(query = %query, "Search query unchanged");
            return;
        }

        debug!(query = %query, "Search query updated");
        self.listeners
            .publish(StateChange::SearchQueryChanged { query });
    }
}

/// Owner of the blog's core state.
pub struct Blog {
    shared: Arc<BlogShared>,
}

impl Blog {
    pub fn new(store: PostStore) -> Self {
        info!(posts = store.len(), "Blog state initialised");
        Self {
            shared: Arc::new(BlogShared {
                state: RwLock::new(BlogState {
                    store,
                    ..BlogState::default()
                }),
                listeners: ListenerRegistry::new(),
            }),
        }
    }

    /// The handle the root provides to the display tree.
    pub fn context(&self) -> BlogContext {
        BlogContext {
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn view(&self) -> ViewState {
        self.shared.view()
    }

    /// Every active post regardless of the search query.
    pub fn all_posts(&self) -> Vec<Post> {
        self.shared
            .read("all_posts", |state| state.store.posts().to_vec())
    }

    pub fn theme(&self) -> Theme {
        self.shared.read("theme", |state| state.theme)
    }

    pub fn toggle_theme(&self) -> Theme {
        let theme = self.shared.mutate("toggle_theme", |state| {
            state.theme = state.theme.toggled();
            state.theme
        });

        debug!(theme = ?theme, "Theme toggled");
        self.shared.listeners.publish(StateChange::ThemeToggled {
            dark: theme.is_dark(),
        });
        theme
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&StateEvent) + Send + Sync + 'static,
    {
        self.shared.listeners.subscribe(listener)
    }
}

impl Observable for Blog {
    fn subscribe_listener(&self, listener: Listener) -> Subscription {
        self.shared.listeners.subscribe_listener(listener)
    }
}

/// Read view and callbacks handed to the display tree.
#[derive(Clone)]
pub struct BlogContext {
    shared: Arc<BlogShared>,
}

impl BlogContext {
    pub fn view(&self) -> ViewState {
        self.shared.view()
    }

    /// The searched posts.
    pub fn posts(&self) -> Vec<Post> {
        self.shared.view().posts
    }

    pub fn search_query(&self) -> String {
        self.shared
            .read("search_query", |state| state.search_query.clone())
    }

    pub fn on_add_post(&self, post: Post) {
        self.shared.add_post(post);
    }

    pub fn on_clear_posts(&self) {
        self.shared.clear_posts();
    }

    pub fn set_search_query(&self, query: impl Into<String>) {
        self.shared.set_search_query(query.into());
    }
}

impl std::fmt::Debug for BlogContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlogContext").finish_non_exhaustive()
    }
}
