use serde::Serialize;

use super::generator::PostGenerator;

/// A single blog entry. Posts carry no identifier; lists key them by position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Post {
    pub title: String,
    pub body: String,
}

impl Post {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// The text the search box matches against.
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.title, self.body)
    }
}

/// The active posts, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostStore {
    posts: Vec<Post>,
}

impl PostStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_posts(posts: Vec<Post>) -> Self {
        Self { posts }
    }

    /// Fill a store with `count` freshly generated posts.
    pub fn seeded<G>(count: usize, generator: &mut G) -> Self
    where
        G: PostGenerator + ?Sized,
    {
        Self {
            posts: (0..count).map(|_| generator.generate()).collect(),
        }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Prepend `post`. Duplicates are allowed.
    pub fn add_post(&mut self, post: Post) {
        self.posts.insert(0, post);
    }

    /// Drop every post, returning how many were removed.
    pub fn clear_posts(&mut self) -> usize {
        let removed = self.posts.len();
        self.posts = Vec::new();
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PostStore {
        PostStore::from_posts(vec![Post::new("a", "x"), Post::new("b", "y")])
    }

    #[test]
    fn add_post_prepends() {
        let mut store = sample();
        store.add_post(Post::new("c", "z"));

        assert_eq!(
            store.posts(),
            &[Post::new("c", "z"), Post::new("a", "x"), Post::new("b", "y")]
        );
    }

    #[test]
    fn add_post_grows_by_exactly_one_even_for_duplicates() {
        let mut store = sample();
        store.add_post(Post::new("a", "x"));
        store.add_post(Post::new("a", "x"));

        assert_eq!(store.len(), 4);
        assert_eq!(store.posts()[0], store.posts()[1]);
    }

    #[test]
    fn clear_posts_is_idempotent() {
        let mut store = sample();

        assert_eq!(store.clear_posts(), 2);
        assert!(store.is_empty());
        assert_eq!(store.clear_posts(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn searchable_text_joins_title_and_body_with_a_space() {
        assert_eq!(Post::new("Rust", "ownership").searchable_text(), "Rust ownership");
    }
}
