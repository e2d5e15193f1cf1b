use super::{error::DomainError, generator::PostGenerator, posts::Post};

/// A fixed pool of older posts and whether the panel listing them is open.
///
/// The pool is generated once and never changes; entries are copied into the
/// active list, never moved.
#[derive(Debug, Clone, Default)]
pub struct ArchiveStore {
    posts: Vec<Post>,
    visible: bool,
}

impl ArchiveStore {
    pub fn new(posts: Vec<Post>) -> Self {
        Self {
            posts,
            visible: false,
        }
    }

    pub fn generate<G>(count: usize, generator: &mut G) -> Self
    where
        G: PostGenerator + ?Sized,
    {
        Self::new((0..count).map(|_| generator.generate()).collect())
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

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Flip the panel between hidden and shown, returning the new state.
    pub fn toggle_visible(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    /// A copy of the entry at `position`, ready to be added to the active list.
    pub fn copy_entry(&self, position: usize) -> Result<Post, DomainError> {
        self.posts
            .get(position)
            .cloned()
            .ok_or_else(|| DomainError::not_found("archive post", position))
    }
}
