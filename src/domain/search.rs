//! Search derivation over the active posts.
//!
//! The filter is recomputed on every state change and is never cached; the
//! active list holds at most a few hundred entries.

use std::borrow::Cow;

use super::posts::Post;

/// Posts whose `title + " " + body` contains `query`, ignoring case.
///
/// An empty query returns the input slice itself, borrowed. Any other query,
/// including one made only of whitespace, is matched literally and yields an
/// order-preserving subsequence.
pub fn filter<'a>(posts: &'a [Post], query: &str) -> Cow<'a, [Post]> {
    if query.is_empty() {
        return Cow::Borrowed(posts);
    }

    let needle = query.to_lowercase();
    Cow::Owned(
        posts
            .iter()
            .filter(|post| contains_lowercase(post, &needle))
            .cloned()
            .collect(),
    )
}

fn contains_lowercase(post: &Post, needle: &str) -> bool {
    post.searchable_text().to_lowercase().contains(needle)
}
