//! Start-up wiring: generate the seeded posts and the archive, create the
//! shared context and mount the display tree.

use tracing::info;

use crate::application::{
    blog::{Blog, PostContext},
    context::MissingProviderError,
};
use crate::config::BlogSettings;
use crate::domain::{
    archive::ArchiveStore,
    generator::{HackerPostGenerator, PostGenerator},
    posts::PostStore,
};
use crate::presentation::app::App;

const CONTEXT_NAME: &str = "PostContext";

pub fn build_app(settings: &BlogSettings) -> Result<App, MissingProviderError> {
    let mut generator = HackerPostGenerator::new(settings.seed);
    build_app_with(settings, &mut generator)
}

/// Like [`build_app`] with a caller-supplied generator.
///
/// The active posts are drawn first, then the archive.
pub fn build_app_with<G>(settings: &BlogSettings, generator: &mut G) -> Result<App, MissingProviderError>
where
    G: PostGenerator + ?Sized,
{
    let store = PostStore::seeded(settings.initial_posts, generator);
    let archive = ArchiveStore::generate(settings.archive_posts, generator);
    info!(
        initial_posts = store.len(),
        archive_posts = archive.len(),
        seeded = settings.seed.is_some(),
        "Generated posts"
    );

    let context = PostContext::new(CONTEXT_NAME);
    App::mount(Blog::new(store), archive, &context)
}
