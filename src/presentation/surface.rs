//! A render surface: the explicit subscriber that turns state changes into
//! frames.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, Weak};
use std::time::Instant;

use metrics::{counter, histogram};
use tracing::{debug, warn};

use crate::application::{
    events::{Epoch, Observable, StateEvent, Subscription},
    lock::mutex_lock,
};

use super::views::TemplateRenderError;

const SOURCE: &str = "presentation::surface";
pub(crate) const METRIC_RENDER_TOTAL: &str = "atomic_blog_render_total";
pub(crate) const METRIC_RENDER_MS: &str = "atomic_blog_render_ms";

type ViewFn = dyn Fn() -> Result<String, TemplateRenderError> + Send + Sync;

#[derive(Debug, Default)]
struct Frames {
    latest: String,
    count: u64,
}

struct SurfaceInner {
    view: Box<ViewFn>,
    frames: Mutex<Frames>,
    output: Option<PathBuf>,
}

impl SurfaceInner {
    // The view function runs without the frame lock held; it reads state
    // that listeners of the same event may still be updating.
    fn draw(&self, epoch: Option<Epoch>) -> Result<(), TemplateRenderError> {
        let started_at = Instant::now();
        let frame = (self.view)()?;
        histogram!(METRIC_RENDER_MS).record(started_at.elapsed().as_secs_f64() * 1000.0);
        counter!(METRIC_RENDER_TOTAL).increment(1);

        if let Some(path) = self.output.as_ref() {
            if let Err(error) = std::fs::write(path, &frame) {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "Failed to write frame"
                );
            }
        }

        let mut frames = mutex_lock(&self.frames, SOURCE, "draw");
        frames.latest = frame;
        frames.count += 1;
        debug!(frame = frames.count, epoch, "Frame rendered");
        Ok(())
    }

    fn on_event(&self, event: &StateEvent) {
        if let Err(error) = self.draw(Some(event.epoch)) {
            warn!(
                epoch = event.epoch,
                origin = error.origin(),
                error = %error,
                "Render failed; keeping the previous frame"
            );
        }
    }
}

/// Re-renders after every notification from the observed sources and keeps
/// the latest frame. Dropping the surface unsubscribes it.
pub struct RenderSurface {
    inner: Arc<SurfaceInner>,
    _subscriptions: Vec<Subscription>,
}

impl RenderSurface {
    /// Draw the first frame, then subscribe to every source.
    pub fn render<F>(
        view: F,
        sources: &[&dyn Observable],
        output: Option<PathBuf>,
    ) -> Result<Self, TemplateRenderError>
    where
        F: Fn() -> Result<String, TemplateRenderError> + Send + Sync + 'static,
    {
        let inner = Arc::new(SurfaceInner {
            view: Box::new(view),
            frames: Mutex::new(Frames::default()),
            output,
        });
        inner.draw(None)?;

        // Listeners hold a weak handle; the surface owns the only strong one.
        let subscriptions = sources
            .iter()
            .map(|source| {
                let weak: Weak<SurfaceInner> = Arc::downgrade(&inner);
                source.subscribe_listener(Arc::new(move |event: &StateEvent| {
                    if let Some(inner) = weak.upgrade() {
                        inner.on_event(event);
                    }
                }))
            })
            .collect();

        Ok(Self {
            inner,
            _subscriptions: subscriptions,
        })
    }

    pub fn latest_frame(&self) -> String {
        mutex_lock(&self.inner.frames, SOURCE, "latest_frame")
            .latest
            .clone()
    }

    /// Frames drawn so far, the initial one included.
    pub fn frame_count(&self) -> u64 {
        mutex_lock(&self.inner.frames, SOURCE, "frame_count").count
    }
}

impl std::fmt::Debug for RenderSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderSurface")
            .field("frames", &self.frame_count())
            .field("output", &self.inner.output)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use super::*;
    use crate::application::events::{ListenerRegistry, StateChange};

    fn unavailable() -> TemplateRenderError {
        TemplateRenderError::new("tests", "view unavailable", askama::Error::Fmt)
    }

    #[test]
    fn redraws_once_per_event_until_dropped() {
        let registry = ListenerRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let surface = RenderSurface::render(
            move || Ok(format!("frame {}", counter.fetch_add(1, Ordering::SeqCst))),
            &[&registry],
            None,
        )
        .expect("first frame");
        assert_eq!(surface.latest_frame(), "frame 0");

        registry.publish(StateChange::FormEdited);
        registry.publish(StateChange::FormEdited);
        assert_eq!(surface.frame_count(), 3);
        assert_eq!(surface.latest_frame(), "frame 2");

        drop(surface);
        registry.publish(StateChange::FormEdited);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(registry.listener_count(), 0);
    }

    #[test]
    fn writes_frames_to_the_output_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("frame.html");
        let registry = ListenerRegistry::new();

        let _surface = RenderSurface::render(
            || Ok("<p>hello</p>".to_string()),
            &[&registry],
            Some(path.clone()),
        )
        .expect("first frame");

        assert_eq!(
            std::fs::read_to_string(&path).expect("frame written"),
            "<p>hello</p>"
        );
    }

    #[test]
    fn failed_redraw_keeps_the_previous_frame() {
        let registry = ListenerRegistry::new();
        let healthy = Arc::new(AtomicBool::new(true));
        let switch = Arc::clone(&healthy);

        let surface = RenderSurface::render(
            move || {
                if switch.load(Ordering::SeqCst) {
                    Ok("good".to_string())
                } else {
                    Err(unavailable())
                }
            },
            &[&registry],
            None,
        )
        .expect("first frame");

        healthy.store(false, Ordering::SeqCst);
        registry.publish(StateChange::FormEdited);

        assert_eq!(surface.latest_frame(), "good");
        assert_eq!(surface.frame_count(), 1);

        healthy.store(true, Ordering::SeqCst);
        registry.publish(StateChange::FormEdited);
        assert_eq!(surface.frame_count(), 2);
    }

    #[test]
    fn failed_first_frame_is_returned_to_the_caller() {
        let registry = ListenerRegistry::new();

        let error = RenderSurface::render(|| Err(unavailable()), &[&registry], None)
            .expect_err("no first frame");

        assert_eq!(error.origin(), "tests");
        assert_eq!(error.to_string(), "view unavailable");
        assert_eq!(registry.listener_count(), 0);
    }
}
