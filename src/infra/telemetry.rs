use std::io;
use std::sync::Once;

use metrics::{Unit, describe_counter, describe_histogram};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber writing to stderr.
///
/// Stdout is reserved for rendered frames and session output.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .with_writer(io::stderr)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(true)
            .with_writer(io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            "atomic_blog_posts_added_total",
            Unit::Count,
            "Total number of posts prepended to the active list."
        );
        describe_counter!(
            "atomic_blog_posts_cleared_total",
            Unit::Count,
            "Total number of posts removed by clearing the active list."
        );
        describe_counter!(
            "atomic_blog_render_total",
            Unit::Count,
            "Total number of frames rendered by render surfaces."
        );
        describe_histogram!(
            "atomic_blog_render_ms",
            Unit::Milliseconds,
            "Frame render latency in milliseconds."
        );
    });
}
