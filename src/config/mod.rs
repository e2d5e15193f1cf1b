//! Configuration layer: typed settings with layered precedence (file → env → CLI).

mod cli;
#[cfg(test)]
mod tests;

use std::{path::PathBuf, str::FromStr};

use clap::Parser;
use config::{Config, Environment, File, Map};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

pub use cli::{BlogOverrides, CliArgs, Command, OutputFormat, RenderArgs, SessionArgs};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "atomic-blog";
const ENV_PREFIX: &str = "ATOMIC_BLOG";
const DEFAULT_INITIAL_POSTS: u64 = 30;
const DEFAULT_ARCHIVE_POSTS: u64 = 50;
const MAX_GENERATED_POSTS: u64 = 10_000;

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub blog: BlogSettings,
    pub render: RenderSettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogSettings {
    pub initial_posts: usize,
    pub archive_posts: usize,
    pub seed: Option<u64>,
}

impl Default for BlogSettings {
    fn default() -> Self {
        Self {
            initial_posts: DEFAULT_INITIAL_POSTS as usize,
            archive_posts: DEFAULT_ARCHIVE_POSTS as usize,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenderSettings {
    pub output: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    load_with_environment(cli, None)
}

/// `environment` replaces the process environment when set.
fn load_with_environment(
    cli: &CliArgs,
    environment: Option<Map<String, String>>,
) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
            .source(environment),
    );

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    match cli.command.as_ref() {
        Some(Command::Render(args)) => raw.apply_blog_overrides(&args.overrides),
        Some(Command::Session(args)) => raw.apply_session_overrides(args),
        None => {}
    }

    Settings::from_raw(raw)
}

/// Resolve configuration using the process arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    blog: RawBlogSettings,
    render: RawRenderSettings,
}

impl RawSettings {
    fn apply_blog_overrides(&mut self, overrides: &BlogOverrides) {
        if let Some(count) = overrides.initial_posts {
            self.blog.initial_posts = Some(count);
        }
        if let Some(count) = overrides.archive_posts {
            self.blog.archive_posts = Some(count);
        }
        if let Some(seed) = overrides.seed {
            self.blog.seed = Some(seed);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }

    fn apply_session_overrides(&mut self, args: &SessionArgs) {
        self.apply_blog_overrides(&args.overrides);
        if let Some(path) = args.output.as_ref() {
            self.render.output = Some(path.clone());
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            logging,
            blog,
            render,
        } = raw;

        Ok(Self {
            logging: build_logging_settings(logging)?,
            blog: build_blog_settings(blog)?,
            render: build_render_settings(render)?,
        })
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_blog_settings(blog: RawBlogSettings) -> Result<BlogSettings, LoadError> {
    let initial_posts = post_count(
        blog.initial_posts.unwrap_or(DEFAULT_INITIAL_POSTS),
        "blog.initial_posts",
    )?;
    let archive_posts = post_count(
        blog.archive_posts.unwrap_or(DEFAULT_ARCHIVE_POSTS),
        "blog.archive_posts",
    )?;

    Ok(BlogSettings {
        initial_posts,
        archive_posts,
        seed: blog.seed,
    })
}

fn build_render_settings(render: RawRenderSettings) -> Result<RenderSettings, LoadError> {
    if render
        .output
        .as_ref()
        .is_some_and(|path| path.as_os_str().is_empty())
    {
        return Err(LoadError::invalid("render.output", "path must not be empty"));
    }

    Ok(RenderSettings {
        output: render.output,
    })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawBlogSettings {
    initial_posts: Option<u64>,
    archive_posts: Option<u64>,
    seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawRenderSettings {
    output: Option<PathBuf>,
}

fn post_count(value: u64, key: &'static str) -> Result<usize, LoadError> {
    if value > MAX_GENERATED_POSTS {
        return Err(LoadError::invalid(
            key,
            format!("must not exceed {MAX_GENERATED_POSTS}"),
        ));
    }
    usize::try_from(value)
        .map_err(|_| LoadError::invalid(key, "value exceeds supported range for usize"))
}
