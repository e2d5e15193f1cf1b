use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the Atomic Blog binary.
#[derive(Debug, Parser)]
#[command(name = "atomic-blog", version, about = "The Atomic Blog")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "ATOMIC_BLOG_CONFIG_FILE",
        value_name = "PATH",
        value_hint = ValueHint::FilePath
    )]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Render one frame of the blog to stdout and exit.
    Render(RenderArgs),
    /// Read commands from stdin and re-render after every change.
    Session(Box<SessionArgs>),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The full HTML page.
    #[default]
    Html,
    /// The page view model as JSON.
    Json,
}

#[derive(Debug, Args, Default, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub overrides: BlogOverrides,

    /// Type this query into the search box before rendering.
    #[arg(long, value_name = "TEXT")]
    pub query: Option<String>,

    /// Switch to the dark theme before rendering.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub dark: bool,

    /// Open the archive panel before rendering.
    #[arg(long = "show-archive", action = clap::ArgAction::SetTrue)]
    pub show_archive: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Html)]
    pub format: OutputFormat,
}

#[derive(Debug, Args, Default, Clone)]
pub struct SessionArgs {
    #[command(flatten)]
    pub overrides: BlogOverrides,

    /// Write every rendered frame to this file.
    #[arg(long = "output", value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct BlogOverrides {
    /// Override the number of posts generated at start-up.
    #[arg(long = "initial-posts", value_name = "COUNT")]
    pub initial_posts: Option<u64>,

    /// Override the number of posts generated for the archive.
    #[arg(long = "archive-posts", value_name = "COUNT")]
    pub archive_posts: Option<u64>,

    /// Seed the post generator for reproducible content.
    #[arg(long = "seed", value_name = "SEED")]
    pub seed: Option<u64>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
}
