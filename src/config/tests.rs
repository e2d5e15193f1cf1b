use std::io::Write;

use super::*;

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.blog.initial_posts = Some(10);
    raw.logging.level = Some("info".to_string());

    let overrides = BlogOverrides {
        initial_posts: Some(3),
        log_level: Some("debug".to_string()),
        ..Default::default()
    };

    raw.apply_blog_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.blog.initial_posts, 3);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn defaults_match_the_classic_layout() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.blog, BlogSettings::default());
    assert_eq!(settings.blog.initial_posts, 30);
    assert_eq!(settings.blog.archive_posts, 50);
    assert_eq!(settings.blog.seed, None);
    assert_eq!(settings.logging.level, LevelFilter::INFO);
    assert!(matches!(settings.logging.format, LogFormat::Compact));
    assert!(settings.render.output.is_none());
}

#[test]
fn oversized_post_counts_are_rejected() {
    let mut raw = RawSettings::default();
    raw.blog.archive_posts = Some(MAX_GENERATED_POSTS + 1);

    let error = Settings::from_raw(raw).expect_err("too many posts");
    assert!(matches!(
        error,
        LoadError::Invalid {
            key: "blog.archive_posts",
            ..
        }
    ));
}

#[test]
fn empty_post_counts_are_allowed() {
    let mut raw = RawSettings::default();
    raw.blog.initial_posts = Some(0);

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.blog.initial_posts, 0);
}

#[test]
fn unparsable_log_level_is_rejected() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("chatty".to_string());

    let error = Settings::from_raw(raw).expect_err("bad level");
    assert!(matches!(
        error,
        LoadError::Invalid {
            key: "logging.level",
            ..
        }
    ));
}

#[test]
fn empty_output_path_is_rejected() {
    let mut raw = RawSettings::default();
    raw.render.output = Some(PathBuf::new());

    assert!(Settings::from_raw(raw).is_err());
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = BlogOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_blog_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn session_output_override_is_applied() {
    let mut raw = RawSettings::default();
    let args = SessionArgs {
        output: Some(PathBuf::from("frame.html")),
        ..Default::default()
    };

    raw.apply_session_overrides(&args);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.render.output, Some(PathBuf::from("frame.html")));
}

#[test]
fn no_subcommand_means_session() {
    let args = CliArgs::parse_from(["atomic-blog"]);
    let command = args
        .command
        .unwrap_or(Command::Session(Box::<SessionArgs>::default()));
    assert!(matches!(command, Command::Session(_)));
}

#[test]
fn parse_render_arguments() {
    let args = CliArgs::parse_from([
        "atomic-blog",
        "render",
        "--query",
        "virtual",
        "--dark",
        "--show-archive",
        "--format",
        "json",
        "--seed",
        "11",
    ]);

    match args.command.expect("render command") {
        Command::Render(render) => {
            assert_eq!(render.query.as_deref(), Some("virtual"));
            assert!(render.dark);
            assert!(render.show_archive);
            assert_eq!(render.format, OutputFormat::Json);
            assert_eq!(render.overrides.seed, Some(11));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn render_defaults_to_html() {
    let args = CliArgs::parse_from(["atomic-blog", "render"]);

    match args.command.expect("render command") {
        Command::Render(render) => {
            assert_eq!(render.format, OutputFormat::Html);
            assert!(!render.dark);
            assert!(render.query.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parse_session_arguments() {
    let args = CliArgs::parse_from([
        "atomic-blog",
        "session",
        "--output",
        "/tmp/blog.html",
        "--initial-posts",
        "5",
        "--log-json",
        "true",
    ]);

    match args.command.expect("session command") {
        Command::Session(session) => {
            assert_eq!(session.output, Some(PathBuf::from("/tmp/blog.html")));
            assert_eq!(session.overrides.initial_posts, Some(5));
            assert_eq!(session.overrides.log_json, Some(true));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn config_file_sits_below_cli_overrides() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp config file");
    writeln!(
        file,
        "[blog]\ninitial_posts = 4\narchive_posts = 6\nseed = 9\n\n[logging]\njson = true"
    )
    .expect("write config");

    let path = file.path().to_string_lossy().into_owned();
    let args = CliArgs::parse_from([
        "atomic-blog",
        "--config-file",
        path.as_str(),
        "render",
        "--archive-posts",
        "2",
    ]);

    let settings = load(&args).expect("settings load");

    assert_eq!(settings.blog.initial_posts, 4);
    assert_eq!(settings.blog.archive_posts, 2);
    assert_eq!(settings.blog.seed, Some(9));
    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn missing_config_file_is_an_error() {
    let args = CliArgs::parse_from([
        "atomic-blog",
        "--config-file",
        "/definitely/not/here/atomic-blog.toml",
    ]);

    assert!(matches!(load(&args), Err(LoadError::Build(_))));
}

#[test]
fn environment_sits_between_file_and_cli() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp config file");
    writeln!(file, "[blog]\ninitial_posts = 4\narchive_posts = 5\nseed = 9").expect("write config");

    let environment = Map::from_iter([
        ("ATOMIC_BLOG__BLOG__INITIAL_POSTS".to_string(), "7".to_string()),
        ("ATOMIC_BLOG__BLOG__ARCHIVE_POSTS".to_string(), "8".to_string()),
    ]);
    let path = file.path().to_string_lossy().into_owned();
    let args = CliArgs::parse_from([
        "atomic-blog",
        "--config-file",
        path.as_str(),
        "render",
        "--archive-posts",
        "1",
    ]);

    let settings = load_with_environment(&args, Some(environment)).expect("settings load");

    assert_eq!(settings.blog.initial_posts, 7);
    assert_eq!(settings.blog.archive_posts, 1);
    assert_eq!(settings.blog.seed, Some(9));
}
