use std::{
    io::{self, Write},
    process,
    sync::Arc,
};

use atomic_blog::{
    application::error::{AppError, ErrorReport},
    bootstrap, config,
    infra::telemetry,
    presentation::{session::Session, surface::RenderSurface},
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

fn main() {
    if let Err(error) = run() {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    let report = ErrorReport::from_error("atomic_blog::main", error);
    if dispatcher::has_been_set() {
        error!(source = report.source, error = %report.summary(), "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(source = report.source, error = %report.summary(), "application error");
    });
}

fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Session(Box::<config::SessionArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Render(args) => run_render(settings, args),
        config::Command::Session(_) => run_session(settings),
    }
}

fn run_render(settings: config::Settings, args: config::RenderArgs) -> Result<(), AppError> {
    let app = bootstrap::build_app(&settings.blog)?;

    if let Some(query) = args.query {
        app.header().search().input(query);
    }
    if args.dark {
        app.toggle_theme();
    }
    if args.show_archive {
        app.archive().toggle();
    }

    let rendered = match args.format {
        config::OutputFormat::Html => app.render()?,
        config::OutputFormat::Json => serde_json::to_string_pretty(&app.view())
            .map_err(|err| AppError::unexpected(format!("failed to serialize view: {err}")))?,
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{rendered}")?;
    stdout.flush()?;

    info!(format = ?args.format, "Rendered one frame");
    Ok(())
}

fn run_session(settings: config::Settings) -> Result<(), AppError> {
    let app = Arc::new(bootstrap::build_app(&settings.blog)?);

    let view_app = Arc::clone(&app);
    let surface = RenderSurface::render(
        move || view_app.render(),
        &app.sources(),
        settings.render.output.clone(),
    )?;

    let session = Session::new(Arc::clone(&app));
    let result = session.run(io::stdin().lock(), io::stdout().lock());

    info!(frames = surface.frame_count(), "Render surface closed");
    drop(surface);
    result
}
