//! Line-driven interaction with a mounted [`App`].
//!
//! Each input line stands for one click or keystroke sequence on the page.
//! Mistyped commands are reported and the session keeps going; anything else
//! that fails ends it.

use std::io::{BufRead, Write};
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, info};

use crate::application::error::AppError;

use super::app::App;
use super::components::SubmitOutcome;

const HELP: &str = "\
commands:
  title <text>           type into the post title field
  body <text>            type into the post body field
  submit                 press \"Add post\"
  add <title> | <body>   fill in the form and submit it
  search [query]         type into the search box (empty clears it)
  clear                  press \"Clear posts\"
  theme                  toggle the dark theme
  archive                show or hide the archive panel
  archive add <n>        press \"Add as a new post\" on archive entry n
  list                   print the searched posts
  help                   print this message
  quit | exit            end the session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Title(String),
    Body(String),
    Submit,
    Add { title: String, body: String },
    Search(String),
    Clear,
    Theme,
    Archive,
    ArchiveAdd(usize),
    List,
    Help,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = AppError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_start();
        let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));

        let command = match verb {
            "title" => Self::Title(rest.to_string()),
            "body" => Self::Body(rest.to_string()),
            "submit" => Self::Submit,
            "add" => {
                let (title, body) = rest
                    .split_once('|')
                    .ok_or_else(|| AppError::validation("usage: add <title> | <body>"))?;
                Self::Add {
                    title: title.trim().to_string(),
                    body: body.trim().to_string(),
                }
            }
            "search" => Self::Search(rest.to_string()),
            "clear" => Self::Clear,
            "theme" => Self::Theme,
            "archive" => match rest.trim() {
                "" => Self::Archive,
                arg => Self::ArchiveAdd(parse_archive_add(arg)?),
            },
            "list" => Self::List,
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => {
                return Err(AppError::validation(format!(
                    "unknown command `{other}`; type `help` for a list"
                )));
            }
        };

        Ok(command)
    }
}

fn parse_archive_add(arg: &str) -> Result<usize, AppError> {
    let mut tokens = arg.split_whitespace();
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some("add"), Some(position), None) => position.parse().map_err(|_| {
            AppError::validation(format!("`{position}` is not an archive position"))
        }),
        _ => Err(AppError::validation("usage: archive [add <n>]")),
    }
}

fn decode_line(bytes: &[u8], number: usize) -> Result<&str, AppError> {
    std::str::from_utf8(bytes)
        .map(|line| line.trim_end_matches(['\n', '\r']))
        .map_err(|_| AppError::validation(format!("line {number} is not valid UTF-8")))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue(Option<String>),
    Quit,
}

pub struct Session {
    app: Arc<App>,
}

impl Session {
    pub fn new(app: Arc<App>) -> Self {
        Self { app }
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn execute(&self, command: SessionCommand) -> Result<Outcome, AppError> {
        debug!(command = ?command, "Executing session command");
        let app = self.app.as_ref();
        let form = app.main().form();

        let message = match command {
            SessionCommand::Title(title) => {
                form.set_title(title);
                None
            }
            SessionCommand::Body(body) => {
                form.set_body(body);
                None
            }
            SessionCommand::Submit => Some(describe_submit(form.submit())),
            SessionCommand::Add { title, body } => {
                form.set_title(title);
                form.set_body(body);
                Some(describe_submit(form.submit()))
            }
            SessionCommand::Search(query) => {
                app.header().search().input(query);
                None
            }
            SessionCommand::Clear => {
                app.header().clear_posts();
                Some("cleared".to_string())
            }
            SessionCommand::Theme => {
                let theme = app.toggle_theme();
                Some(format!("theme: {}", if theme.is_dark() { "dark" } else { "default" }))
            }
            SessionCommand::Archive => {
                let visible = app.archive().toggle();
                Some(format!("archive: {}", if visible { "shown" } else { "hidden" }))
            }
            SessionCommand::ArchiveAdd(position) => {
                let post = app.archive().add_to_active(position)?;
                Some(format!("added from archive: {}", post.title))
            }
            SessionCommand::List => {
                let lines: Vec<String> = app
                    .main()
                    .list()
                    .view()
                    .into_iter()
                    .map(|item| format!("[{}] {}: {}", item.key, item.title, item.body))
                    .collect();
                Some(lines.join("\n")).filter(|listing| !listing.is_empty())
            }
            SessionCommand::Help => Some(HELP.to_string()),
            SessionCommand::Quit => return Ok(Outcome::Quit),
        };

        Ok(Outcome::Continue(message))
    }

    /// Execute every command read from `input` until it ends or a `quit`.
    pub fn run<R, W>(&self, mut input: R, mut output: W) -> Result<(), AppError>
    where
        R: BufRead,
        W: Write,
    {
        info!("Session started");
        let mut executed = 0usize;
        let mut buffer = Vec::new();
        let mut number = 0usize;

        loop {
            buffer.clear();
            if input.read_until(b'\n', &mut buffer)? == 0 {
                break;
            }
            number += 1;

            let outcome = match decode_line(&buffer, number) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() || trimmed.starts_with('#') {
                        continue;
                    }
                    line.parse::<SessionCommand>()
                        .and_then(|command| self.execute(command))
                }
                Err(error) => Err(error),
            };

            match outcome {
                Ok(Outcome::Quit) => break,
                Ok(Outcome::Continue(message)) => {
                    executed += 1;
                    if let Some(message) = message {
                        writeln!(output, "{message}")?;
                    }
                }
                Err(error) if error.is_recoverable() => {
                    writeln!(output, "error: {error}")?;
                }
                Err(error) => return Err(error),
            }

            writeln!(output, "{}", self.app.header().results().view().label)?;
        }

        output.flush()?;
        info!(executed, "Session ended");
        Ok(())
    }
}

fn describe_submit(outcome: SubmitOutcome) -> String {
    match outcome {
        SubmitOutcome::Added(post) => format!("added: {}", post.title),
        SubmitOutcome::Ignored => "ignored: title and body are both required".to_string(),
    }
}
