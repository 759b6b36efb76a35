//! Line-oriented console front end.
//!
//! Each stdin line is one command; each response is one line of JSON (the
//! serialised [`CommandResult`]).
//!
//! | Line               | Command                                   |
//! |--------------------|-------------------------------------------|
//! | `monitors`         | list monitors                             |
//! | `refresh`          | re-enumerate monitors                     |
//! | `select <n>`       | draw on monitor `n` (0-based)             |
//! | `select <label>`   | draw on the monitor with that label       |
//! | `clear`            | clear the canvas                          |
//! | `snapshot`         | save into the snapshot folder             |
//! | `pick <dir>`       | choose the save-as directory              |
//! | `save`             | save-as into the picked directory         |
//! | `save <dir>`       | pick `dir`, then save-as                  |
//! | `status`           | session state and counters                |
//! | `help`             | list commands                             |
//! | `quit` / `exit`    | shut down                                 |

use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::{
    clear_canvas, get_monitors, get_status, pick_save_directory, refresh_monitors, save_as,
    select_monitor, select_monitor_by_label, take_snapshot, AppState, CommandResult,
};

/// Help text printed by `help`.
pub const HELP: &str = "commands: monitors | refresh | select <n|label> | clear | snapshot | \
                        pick <dir> | save [dir] | status | help | quit";

/// Error type for console line parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command {0:?}; type `help` for a list")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
}

/// One parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Monitors,
    Refresh,
    Select(usize),
    SelectLabel(String),
    Clear,
    Snapshot,
    Pick(PathBuf),
    Save(Option<PathBuf>),
    Status,
    Help,
    Quit,
}

impl ConsoleCommand {
    /// Parses one input line.  Blank lines yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] for unknown commands or missing arguments.
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "monitors" | "list" => ConsoleCommand::Monitors,
            "refresh" => ConsoleCommand::Refresh,
            "select" => {
                if rest.is_empty() {
                    return Err(ParseError::MissingArgument("select"));
                }
                match rest.parse::<usize>() {
                    Ok(index) => ConsoleCommand::Select(index),
                    Err(_) => ConsoleCommand::SelectLabel(rest.to_string()),
                }
            }
            "clear" => ConsoleCommand::Clear,
            "snapshot" => ConsoleCommand::Snapshot,
            "pick" => {
                if rest.is_empty() {
                    return Err(ParseError::MissingArgument("pick"));
                }
                ConsoleCommand::Pick(PathBuf::from(rest))
            }
            "save" => ConsoleCommand::Save((!rest.is_empty()).then(|| PathBuf::from(rest))),
            "status" => ConsoleCommand::Status,
            "help" | "?" => ConsoleCommand::Help,
            "quit" | "exit" => ConsoleCommand::Quit,
            other => return Err(ParseError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }

    /// `true` for commands that write files and should run on a blocking thread.
    pub fn does_io(&self) -> bool {
        matches!(self, ConsoleCommand::Snapshot | ConsoleCommand::Save(_))
    }
}

fn to_json<T: Serialize>(result: CommandResult<T>) -> Value {
    serde_json::to_value(&result).unwrap_or_else(|e| {
        serde_json::json!({ "success": false, "data": null, "error": e.to_string() })
    })
}

/// Runs a parsed command and returns its JSON response.
///
/// `Quit` is answered with a plain success; the caller initiates shutdown.
pub fn execute(state: &AppState, command: &ConsoleCommand) -> Value {
    match command {
        ConsoleCommand::Monitors => to_json(get_monitors(state)),
        ConsoleCommand::Refresh => to_json(refresh_monitors(state)),
        ConsoleCommand::Select(index) => to_json(select_monitor(state, *index)),
        ConsoleCommand::SelectLabel(label) => to_json(select_monitor_by_label(state, label)),
        ConsoleCommand::Clear => to_json(clear_canvas(state)),
        ConsoleCommand::Snapshot => to_json(take_snapshot(state)),
        ConsoleCommand::Pick(dir) => to_json(pick_save_directory(state, dir)),
        ConsoleCommand::Save(dir) => {
            if let Some(dir) = dir {
                pick_save_directory(state, dir);
            }
            to_json(save_as(state))
        }
        ConsoleCommand::Status => to_json(get_status(state)),
        ConsoleCommand::Help => to_json(CommandResult::ok(HELP)),
        ConsoleCommand::Quit => to_json(CommandResult::ok("shutting down")),
    }
}

/// What the caller must do with one input line.
#[derive(Debug)]
pub enum LineOutcome {
    /// Blank line; print nothing.
    Blank,
    /// The command already ran (or failed to parse); print the response.
    Reply(Value),
    /// A file-writing command; run it with [`execute`] on a blocking thread.
    Blocking(ConsoleCommand),
    /// Print the response, then shut down.
    Quit(Value),
}

/// Parses one line and runs it unless it needs a blocking thread.
pub fn dispatch_line(state: &AppState, line: &str) -> LineOutcome {
    let command = match ConsoleCommand::parse(line) {
        Ok(Some(command)) => command,
        Ok(None) => return LineOutcome::Blank,
        Err(e) => return LineOutcome::Reply(to_json(CommandResult::<()>::err(e.to_string()))),
    };
    match command {
        ConsoleCommand::Quit => LineOutcome::Quit(execute(state, &command)),
        command if command.does_io() => LineOutcome::Blocking(command),
        command => LineOutcome::Reply(execute(state, &command)),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
