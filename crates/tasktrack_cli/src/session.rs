//! The interactive prompt: login gate, then one command per line.

use crate::cli::{ReplCommand, ReplLine, normalize_parse_error};
use crate::render::{OutputFormat, render_log, render_tasks};
use std::borrow::Cow;
use std::io::{BufRead, Write};
use tasktrack_core::TaskManager;
use tasktrack_core::config::Config;
use tasktrack_core::error::AppError;
use tasktrack_core::model::Task;

pub const COMMANDS_BANNER: &str = "Commands: add, next, search, undo, redo, list, log, exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    LoginFailed,
    Exited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

pub struct Session<'a, R, W, E> {
    input: R,
    out: W,
    err: E,
    manager: &'a mut TaskManager,
    config: &'a Config,
    format: OutputFormat,
    line: Vec<u8>,
}

impl<'a, R, W, E> Session<'a, R, W, E>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    pub fn new(
        input: R,
        out: W,
        err: E,
        manager: &'a mut TaskManager,
        config: &'a Config,
        format: OutputFormat,
    ) -> Self {
        Self {
            input,
            out,
            err,
            manager,
            config,
            format,
            line: Vec::new(),
        }
    }

    pub fn run(&mut self) -> Result<SessionEnd, AppError> {
        if !self.login()? {
            writeln!(self.out, "Login failed.")?;
            return Ok(SessionEnd::LoginFailed);
        }
        self.command_loop()?;
        writeln!(self.out, "Goodbye!")?;
        Ok(SessionEnd::Exited)
    }

    /// A single attempt; end of input counts as a failed login.
    pub fn login(&mut self) -> Result<bool, AppError> {
        let Some(username) = self.prompt("Username: ")? else {
            return Ok(false);
        };
        let Some(credential) = self.prompt("Password: ")? else {
            return Ok(false);
        };
        Ok(self.manager.login(&username, &credential))
    }

    pub fn command_loop(&mut self) -> Result<(), AppError> {
        loop {
            writeln!(self.out)?;
            writeln!(self.out, "{COMMANDS_BANNER}")?;
            self.out.flush()?;

            let Some(raw) = self.read_line()? else {
                break;
            };
            let line = self.config.expand_alias(&raw);
            if line.is_empty() {
                continue;
            }

            if line.eq_ignore_ascii_case("help") || line == "?" {
                writeln!(self.out, "{}", ReplLine::render_help())?;
                continue;
            }

            let flow = match self.dispatch_line(&line) {
                Ok(flow) => flow,
                Err(err) => {
                    writeln!(self.err, "ERROR: {err}")?;
                    Flow::Continue
                }
            };
            if flow == Flow::Exit {
                break;
            }
        }
        Ok(())
    }

    fn dispatch_line(&mut self, line: &str) -> Result<Flow, AppError> {
        let first_word = line.split_whitespace().next().unwrap_or_default();
        if !ReplLine::is_known_command(first_word) {
            writeln!(self.out, "Unknown command.")?;
            return Ok(Flow::Continue);
        }

        let parsed = match ReplLine::parse_line(line) {
            Ok(parsed) => parsed,
            Err(err) if err.kind() == clap::error::ErrorKind::DisplayHelp => {
                writeln!(self.out, "{err}")?;
                return Ok(Flow::Continue);
            }
            Err(err) => return Err(normalize_parse_error(err)),
        };
        self.dispatch(parsed.command)
    }

    fn dispatch(&mut self, command: ReplCommand) -> Result<Flow, AppError> {
        match command {
            ReplCommand::Add { title, priority } => {
                let Some(task) = self.read_task(title, priority)? else {
                    return Ok(Flow::Exit);
                };
                let (title, priority) = (task.title().to_string(), task.priority());
                self.manager.add_task(task);
                writeln!(self.out, "Added task: {title} (priority {priority})")?;
            }
            ReplCommand::Next => match self.manager.complete_task() {
                Some(task) => {
                    let title = task.title().to_string();
                    writeln!(self.out, "Completed task: {title}")?;
                }
                None => writeln!(self.out, "No tasks to complete.")?,
            },
            ReplCommand::Undo => match self.manager.undo() {
                Some(step) => writeln!(self.out, "Undo {}: {}", step.action.label(), step.title)?,
                None => writeln!(self.out, "Nothing to undo.")?,
            },
            ReplCommand::Redo => match self.manager.redo() {
                Some(step) => writeln!(self.out, "Redo {}: {}", step.action.label(), step.title)?,
                None => writeln!(self.out, "Nothing to redo.")?,
            },
            ReplCommand::List => {
                let tasks = self.manager.list_tasks();
                if tasks.is_empty() && self.format != OutputFormat::Json {
                    writeln!(self.out, "No pending tasks.")?;
                } else {
                    let rendered = render_tasks(
                        &tasks,
                        "Pending tasks:",
                        self.format,
                        &self.config.palette(),
                    )?;
                    writeln!(self.out, "{rendered}")?;
                }
            }
            ReplCommand::Log => {
                let rendered = render_log(self.manager.show_log(), self.format)?;
                writeln!(self.out, "{rendered}")?;
            }
            ReplCommand::Recent => {
                let tasks = self.manager.recent_completed();
                if tasks.is_empty() && self.format != OutputFormat::Json {
                    writeln!(self.out, "No completed tasks.")?;
                } else {
                    let rendered = render_tasks(
                        &tasks,
                        "Recently completed:",
                        self.format,
                        &self.config.palette(),
                    )?;
                    writeln!(self.out, "{rendered}")?;
                }
            }
            ReplCommand::Search { words } => {
                let title = (!words.is_empty()).then(|| words.join(" "));
                let Some(title) = self.value_or_prompt(title, "Search title: ")? else {
                    return Ok(Flow::Exit);
                };
                match self.manager.search_subtasks(&title) {
                    Some(found) => {
                        let found = found.title().to_string();
                        writeln!(self.out, "Found: {found}")?;
                    }
                    None => writeln!(self.out, "Not found: {title}")?,
                }
            }
            ReplCommand::Subtask {
                parent,
                title,
                priority,
            } => {
                let Some(parent) = self.value_or_prompt(parent, "Parent title: ")? else {
                    return Ok(Flow::Exit);
                };
                let Some(task) = self.read_task(title, priority)? else {
                    return Ok(Flow::Exit);
                };
                let child = task.title().to_string();
                match self.manager.add_subtask(&parent, task) {
                    Some(parent_name) => {
                        writeln!(self.out, "Added subtask: {child} -> {parent_name}")?
                    }
                    None => writeln!(self.out, "Not found: {parent}")?,
                }
            }
            ReplCommand::Exit => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }

    /// Builds a task stamped with the current time, prompting for whatever
    /// was not given inline. `None` means input ended.
    fn read_task(
        &mut self,
        title: Option<String>,
        priority: Option<i32>,
    ) -> Result<Option<Task>, AppError> {
        let Some(title) = self.value_or_prompt(title, "Title: ")? else {
            return Ok(None);
        };
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::invalid_input("title is required"));
        }

        let priority = match priority {
            Some(priority) => priority,
            None => {
                let Some(raw) = self.prompt("Priority (int): ")? else {
                    return Ok(None);
                };
                parse_priority(&raw)?
            }
        };

        let added_at = self.manager.clock().now();
        Ok(Some(Task::new(title, added_at, priority)))
    }

    fn value_or_prompt(
        &mut self,
        value: Option<String>,
        label: &str,
    ) -> Result<Option<String>, AppError> {
        match value {
            Some(value) => Ok(Some(value)),
            None => self.prompt(label),
        }
    }

    fn prompt(&mut self, label: &str) -> Result<Option<String>, AppError> {
        write!(self.out, "{label}")?;
        self.out.flush()?;
        self.read_line()
    }

    /// Bytes that are not UTF-8 are replaced rather than failing the read, so
    /// a garbled line is reported like any other bad input.
    fn read_line(&mut self) -> Result<Option<String>, AppError> {
        self.line.clear();
        let bytes = self.input.read_until(b'\n', &mut self.line)?;
        if bytes == 0 {
            return Ok(None);
        }
        let text = String::from_utf8_lossy(&self.line);
        if matches!(text, Cow::Owned(_)) {
            tracing::debug!(bytes, "replaced invalid UTF-8 in input line");
        }
        Ok(Some(text.trim_end_matches(['\r', '\n']).to_string()))
    }
}

pub fn parse_priority(raw: &str) -> Result<i32, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("priority is required"));
    }
    trimmed
        .parse::<i32>()
        .map_err(|_| AppError::invalid_input(format!("priority must be an integer: {trimmed}")))
}
