use clap::{CommandFactory, Parser, Subcommand};
use tasktrack_core::config::{ConfigOverrides, Theme, canonical_name};
use tasktrack_core::error::AppError;

use crate::render::OutputFormat;

#[derive(Parser, Debug)]
#[command(author, version, about = "Interactive priority task tracker", long_about = None)]
pub struct Cli {
    /// Render list, log and recent output as JSON
    #[arg(long, conflicts_with = "table")]
    pub json: bool,

    /// Render list, log and recent output as tables
    #[arg(long)]
    pub table: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE")]
    pub config_override: Vec<String>,
}

impl Cli {
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else if self.table {
            OutputFormat::Table
        } else {
            OutputFormat::Plain
        }
    }

    pub fn config_overrides(&self) -> Result<ConfigOverrides, AppError> {
        let mut overrides = ConfigOverrides::default();
        for raw in &self.config_override {
            let parsed = parse_config_override(raw).map_err(AppError::invalid_input)?;
            match parsed.target {
                ConfigOverrideTarget::Theme => {
                    let theme = Theme::from_name(&parsed.value).ok_or_else(|| {
                        AppError::invalid_input(format!("unknown theme '{}'", parsed.value))
                    })?;
                    overrides.theme = Some(theme);
                }
                ConfigOverrideTarget::Alias(alias) => {
                    overrides.aliases.insert(alias, parsed.value);
                }
                ConfigOverrideTarget::RecentCapacity => {
                    let capacity = parsed
                        .value
                        .parse::<usize>()
                        .ok()
                        .filter(|capacity| *capacity > 0)
                        .ok_or_else(|| {
                            AppError::invalid_input("recent_capacity must be a positive integer")
                        })?;
                    overrides.recent_capacity = Some(capacity);
                }
            }
        }
        Ok(overrides)
    }
}

/// One line typed at the interactive prompt.
#[derive(Parser, Debug)]
#[command(
    name = "tasktrack",
    no_binary_name = true,
    disable_help_subcommand = true,
    disable_version_flag = true
)]
pub struct ReplLine {
    #[command(subcommand)]
    pub command: ReplCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ReplCommand {
    /// Add a task; prompts for anything not given
    ///
    /// Quote titles that contain spaces. Example: add "Write spec" 2
    Add {
        title: Option<String>,
        #[arg(allow_negative_numbers = true)]
        priority: Option<i32>,
    },
    /// Complete the most urgent task
    Next,
    /// Find a task or subtask by title (case-insensitive)
    ///
    /// Remaining words form the title. Example: search fix bug
    Search {
        #[arg(num_args = 1.., trailing_var_arg = true)]
        words: Vec<String>,
    },
    /// Attach a subtask under a pending task or subtask
    ///
    /// Quote titles that contain spaces. Example: subtask "Release" "Write changelog" 2
    Subtask {
        parent: Option<String>,
        title: Option<String>,
        #[arg(allow_negative_numbers = true)]
        priority: Option<i32>,
    },
    /// Revert the last add or completion
    Undo,
    /// Re-apply the last undone action
    Redo,
    /// List pending tasks by priority
    List,
    /// Show the activity log
    Log,
    /// Show recently completed tasks
    Recent,
    /// Leave the session
    #[command(alias = "quit")]
    Exit,
}

impl ReplLine {
    pub fn parse_line(line: &str) -> Result<ReplLine, clap::Error> {
        let args = split_command_line(line).map_err(|err| {
            ReplLine::command().error(clap::error::ErrorKind::InvalidValue, err.message())
        })?;
        ReplLine::try_parse_from(normalize_command_word(args))
    }

    pub fn is_known_command(word: &str) -> bool {
        let word = word.to_ascii_lowercase();
        ReplLine::command()
            .get_subcommands()
            .any(|sub| sub.get_name() == word || sub.get_all_aliases().any(|alias| alias == word))
    }

    pub fn render_help() -> String {
        ReplLine::command().render_help().to_string()
    }
}

fn normalize_command_word(mut args: Vec<String>) -> Vec<String> {
    if let Some(first) = args.first_mut() {
        *first = first.to_ascii_lowercase();
    }
    args
}

pub fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

/// Whitespace tokenizer that keeps double-quoted runs together.
pub fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            quoted = true;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() || quoted {
                args.push(std::mem::take(&mut current));
                quoted = false;
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() || quoted {
        args.push(current);
    }

    Ok(args)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    Alias(String),
    RecentCapacity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let (field, remainder) = key_raw
        .split_once('.')
        .map(|(field, rest)| (field.trim(), Some(rest.trim())))
        .unwrap_or((key_raw.trim(), None));

    let canonical_field = canonical_name(field);
    if canonical_field.is_empty() {
        return Err("override key cannot be empty".to_string());
    }

    let target = match canonical_field.as_str() {
        "theme" | "recent_capacity" if remainder.is_some() => {
            return Err(format!("{canonical_field} override cannot have subfields"));
        }
        "theme" => ConfigOverrideTarget::Theme,
        "recent_capacity" | "recent" => ConfigOverrideTarget::RecentCapacity,
        "aliases" | "alias" => {
            let alias_name = remainder
                .filter(|segment| !segment.is_empty())
                .ok_or_else(|| "aliases override requires an alias name".to_string())?;
            ConfigOverrideTarget::Alias(alias_name.to_string())
        }
        other => return Err(format!("unknown config field '{other}'")),
    };

    Ok(ParsedConfigOverride { target, value })
}
