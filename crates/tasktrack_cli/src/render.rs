use serde_json::{Value, json};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tasktrack_core::clock::format_timestamp;
use tasktrack_core::config::Palette;
use tasktrack_core::error::AppError;
use tasktrack_core::model::{LogEntry, Task};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Plain,
    Json,
    Table,
}

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Priority")]
    priority: i32,
    #[tabled(rename = "Added")]
    added: String,
    #[tabled(rename = "Subtasks")]
    subtasks: usize,
}

#[derive(Tabled)]
struct LogRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Action")]
    action: String,
}

/// Renders pending or completed tasks. `heading` is only used by the plain
/// format.
pub fn render_tasks(
    tasks: &[&Task],
    heading: &str,
    format: OutputFormat,
    palette: &Palette,
) -> Result<String, AppError> {
    match format {
        OutputFormat::Plain => {
            let mut lines = vec![heading.to_string()];
            for task in tasks {
                let details = format!(
                    "(prior:{}, added:{})",
                    task.priority(),
                    format_timestamp(task.added_at())?
                );
                lines.push(format!(
                    "- {} {}",
                    palette.accentize(task.title()),
                    palette.mutedize(&details)
                ));
            }
            Ok(lines.join("\n"))
        }
        OutputFormat::Json => {
            let payload = tasks
                .iter()
                .map(|task| task_json(task))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(payload).to_string())
        }
        OutputFormat::Table => {
            let rows = tasks
                .iter()
                .map(|task| {
                    Ok(TaskRow {
                        title: task.title().to_string(),
                        priority: task.priority(),
                        added: format_timestamp(task.added_at())?,
                        subtasks: task.subtasks().len(),
                    })
                })
                .collect::<Result<Vec<_>, AppError>>()?;
            let mut table = Table::new(rows);
            table.with(Style::sharp());
            Ok(table.to_string())
        }
    }
}

pub fn render_log(entries: &[LogEntry], format: OutputFormat) -> Result<String, AppError> {
    match format {
        OutputFormat::Plain => {
            let lines = entries
                .iter()
                .map(|entry| Ok(format!("{} - {}", format_timestamp(entry.timestamp)?, entry.action)))
                .collect::<Result<Vec<_>, AppError>>()?;
            Ok(lines.join("\n"))
        }
        OutputFormat::Json => {
            let payload = entries
                .iter()
                .map(|entry| {
                    Ok(json!({
                        "timestamp": format_timestamp(entry.timestamp)?,
                        "action": entry.action,
                    }))
                })
                .collect::<Result<Vec<_>, AppError>>()?;
            Ok(Value::Array(payload).to_string())
        }
        OutputFormat::Table => {
            let rows = entries
                .iter()
                .map(|entry| {
                    Ok(LogRow {
                        time: format_timestamp(entry.timestamp)?,
                        action: entry.action.clone(),
                    })
                })
                .collect::<Result<Vec<_>, AppError>>()?;
            let mut table = Table::new(rows);
            table.with(Style::sharp());
            Ok(table.to_string())
        }
    }
}

fn task_json(task: &Task) -> Result<Value, AppError> {
    let subtasks = task
        .subtasks()
        .iter()
        .map(task_json)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(json!({
        "title": task.title(),
        "priority": task.priority(),
        "added_at": format_timestamp(task.added_at())?,
        "subtasks": subtasks,
    }))
}
