mod log;
mod task;
mod user;

pub use log::{ActivityLog, LogEntry};
pub use task::{Task, TaskId, titles_match};
pub use user::User;
