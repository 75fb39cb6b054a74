use std::fmt;
use time::OffsetDateTime;

/// Handle to a top-level task stored in the manager's arena.
///
/// Identity is by handle, never by title: two tasks may share a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(usize);

impl TaskId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// A unit of work. Lower `priority` values are more urgent.
///
/// Title, timestamp and priority are fixed at construction; only the subtask
/// list grows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    title: String,
    added_at: OffsetDateTime,
    priority: i32,
    subtasks: Vec<Task>,
}

impl Task {
    pub fn new<T: Into<String>>(title: T, added_at: OffsetDateTime, priority: i32) -> Self {
        Self {
            title: title.into(),
            added_at,
            priority,
            subtasks: Vec::new(),
        }
    }

    pub fn with_subtask(mut self, subtask: Task) -> Self {
        self.subtasks.push(subtask);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn added_at(&self) -> OffsetDateTime {
        self.added_at
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn subtasks(&self) -> &[Task] {
        &self.subtasks
    }

    pub fn add_subtask(&mut self, subtask: Task) {
        self.subtasks.push(subtask);
    }

    /// Depth-first, pre-order search for `title`, ignoring case.
    ///
    /// Checks `self` first, then each subtask in insertion order; the first
    /// match wins.
    pub fn find_subtask(&self, title: &str) -> Option<&Task> {
        if titles_match(&self.title, title) {
            return Some(self);
        }
        self.subtasks
            .iter()
            .find_map(|subtask| subtask.find_subtask(title))
    }

    pub(crate) fn find_subtask_mut(&mut self, title: &str) -> Option<&mut Task> {
        if titles_match(&self.title, title) {
            return Some(self);
        }
        self.subtasks
            .iter_mut()
            .find_map(|subtask| subtask.find_subtask_mut(title))
    }
}

pub fn titles_match(left: &str, right: &str) -> bool {
    left.chars()
        .flat_map(char::to_lowercase)
        .eq(right.chars().flat_map(char::to_lowercase))
}
