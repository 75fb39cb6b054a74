//! The session orchestrator.
//!
//! [`TaskManager`] owns every container. Top-level tasks live in an arena for
//! the whole session and everything else (queue, undo stacks, recent ring)
//! refers to them by [`TaskId`]. Core operations never fail: "nothing to do"
//! and "not found" come back as `None`/`false` for the caller to report.

use crate::auth::UserDirectory;
use crate::clock::Clock;
use crate::config::Config;
use crate::model::{ActivityLog, LogEntry, Task, TaskId};
use crate::queue::TaskQueue;
use crate::recent::RecentCompletedRing;
use crate::undo::{UndoAction, UndoEngine};

/// What an undo or redo just did, for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStep {
    pub action: UndoAction,
    pub title: String,
}

pub struct TaskManager {
    users: UserDirectory,
    arena: Vec<Task>,
    queue: TaskQueue,
    log: ActivityLog,
    history: UndoEngine,
    recent: RecentCompletedRing,
    clock: Box<dyn Clock>,
}

impl TaskManager {
    pub fn new(users: UserDirectory, clock: Box<dyn Clock>, recent_capacity: usize) -> Self {
        Self {
            users,
            arena: Vec::new(),
            queue: TaskQueue::new(),
            log: ActivityLog::new(),
            history: UndoEngine::new(),
            recent: RecentCompletedRing::with_capacity(recent_capacity),
            clock,
        }
    }

    pub fn from_config(config: &Config, clock: Box<dyn Clock>) -> Self {
        let users = UserDirectory::from_credentials(&config.users);
        let recent_capacity = config.recent_capacity();
        tracing::debug!(users = users.len(), recent_capacity, "task manager configured");
        Self::new(users, clock, recent_capacity)
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn login(&mut self, username: &str, credential: &str) -> bool {
        if !self.users.authenticate(username, credential) {
            tracing::debug!(username, "login rejected");
            return false;
        }
        self.record_activity(format!("Logged in: {username}"));
        true
    }

    pub fn add_task(&mut self, task: Task) -> TaskId {
        let id = TaskId::new(self.arena.len());
        let priority = task.priority();
        let title = task.title().to_string();
        self.arena.push(task);

        self.queue.insert(id, priority);
        self.record_activity(format!("Added: {title}"));
        self.history.record(UndoAction::Add(id));
        tracing::debug!(task = %id, priority, "task added");
        id
    }

    /// Takes the most urgent pending task off the queue.
    ///
    /// An empty queue is a no-op: no log entry, no undo record, and the redo
    /// history is left alone.
    pub fn complete_task(&mut self) -> Option<&Task> {
        let id = self.queue.extract_min()?;
        self.recent.push(id);
        let title = self.title_of(id);
        self.record_activity(format!("Completed: {title}"));
        self.history.record(UndoAction::Complete(id));
        tracing::debug!(task = %id, "task completed");
        self.task(id)
    }

    /// Reverts the most recent mutation. The completion's entry in the recent
    /// ring is kept.
    pub fn undo(&mut self) -> Option<HistoryStep> {
        let action = self.history.take_undo()?;
        match action {
            UndoAction::Add(id) => {
                self.queue.remove(id);
            }
            UndoAction::Complete(id) => {
                let priority = self.priority_of(id);
                self.queue.insert(id, priority);
            }
        }
        let step = self.finish_step(action, "Undo");
        self.history.push_redo(action);
        Some(step)
    }

    pub fn redo(&mut self) -> Option<HistoryStep> {
        let action = self.history.take_redo()?;
        match action {
            UndoAction::Add(id) => {
                let priority = self.priority_of(id);
                self.queue.insert(id, priority);
            }
            UndoAction::Complete(id) => {
                self.queue.remove(id);
            }
        }
        let step = self.finish_step(action, "Redo");
        self.history.push_undo(action);
        Some(step)
    }

    /// Pending tasks, most urgent first.
    pub fn list_tasks(&self) -> Vec<&Task> {
        self.queue
            .snapshot_sorted()
            .into_iter()
            .filter_map(|id| self.task(id))
            .collect()
    }

    pub fn show_log(&self) -> &[LogEntry] {
        self.log.entries()
    }

    /// First case-insensitive title match across the pending forest, walking
    /// top-level tasks in queue order and each tree depth-first.
    pub fn search_subtasks(&self, title: &str) -> Option<&Task> {
        self.queue
            .iter()
            .filter_map(|id| self.task(id))
            .find_map(|task| task.find_subtask(title))
    }

    /// Appends `subtask` under the first pending node titled `parent_title`
    /// and returns that node's title. Subtasks are not part of undo history.
    pub fn add_subtask(&mut self, parent_title: &str, subtask: Task) -> Option<String> {
        let root = self.queue.iter().find(|id| {
            self.task(*id)
                .is_some_and(|task| task.find_subtask(parent_title).is_some())
        })?;

        let parent = self.arena.get_mut(root.index())?.find_subtask_mut(parent_title)?;
        let parent_name = parent.title().to_string();
        let child_name = subtask.title().to_string();
        parent.add_subtask(subtask);

        self.record_activity(format!("Added subtask: {child_name} -> {parent_name}"));
        Some(parent_name)
    }

    /// Recently completed tasks, oldest first.
    pub fn recent_completed(&self) -> Vec<&Task> {
        self.recent.iter().filter_map(|id| self.task(id)).collect()
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.arena.get(id.index())
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.queue.contains(id)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn finish_step(&mut self, action: UndoAction, verb: &str) -> HistoryStep {
        let title = self.title_of(action.task());
        self.record_activity(format!("{verb} {}: {title}", action.label()));
        tracing::debug!(
            task = %action.task(),
            action = action.label(),
            verb,
            undo_depth = self.history.undo_depth(),
            redo_depth = self.history.redo_depth(),
            "history step"
        );
        HistoryStep { action, title }
    }

    fn record_activity(&mut self, action: String) {
        let now = self.clock.now();
        self.log.append(now, action);
    }

    fn title_of(&self, id: TaskId) -> String {
        self.task(id)
            .map(|task| task.title().to_string())
            .unwrap_or_default()
    }

    fn priority_of(&self, id: TaskId) -> i32 {
        self.task(id).map(Task::priority).unwrap_or_default()
    }
}
