//! Undo/redo history for queue mutations.
//!
//! Each mutation is recorded as an [`UndoAction`] naming the task it touched.
//! The manager interprets an action in two directions: `revert` on undo and
//! `reapply` on redo. A record sits in exactly one of the two stacks.

use crate::model::TaskId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoAction {
    /// The task was inserted into the queue.
    Add(TaskId),
    /// The task was taken off the queue as completed.
    Complete(TaskId),
}

impl UndoAction {
    pub fn task(self) -> TaskId {
        match self {
            Self::Add(id) | Self::Complete(id) => id,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Complete(_) => "complete",
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct UndoEngine {
    undo_stack: Vec<UndoAction>,
    redo_stack: Vec<UndoAction>,
}

impl UndoEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a fresh mutation. Any pending redo history is discarded.
    pub fn record(&mut self, action: UndoAction) {
        self.undo_stack.push(action);
        if !self.redo_stack.is_empty() {
            tracing::debug!(dropped = self.redo_stack.len(), "clearing redo history");
            self.redo_stack.clear();
        }
    }

    pub fn take_undo(&mut self) -> Option<UndoAction> {
        self.undo_stack.pop()
    }

    pub fn take_redo(&mut self) -> Option<UndoAction> {
        self.redo_stack.pop()
    }

    pub fn push_undo(&mut self, action: UndoAction) {
        self.undo_stack.push(action);
    }

    pub fn push_redo(&mut self, action: UndoAction) {
        self.redo_stack.push(action);
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{UndoAction, UndoEngine};
    use crate::model::TaskId;

    #[test]
    fn record_clears_redo_history() {
        let mut engine = UndoEngine::new();
        engine.record(UndoAction::Add(TaskId::new(0)));
        let action = engine.take_undo().unwrap();
        engine.push_redo(action);
        assert!(engine.can_redo());

        engine.record(UndoAction::Add(TaskId::new(1)));

        assert!(!engine.can_redo());
        assert_eq!(engine.undo_depth(), 1);
    }

    #[test]
    fn stacks_are_last_in_first_out() {
        let mut engine = UndoEngine::new();
        engine.record(UndoAction::Add(TaskId::new(0)));
        engine.record(UndoAction::Complete(TaskId::new(0)));

        assert_eq!(
            engine.take_undo(),
            Some(UndoAction::Complete(TaskId::new(0)))
        );
        assert_eq!(engine.take_undo(), Some(UndoAction::Add(TaskId::new(0))));
        assert_eq!(engine.take_undo(), None);
    }

    #[test]
    fn action_exposes_task_and_label() {
        let action = UndoAction::Complete(TaskId::new(4));
        assert_eq!(action.task(), TaskId::new(4));
        assert_eq!(action.label(), "complete");
        assert_eq!(UndoAction::Add(TaskId::new(4)).label(), "add");
    }
}
