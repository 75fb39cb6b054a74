use crate::model::TaskId;

pub const DEFAULT_RECENT_CAPACITY: usize = 10;

/// Fixed-size ring of the most recently completed tasks.
///
/// The write cursor only ever grows; `cursor % capacity` is the next slot, so
/// once full each completion overwrites the oldest entry.
#[derive(Debug, Clone)]
pub struct RecentCompletedRing {
    slots: Vec<Option<TaskId>>,
    cursor: usize,
}

impl Default for RecentCompletedRing {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_RECENT_CAPACITY)
    }
}

impl RecentCompletedRing {
    /// A zero capacity is bumped to one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity.max(1)],
            cursor: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.cursor.min(self.capacity())
    }

    pub fn is_empty(&self) -> bool {
        self.cursor == 0
    }

    /// Total completions written since construction.
    pub fn written(&self) -> usize {
        self.cursor
    }

    pub fn push(&mut self, id: TaskId) {
        let slot = self.cursor % self.capacity();
        self.slots[slot] = Some(id);
        self.cursor += 1;
    }

    #[cfg(test)]
    pub fn latest(&self) -> Option<TaskId> {
        if self.cursor == 0 {
            return None;
        }
        self.slots[(self.cursor - 1) % self.capacity()]
    }

    /// Oldest retained entry first.
    pub fn iter(&self) -> impl Iterator<Item = TaskId> + '_ {
        let capacity = self.capacity();
        let start = self.cursor - self.len();
        (start..self.cursor).filter_map(move |position| self.slots[position % capacity])
    }
}
