//! Binary min-heap of pending tasks keyed by priority.
//!
//! Alongside the heap array the queue keeps a `TaskId -> index` map so a task
//! can be removed by identity in O(log n), which undo needs and which
//! `std::collections::BinaryHeap` cannot do.

use crate::model::TaskId;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    priority: i32,
    id: TaskId,
}

#[derive(Debug, Default, Clone)]
pub struct TaskQueue {
    heap: Vec<Slot>,
    positions: HashMap<TaskId, usize>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.positions.contains_key(&id)
    }

    /// Returns `false` and leaves the queue untouched if `id` is already queued.
    pub fn insert(&mut self, id: TaskId, priority: i32) -> bool {
        if self.positions.contains_key(&id) {
            tracing::warn!(task = %id, "ignoring duplicate queue insert");
            return false;
        }

        let index = self.heap.len();
        self.heap.push(Slot { priority, id });
        self.positions.insert(id, index);
        self.sift_up(index);
        true
    }

    #[cfg(test)]
    pub fn peek_min(&self) -> Option<TaskId> {
        self.heap.first().map(|slot| slot.id)
    }

    pub fn extract_min(&mut self) -> Option<TaskId> {
        if self.heap.is_empty() {
            return None;
        }
        Some(self.remove_at(0))
    }

    pub fn remove(&mut self, id: TaskId) -> bool {
        match self.positions.get(&id) {
            Some(&index) => {
                self.remove_at(index);
                true
            }
            None => false,
        }
    }

    /// Heap order, not priority order.
    pub fn iter(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.heap.iter().map(|slot| slot.id)
    }

    /// Every queued id by ascending priority; equal priorities fall back to id
    /// order so the listing is stable.
    pub fn snapshot_sorted(&self) -> Vec<TaskId> {
        let mut slots = self.heap.clone();
        slots.sort_by_key(|slot| (slot.priority, slot.id));
        slots.into_iter().map(|slot| slot.id).collect()
    }

    fn remove_at(&mut self, index: usize) -> TaskId {
        let removed = self.heap.swap_remove(index).id;
        self.positions.remove(&removed);

        if index < self.heap.len() {
            self.positions.insert(self.heap[index].id, index);
            // The slot moved in from the tail may belong above or below `index`.
            let settled = self.sift_up(index);
            if settled == index {
                self.sift_down(index);
            }
        }
        removed
    }

    fn sift_up(&mut self, mut index: usize) -> usize {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.heap[index].priority >= self.heap[parent].priority {
                break;
            }
            self.swap(index, parent);
            index = parent;
        }
        index
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;

            if left < len && self.heap[left].priority < self.heap[smallest].priority {
                smallest = left;
            }
            if right < len && self.heap[right].priority < self.heap[smallest].priority {
                smallest = right;
            }
            if smallest == index {
                break;
            }
            self.swap(index, smallest);
            index = smallest;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.heap.swap(a, b);
        self.positions.insert(self.heap[a].id, a);
        self.positions.insert(self.heap[b].id, b);
    }
}
