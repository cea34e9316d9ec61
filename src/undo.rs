use std::collections::VecDeque;

/// Bounded history of removed items. Capacity 1 gives "last delete only":
/// a new push silently evicts the older entry.
#[derive(Debug, Clone)]
pub struct UndoBuffer<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> UndoBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, item: T) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(item);
    }

    /// Shrinking drops the oldest entries first.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn pop(&mut self) -> Option<T> {
        self.entries.pop_back()
    }

    pub fn peek(&self) -> Option<&T> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for UndoBuffer<T> {
    fn default() -> Self {
        Self::new(1)
    }
}
