//! Generic sequence guarded by a single reader/writer lock.

use std::collections::VecDeque;

use parking_lot::RwLock;

/// Thread-safe list for producer/consumer style sharing.
///
/// Items are appended at the back; `pop` takes from the back and `shift` from
/// the front.
pub struct SyncedSlice<T> {
    items: RwLock<VecDeque<T>>,
}

impl<T> SyncedSlice<T> {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(VecDeque::new()),
        }
    }

    /// Preallocates room for `capacity` items.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: RwLock::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn length(&self) -> usize {
        self.items.read().len()
    }

    /// Allocated capacity.
    pub fn size(&self) -> usize {
        self.items.read().capacity()
    }

    pub fn get(&self, index: usize) -> Option<T>
    where
        T: Clone,
    {
        self.items.read().get(index).cloned()
    }

    pub fn append(&self, item: T) {
        self.items.write().push_back(item);
    }

    /// Removes and returns the last item.
    pub fn pop(&self) -> Option<T> {
        self.items.write().pop_back()
    }

    /// Removes and returns the first item.
    pub fn shift(&self) -> Option<T> {
        self.items.write().pop_front()
    }
}

impl<T> Default for SyncedSlice<T> {
    fn default() -> Self {
        Self::new()
    }
}
