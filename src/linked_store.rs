use std::collections::VecDeque;

use crate::{WQRemovable, WQStore};

/// Growable FIFO sequence with O(1) append and O(1) remove-front.
///
/// Capacity is not a property of the sequence; a bounded linked queue gets its bound from the
/// owning [`WQBlockingQueue`](crate::WQBlockingQueue).
#[derive(Clone, Debug)]
pub struct WQLinkedStore<T> {
    items: VecDeque<T>,
}

impl<T> WQLinkedStore<T> {
    pub fn new() -> WQLinkedStore<T> {
        WQLinkedStore {
            items: VecDeque::new(),
        }
    }
}

impl<T> Default for WQLinkedStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for WQLinkedStore<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        WQLinkedStore {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> WQStore<T> for WQLinkedStore<T> {
    fn kind(&self) -> &'static str {
        "WQLinkedQueue"
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn push(&mut self, value: T) -> Result<(), T> {
        self.items.push_back(value);
        Ok(())
    }

    fn pop(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    fn peek(&self) -> Option<&T> {
        self.items.front()
    }

    fn clear(&mut self) {
        self.items.clear();
    }

    fn each(&self, f: &mut dyn FnMut(usize, &T) -> bool) {
        for (position, value) in self.items.iter().enumerate() {
            if !f(position, value) {
                return;
            }
        }
    }
}

impl<T> WQRemovable<T> for WQLinkedStore<T> {
    fn remove_where(&mut self, predicate: &mut dyn FnMut(&T) -> bool) -> usize {
        // Evaluate every match before mutating so a panicking predicate leaves the order intact.
        let keep: Vec<bool> = self.items.iter().map(|value| !predicate(value)).collect();
        let before = self.items.len();
        let mut keep = keep.into_iter();
        self.items.retain(|_| keep.next().unwrap_or(true));
        before - self.items.len()
    }
}
