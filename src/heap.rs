use std::cmp::Ordering;

use crate::{WQComparator, WQRemovable, WQStore};

/// Array-backed binary min-heap ordered by an injected comparator.
///
/// Insertion sifts the new value up while it compares less than its parent; removal moves the
/// last value into the root and sifts it down towards the smaller child. Both are O(log n) and
/// [`peek`](Self::peek) is O(1). Equal values leave in heap-structural order, not insertion
/// order.
///
/// The heap is single-owner. Wrap it in a [`WQPriorityQueue`](crate::WQPriorityQueue) to share
/// it between threads.
#[derive(Clone, Debug)]
pub struct WQHeap<T, C> {
    items: Vec<T>,
    comparator: C,
}

impl<T, C: WQComparator<T>> WQHeap<T, C> {
    /// Create an empty heap ordered by `comparator`.
    ///
    /// # Examples
    /// ```
    /// use waitq::{WQHeap, WQNaturalOrder};
    ///
    /// let mut heap = WQHeap::new(WQNaturalOrder);
    /// for value in [3, 1, 2] {
    ///     heap.push(value);
    /// }
    /// assert_eq!(heap.pop(), Some(1));
    /// assert_eq!(heap.peek(), Some(&2));
    /// ```
    pub fn new(comparator: C) -> WQHeap<T, C> {
        WQHeap {
            items: Vec::new(),
            comparator,
        }
    }

    /// Create an empty heap with room for `capacity` values before reallocating.
    pub fn with_capacity(comparator: C, capacity: usize) -> WQHeap<T, C> {
        WQHeap {
            items: Vec::with_capacity(capacity),
            comparator,
        }
    }

    #[inline]
    fn less(&self, i: usize, j: usize) -> bool {
        self.comparator.compare(&self.items[i], &self.items[j]) == Ordering::Less
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self.less(index, parent) {
                break;
            }
            self.items.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.items.len();
        loop {
            let left = index * 2 + 1;
            if left >= len {
                break;
            }

            let right = left + 1;
            let smaller = if right < len && self.less(right, left) {
                right
            } else {
                left
            };

            if !self.less(smaller, index) {
                break;
            }
            self.items.swap(smaller, index);
            index = smaller;
        }
    }

    /// Restore heap order over the whole array, bottom-up.
    fn heapify(&mut self) {
        for index in (0..self.items.len() / 2).rev() {
            self.sift_down(index);
        }
    }

    pub fn push(&mut self, value: T) {
        self.items.push(value);
        self.sift_up(self.items.len() - 1);
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }

        let last = self.items.len() - 1;
        self.items.swap(0, last);
        let value = self.items.pop();
        if !self.items.is_empty() {
            self.sift_down(0);
        }
        value
    }

    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Values in heap array layout. Rebuilding a heap by pushing this slice in order reproduces
    /// the same layout.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Remove every value matching `predicate` and re-heapify. O(n).
    ///
    /// The predicate sees every value before anything moves, so if it panics the heap is left
    /// as it was.
    pub fn retain_unmatched(&mut self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let keep: Vec<bool> = self.items.iter().map(|value| !predicate(value)).collect();
        let before = self.items.len();
        let mut keep = keep.into_iter();
        self.items.retain(|_| keep.next().unwrap_or(true));
        let removed = before - self.items.len();
        if removed > 0 {
            self.heapify();
        }
        removed
    }

    /// Drain into a vector in comparator order.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut values = Vec::with_capacity(self.items.len());
        while let Some(value) = self.pop() {
            values.push(value);
        }
        values
    }

    /// Copy the values out in comparator order, leaving the heap untouched.
    pub fn to_sorted_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut values = self.items.clone();
        values.sort_by(|a, b| self.comparator.compare(a, b));
        values
    }
}

impl<T, C: WQComparator<T> + Default> Default for WQHeap<T, C> {
    fn default() -> Self {
        Self::new(C::default())
    }
}

impl<T, C: WQComparator<T>> WQStore<T> for WQHeap<T, C> {
    fn kind(&self) -> &'static str {
        "WQPriorityQueue"
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn push(&mut self, value: T) -> Result<(), T> {
        WQHeap::push(self, value);
        Ok(())
    }

    fn pop(&mut self) -> Option<T> {
        WQHeap::pop(self)
    }

    fn peek(&self) -> Option<&T> {
        WQHeap::peek(self)
    }

    fn clear(&mut self) {
        WQHeap::clear(self);
    }

    fn each(&self, f: &mut dyn FnMut(usize, &T) -> bool) {
        for (position, value) in self.items.iter().enumerate() {
            if !f(position, value) {
                return;
            }
        }
    }
}

impl<T, C: WQComparator<T>> WQRemovable<T> for WQHeap<T, C> {
    fn remove_where(&mut self, predicate: &mut dyn FnMut(&T) -> bool) -> usize {
        self.retain_unmatched(predicate)
    }
}
