use std::time::Duration;

/// Whether the head of a store may be taken right now.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WQGate {
    /// The head can be removed immediately.
    Open,
    /// Nothing is takeable until another producer mutates the store.
    Closed,
    /// The head becomes takeable after the given delay, unless the store changes first.
    OpensIn(Duration),
}

/// Single-threaded backing storage for a [`WQBlockingQueue`](crate::WQBlockingQueue).
///
/// Stores carry no concurrency contract of their own; the blocking queue owns one exclusively
/// and only touches it while holding its lock.
pub trait WQStore<T> {
    /// Short name used when formatting and logging the owning queue.
    fn kind(&self) -> &'static str;

    /// Number of live elements.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Capacity imposed by the storage layout itself, if any.
    fn fixed_capacity(&self) -> Option<usize> {
        None
    }

    /// Insert `value`, handing it back when the store has no room left.
    fn push(&mut self, value: T) -> Result<(), T>;

    /// Remove the head element.
    fn pop(&mut self) -> Option<T>;

    /// Borrow the head element without removing it.
    fn peek(&self) -> Option<&T>;

    /// Drop every element, keeping configured capacity and ordering.
    fn clear(&mut self);

    /// Walk the elements in snapshot order. The callback receives the position and the value and
    /// returns `false` to stop early.
    fn each(&self, f: &mut dyn FnMut(usize, &T) -> bool);

    /// Whether the head may be taken now. Stores with time-gated heads override this.
    fn gate(&self) -> WQGate {
        if self.is_empty() {
            WQGate::Closed
        } else {
            WQGate::Open
        }
    }

    /// Copy the elements out in [`each`](Self::each) order.
    fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut values = Vec::with_capacity(self.len());
        self.each(&mut |_, value| {
            values.push(value.clone());
            true
        });
        values
    }
}

/// Stores that support removing arbitrary elements by linear scan.
pub trait WQRemovable<T>: WQStore<T> {
    /// Remove every element matching `predicate`, returning how many were removed.
    fn remove_where(&mut self, predicate: &mut dyn FnMut(&T) -> bool) -> usize;
}
