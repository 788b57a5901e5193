use std::fmt;
use std::marker::PhantomData;
use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::utils::{deadline_after, recover};
use crate::{
    WQComparator, WQDelayStore, WQDelayed, WQError, WQGate, WQHeap, WQLinkedStore, WQRemovable,
    WQRingStore, WQStore,
};

/// FIFO blocking queue over a fixed-capacity ring buffer.
pub type WQRingQueue<T> = WQBlockingQueue<T, WQRingStore<T>>;

/// FIFO blocking queue over a growable sequence, bounded or unbounded.
pub type WQLinkedQueue<T> = WQBlockingQueue<T, WQLinkedStore<T>>;

/// Blocking queue that dequeues the smallest value according to `C`.
pub type WQPriorityQueue<T, C = crate::WQNaturalOrder> = WQBlockingQueue<T, WQHeap<T, C>>;

/// Blocking queue that only releases elements once their release timestamp has passed.
pub type WQDelayQueue<T> = WQBlockingQueue<T, WQDelayStore<T>>;

/// How long a call is prepared to park.
#[derive(Clone, Copy, Debug)]
enum WQWait {
    Never,
    Forever,
    Until(Instant),
}

impl WQWait {
    fn within(timeout: Duration) -> WQWait {
        match deadline_after(timeout) {
            Some(deadline) => WQWait::Until(deadline),
            None => WQWait::Forever,
        }
    }
}

/// Mutex and CondVar backed coordinator over any [`WQStore`].
///
/// One mutex guards the store. Producers park on `not_full` while the queue is at capacity and
/// consumers park on `not_empty` while the store's [`gate`](WQStore::gate) is closed. Every
/// successful mutation broadcasts to the opposite side and each woken caller re-checks its own
/// predicate, so there is no wake-order fairness between waiters of the same kind.
///
/// The `try_*` calls never park, the `*_timeout` calls park for at most the given duration and
/// leave the store untouched when it runs out, and the plain calls park until they succeed.
pub struct WQBlockingQueue<T, S> {
    store: Mutex<S>,
    not_full: Condvar,
    not_empty: Condvar,
    capacity: Option<usize>,
    _marker: PhantomData<fn(T) -> T>,
}

impl<T, S: WQStore<T>> WQBlockingQueue<T, S> {
    /// Wrap `store` in a blocking queue.
    ///
    /// # Arguments
    /// * `store` - Backing storage, exclusively owned by the queue from here on.
    /// * `capacity` - Maximum element count. `None` or zero means unbounded; a store with a fixed
    ///   capacity caps it further.
    ///
    /// # Examples
    /// ```
    /// use waitq::{WQBlockingQueue, WQLinkedStore};
    ///
    /// let queue = WQBlockingQueue::from_store(WQLinkedStore::new(), Some(2));
    /// queue.enqueue(1);
    /// queue.enqueue(2);
    /// assert_eq!(queue.try_enqueue(3), Err(3));
    /// assert_eq!(queue.capacity(), Some(2));
    /// ```
    pub fn from_store(store: S, capacity: Option<usize>) -> WQBlockingQueue<T, S> {
        let requested = capacity.filter(|capacity| *capacity > 0);
        let capacity = match (requested, store.fixed_capacity()) {
            (Some(requested), Some(fixed)) => Some(requested.min(fixed)),
            (requested, fixed) => requested.or(fixed),
        };
        debug!(kind = store.kind(), ?capacity, "created blocking queue");

        WQBlockingQueue {
            store: Mutex::new(store),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            capacity,
            _marker: PhantomData,
        }
    }

    pub(crate) fn lock_store(&self) -> MutexGuard<'_, S> {
        recover(self.store.lock())
    }

    fn is_full(&self, store: &S) -> bool {
        self.capacity
            .is_some_and(|capacity| store.len() >= capacity)
    }

    /// Park on `condvar` until woken, until `hint` elapses, or until `wait` runs out.
    ///
    /// Returns `None` once the caller's wait budget is spent; the guard is dropped with it, which
    /// releases the lock without leaving anything registered on the condvar.
    fn park<'a>(
        &self,
        condvar: &Condvar,
        guard: MutexGuard<'a, S>,
        wait: WQWait,
        hint: Option<Duration>,
    ) -> Option<MutexGuard<'a, S>> {
        let budget = match wait {
            WQWait::Never => return None,
            WQWait::Forever => hint,
            WQWait::Until(deadline) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    debug!(kind = guard.kind(), "timed wait expired");
                    return None;
                }
                Some(hint.map_or(remaining, |hint| hint.min(remaining)))
            }
        };

        let guard = match budget {
            Some(timeout) => recover(condvar.wait_timeout(guard, timeout)).0,
            None => recover(condvar.wait(guard)),
        };
        Some(guard)
    }

    fn put(&self, value: T, wait: WQWait) -> Result<(), T> {
        let mut store = self.lock_store();
        while self.is_full(&store) {
            trace!(kind = store.kind(), len = store.len(), "producer parked on full queue");
            store = match self.park(&self.not_full, store, wait, None) {
                Some(store) => store,
                None => return Err(value),
            };
        }

        let pushed = store.push(value);
        drop(store);

        if pushed.is_ok() {
            // Wake any consumers that might be waiting for data.
            self.not_empty.notify_all();
        }
        pushed
    }

    fn take(&self, wait: WQWait) -> Option<T> {
        let mut store = self.lock_store();
        loop {
            // Re-read the gate after every wake: the head may have changed while parked.
            let hint = match store.gate() {
                WQGate::Open => break,
                WQGate::Closed => None,
                WQGate::OpensIn(remaining) => Some(remaining),
            };
            trace!(kind = store.kind(), ?hint, "consumer parked on closed queue");
            store = self.park(&self.not_empty, store, wait, hint)?;
        }

        let value = store.pop();
        drop(store);

        if value.is_some() {
            // Wake any producers that might be waiting for capacity.
            self.not_full.notify_all();
        }
        value
    }

    /// Number of elements currently queued.
    pub fn count(&self) -> usize {
        self.lock_store().len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn is_not_empty(&self) -> bool {
        !self.is_empty()
    }

    /// Effective capacity, `None` when unbounded.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Free slots left before producers block, `None` when unbounded.
    pub fn remaining_capacity(&self) -> Option<usize> {
        let len = self.count();
        self.capacity
            .map(|capacity| capacity.saturating_sub(len))
    }

    /// Drop every element and wake blocked producers. Capacity and ordering are kept.
    pub fn clear(&self) {
        let mut store = self.lock_store();
        store.clear();
        drop(store);
        self.not_full.notify_all();
    }

    /// Clone of the head element. For a delay queue this is the earliest element whether or not
    /// it has been released yet.
    pub fn peek(&self) -> Option<T>
    where
        T: Clone,
    {
        self.lock_store().peek().cloned()
    }

    /// Insert `value`, blocking while the queue is full.
    ///
    /// # Examples
    /// ```
    /// use waitq::WQRingQueue;
    ///
    /// let queue = WQRingQueue::new(4).unwrap();
    /// queue.enqueue("hello there");
    /// assert_eq!(queue.dequeue(), "hello there");
    /// ```
    pub fn enqueue(&self, value: T) {
        let mut value = value;
        // The capacity never exceeds what the store can hold, so a rejected push only happens
        // if another producer refilled the store between checks; park again.
        while let Err(rejected) = self.put(value, WQWait::Forever) {
            value = rejected;
        }
    }

    /// Insert `value` only if there is room right now, handing it back otherwise.
    pub fn try_enqueue(&self, value: T) -> Result<(), T> {
        self.put(value, WQWait::Never)
    }

    /// Insert `value`, blocking for at most `timeout` while the queue is full.
    ///
    /// # Returns
    /// `Err(value)` when the timeout elapsed without room becoming available; the queue is left
    /// unchanged.
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    /// use waitq::WQRingQueue;
    ///
    /// let queue = WQRingQueue::new(1).unwrap();
    /// assert!(queue.enqueue_timeout(1, Duration::from_millis(1)).is_ok());
    /// assert_eq!(queue.enqueue_timeout(2, Duration::from_millis(1)), Err(2));
    /// ```
    pub fn enqueue_timeout(&self, value: T, timeout: Duration) -> Result<(), T> {
        self.put(value, WQWait::within(timeout))
    }

    /// Insert every value in order, each as its own blocking [`enqueue`](Self::enqueue). The lock
    /// is released between values, so consumers can drain a bounded queue mid-batch.
    pub fn enqueue_all<I: IntoIterator<Item = T>>(&self, values: I) -> usize {
        let mut count = 0;
        for value in values {
            self.enqueue(value);
            count += 1;
        }
        count
    }

    /// Remove the head element, blocking until one is available.
    pub fn dequeue(&self) -> T {
        loop {
            if let Some(value) = self.take(WQWait::Forever) {
                return value;
            }
        }
    }

    /// Remove the head element only if one is takeable right now.
    pub fn try_dequeue(&self) -> Option<T> {
        self.take(WQWait::Never)
    }

    /// Remove the head element, blocking for at most `timeout`.
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    /// use waitq::WQLinkedQueue;
    ///
    /// let queue = WQLinkedQueue::<u32>::unbounded();
    /// assert_eq!(queue.dequeue_timeout(Duration::from_millis(1)), None);
    /// ```
    pub fn dequeue_timeout(&self, timeout: Duration) -> Option<T> {
        self.take(WQWait::within(timeout))
    }

    /// Snapshot of the elements in store order: FIFO for ring and linked queues, heap layout for
    /// priority and delay queues.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.lock_store().to_vec()
    }

    /// Walk the elements in store order while holding the lock. The callback returns `false` to
    /// stop early; it must not call back into this queue.
    pub fn each(&self, mut f: impl FnMut(usize, &T) -> bool) {
        self.lock_store().each(&mut f);
    }
}

impl<T, S: WQRemovable<T>> WQBlockingQueue<T, S> {
    /// Remove every element matching `predicate`, returning how many were removed.
    pub fn remove_where(&self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let mut store = self.lock_store();
        let removed = store.remove_where(&mut predicate);
        drop(store);

        if removed > 0 {
            self.not_full.notify_all();
        }
        removed
    }

    /// Remove every element equal to `value`.
    pub fn remove(&self, value: &T) -> usize
    where
        T: PartialEq,
    {
        self.remove_where(|item| item == value)
    }
}

impl<T> WQBlockingQueue<T, WQRingStore<T>> {
    /// Create a ring buffer queue with `capacity` slots.
    ///
    /// # Errors
    /// Returns `WQError::InvalidArgs` when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<WQRingQueue<T>, WQError> {
        Ok(WQBlockingQueue::from_store(WQRingStore::new(capacity)?, None))
    }
}

impl<T> WQBlockingQueue<T, WQLinkedStore<T>> {
    /// Create a linked queue. `None` or zero capacity means unbounded.
    pub fn new(capacity: Option<usize>) -> WQLinkedQueue<T> {
        WQBlockingQueue::from_store(WQLinkedStore::new(), capacity)
    }

    pub fn unbounded() -> WQLinkedQueue<T> {
        Self::new(None)
    }
}

impl<T, C: WQComparator<T>> WQBlockingQueue<T, WQHeap<T, C>> {
    /// Create a priority queue ordered by `comparator`. `None` or zero capacity means unbounded.
    ///
    /// # Examples
    /// ```
    /// use waitq::{WQNaturalOrder, WQPriorityQueue};
    ///
    /// let queue = WQPriorityQueue::new(WQNaturalOrder, None);
    /// queue.enqueue_all([3, 1, 2]);
    /// assert_eq!(queue.dequeue(), 1);
    /// assert_eq!(queue.dequeue(), 2);
    /// assert_eq!(queue.dequeue(), 3);
    /// ```
    pub fn new(comparator: C, capacity: Option<usize>) -> WQPriorityQueue<T, C> {
        WQBlockingQueue::from_store(WQHeap::new(comparator), capacity)
    }

    /// Snapshot of the elements in dequeue order.
    pub fn to_sorted_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.lock_store().to_sorted_vec()
    }
}

impl<T: WQDelayed> WQBlockingQueue<T, WQDelayStore<T>> {
    /// Create a delay queue. `None` or zero capacity means unbounded.
    pub fn new(capacity: Option<usize>) -> WQDelayQueue<T> {
        WQBlockingQueue::from_store(WQDelayStore::new(), capacity)
    }

    /// Snapshot of the elements in release order.
    pub fn to_sorted_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.lock_store().to_sorted_vec()
    }
}

impl<T, S: WQStore<T> + Default> Default for WQBlockingQueue<T, S> {
    fn default() -> Self {
        WQBlockingQueue::from_store(S::default(), None)
    }
}

impl<T: fmt::Display, S: WQStore<T>> fmt::Display for WQBlockingQueue<T, S> {
    /// Header with the element type and length, then at most the first five elements.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.lock_store();
        writeln!(
            f,
            "{}[{}](len={}){{",
            store.kind(),
            std::any::type_name::<T>(),
            store.len()
        )?;

        let mut written = Ok(());
        store.each(&mut |position, value| {
            written = writeln!(f, "\t{value},");
            written.is_ok() && position < 4
        });
        written?;

        if store.len() > 5 {
            f.write_str("\t...\n")?;
        }
        f.write_str("}")
    }
}

impl<T, S: WQStore<T>> fmt::Debug for WQBlockingQueue<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.lock_store();
        f.debug_struct("WQBlockingQueue")
            .field("kind", &store.kind())
            .field("len", &store.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{WQDelay, WQNaturalOrder, WQReverseOrder};

    const DEFAULT_SMALL_TIMEOUT: Duration = Duration::from_millis(1);

    #[test]
    fn capacity_is_capped_by_fixed_store() {
        let ring = WQBlockingQueue::from_store(WQRingStore::<u8>::new(4).unwrap(), Some(8));
        assert_eq!(ring.capacity(), Some(4));

        let ring = WQBlockingQueue::from_store(WQRingStore::<u8>::new(4).unwrap(), Some(2));
        assert_eq!(ring.capacity(), Some(2));

        assert_eq!(WQLinkedQueue::<u8>::new(Some(0)).capacity(), None);
        assert_eq!(WQLinkedQueue::<u8>::unbounded().remaining_capacity(), None);
    }

    #[test]
    fn single_slot_roundtrip_and_try_paths() {
        let queue = WQRingQueue::new(2).unwrap();

        assert_eq!(queue.try_dequeue(), None);
        assert_eq!(queue.peek(), None);

        queue.try_enqueue(0x11).unwrap();
        queue.try_enqueue(0x22).unwrap();
        assert_eq!(queue.try_enqueue(0x33), Err(0x33));
        assert_eq!(queue.count(), 2);
        assert_eq!(queue.remaining_capacity(), Some(0));

        assert_eq!(queue.peek(), Some(0x11));
        assert_eq!(queue.try_dequeue(), Some(0x11));
        assert_eq!(queue.dequeue(), 0x22);
        assert!(queue.is_empty());
    }

    #[test]
    fn timeout_when_queue_empty_or_full() {
        let queue = WQLinkedQueue::new(Some(1));

        assert_eq!(queue.dequeue_timeout(DEFAULT_SMALL_TIMEOUT), None);

        assert!(queue.enqueue_timeout(1, DEFAULT_SMALL_TIMEOUT).is_ok());
        assert_eq!(queue.enqueue_timeout(2, DEFAULT_SMALL_TIMEOUT), Err(2));
        assert_eq!(queue.to_vec(), vec![1]);

        assert_eq!(queue.dequeue_timeout(DEFAULT_SMALL_TIMEOUT), Some(1));
        assert!(queue.is_empty());
    }

    #[test]
    fn huge_timeout_does_not_overflow() {
        let queue = WQLinkedQueue::unbounded();
        queue.enqueue(5);
        assert_eq!(queue.dequeue_timeout(Duration::MAX), Some(5));
    }

    #[test]
    fn clear_keeps_capacity() {
        let queue = WQRingQueue::new(3).unwrap();
        queue.enqueue_all([1, 2, 3]);
        queue.clear();

        assert!(queue.is_empty());
        assert_eq!(queue.capacity(), Some(3));
        queue.enqueue_all([4, 5, 6]);
        assert_eq!(queue.to_vec(), vec![4, 5, 6]);
    }

    #[test]
    fn remove_and_remove_where() {
        let queue = WQLinkedQueue::unbounded();
        queue.enqueue_all([1, 2, 3, 2, 4]);

        assert_eq!(queue.remove(&2), 2);
        assert_eq!(queue.remove_where(|value| *value > 3), 1);
        assert_eq!(queue.to_vec(), vec![1, 3]);

        let priority = WQPriorityQueue::new(WQReverseOrder, None);
        priority.enqueue_all([1, 5, 3, 4]);
        assert_eq!(priority.remove(&5), 1);
        assert_eq!(priority.dequeue(), 4);
    }

    #[test]
    fn panicking_predicate_does_not_wedge_queue() {
        let queue = WQLinkedQueue::unbounded();
        queue.enqueue_all([1, 2, 3]);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            queue.remove_where(|_| panic!("predicate failure"))
        }));
        assert!(result.is_err());

        assert_eq!(queue.count(), 3);
        queue.enqueue(4);
        assert_eq!(queue.dequeue(), 1);
        assert_eq!(queue.remove(&3), 1);
    }

    /// Predicate that matches even values and panics on its `nth` call.
    fn evens_until_call(nth: usize) -> impl FnMut(&u32) -> bool {
        let mut calls = 0;
        move |value| {
            calls += 1;
            if calls == nth {
                panic!("predicate failure on call {nth}");
            }
            value % 2 == 0
        }
    }

    fn remove_and_catch<S: WQRemovable<u32>>(queue: &WQBlockingQueue<u32, S>, nth: usize) {
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            queue.remove_where(evens_until_call(nth))
        }));
        assert!(result.is_err(), "predicate should have panicked");
    }

    #[test]
    fn linked_order_survives_predicate_panic_mid_scan() {
        let queue = WQLinkedQueue::unbounded();
        queue.enqueue_all(0..8);

        remove_and_catch(&queue, 6);

        assert_eq!(queue.to_vec(), (0..8).collect::<Vec<_>>());
        assert_eq!(queue.dequeue(), 0);
        assert_eq!(queue.remove_where(|value| value % 2 == 0), 3);
        assert_eq!(queue.to_vec(), vec![1, 3, 5, 7]);
    }

    #[test]
    fn priority_contents_survive_predicate_panic_mid_scan() {
        let queue = WQPriorityQueue::new(WQNaturalOrder, None);
        queue.enqueue_all([7, 2, 5, 0, 6, 3, 1, 4]);
        let layout = queue.to_vec();

        remove_and_catch(&queue, 5);

        assert_eq!(queue.to_vec(), layout);
        assert_eq!(queue.to_sorted_vec(), (0..8).collect::<Vec<_>>());
        assert_eq!(queue.dequeue(), 0);
    }

    #[test]
    fn priority_sorted_snapshot() {
        let queue = WQPriorityQueue::new(WQNaturalOrder, Some(8));
        queue.enqueue_all([7, 3, 9, 1]);

        assert_eq!(queue.to_sorted_vec(), vec![1, 3, 7, 9]);
        assert_eq!(queue.peek(), Some(1));
        assert_eq!(queue.count(), 4);
    }

    #[test]
    fn delay_queue_try_dequeue_waits_for_release() {
        let queue = WQDelayQueue::new(None);
        queue.enqueue(WQDelay::after("later", Duration::from_secs(60)));

        assert_eq!(queue.try_dequeue(), None);
        assert_eq!(queue.dequeue_timeout(DEFAULT_SMALL_TIMEOUT), None);
        assert_eq!(queue.count(), 1);
        assert_eq!(queue.peek().map(|item| item.value), Some("later"));

        queue.enqueue(WQDelay::after("now", Duration::ZERO));
        assert_eq!(queue.try_dequeue().map(WQDelay::into_value), Some("now"));
        assert_eq!(queue.to_sorted_vec().len(), 1);
    }

    #[test]
    fn display_lists_first_five() {
        let queue = WQLinkedQueue::unbounded();
        queue.enqueue_all(1..=7);

        assert_eq!(
            queue.to_string(),
            "WQLinkedQueue[i32](len=7){\n\t1,\n\t2,\n\t3,\n\t4,\n\t5,\n\t...\n}"
        );

        let short = WQRingQueue::new(4).unwrap();
        short.enqueue("a");
        assert_eq!(short.to_string(), "WQRingQueue[&str](len=1){\n\ta,\n}");
    }

    #[test]
    fn debug_does_not_need_debug_elements() {
        struct Opaque;
        let queue = WQLinkedQueue::new(Some(3));
        queue.enqueue(Opaque);
        assert_eq!(
            format!("{queue:?}"),
            "WQBlockingQueue { kind: \"WQLinkedQueue\", len: 1, capacity: Some(3) }"
        );
    }
}
