use std::cmp::Ordering;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::{WQComparator, WQGate, WQHeap, WQRemovable, WQStore};

/// Elements of a [`WQDelayQueue`](crate::WQDelayQueue): each one becomes takeable once the wall
/// clock reaches its release timestamp.
pub trait WQDelayed {
    fn release_at(&self) -> DateTime<Utc>;
}

/// Time left until `item` is released, or `None` when it is already due.
pub fn release_delay<D: WQDelayed + ?Sized>(item: &D) -> Option<Duration> {
    (item.release_at() - Utc::now())
        .to_std()
        .ok()
        .filter(|remaining| !remaining.is_zero())
}

/// A value paired with the instant it is released.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct WQDelay<T> {
    pub value: T,
    pub release_at: DateTime<Utc>,
}

impl<T> WQDelay<T> {
    pub fn at(value: T, release_at: DateTime<Utc>) -> WQDelay<T> {
        WQDelay { value, release_at }
    }

    /// Release `value` once `delay` has elapsed from now. Delays too large to represent saturate
    /// to the latest representable instant.
    pub fn after(value: T, delay: Duration) -> WQDelay<T> {
        let release_at = TimeDelta::from_std(delay)
            .ok()
            .and_then(|delay| Utc::now().checked_add_signed(delay))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        WQDelay { value, release_at }
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T> WQDelayed for WQDelay<T> {
    fn release_at(&self) -> DateTime<Utc> {
        self.release_at
    }
}

impl<T: fmt::Display> fmt::Display for WQDelay<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "value: {}, until: {}",
            self.value,
            self.release_at.format("%Y-%m-%d %H:%M:%S")
        )
    }
}

/// Orders delayed elements by ascending release timestamp.
#[derive(Clone, Copy, Debug, Default)]
pub struct WQReleaseOrder;

impl<T: WQDelayed> WQComparator<T> for WQReleaseOrder {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.release_at().cmp(&b.release_at())
    }
}

/// Heap of delayed elements whose head is gated on its release timestamp.
#[derive(Clone, Debug)]
pub struct WQDelayStore<T> {
    heap: WQHeap<T, WQReleaseOrder>,
}

impl<T: WQDelayed> WQDelayStore<T> {
    pub fn new() -> WQDelayStore<T> {
        WQDelayStore {
            heap: WQHeap::new(WQReleaseOrder),
        }
    }

    /// Copy the elements out in release order.
    pub fn to_sorted_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.heap.to_sorted_vec()
    }
}

impl<T: WQDelayed> Default for WQDelayStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: WQDelayed> WQStore<T> for WQDelayStore<T> {
    fn kind(&self) -> &'static str {
        "WQDelayQueue"
    }

    fn len(&self) -> usize {
        self.heap.len()
    }

    fn push(&mut self, value: T) -> Result<(), T> {
        self.heap.push(value);
        Ok(())
    }

    fn pop(&mut self) -> Option<T> {
        self.heap.pop()
    }

    fn peek(&self) -> Option<&T> {
        self.heap.peek()
    }

    fn clear(&mut self) {
        self.heap.clear();
    }

    fn each(&self, f: &mut dyn FnMut(usize, &T) -> bool) {
        WQStore::each(&self.heap, f);
    }

    fn gate(&self) -> WQGate {
        match self.heap.peek() {
            None => WQGate::Closed,
            Some(head) => match release_delay(head) {
                None => WQGate::Open,
                Some(remaining) => WQGate::OpensIn(remaining),
            },
        }
    }
}

impl<T: WQDelayed> WQRemovable<T> for WQDelayStore<T> {
    fn remove_where(&mut self, predicate: &mut dyn FnMut(&T) -> bool) -> usize {
        self.heap.retain_unmatched(predicate)
    }
}
