use std::cmp::Ordering;

/// Total order injected into the heap, priority queue and delay queue.
///
/// Implementations must be antisymmetric and transitive; the heap relies on it. Any
/// `Fn(&T, &T) -> Ordering` closure is a comparator.
pub trait WQComparator<T> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T, F> WQComparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// Ascending [`Ord`] order: the smallest value is dequeued first.
#[derive(Clone, Copy, Debug, Default)]
pub struct WQNaturalOrder;

impl<T: Ord> WQComparator<T> for WQNaturalOrder {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Descending [`Ord`] order: the largest value is dequeued first.
#[derive(Clone, Copy, Debug, Default)]
pub struct WQReverseOrder;

impl<T: Ord> WQComparator<T> for WQReverseOrder {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        b.cmp(a)
    }
}
