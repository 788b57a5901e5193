use crate::{
    WQComparator, WQHeap, WQLinkedStore, WQNaturalOrder, WQRemovable, WQRingStore, WQStore,
};

/// Backing storage chosen at runtime, typically from a [`WQConfig`](crate::WQConfig).
///
/// Lets one queue type stand in for any of the ring, linked or priority variants when the choice
/// comes from configuration instead of code.
#[derive(Debug)]
pub enum WQAnyStore<T, C = WQNaturalOrder> {
    Ring(WQRingStore<T>),
    Linked(WQLinkedStore<T>),
    Heap(WQHeap<T, C>),
}

macro_rules! dispatch {
    ($store:expr, $inner:ident => $body:expr) => {
        match $store {
            WQAnyStore::Ring($inner) => $body,
            WQAnyStore::Linked($inner) => $body,
            WQAnyStore::Heap($inner) => $body,
        }
    };
}

impl<T, C: WQComparator<T>> WQStore<T> for WQAnyStore<T, C> {
    fn kind(&self) -> &'static str {
        dispatch!(self, inner => inner.kind())
    }

    fn len(&self) -> usize {
        dispatch!(self, inner => WQStore::len(inner))
    }

    fn fixed_capacity(&self) -> Option<usize> {
        dispatch!(self, inner => inner.fixed_capacity())
    }

    fn push(&mut self, value: T) -> Result<(), T> {
        dispatch!(self, inner => WQStore::push(inner, value))
    }

    fn pop(&mut self) -> Option<T> {
        dispatch!(self, inner => WQStore::pop(inner))
    }

    fn peek(&self) -> Option<&T> {
        dispatch!(self, inner => WQStore::peek(inner))
    }

    fn clear(&mut self) {
        dispatch!(self, inner => WQStore::clear(inner))
    }

    fn each(&self, f: &mut dyn FnMut(usize, &T) -> bool) {
        dispatch!(self, inner => inner.each(f))
    }
}

impl<T, C: WQComparator<T>> WQRemovable<T> for WQAnyStore<T, C> {
    fn remove_where(&mut self, predicate: &mut dyn FnMut(&T) -> bool) -> usize {
        match self {
            WQAnyStore::Ring(ring) => {
                // The ring has no in-place removal; mark matches first, then rebuild it from the
                // survivors in FIFO order. Nothing is popped until the predicate has seen every
                // value.
                let mut matched = Vec::with_capacity(ring.len());
                ring.each(&mut |_, value| {
                    matched.push(predicate(value));
                    true
                });

                let removed = matched.iter().filter(|matched| **matched).count();
                if removed > 0 {
                    let mut kept = Vec::with_capacity(ring.len() - removed);
                    for is_match in matched {
                        match ring.pop() {
                            Some(value) if !is_match => kept.push(value),
                            _ => {}
                        }
                    }
                    for value in kept {
                        // Survivors never exceed the slots they were popped from.
                        let _ = ring.push(value);
                    }
                }
                removed
            }
            WQAnyStore::Linked(linked) => linked.remove_where(predicate),
            WQAnyStore::Heap(heap) => heap.remove_where(predicate),
        }
    }
}
