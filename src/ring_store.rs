use crate::queue_meta::WQRingMeta;
use crate::utils::advance_idx;
use crate::{WQError, WQStore};

/// Fixed-capacity ring buffer with wraparound enqueue/dequeue indices.
///
/// Vacated slots are reset to `None` so a dequeued value is never retained by the buffer.
#[derive(Debug)]
pub struct WQRingStore<T> {
    meta: WQRingMeta,
    slots: Vec<Option<T>>,
}

impl<T> WQRingStore<T> {
    /// Create an empty ring with `slot_count` slots.
    ///
    /// # Errors
    /// Returns `WQError::InvalidArgs` when `slot_count` is zero.
    ///
    /// # Examples
    /// ```
    /// use waitq::{WQRingStore, WQStore};
    ///
    /// let mut ring = WQRingStore::new(2).unwrap();
    /// ring.push(1).unwrap();
    /// ring.push(2).unwrap();
    /// assert_eq!(ring.push(3), Err(3));
    /// assert_eq!(ring.pop(), Some(1));
    /// ```
    pub fn new(slot_count: usize) -> Result<WQRingStore<T>, WQError> {
        if slot_count == 0 {
            return Err(WQError::InvalidArgs(
                "ring buffer capacity must be greater than zero",
            ));
        }

        let mut slots = Vec::with_capacity(slot_count);
        slots.resize_with(slot_count, || None);

        Ok(WQRingStore {
            meta: WQRingMeta::default(),
            slots,
        })
    }

    /// Total number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Slot index the next enqueue writes to.
    #[inline]
    pub fn enqueue_idx(&self) -> usize {
        self.meta.enqueue_idx
    }

    /// Slot index the next dequeue reads from.
    #[inline]
    pub fn dequeue_idx(&self) -> usize {
        self.meta.dequeue_idx
    }
}

impl<T> WQStore<T> for WQRingStore<T> {
    fn kind(&self) -> &'static str {
        "WQRingQueue"
    }

    #[inline]
    fn len(&self) -> usize {
        self.meta.size
    }

    fn fixed_capacity(&self) -> Option<usize> {
        Some(self.slots.len())
    }

    fn push(&mut self, value: T) -> Result<(), T> {
        if self.meta.size == self.slots.len() {
            return Err(value);
        }

        let idx = self.meta.claim_enqueue(self.slots.len());
        let old = self.slots[idx].replace(value);
        debug_assert!(old.is_none(), "we double-filled ring slot {idx}");
        Ok(())
    }

    fn pop(&mut self) -> Option<T> {
        if self.meta.size == 0 {
            return None;
        }

        let idx = self.meta.claim_dequeue(self.slots.len());
        let value = self.slots[idx].take();
        debug_assert!(value.is_some(), "live ring slot {idx} was empty");
        value
    }

    fn peek(&self) -> Option<&T> {
        if self.meta.size == 0 {
            return None;
        }
        self.slots[self.meta.dequeue_idx].as_ref()
    }

    fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.meta.reset();
    }

    fn each(&self, f: &mut dyn FnMut(usize, &T) -> bool) {
        let mut idx = self.meta.dequeue_idx;
        for position in 0..self.meta.size {
            if let Some(value) = self.slots[idx].as_ref() {
                if !f(position, value) {
                    return;
                }
            }
            idx = advance_idx(idx, self.slots.len());
        }
    }
}
