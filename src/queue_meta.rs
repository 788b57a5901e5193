use crate::utils::advance_idx;

/// Index bookkeeping for the ring buffer store.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct WQRingMeta {
    /// where the next enqueue writes
    pub(crate) enqueue_idx: usize,
    // how many live values there are
    pub(crate) size: usize,
    /// where the next dequeue reads
    pub(crate) dequeue_idx: usize,
}

impl WQRingMeta {
    /// Claim the enqueue slot, returning its index. The caller must have checked for space.
    pub(crate) fn claim_enqueue(&mut self, slot_count: usize) -> usize {
        debug_assert!(self.size < slot_count, "claimed an enqueue slot on a full ring");
        let idx = self.enqueue_idx;
        self.enqueue_idx = advance_idx(idx, slot_count);
        self.size += 1;
        idx
    }

    /// Claim the dequeue slot, returning its index. The caller must have checked for data.
    pub(crate) fn claim_dequeue(&mut self, slot_count: usize) -> usize {
        debug_assert!(self.size > 0, "claimed a dequeue slot on an empty ring");
        let idx = self.dequeue_idx;
        self.dequeue_idx = advance_idx(idx, slot_count);
        self.size -= 1;
        idx
    }

    pub(crate) fn reset(&mut self) {
        *self = WQRingMeta::default();
    }
}
