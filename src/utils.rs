use std::sync::LockResult;
use std::time::{Duration, Instant};

use tracing::warn;

/// Advance a circular index by one slot.
pub(crate) fn advance_idx(idx: usize, slot_count: usize) -> usize {
    debug_assert!(slot_count > 0, "slot_count must be non-zero");
    let next = idx + 1;
    // wrap around if needed
    if next >= slot_count { next - slot_count } else { next }
}

/// Instant at which a wait of `timeout` started now expires. `None` when the deadline is too far
/// out to represent, which callers treat as waiting forever.
pub(crate) fn deadline_after(timeout: Duration) -> Option<Instant> {
    Instant::now().checked_add(timeout)
}

/// Take the guard out of a poisoned lock result. Queue state is only mutated through store calls
/// that cannot leave it half-written, so a panic elsewhere in the holder is safe to step past.
pub(crate) fn recover<G>(result: LockResult<G>) -> G {
    result.unwrap_or_else(|poisoned| {
        warn!("queue lock poisoned by a panicking holder, recovering");
        poisoned.into_inner()
    })
}
