//! Thread-safe blocking queues sharing one mutex and two condition variables: a fixed-capacity
//! ring buffer, a linked queue, a comparator-ordered priority queue and a time-gated delay queue.

/// the blocking coordinator and its queue variants
pub mod blocking_queue;
pub use blocking_queue::WQBlockingQueue;
pub use blocking_queue::WQDelayQueue;
pub use blocking_queue::WQLinkedQueue;
pub use blocking_queue::WQPriorityQueue;
pub use blocking_queue::WQRingQueue;

/// storage contract the coordinator drives
pub mod store;
pub use store::{WQGate, WQRemovable, WQStore};

/// fixed-capacity circular storage
pub mod ring_store;
pub use ring_store::WQRingStore;

/// growable FIFO storage
pub mod linked_store;
pub use linked_store::WQLinkedStore;

/// ordering strategies
pub mod comparator;
pub use comparator::{WQComparator, WQNaturalOrder, WQReverseOrder};

/// binary heap
pub mod heap;
pub use heap::WQHeap;

/// time-gated elements and storage
pub mod delay;
pub use delay::{WQDelay, WQDelayStore, WQDelayed, WQReleaseOrder, release_delay};

/// runtime-selected storage
pub mod any_store;
pub use any_store::WQAnyStore;

/// declarative queue settings
pub mod config;
pub use config::{WQBacking, WQConfig};

/// the errors
pub mod error;
pub use error::WQError;

/// array-shaped serde support
mod serialization;

/// ring buffer cursor bookkeeping
mod queue_meta;

/// utils for internal usage
mod utils;
