use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    WQAnyStore, WQBlockingQueue, WQComparator, WQError, WQHeap, WQLinkedStore, WQNaturalOrder,
    WQRingStore,
};

/// Storage layout behind a configured queue.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WQBacking {
    Ring,
    #[default]
    Linked,
    Heap,
}

/// Declarative queue settings.
///
/// ```toml
/// backing = "ring"
/// capacity = 1024
/// ```
///
/// A missing or zero `capacity` means unbounded, except for `ring`, which needs at least one slot.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WQConfig {
    pub capacity: Option<usize>,
    pub backing: WQBacking,
}

impl WQConfig {
    /// Parse settings from TOML.
    ///
    /// # Errors
    /// Returns `WQError::Config` on malformed TOML or unknown keys, and `WQError::InvalidArgs` when
    /// the settings cannot describe a queue.
    ///
    /// # Examples
    /// ```
    /// use waitq::{WQBacking, WQConfig};
    ///
    /// let config = WQConfig::from_toml_str("backing = \"heap\"\ncapacity = 16").unwrap();
    /// assert_eq!(config.backing, WQBacking::Heap);
    /// assert_eq!(config.capacity, Some(16));
    ///
    /// assert!(WQConfig::from_toml_str("backing = \"ring\"").is_err());
    /// ```
    pub fn from_toml_str(input: &str) -> Result<WQConfig, WQError> {
        let config: WQConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), WQError> {
        if self.backing == WQBacking::Ring && self.capacity.unwrap_or(0) == 0 {
            return Err(WQError::InvalidArgs("ring backing requires a nonzero capacity"));
        }
        Ok(())
    }

    /// Build a queue from these settings, ordering `heap` backings with `comparator`.
    pub fn build_with<T, C: WQComparator<T>>(
        &self,
        comparator: C,
    ) -> Result<WQBlockingQueue<T, WQAnyStore<T, C>>, WQError> {
        self.validate()?;
        debug!(backing = ?self.backing, capacity = ?self.capacity, "building configured queue");

        let store = match self.backing {
            WQBacking::Ring => WQAnyStore::Ring(WQRingStore::new(self.capacity.unwrap_or(0))?),
            WQBacking::Linked => WQAnyStore::Linked(WQLinkedStore::new()),
            WQBacking::Heap => WQAnyStore::Heap(WQHeap::new(comparator)),
        };
        Ok(WQBlockingQueue::from_store(store, self.capacity))
    }

    /// Build a queue from these settings, ordering `heap` backings by `Ord`.
    pub fn build<T: Ord>(&self) -> Result<WQBlockingQueue<T, WQAnyStore<T>>, WQError> {
        self.build_with(WQNaturalOrder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_unbounded_linked() {
        let config = WQConfig::from_toml_str("").unwrap();
        assert_eq!(config, WQConfig::default());

        let queue = config.build::<u8>().unwrap();
        assert_eq!(queue.capacity(), None);
        assert!(format!("{queue:?}").contains("WQLinkedQueue"));
    }

    #[test]
    fn rejects_unknown_keys_and_backings() {
        assert!(matches!(
            WQConfig::from_toml_str("capacty = 4"),
            Err(WQError::Config(_))
        ));
        assert!(matches!(
            WQConfig::from_toml_str("backing = \"skiplist\""),
            Err(WQError::Config(_))
        ));
        assert!(matches!(
            WQConfig::from_toml_str("backing = \"ring\"\ncapacity = 0"),
            Err(WQError::InvalidArgs(_))
        ));
    }

    #[test]
    fn builds_each_backing() {
        let ring = WQConfig::from_toml_str("backing = \"ring\"\ncapacity = 2")
            .unwrap()
            .build::<i32>()
            .unwrap();
        ring.enqueue_all([2, 1]);
        assert_eq!(ring.try_enqueue(0), Err(0));
        assert_eq!(ring.dequeue(), 2);

        let heap = WQConfig {
            capacity: None,
            backing: WQBacking::Heap,
        }
        .build_with(|a: &i32, b: &i32| b.cmp(a))
        .unwrap();
        heap.enqueue_all([1, 3, 2]);
        assert_eq!(heap.dequeue(), 3);
    }
}
