use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{WQBlockingQueue, WQStore};

// A queue serializes as a plain array of its elements in store order. Capacity and comparator
// are configuration, not content, and are not written.
impl<T: Serialize, S: WQStore<T>> Serialize for WQBlockingQueue<T, S> {
    fn serialize<Z: Serializer>(&self, serializer: Z) -> Result<Z::Ok, Z::Error> {
        let store = self.lock_store();
        let mut seq = serializer.serialize_seq(Some(store.len()))?;
        let mut result = Ok(());
        store.each(&mut |_, value| {
            result = seq.serialize_element(value);
            result.is_ok()
        });
        result?;
        seq.end()
    }
}

// Deserializing builds a fresh unbounded queue around the store's default configuration.
impl<'de, T, S> Deserialize<'de> for WQBlockingQueue<T, S>
where
    T: Deserialize<'de>,
    S: WQStore<T> + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<T>::deserialize(deserializer)?;
        let queue = WQBlockingQueue::from_store(S::default(), None);
        queue.enqueue_all(values);
        Ok(queue)
    }
}

#[cfg(feature = "json")]
impl<T, S: WQStore<T>> WQBlockingQueue<T, S> {
    /// Encode the elements as a JSON array in store order.
    ///
    /// # Errors
    /// Returns `WQError::Encode` when an element fails to serialize.
    pub fn to_json(&self) -> Result<String, crate::WQError>
    where
        T: Serialize,
    {
        serde_json::to_string(self).map_err(crate::WQError::Encode)
    }

    /// Decode a JSON array and enqueue every element into this queue.
    ///
    /// The whole array is decoded before anything is enqueued, so a malformed document leaves
    /// the queue untouched. Each element then goes through a blocking
    /// [`enqueue`](Self::enqueue) of its own; on a bounded queue the call waits for consumers
    /// to make room and other threads may interleave with the batch.
    ///
    /// # Returns
    /// The number of elements enqueued.
    ///
    /// # Errors
    /// Returns `WQError::Decode` when `json` is not an array of `T`.
    ///
    /// # Examples
    /// ```
    /// use waitq::WQLinkedQueue;
    ///
    /// let queue = WQLinkedQueue::<i32>::unbounded();
    /// assert_eq!(queue.load_json("[4, 5, 6]").unwrap(), 3);
    /// assert_eq!(queue.to_json().unwrap(), "[4,5,6]");
    /// assert!(queue.load_json("{\"not\": \"an array\"}").is_err());
    /// assert_eq!(queue.count(), 3);
    /// ```
    pub fn load_json(&self, json: &str) -> Result<usize, crate::WQError>
    where
        T: serde::de::DeserializeOwned,
    {
        let values: Vec<T> = serde_json::from_str(json).map_err(crate::WQError::Decode)?;
        tracing::debug!(count = values.len(), "loading decoded elements");
        Ok(self.enqueue_all(values))
    }
}
