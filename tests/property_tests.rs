//! Property-based tests for queue invariants under arbitrary operation sequences.

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use proptest::prelude::*;

    use waitq::{WQLinkedQueue, WQNaturalOrder, WQPriorityQueue, WQReverseOrder, WQRingQueue};

    #[derive(Clone, Debug)]
    enum Op {
        Enqueue(u16),
        Dequeue,
        Remove(u16),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => any::<u16>().prop_map(|value| Op::Enqueue(value % 32)),
            2 => Just(Op::Dequeue),
            1 => any::<u16>().prop_map(|value| Op::Remove(value % 32)),
        ]
    }

    fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
        prop::collection::vec(op_strategy(), 0..200)
    }

    proptest! {
        /// A bounded ring queue tracks a plain FIFO model and never exceeds its capacity.
        #[test]
        fn ring_matches_fifo_model(capacity in 1usize..16, ops in ops_strategy()) {
            let queue = WQRingQueue::new(capacity).unwrap();
            let mut model = VecDeque::new();

            for op in ops {
                match op {
                    Op::Enqueue(value) => {
                        let result = queue.try_enqueue(value);
                        if model.len() < capacity {
                            prop_assert_eq!(result, Ok(()));
                            model.push_back(value);
                        } else {
                            prop_assert_eq!(result, Err(value));
                        }
                    }
                    Op::Dequeue => prop_assert_eq!(queue.try_dequeue(), model.pop_front()),
                    // ring storage has no removal; treat it as a peek
                    Op::Remove(_) => prop_assert_eq!(queue.peek(), model.front().copied()),
                }
                prop_assert!(queue.count() <= capacity);
                prop_assert_eq!(queue.count(), model.len());
            }
            prop_assert_eq!(queue.to_vec(), Vec::from(model));
        }

        /// Removal on a linked queue drops every match and keeps the survivors' order.
        #[test]
        fn linked_remove_matches_model(ops in ops_strategy()) {
            let queue = WQLinkedQueue::unbounded();
            let mut model = VecDeque::new();

            for op in ops {
                match op {
                    Op::Enqueue(value) => {
                        queue.enqueue(value);
                        model.push_back(value);
                    }
                    Op::Dequeue => prop_assert_eq!(queue.try_dequeue(), model.pop_front()),
                    Op::Remove(value) => {
                        let before = model.len();
                        model.retain(|item| *item != value);
                        prop_assert_eq!(queue.remove(&value), before - model.len());
                    }
                }
            }
            prop_assert_eq!(queue.to_vec(), Vec::from(model));
        }

        /// Priority queues always hand out the smallest remaining value, through any mix of
        /// removals.
        #[test]
        fn priority_dequeues_in_order(ops in ops_strategy()) {
            let queue = WQPriorityQueue::new(WQNaturalOrder, None);
            let mut model: Vec<u16> = Vec::new();

            for op in ops {
                match op {
                    Op::Enqueue(value) => {
                        queue.enqueue(value);
                        model.push(value);
                    }
                    Op::Dequeue => {
                        let expected = model.iter().copied().min();
                        if let Some(min) = expected {
                            let position = model.iter().position(|item| *item == min).unwrap();
                            model.swap_remove(position);
                        }
                        prop_assert_eq!(queue.try_dequeue(), expected);
                    }
                    Op::Remove(value) => {
                        let before = model.len();
                        model.retain(|item| *item != value);
                        prop_assert_eq!(queue.remove(&value), before - model.len());
                    }
                }
            }

            model.sort_unstable();
            prop_assert_eq!(queue.to_sorted_vec(), model);
        }

        /// After enqueueing n values and dequeueing k of them, n - k remain, in comparator order.
        #[test]
        fn sizes_after_partial_drain(values in prop::collection::vec(any::<i32>(), 0..100), k in 0usize..100) {
            let queue = WQPriorityQueue::new(WQReverseOrder, None);
            queue.enqueue_all(values.iter().copied());

            let k = k.min(values.len());
            let mut last = None;
            for _ in 0..k {
                let value = queue.dequeue();
                if let Some(previous) = last {
                    prop_assert!(previous >= value);
                }
                last = Some(value);
            }
            prop_assert_eq!(queue.count(), values.len() - k);
        }
    }
}
