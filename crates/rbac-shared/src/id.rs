//! Snowflake identifier generation
//!
//! Layout of a generated id (63 bits used, always positive as `i64`):
//! 41 bits milliseconds since [`EPOCH_MILLIS`] | 5 bits node | 5 bits worker | 12 bits sequence.

use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

/// 2020-01-01T00:00:00Z
pub const EPOCH_MILLIS: u64 = 1_577_836_800_000;

const NODE_BITS: u64 = 5;
const WORKER_BITS: u64 = 5;
const SEQUENCE_BITS: u64 = 12;

const MAX_NODE_ID: u64 = (1 << NODE_BITS) - 1;
const MAX_WORKER_ID: u64 = (1 << WORKER_BITS) - 1;
const SEQUENCE_MASK: u64 = (1 << SEQUENCE_BITS) - 1;

const WORKER_SHIFT: u64 = SEQUENCE_BITS;
const NODE_SHIFT: u64 = SEQUENCE_BITS + WORKER_BITS;
const TIMESTAMP_SHIFT: u64 = SEQUENCE_BITS + WORKER_BITS + NODE_BITS;

#[derive(Debug)]
struct State {
    last_timestamp: u64,
    sequence: u64,
}

/// Time-ordered 64-bit id generator, safe to share between threads.
#[derive(Debug)]
pub struct IdGenerator {
    node_id: u64,
    worker_id: u64,
    state: Mutex<State>,
}

impl IdGenerator {
    pub fn new(node_id: u64, worker_id: u64) -> Self {
        Self {
            node_id: node_id & MAX_NODE_ID,
            worker_id: worker_id & MAX_WORKER_ID,
            state: Mutex::new(State { last_timestamp: 0, sequence: 0 }),
        }
    }

    fn now_millis() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(EPOCH_MILLIS)
            .saturating_sub(EPOCH_MILLIS)
    }

    /// Next id. Strictly greater than every id this generator returned before.
    pub fn next_id(&self) -> u64 {
        let mut state = self.state.lock();
        let mut timestamp = Self::now_millis();

        // Clock went backwards: keep issuing from the last seen millisecond.
        if timestamp < state.last_timestamp {
            timestamp = state.last_timestamp;
        }

        if timestamp == state.last_timestamp {
            state.sequence = (state.sequence + 1) & SEQUENCE_MASK;
            if state.sequence == 0 {
                // sequence exhausted for this millisecond
                while timestamp <= state.last_timestamp {
                    std::hint::spin_loop();
                    timestamp = Self::now_millis();
                }
            }
        } else {
            state.sequence = 0;
        }

        state.last_timestamp = timestamp;

        (timestamp << TIMESTAMP_SHIFT)
            | (self.node_id << NODE_SHIFT)
            | (self.worker_id << WORKER_SHIFT)
            | state.sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_ids_strictly_increase() {
        let generator = IdGenerator::new(1, 1);
        let mut last = 0;
        for _ in 0..10_000 {
            let id = generator.next_id();
            assert!(id > last);
            last = id;
        }
    }

    #[test]
    fn test_node_and_worker_are_encoded() {
        let generator = IdGenerator::new(3, 7);
        let id = generator.next_id();
        assert_eq!((id >> NODE_SHIFT) & MAX_NODE_ID, 3);
        assert_eq!((id >> WORKER_SHIFT) & MAX_WORKER_ID, 7);
        assert!(id < (1u64 << 63));
    }

    #[test]
    fn test_no_collisions_across_threads() {
        let generator = Arc::new(IdGenerator::new(1, 1));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let generator = Arc::clone(&generator);
                std::thread::spawn(move || (0..5_000).map(|_| generator.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id {}", id);
            }
        }
        assert_eq!(seen.len(), 20_000);
    }
}
