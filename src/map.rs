//! Implements the Map phase.
//!

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;

use crate::partition::Partition;
use crate::record_types::PartialResult;

/// How many records are counted between two looks at the cancellation flag.
const CANCEL_CHECK_INTERVAL: usize = 1024;

/// This is the base of the mapping phase. Every map unit has one MapPartition
/// instance for the partition it owns; the counter map is local to it.
pub struct MapPartition<'a> {
    input: &'a Partition,
    counts: HashMap<String, u64>,
}

impl<'a> MapPartition<'a> {
    pub fn new(input: &'a Partition) -> MapPartition<'a> {
        MapPartition {
            input,
            counts: HashMap::new(),
        }
    }

    /// Count, then sort. Returns None if `cancel` was raised before counting finished.
    pub fn run(mut self, cancel: &AtomicBool) -> Option<PartialResult> {
        if !self.do_map(cancel) {
            debug!("map unit {} cancelled", self.input.index);
            return None;
        }
        let input = self.input;
        let result = self.sorted_output();
        debug!("map unit {}: {} records, {} keys", input.index, input.len(), result.len());
        Some(result)
    }

    /// Executes the counting pass. Returns false on cancellation.
    fn do_map(&mut self, cancel: &AtomicBool) -> bool {
        for (i, record) in self.input.records.iter().enumerate() {
            if i % CANCEL_CHECK_INTERVAL == 0 && cancel.load(Ordering::Relaxed) {
                return false;
            }
            // Look up by &str first so repeated keys don't allocate.
            match self.counts.get_mut(record.key()) {
                Some(n) => *n += 1,
                None => {
                    self.counts.insert(record.key().to_string(), 1);
                }
            }
        }
        true
    }

    fn sorted_output(self) -> PartialResult {
        PartialResult::from_unsorted(self.counts)
    }
}

/// Maps one partition without cancellation.
pub fn map_partition(partition: &Partition) -> PartialResult {
    let never = AtomicBool::new(false);
    let mut mp = MapPartition::new(partition);
    mp.do_map(&never);
    mp.sorted_output()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::tests::flights;
    use crate::partition::{partition, Partition};
    use crate::record_types::KeyCount;

    fn get_input() -> Partition {
        Partition {
            index: 0,
            records: flights(&["UES9151GS5", "EZC9678QI6", "UES9151GS5", "ONL0812DH1", "EZC9678QI6", "UES9151GS5"]),
        }
    }

    #[test]
    fn test_map_partition() {
        let result = map_partition(&get_input());
        assert_eq!(
            result.into_entries(),
            vec![
                KeyCount::new("EZC9678QI6", 2),
                KeyCount::new("ONL0812DH1", 1),
                KeyCount::new("UES9151GS5", 3),
            ]
        );
    }

    #[test]
    fn test_keys_sorted_and_counts_true() {
        let input = flights(&["d", "b", "a", "d", "c", "b", "d", "a", "e"]);
        for p in partition(input, 4).unwrap() {
            let result = map_partition(&p);
            let entries = result.entries();
            assert!(entries.windows(2).all(|w| w[0].key < w[1].key));
            for e in entries {
                let n = p.records.iter().filter(|r| r.key() == e.key).count() as u64;
                assert_eq!(e.count, n);
            }
            assert_eq!(result.total(), p.len() as u64);
        }
    }

    #[test]
    fn test_empty_partition() {
        let p = Partition {
            index: 3,
            records: Vec::new(),
        };
        assert!(map_partition(&p).is_empty());
    }

    #[test]
    fn test_cancelled() {
        let cancel = AtomicBool::new(true);
        assert!(MapPartition::new(&get_input()).run(&cancel).is_none());

        let go = AtomicBool::new(false);
        assert_eq!(MapPartition::new(&get_input()).run(&go), Some(map_partition(&get_input())));
    }
}
