//! Implements the Reduce phase.
//!

use std::iter::Peekable;

use log::debug;

use crate::record_types::{GlobalResult, KeyCount, PartialResult};
use crate::shard_merge::ShardMergeIterator;

/// Merges all partial results into one global result.
///
/// Every partial result is sorted by key, so a merge over all of them yields equal keys next
/// to each other; summing those runs gives each key's total in a single pass. The order of
/// `partials` does not matter.
pub fn reduce(partials: Vec<PartialResult>) -> GlobalResult {
    let sources = partials.len();
    let merged = ShardMergeIterator::build(partials.into_iter().map(PartialResult::into_iter));
    let entries: Vec<KeyCount> = SumAdjacent::new(merged).collect();
    debug!("reduced {} partial results into {} keys", sources, entries.len());
    GlobalResult::from_sorted(entries)
}

/// Iterator adapter: Converts an Iterator<Item=KeyCount> into one yielding a single KeyCount
/// per key by summing subsequent counts with identical key.
/// The original iterator must yield identical keys adjacently (e.g. sorted by key).
struct SumAdjacent<It: Iterator<Item = KeyCount>> {
    it: Peekable<It>,
}

impl<It: Iterator<Item = KeyCount>> SumAdjacent<It> {
    fn new(it: It) -> SumAdjacent<It> {
        SumAdjacent { it: it.peekable() }
    }
}

impl<It: Iterator<Item = KeyCount>> Iterator for SumAdjacent<It> {
    type Item = KeyCount;
    fn next(&mut self) -> Option<Self::Item> {
        let mut current = self.it.next()?;

        while let Some(next) = self.it.next_if(|kc| kc.key == current.key) {
            current.count += next.count;
        }

        Some(current)
    }
}
