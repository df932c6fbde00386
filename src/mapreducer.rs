//! The Mapper and Reducer traits, and the flight counting job implementing them.

use crate::map;
use crate::partition::Partition;
use crate::record_types::{GlobalResult, PartialResult};
use crate::reduce;

use std::sync::atomic::AtomicBool;

/// Per-partition aggregation. One instance is shared by all map units of a job, so
/// implementations must not keep mutable state between partitions.
pub trait Mapper: Send + Sync {
    /// Aggregates one partition into a key-sorted partial result.
    ///
    /// `cancel` is raised by the coordinator when the map timeout expires; long running
    /// implementations should check it and return None early. The job fails on timeout either
    /// way, but a unit that ignores the flag keeps its worker thread busy until it returns.
    fn map(&self, partition: &Partition, cancel: &AtomicBool) -> Option<PartialResult>;
}

pub trait Reducer {
    /// Merges all partial results into one key-sorted global result.
    fn reduce(&self, partials: Vec<PartialResult>) -> GlobalResult;
}

/// Counts flights per passenger.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlightCounter;

impl Mapper for FlightCounter {
    fn map(&self, partition: &Partition, cancel: &AtomicBool) -> Option<PartialResult> {
        map::MapPartition::new(partition).run(cancel)
    }
}

impl Reducer for FlightCounter {
    fn reduce(&self, partials: Vec<PartialResult>) -> GlobalResult {
        reduce::reduce(partials)
    }
}
