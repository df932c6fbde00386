//! A MapReducer that uses supplied map()/reduce() functions.

use std::sync::atomic::AtomicBool;

use crate::mapreducer::{Mapper, Reducer};
use crate::partition::Partition;
use crate::record_types::{GlobalResult, PartialResult};
use crate::{map, reduce};

/// map() function type. Returning None means the unit gave up after cancellation.
pub type MapperF = fn(&Partition, &AtomicBool) -> Option<PartialResult>;
/// reduce() function type.
pub type ReducerF = fn(Vec<PartialResult>) -> GlobalResult;

/// This type implements Mapper and Reducer from plain functions. It is useful to swap in a
/// different map step (e.g. for instrumentation) while keeping the standard reduce step.
#[derive(Clone, Copy)]
pub struct ClosureMapReducer {
    mapper: MapperF,
    reducer: ReducerF,
}

fn default_map(p: &Partition, cancel: &AtomicBool) -> Option<PartialResult> {
    map::MapPartition::new(p).run(cancel)
}

impl Default for ClosureMapReducer {
    fn default() -> ClosureMapReducer {
        ClosureMapReducer::new(default_map, reduce::reduce)
    }
}

impl ClosureMapReducer {
    /// Create a new MapReducer from the supplied functions.
    pub fn new(mapper: MapperF, reducer: ReducerF) -> ClosureMapReducer {
        ClosureMapReducer { mapper, reducer }
    }

    /// Replace only the map function.
    pub fn with_mapper(mapper: MapperF) -> ClosureMapReducer {
        ClosureMapReducer {
            mapper,
            ..ClosureMapReducer::default()
        }
    }
}

impl Mapper for ClosureMapReducer {
    fn map(&self, p: &Partition, cancel: &AtomicBool) -> Option<PartialResult> {
        (self.mapper)(p, cancel)
    }
}

impl Reducer for ClosureMapReducer {
    fn reduce(&self, partials: Vec<PartialResult>) -> GlobalResult {
        (self.reducer)(partials)
    }
}
