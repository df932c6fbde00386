//! Finds the passengers with the most flights using a mapreduce process bounded to one
//! machine: the input is cut into partitions, each partition is counted by its own map unit
//! in parallel, and the sorted partial counts are merged into one global count.
//!

pub mod closure_mr;
pub mod controller;
pub mod error;
pub mod formats;
pub mod map;
pub mod mapreducer;
pub mod max_extract;
pub mod parameters;
pub mod partition;
pub mod record_types;
pub mod reduce;
pub mod sequential;
pub mod shard_merge;

pub use controller::MRController;
pub use error::{MRError, Result};
pub use parameters::MRParameters;
pub use record_types::{CountTable, Flight, GlobalResult, KeyCount, MaxFlights, PartialResult};
