//! Single-threaded reference computation, used to cross-check the parallel job.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::max_extract::find_max;
use crate::record_types::{Flight, GlobalResult, MaxFlights};

/// Counts flights per passenger in one pass over all records.
pub fn count_flights(records: &[Flight]) -> GlobalResult {
    let mut grouped: BTreeMap<&str, u64> = BTreeMap::new();
    for r in records {
        *grouped.entry(r.key()).or_default() += 1;
    }
    GlobalResult::from_unsorted(grouped.into_iter().map(|(k, n)| (k.to_string(), n)))
}

pub fn max_flights(records: &[Flight]) -> Result<MaxFlights> {
    find_max(&count_flights(records))
}
