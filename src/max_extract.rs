//! Finds the passengers with the most flights in a global result.

use std::collections::BTreeSet;

use crate::error::{MRError, Result};
use crate::record_types::{GlobalResult, MaxFlights};

/// Returns the highest count in `result` together with every key reaching it.
pub fn find_max(result: &GlobalResult) -> Result<MaxFlights> {
    let max = result
        .entries()
        .iter()
        .map(|e| e.count)
        .max()
        .ok_or(MRError::EmptyInput("no result to take a maximum from"))?;

    let keys: BTreeSet<String> = result
        .entries()
        .iter()
        .filter(|e| e.count == max)
        .map(|e| e.key.clone())
        .collect();

    Ok(MaxFlights { count: max, keys })
}
