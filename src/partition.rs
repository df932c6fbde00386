//! Splits the input into the chunks that map units work on.

use crate::error::{MRError, Result};
use crate::record_types::Flight;

/// A contiguous chunk of the input. `index` is the position of the chunk in input order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    pub index: usize,
    pub records: Vec<Flight>,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Moves `records` into partitions of exactly `size` records each; the last partition holds
/// the remainder. No records are copied.
pub fn partition<It: IntoIterator<Item = Flight>>(records: It, size: usize) -> Result<Vec<Partition>> {
    if size == 0 {
        return Err(MRError::InvalidConfig(String::from("partition size must be positive")));
    }

    let mut partitions = Vec::new();
    let mut chunk = Vec::with_capacity(size);

    for r in records {
        chunk.push(r);

        if chunk.len() == size {
            partitions.push(Partition {
                index: partitions.len(),
                records: chunk,
            });
            chunk = Vec::with_capacity(size);
        }
    }

    if !chunk.is_empty() {
        partitions.push(Partition {
            index: partitions.len(),
            records: chunk,
        });
    }

    Ok(partitions)
}
