use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;

/// One flight taken by one passenger. Only `passenger_id` takes part in aggregation.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Flight {
    pub passenger_id: String,
    pub flight_id: String,
    pub from: String,
    pub to: String,
    pub departure: i64,
    pub duration: i64,
}

impl Flight {
    /// The aggregation key of this record.
    pub fn key(&self) -> &str {
        &self.passenger_id
    }
}

/// A (key,count) pair. Ordering is by key first, which is what the merge in the
/// reduce phase relies on.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct KeyCount {
    pub key: String,
    pub count: u64,
}

impl KeyCount {
    pub fn new<S: Into<String>>(key: S, count: u64) -> KeyCount {
        KeyCount {
            key: key.into(),
            count,
        }
    }
}

impl fmt::Display for KeyCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.key, self.count)
    }
}

/// Counts sorted strictly ascending by key. Both the output of one map unit and the output
/// of the reduce phase have this shape.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CountTable {
    entries: Vec<KeyCount>,
}

pub type PartialResult = CountTable;
pub type GlobalResult = CountTable;

impl CountTable {
    /// Builds a table from (key,count) pairs with unique keys in any order.
    pub fn from_unsorted<I: IntoIterator<Item = (String, u64)>>(counts: I) -> CountTable {
        let mut entries: Vec<KeyCount> = counts
            .into_iter()
            .map(|(key, count)| KeyCount { key, count })
            .collect();
        entries.sort_unstable_by(|a, b| a.key.cmp(&b.key));
        CountTable { entries }
    }

    /// Wraps entries that are already sorted by unique keys; callers guarantee the order.
    pub(crate) fn from_sorted(entries: Vec<KeyCount>) -> CountTable {
        debug_assert!(entries.windows(2).all(|w| w[0].key < w[1].key));
        CountTable { entries }
    }

    pub fn entries(&self) -> &[KeyCount] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<KeyCount> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up the count of `key`.
    pub fn get(&self, key: &str) -> Option<u64> {
        self.entries
            .binary_search_by(|e| e.key.as_str().cmp(key))
            .ok()
            .map(|i| self.entries[i].count)
    }

    /// Sum of all counts, i.e. the number of records this table was built from.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }
}

impl IntoIterator for CountTable {
    type Item = KeyCount;
    type IntoIter = std::vec::IntoIter<KeyCount>;
    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// The answer of a job: the highest flight count and every passenger reaching it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaxFlights {
    pub count: u64,
    pub keys: BTreeSet<String>,
}
