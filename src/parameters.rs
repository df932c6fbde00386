//! Parameters for a mapreduce process.
//!

use std::time::Duration;

use crate::error::{MRError, Result};

#[derive(Clone, Debug)]
pub struct MRParameters {
    pub partition_size: usize,

    /// Upper bound on concurrently running map units. `None` means one worker per partition.
    pub mappers: Option<usize>,

    pub map_timeout: Option<Duration>,
}

impl Default for MRParameters {
    fn default() -> MRParameters {
        MRParameters::new()
    }
}

impl MRParameters {
    pub fn new() -> MRParameters {
        MRParameters {
            partition_size: 100,
            mappers: None,
            map_timeout: None,
        }
    }

    /// This parameter determines how many records go into one partition, and therefore how
    /// many map units are run: ceil(records / size). The last partition holds the remainder.
    /// All partitions are held in memory at once.
    ///
    /// Default 100
    pub fn set_partition_size(mut self, size: usize) -> MRParameters {
        self.partition_size = size;
        self
    }

    /// Caps how many map units run at the same time. Results do not depend on this value;
    /// units beyond the cap simply wait for a free worker.
    ///
    /// Default: no cap (one worker thread per partition)
    pub fn set_mappers(mut self, mappers: usize) -> MRParameters {
        self.mappers = Some(mappers);
        self
    }

    /// If the map phase has not delivered every partial result after `timeout`, the job fails
    /// with a WorkerFailure without waiting for the outstanding units; they are asked to stop
    /// and run detached until they do.
    ///
    /// Default: wait indefinitely
    pub fn set_map_timeout(mut self, timeout: Duration) -> MRParameters {
        self.map_timeout = Some(timeout);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.partition_size == 0 {
            return Err(MRError::InvalidConfig(String::from("partition size must be positive")));
        }
        if self.mappers == Some(0) {
            return Err(MRError::InvalidConfig(String::from("mapper count must be positive")));
        }
        if self.map_timeout == Some(Duration::ZERO) {
            return Err(MRError::InvalidConfig(String::from("map timeout must be non-zero")));
        }
        Ok(())
    }

    /// Number of worker threads for a map phase over `partitions` partitions.
    pub fn worker_count(&self, partitions: usize) -> usize {
        match self.mappers {
            Some(cap) => cap.min(partitions).max(1),
            None => partitions.max(1),
        }
    }
}
