//! Error type shared by all phases of a job.

use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MRError>;

#[derive(Debug, Error)]
pub enum MRError {
    /// A parameter is out of range (e.g. a partition size of 0).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// At least one map unit did not produce output. `partition` is the lowest-indexed
    /// failed partition; `failed` counts all failed units of the run.
    #[error("map worker for partition {partition} failed: {reason} ({failed} unit(s) failed)")]
    WorkerFailure {
        partition: usize,
        failed: usize,
        reason: String,
    },

    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// A malformed input line; `line` is 1-based.
    #[error("parse error on line {line}: {message}")]
    Parse { line: u64, message: String },
}
