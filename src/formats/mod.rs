//! Input and output formats: flight records in, a plain text report out.

pub mod records;
pub mod report;
