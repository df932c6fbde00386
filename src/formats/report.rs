//! Renders the result of a job for humans.

use std::io::{self, Write};

use crate::record_types::MaxFlights;

/// Writes a heading naming the maximum, then every passenger reaching it, one per line in
/// ascending order.
pub fn write_report<W: Write>(out: &mut W, max: &MaxFlights) -> io::Result<()> {
    writeln!(out, "The passengers who have {} (max) flights", max.count)?;
    for key in &max.keys {
        writeln!(out, "{}", key)?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_write_report() {
        let max = MaxFlights {
            count: 25,
            keys: ["UES9151GS5", "EZC9678QI6"].iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
        };
        let mut buf = Vec::new();
        write_report(&mut buf, &max).unwrap();

        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "The passengers who have 25 (max) flights\nEZC9678QI6\nUES9151GS5\n"
        );
    }
}
