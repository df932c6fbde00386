//! Reads flight records from comma-separated text.
//!
//! Every line holds `passengerId,flightId,from,to,departure,duration`; there is no header and
//! `departure` and `duration` are integers. Blank lines are malformed.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use log::info;

use crate::error::{MRError, Result};
use crate::record_types::Flight;

/// Loads all records from the file at `path`. The path `-` reads standard input.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<Flight>> {
    let path = path.as_ref();
    let records = if path == Path::new("-") {
        read_records(io::stdin().lock())?
    } else {
        read_records(fs::File::open(path)?)?
    };
    info!("count={} ({})", records.len(), path.display());
    Ok(records)
}

/// Reads all records from `src`.
pub fn read_records<R: Read>(mut src: R) -> Result<Vec<Flight>> {
    let mut data = Vec::new();
    src.read_to_end(&mut data)?;
    // The csv reader skips empty lines silently.
    check_blank_lines(&data)?;

    let mut reader = csv::ReaderBuilder::new().has_headers(false).from_reader(data.as_slice());

    let mut records = Vec::new();
    for r in reader.deserialize() {
        records.push(r.map_err(convert_error)?);
    }
    Ok(records)
}

fn check_blank_lines(data: &[u8]) -> Result<()> {
    if data.is_empty() {
        return Ok(());
    }
    let body = data.strip_suffix(b"\n").unwrap_or(data);

    for (i, line) in body.split(|b| *b == b'\n').enumerate() {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.is_empty() {
            return Err(MRError::Parse {
                line: i as u64 + 1,
                message: String::from("empty line"),
            });
        }
    }
    Ok(())
}

fn convert_error(e: csv::Error) -> MRError {
    let line = e.position().map(|p| p.line()).unwrap_or(0);

    match e.into_kind() {
        csv::ErrorKind::Io(e) => MRError::Io(e),
        csv::ErrorKind::Deserialize { err, .. } => MRError::Parse {
            line,
            message: err.to_string(),
        },
        csv::ErrorKind::UnequalLengths { expected_len, len, .. } => MRError::Parse {
            line,
            message: format!("expected {} fields, found {}", expected_len, len),
        },
        csv::ErrorKind::Utf8 { err, .. } => MRError::Parse {
            line,
            message: err.to_string(),
        },
        other => MRError::Parse {
            line,
            message: format!("{:?}", other),
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_read_records() {
        let input = "UES9151GS5,SQU6245R,DEN,FRA,1420564460,1049\n\
                     EZC9678QI6,SOH3431A,ORD,MIA,1420563917,802\n";
        let records = read_records(input.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            Flight {
                passenger_id: String::from("UES9151GS5"),
                flight_id: String::from("SQU6245R"),
                from: String::from("DEN"),
                to: String::from("FRA"),
                departure: 1420564460,
                duration: 1049,
            }
        );
        assert_eq!(records[1].key(), "EZC9678QI6");
    }

    #[test]
    fn test_bad_integer() {
        let input = "A,F1,DEN,FRA,1420564460,1049\n\
                     B,F2,ORD,MIA,soon,802\n";
        match read_records(input.as_bytes()) {
            Err(MRError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_fields() {
        let input = "A,F1,DEN,FRA,1420564460,1049\n\
                     B,F2,ORD\n";
        match read_records(input.as_bytes()) {
            Err(MRError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_blank_lines() {
        let inner = "A,F1,DEN,FRA,1420564460,1049\n\nB,F2,ORD,MIA,1420563917,802\n";
        match read_records(inner.as_bytes()) {
            Err(MRError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected result: {:?}", other),
        }

        let trailing = "A,F1,DEN,FRA,1420564460,1049\r\n\r\n";
        match read_records(trailing.as_bytes()) {
            Err(MRError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_line_endings() {
        let crlf = "A,F1,DEN,FRA,1420564460,1049\r\nB,F2,ORD,MIA,1420563917,802\r\n";
        assert_eq!(read_records(crlf.as_bytes()).unwrap().len(), 2);

        let no_newline = "A,F1,DEN,FRA,1420564460,1049";
        assert_eq!(read_records(no_newline.as_bytes()).unwrap().len(), 1);
        assert!(read_records("".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_file() {
        match load("testdata/does_not_exist.csv") {
            Err(MRError::Io(_)) => (),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_load_file() {
        let records = load("testdata/flights.csv").unwrap();
        assert_eq!(records.len(), 20);
    }
}
