//! CSV ingestion of travel records.
//!
//! A [`RecordReader`] is a lazy, finite and non-restartable iterator over the
//! rows of one delimited source. The first line is always treated as the
//! header; blank lines are skipped; quoted fields follow RFC 4180. The first
//! bad row ends the iteration with an error.

use crate::error::{FareError, Result};
use crate::record::{Column, TravelRecord, COLUMN_COUNT, FARE_HEADER};
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, warn};

/// Streaming reader yielding one [`TravelRecord`] per data row.
pub struct RecordReader<R: Read> {
    inner: csv::Reader<R>,
    source: String,
    row: StringRecord,
    done: bool,
}

impl RecordReader<BufReader<File>> {
    /// Opens `path` and reads its header line.
    ///
    /// # Errors
    /// [`FareError::Io`] if the file cannot be opened.
    pub fn from_path(path: impl AsRef<Path>, delimiter: u8) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| FareError::io(path, e))?;
        Self::from_reader(BufReader::new(file), delimiter, path.display().to_string())
    }
}

impl<R: Read> RecordReader<R> {
    /// Wraps any byte source. `source` names it in error messages.
    pub fn from_reader(reader: R, delimiter: u8, source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let mut inner = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let header = inner.headers().map_err(|e| FareError::Csv {
            source_name: source.clone(),
            source: e,
        })?;
        if !header_matches(header) {
            warn!(
                source = %source,
                header = ?header.iter().collect::<Vec<_>>(),
                "unexpected CSV header; reading columns by position"
            );
        }

        Ok(Self {
            inner,
            source,
            row: StringRecord::new(),
            done: false,
        })
    }

    /// Name of the source used in error messages.
    pub fn source_name(&self) -> &str {
        &self.source
    }

    fn parse_row(&self) -> Result<TravelRecord> {
        let line = self.row.position().map_or(0, |p| p.line());
        if self.row.len() != COLUMN_COUNT {
            return Err(FareError::MalformedRow {
                source_name: self.source.clone(),
                line,
                expected: COLUMN_COUNT,
                got: self.row.len(),
            });
        }

        let field = |c: Column| self.row.get(c.position()).unwrap_or_default();
        let raw_fare = self.row.get(COLUMN_COUNT - 1).unwrap_or_default();
        let fare = parse_fare(raw_fare).map_err(|reason| FareError::FieldParse {
            source_name: self.source.clone(),
            line,
            column: FARE_HEADER.to_string(),
            value: raw_fare.to_string(),
            reason,
        })?;

        Ok(TravelRecord::from_fields(Column::ALL.map(field), fare))
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<TravelRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = match self.inner.read_record(&mut self.row) {
            Ok(false) => {
                self.done = true;
                return None;
            }
            Ok(true) => self.parse_row(),
            Err(e) => Err(FareError::Csv {
                source_name: self.source.clone(),
                source: e,
            }),
        };
        if item.is_err() {
            self.done = true;
        }
        Some(item)
    }
}

/// Reads every record of `path`, stopping at the first error.
pub fn read_all(path: impl AsRef<Path>, delimiter: u8) -> Result<Vec<TravelRecord>> {
    let reader = RecordReader::from_path(path, delimiter)?;
    let source = reader.source_name().to_string();
    let records = reader.collect::<Result<Vec<_>>>()?;
    debug!(source = %source, rows = records.len(), "read records");
    Ok(records)
}

/// Parses a single headerless data line such as one given on a command line.
///
/// The fare column may be left off; the returned flag says whether it was
/// present. A record without one carries a fare of `0`.
///
/// # Errors
/// - [`FareError::MalformedRow`] unless the line has 10 or 11 fields.
/// - [`FareError::FieldParse`] for an invalid fare.
pub fn parse_line(line: &str, delimiter: u8) -> Result<(TravelRecord, bool)> {
    const SOURCE: &str = "<row>";
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    let mut row = StringRecord::new();
    let found = reader.read_record(&mut row).map_err(|e| FareError::Csv {
        source_name: SOURCE.to_string(),
        source: e,
    })?;
    if !found || !(COLUMN_COUNT - 1..=COLUMN_COUNT).contains(&row.len()) {
        return Err(FareError::MalformedRow {
            source_name: SOURCE.to_string(),
            line: 1,
            expected: COLUMN_COUNT,
            got: row.len(),
        });
    }

    let field = |c: Column| row.get(c.position()).unwrap_or_default();
    let fare = match row.get(COLUMN_COUNT - 1) {
        Some(raw) => Some(parse_fare(raw).map_err(|reason| FareError::FieldParse {
            source_name: SOURCE.to_string(),
            line: 1,
            column: FARE_HEADER.to_string(),
            value: raw.to_string(),
            reason,
        })?),
        None => None,
    };
    Ok((
        TravelRecord::from_fields(Column::ALL.map(field), fare.unwrap_or(0.0)),
        fare.is_some(),
    ))
}

fn header_matches(header: &StringRecord) -> bool {
    header.len() == COLUMN_COUNT
        && Column::ALL
            .iter()
            .map(|c| c.header_name())
            .chain(std::iter::once(FARE_HEADER))
            .zip(header.iter())
            .all(|(want, got)| want.eq_ignore_ascii_case(got.trim()))
}

fn parse_fare(raw: &str) -> std::result::Result<f64, String> {
    let fare: f64 = raw.trim().parse().map_err(|e| format!("{e}"))?;
    if !fare.is_finite() {
        return Err("fare must be finite".to_string());
    }
    Ok(fare)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "TravelDate,DepartureAirport,DepartureTime,ArrivalAirport,ArrivalTime,Duration,Direct,Transit,Baggage,Airline,AirFare";

    fn reader(body: &str) -> RecordReader<&[u8]> {
        RecordReader::from_reader(body.as_bytes(), b',', "memory").unwrap()
    }

    #[test]
    fn test_reads_rows_in_order() {
        let text = format!(
            "{HEADER}\n\
             18/12/2019,ZQN,10:20 AM,WLG,6:10 PM,7h 50m,(1 stop),4h 50m in AKL,,Air New Zealand,422\n\
             19/12/2019,AKL,6:00 AM,CHC,7:25 AM,1h 25m,(Direct),,,Jetstar,89.5\n"
        );
        let records: Vec<_> = reader(&text).map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].departure_airport, "ZQN");
        assert_eq!(records[0].baggage, "");
        assert_eq!(records[0].fare, 422.0);
        assert_eq!(records[1].airline, "Jetstar");
        assert_eq!(records[1].fare, 89.5);
    }

    #[test]
    fn test_header_only_yields_nothing() {
        assert_eq!(reader(&format!("{HEADER}\n")).count(), 0);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let text = format!(
            "{HEADER}\n\n18/12/2019,ZQN,10:20 AM,WLG,6:10 PM,7h 50m,(1 stop),,,Air New Zealand,422\n\n\n"
        );
        assert_eq!(reader(&text).filter(|r| r.is_ok()).count(), 1);
    }

    #[test]
    fn test_quoted_field_with_delimiter() {
        let text = format!(
            "{HEADER}\n18/12/2019,ZQN,10:20 AM,WLG,6:10 PM,7h 50m,(1 stop),\"AKL, 4h 50m\",,Air New Zealand,422\n"
        );
        let rec = reader(&text).next().unwrap().unwrap();
        assert_eq!(rec.transit, "AKL, 4h 50m");
    }

    #[test]
    fn test_short_row_is_malformed_with_line_number() {
        let text = format!(
            "{HEADER}\n\
             18/12/2019,ZQN,10:20 AM,WLG,6:10 PM,7h 50m,(1 stop),,,Air New Zealand,422\n\
             19/12/2019,AKL,6:00 AM,CHC\n"
        );
        let mut it = reader(&text);
        assert!(it.next().unwrap().is_ok());
        match it.next().unwrap() {
            Err(FareError::MalformedRow {
                line, expected, got, ..
            }) => {
                assert_eq!(line, 3);
                assert_eq!(expected, 11);
                assert_eq!(got, 4);
            }
            other => panic!("expected MalformedRow, got {other:?}"),
        }
        assert!(it.next().is_none());
    }

    #[test]
    fn test_bad_fare_is_field_parse() {
        let text = format!(
            "{HEADER}\n18/12/2019,ZQN,10:20 AM,WLG,6:10 PM,7h 50m,(1 stop),,,Air New Zealand,cheap\n"
        );
        match reader(&text).next().unwrap() {
            Err(FareError::FieldParse {
                line, column, value, ..
            }) => {
                assert_eq!(line, 2);
                assert_eq!(column, "AirFare");
                assert_eq!(value, "cheap");
            }
            other => panic!("expected FieldParse, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_fare_is_read_then_filtered() {
        let text = format!(
            "{HEADER}\n\
             18/12/2019,ZQN,10:20 AM,WLG,6:10 PM,7h 50m,(1 stop),,,Air New Zealand,-5\n\
             18/12/2019,ZQN,10:20 AM,WLG,6:10 PM,7h 50m,(1 stop),,,Air New Zealand,422\n"
        );
        let records: Vec<_> = reader(&text).map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].fare, -5.0);

        let kept = crate::filter::filter_outliers(records, &crate::filter::FareRange::default());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].fare, 422.0);
    }

    #[test]
    fn test_non_finite_fares_rejected() {
        for fare in ["NaN", "inf", "-inf"] {
            let text = format!(
                "{HEADER}\n18/12/2019,ZQN,10:20 AM,WLG,6:10 PM,7h 50m,(1 stop),,,Air New Zealand,{fare}\n"
            );
            let first = reader(&text).next().unwrap();
            assert!(matches!(first, Err(FareError::FieldParse { .. })), "{fare}");
        }
    }

    #[test]
    fn test_custom_delimiter() {
        let text = "h1;h2;h3;h4;h5;h6;h7;h8;h9;h10;h11\n18/12/2019;ZQN;10:20 AM;WLG;6:10 PM;7h 50m;(1 stop);;;Air New Zealand;422\n";
        let mut it = RecordReader::from_reader(text.as_bytes(), b';', "semi").unwrap();
        let rec = it.next().unwrap().unwrap();
        assert_eq!(rec.arrival_airport, "WLG");
        assert_eq!(rec.fare, 422.0);
    }

    #[test]
    fn test_read_all_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        writeln!(
            file,
            "18/12/2019,ZQN,10:20 AM,WLG,6:10 PM,7h 50m,(1 stop),,,Air New Zealand,422"
        )
        .unwrap();
        file.flush().unwrap();

        let records = read_all(file.path(), b',').unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_all("/definitely/not/here.csv", b',').unwrap_err();
        match err {
            FareError::Io { path, .. } => assert!(path.contains("here.csv")),
            other => panic!("expected Io, got {other:?}"),
        }
    }

    #[test]
    fn test_header_check() {
        let good = StringRecord::from(HEADER.split(',').collect::<Vec<_>>());
        assert!(header_matches(&good));
        let bad = StringRecord::from(vec!["a", "b"]);
        assert!(!header_matches(&bad));
    }

    #[test]
    fn test_parse_line_with_and_without_fare() {
        let line = "18/12/2019,ZQN,10:20 AM,WLG,6:10 PM,7h 50m,(1 stop),4h 50m in AKL,,Air New Zealand";
        let (rec, has_fare) = parse_line(line, b',').unwrap();
        assert!(!has_fare);
        assert_eq!(rec.transit, "4h 50m in AKL");
        assert_eq!(rec.airline, "Air New Zealand");

        let (rec, has_fare) = parse_line(&format!("{line},422"), b',').unwrap();
        assert!(has_fare);
        assert_eq!(rec.fare, 422.0);
    }

    #[test]
    fn test_parse_line_errors() {
        assert!(matches!(
            parse_line("a,b,c", b','),
            Err(FareError::MalformedRow { got: 3, .. })
        ));
        assert!(matches!(
            parse_line("1,2,3,4,5,6,7,8,9,10,NaN", b','),
            Err(FareError::FieldParse { .. })
        ));
        let (rec, has_fare) = parse_line("1,2,3,4,5,6,7,8,9,10,-5", b',').unwrap();
        assert!(has_fare);
        assert_eq!(rec.fare, -5.0);
    }
}
