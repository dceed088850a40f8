//! The fixed travel-record schema.
//!
//! A [`TravelRecord`] holds the ten feature fields of one observed trip as
//! strings plus the numeric fare label. Date, time and duration fields stay
//! opaque until a caller asks for the typed form through the accessor methods,
//! so a record can be one-hot encoded on any column without parsing it first.

use crate::error::{FareError, Result};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of fields in a CSV row: ten features plus the fare.
pub const COLUMN_COUNT: usize = 11;

/// Header name of the label column.
pub const FARE_HEADER: &str = "AirFare";

/// `dd/MM/yyyy`
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// `h:mm tt`
pub const TIME_FORMAT: &str = "%I:%M %p";

/// Feature columns of the schema, in CSV order.
///
/// Serializes as its header name and deserializes through [`FromStr`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Column {
    TravelDate,
    DepartureAirport,
    DepartureTime,
    ArrivalAirport,
    ArrivalTime,
    Duration,
    Direct,
    Transit,
    Baggage,
    Airline,
}

impl Column {
    /// All feature columns in schema order.
    pub const ALL: [Column; 10] = [
        Column::TravelDate,
        Column::DepartureAirport,
        Column::DepartureTime,
        Column::ArrivalAirport,
        Column::ArrivalTime,
        Column::Duration,
        Column::Direct,
        Column::Transit,
        Column::Baggage,
        Column::Airline,
    ];

    /// Columns one-hot encoded when no configuration says otherwise.
    pub const DEFAULT_ENCODED: [Column; 3] = [
        Column::DepartureAirport,
        Column::ArrivalAirport,
        Column::Airline,
    ];

    /// Header name as it appears in the CSV file.
    pub fn header_name(self) -> &'static str {
        match self {
            Column::TravelDate => "TravelDate",
            Column::DepartureAirport => "DepartureAirport",
            Column::DepartureTime => "DepartureTime",
            Column::ArrivalAirport => "ArrivalAirport",
            Column::ArrivalTime => "ArrivalTime",
            Column::Duration => "Duration",
            Column::Direct => "Direct",
            Column::Transit => "Transit",
            Column::Baggage => "Baggage",
            Column::Airline => "Airline",
        }
    }

    /// Zero-based field position in a CSV row.
    pub fn position(self) -> usize {
        self as usize
    }

    /// Header names of a column list, for error messages.
    pub fn names(columns: &[Column]) -> Vec<String> {
        columns.iter().map(|c| c.header_name().to_string()).collect()
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header_name())
    }
}

impl From<Column> for String {
    fn from(column: Column) -> Self {
        column.header_name().to_string()
    }
}

impl TryFrom<String> for Column {
    type Error = FareError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl FromStr for Column {
    type Err = FareError;

    /// Accepts header names case-insensitively, and snake_case names.
    fn from_str(s: &str) -> Result<Self> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        Column::ALL
            .into_iter()
            .find(|c| c.header_name().to_lowercase() == wanted)
            .ok_or_else(|| FareError::InvalidConfig(format!("unknown column name {s:?}")))
    }
}

/// One observed trip.
#[derive(Clone, Debug, PartialEq)]
pub struct TravelRecord {
    pub travel_date: String,
    pub departure_airport: String,
    pub departure_time: String,
    pub arrival_airport: String,
    pub arrival_time: String,
    pub duration: String,
    pub direct: String,
    pub transit: String,
    pub baggage: String,
    pub airline: String,
    pub fare: f64,
}

impl TravelRecord {
    /// Builds a record from the ten feature fields in schema order and a fare.
    pub fn from_fields(fields: [&str; 10], fare: f64) -> Self {
        let [
            travel_date,
            departure_airport,
            departure_time,
            arrival_airport,
            arrival_time,
            duration,
            direct,
            transit,
            baggage,
            airline,
        ] = fields.map(str::to_string);
        Self {
            travel_date,
            departure_airport,
            departure_time,
            arrival_airport,
            arrival_time,
            duration,
            direct,
            transit,
            baggage,
            airline,
            fare,
        }
    }

    /// Raw string value of a feature column.
    pub fn value(&self, column: Column) -> &str {
        match column {
            Column::TravelDate => &self.travel_date,
            Column::DepartureAirport => &self.departure_airport,
            Column::DepartureTime => &self.departure_time,
            Column::ArrivalAirport => &self.arrival_airport,
            Column::ArrivalTime => &self.arrival_time,
            Column::Duration => &self.duration,
            Column::Direct => &self.direct,
            Column::Transit => &self.transit,
            Column::Baggage => &self.baggage,
            Column::Airline => &self.airline,
        }
    }

    /// Travel date parsed from `dd/MM/yyyy`.
    pub fn travel_date(&self) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(self.travel_date.trim(), DATE_FORMAT)
            .map_err(|e| self.field_error(Column::TravelDate, e.to_string()))
    }

    /// Departure time parsed from `h:mm tt`.
    pub fn departure_time(&self) -> Result<NaiveTime> {
        parse_clock(&self.departure_time)
            .map_err(|e| self.field_error(Column::DepartureTime, e))
    }

    /// Arrival time parsed from `h:mm tt`.
    pub fn arrival_time(&self) -> Result<NaiveTime> {
        parse_clock(&self.arrival_time).map_err(|e| self.field_error(Column::ArrivalTime, e))
    }

    /// Elapsed trip time in minutes, parsed from `<h>h <mm>m`.
    pub fn duration_minutes(&self) -> Result<u32> {
        parse_duration_minutes(&self.duration).map_err(|e| self.field_error(Column::Duration, e))
    }

    fn field_error(&self, column: Column, reason: String) -> FareError {
        FareError::FieldParse {
            source_name: "record".to_string(),
            line: 0,
            column: column.header_name().to_string(),
            value: self.value(column).to_string(),
            reason,
        }
    }
}

fn parse_clock(raw: &str) -> std::result::Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw.trim(), TIME_FORMAT).map_err(|e| e.to_string())
}

/// Parses `"7h 50m"`, `"2h"`, `"45m"` (whitespace optional) into minutes.
pub fn parse_duration_minutes(raw: &str) -> std::result::Result<u32, String> {
    let text = raw.trim();
    if text.is_empty() {
        return Err("empty duration".to_string());
    }

    let mut hours: Option<u32> = None;
    let mut minutes: Option<u32> = None;
    let mut digits = String::new();
    for ch in text.chars() {
        match ch {
            '0'..='9' => digits.push(ch),
            'h' | 'H' | 'm' | 'M' => {
                if digits.is_empty() {
                    return Err(format!("missing number before '{ch}'"));
                }
                let n: u32 = digits.parse().map_err(|e| format!("{e}"))?;
                digits.clear();
                let slot = if ch.eq_ignore_ascii_case(&'h') {
                    &mut hours
                } else {
                    &mut minutes
                };
                if slot.replace(n).is_some() {
                    return Err(format!("repeated '{ch}' component"));
                }
            }
            c if c.is_whitespace() => {
                if !digits.is_empty() {
                    return Err("number without unit".to_string());
                }
            }
            other => return Err(format!("unexpected character {other:?}")),
        }
    }
    if !digits.is_empty() {
        return Err("number without unit".to_string());
    }
    if hours.is_some() && minutes.map_or(false, |m| m >= 60) {
        return Err("minutes component must be below 60".to_string());
    }
    Ok(hours.unwrap_or(0) * 60 + minutes.unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TravelRecord {
        TravelRecord::from_fields(
            [
                "18/12/2019",
                "ZQN",
                "10:20 AM",
                "WLG",
                "6:10 PM",
                "7h 50m",
                "(1 stop)",
                "4h 50m in AKL",
                "",
                "Air New Zealand",
            ],
            422.0,
        )
    }

    #[test]
    fn test_value_by_column() {
        let r = sample();
        assert_eq!(r.value(Column::DepartureAirport), "ZQN");
        assert_eq!(r.value(Column::ArrivalAirport), "WLG");
        assert_eq!(r.value(Column::Baggage), "");
        assert_eq!(r.value(Column::Airline), "Air New Zealand");
    }

    #[test]
    fn test_column_positions_follow_schema() {
        for (i, c) in Column::ALL.iter().enumerate() {
            assert_eq!(c.position(), i);
        }
        assert_eq!(Column::ALL.len() + 1, COLUMN_COUNT);
    }

    #[test]
    fn test_column_from_str() {
        assert_eq!("Airline".parse::<Column>().unwrap(), Column::Airline);
        assert_eq!("departure_airport".parse::<Column>().unwrap(), Column::DepartureAirport);
        assert_eq!("ARRIVALTIME".parse::<Column>().unwrap(), Column::ArrivalTime);
        assert!("AirFare".parse::<Column>().is_err());
    }

    #[test]
    fn test_typed_accessors() {
        let r = sample();
        assert_eq!(r.travel_date().unwrap(), NaiveDate::from_ymd_opt(2019, 12, 18).unwrap());
        assert_eq!(r.departure_time().unwrap(), NaiveTime::from_hms_opt(10, 20, 0).unwrap());
        assert_eq!(r.arrival_time().unwrap(), NaiveTime::from_hms_opt(18, 10, 0).unwrap());
        assert_eq!(r.duration_minutes().unwrap(), 470);
    }

    #[test]
    fn test_single_digit_hour() {
        let mut r = sample();
        r.departure_time = "9:35 AM".to_string();
        assert_eq!(r.departure_time().unwrap(), NaiveTime::from_hms_opt(9, 35, 0).unwrap());
    }

    #[test]
    fn test_bad_date_reports_column() {
        let mut r = sample();
        r.travel_date = "2019-12-18".to_string();
        match r.travel_date() {
            Err(FareError::FieldParse { column, value, .. }) => {
                assert_eq!(column, "TravelDate");
                assert_eq!(value, "2019-12-18");
            }
            other => panic!("expected FieldParse, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_duration_forms() {
        assert_eq!(parse_duration_minutes("8h 35m"), Ok(515));
        assert_eq!(parse_duration_minutes("2h"), Ok(120));
        assert_eq!(parse_duration_minutes("45m"), Ok(45));
        assert_eq!(parse_duration_minutes("1h05m"), Ok(65));
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert!(parse_duration_minutes("").is_err());
        assert!(parse_duration_minutes("7 50").is_err());
        assert!(parse_duration_minutes("h 50m").is_err());
        assert!(parse_duration_minutes("1h 2h").is_err());
        assert!(parse_duration_minutes("1h 75m").is_err());
        assert!(parse_duration_minutes("7h50x").is_err());
    }

    #[test]
    fn test_column_serde_uses_header_names() {
        assert_eq!(
            serde_json::to_string(&Column::DepartureAirport).unwrap(),
            "\"DepartureAirport\""
        );
        let cols: Vec<Column> = serde_json::from_str(r#"["arrival_airport", "AIRLINE"]"#).unwrap();
        assert_eq!(cols, vec![Column::ArrivalAirport, Column::Airline]);
        assert!(serde_json::from_str::<Column>("\"Fare\"").is_err());
    }
}
