//! CSV parsing into passenger records.
//!
//! Header names are normalized once here (trimmed and lower-cased), so the
//! rest of the application never has to care whether the source says
//! `Pclass` or `pclass`.

use super::error::{DatasetError, Result};
use crate::models::{Passenger, PassengerClass, Sex};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Positions of the required columns within a record.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    passenger_id: usize,
    survived: usize,
    class: usize,
    sex: usize,
    age: usize,
    siblings_spouses: usize,
    parents_children: usize,
    fare: usize,
    name: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let positions: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (normalize_header(h), i))
            .collect();

        let find = |name: &str| {
            positions
                .get(name)
                .copied()
                .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            passenger_id: find("passengerid")?,
            survived: find("survived")?,
            class: find("pclass")?,
            sex: find("sex")?,
            age: find("age")?,
            siblings_spouses: find("sibsp")?,
            parents_children: find("parch")?,
            fare: find("fare")?,
            name: find("name")?,
        })
    }
}

/// Normalize a header name: trim whitespace (and a stray BOM) and lower-case.
pub fn normalize_header(header: &str) -> String {
    header.trim().trim_start_matches('\u{feff}').to_lowercase()
}

/// Parse CSV text into passenger records.
///
/// Missing or unparseable `age`, `fare`, `sibsp` and `parch` values become
/// `None`. Identity columns (`passengerid`, `survived`, `pclass`, `sex`)
/// must be valid; the first bad value aborts the parse.
pub fn parse_passengers(text: &str) -> Result<Vec<Passenger>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let index = ColumnIndex::from_headers(&headers)?;
    debug!("Dataset columns: {:?}", headers.iter().collect::<Vec<_>>());

    let mut passengers = Vec::new();
    let mut seen_ids = HashSet::new();

    for (i, record) in reader.records().enumerate() {
        let record = record?;
        // Row numbers are 1-based and count the header line.
        let passenger = parse_record(&record, &index, i + 2)?;

        if !seen_ids.insert(passenger.passenger_id) {
            return Err(DatasetError::DuplicateId(passenger.passenger_id));
        }

        passengers.push(passenger);
    }

    if passengers.is_empty() {
        return Err(DatasetError::Empty);
    }

    debug!("Parsed {} passenger records", passengers.len());
    Ok(passengers)
}

fn parse_record(record: &StringRecord, index: &ColumnIndex, row: usize) -> Result<Passenger> {
    let field = |i: usize| record.get(i).unwrap_or("");

    let invalid = |column: &str, value: &str| DatasetError::InvalidValue {
        row,
        column: column.to_string(),
        value: value.to_string(),
    };

    let raw_id = field(index.passenger_id);
    let passenger_id = raw_id
        .parse::<u32>()
        .map_err(|_| invalid("passengerid", raw_id))?;

    let raw_survived = field(index.survived);
    let survived = parse_flag(raw_survived)
        .ok_or_else(|| invalid("survived", raw_survived))?;

    let raw_class = field(index.class);
    let class = raw_class
        .parse::<u8>()
        .ok()
        .and_then(PassengerClass::from_number)
        .ok_or_else(|| invalid("pclass", raw_class))?;

    let raw_sex = field(index.sex);
    let sex = Sex::parse(raw_sex).ok_or_else(|| invalid("sex", raw_sex))?;

    Ok(Passenger {
        passenger_id,
        survived,
        class,
        sex,
        age: parse_non_negative(field(index.age)),
        siblings_spouses: field(index.siblings_spouses).parse().ok(),
        parents_children: field(index.parents_children).parse().ok(),
        fare: parse_non_negative(field(index.fare)),
        name: field(index.name).to_string(),
    })
}

fn parse_flag(s: &str) -> Option<bool> {
    match s {
        "0" => Some(false),
        "1" => Some(true),
        _ => match s.to_lowercase().as_str() {
            "false" => Some(false),
            "true" => Some(true),
            _ => None,
        },
    }
}

fn parse_non_negative(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0)
}
