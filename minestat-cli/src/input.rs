// Minestat CLI - CSV input
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Loading readings from CSV files.
//!
//! Expected columns: `mine,date,production` with optional
//! `anomaly_type,anomaly_severity` columns carrying ground-truth labels.

use chrono::NaiveDate;
use minestat::{Reading, Severity};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("unknown severity '{0}' (expected low, medium or high)")]
    UnknownSeverity(String),
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    mine: String,
    date: NaiveDate,
    production: u32,
    #[serde(default)]
    anomaly_type: Option<String>,
    #[serde(default)]
    anomaly_severity: Option<String>,
}

fn parse_severity(raw: &str) -> Result<Severity, InputError> {
    match raw.to_lowercase().as_str() {
        "low" => Ok(Severity::Low),
        "medium" => Ok(Severity::Medium),
        "high" => Ok(Severity::High),
        other => Err(InputError::UnknownSeverity(other.to_string())),
    }
}

/// Load readings from a CSV file. Rows with a non-empty `anomaly_type`
/// become labeled readings; a missing severity defaults to low.
pub fn load_csv(path: impl AsRef<Path>) -> Result<Vec<Reading>, InputError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut readings = Vec::new();

    for row in reader.deserialize() {
        let row: CsvRow = row?;
        let mut reading = Reading::new(&row.mine, row.date, row.production);

        if let Some(kind) = row.anomaly_type.filter(|k| !k.is_empty()) {
            let severity = match row.anomaly_severity.as_deref().filter(|s| !s.is_empty()) {
                Some(raw) => parse_severity(raw)?,
                None => Severity::Low,
            };
            reading = reading.with_label(&kind, severity);
        }

        readings.push(reading);
    }

    Ok(readings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_plain_rows() {
        let file = write_csv(
            "mine,date,production\n\
             Mine A,2024-01-01,1200\n\
             Mine A,2024-01-02,1150\n",
        );
        let readings = load_csv(file.path()).unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].mine, "Mine A");
        assert_eq!(readings[0].production, 1200);
        assert!(readings[0].label.is_none());
    }

    #[test]
    fn test_load_labeled_rows() {
        let file = write_csv(
            "mine,date,production,anomaly_type,anomaly_severity\n\
             Mine A,2024-01-01,1200,,\n\
             Mine A,2024-01-02,2900,Major Production Spike,high\n",
        );
        let readings = load_csv(file.path()).unwrap();
        assert!(readings[0].label.is_none());
        let label = readings[1].label.as_ref().unwrap();
        assert_eq!(label.kind, "Major Production Spike");
        assert_eq!(label.severity, Severity::High);
    }

    #[test]
    fn test_unknown_severity_rejected() {
        let file = write_csv(
            "mine,date,production,anomaly_type,anomaly_severity\n\
             Mine A,2024-01-01,1200,Spike,catastrophic\n",
        );
        assert!(load_csv(file.path()).is_err());
    }
}
