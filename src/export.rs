// Minestat - Mine production statistics and anomaly detection
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Export projection of enriched records.
//!
//! The projection carries a fixed set of columns in a stable order so
//! downstream consumers can rely on the layout across releases:
//! mine, date, production, moving average, median, IQR, standard
//! deviation, z-score, outlier flag, classification, detection method.

use crate::error::Result;
use crate::processor::EnrichedRecord;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// One exported row. Field order matches the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub mine: String,
    pub date: String,
    pub production: u32,
    pub moving_avg: f64,
    pub median: f64,
    pub iqr: f64,
    pub std_dev: f64,
    pub z_score: f64,
    pub is_outlier: bool,
    pub classification: String,
    pub detection_method: String,
}

const CSV_HEADER: &str =
    "mine,date,production,moving_avg,median,iqr,std_dev,z_score,is_outlier,classification,detection_method";

/// Project enriched records into export rows, preserving record order.
pub fn project(records: &[EnrichedRecord]) -> Vec<ExportRow> {
    records
        .iter()
        .map(|r| ExportRow {
            mine: r.reading.mine.clone(),
            date: r.reading.date.format("%Y-%m-%d").to_string(),
            production: r.reading.production,
            moving_avg: r.metrics.moving_avg,
            median: r.metrics.median,
            iqr: r.metrics.quartiles.iqr,
            std_dev: r.metrics.std_dev,
            z_score: r.metrics.z_score,
            is_outlier: r.outlier,
            classification: r.classification.label(),
            detection_method: r.verdict.method.as_str().to_string(),
        })
        .collect()
}

/// Quote a CSV field when it contains a delimiter, quote or newline.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Write the projection as CSV.
pub fn write_csv<W: Write>(writer: &mut W, records: &[EnrichedRecord]) -> Result<()> {
    writeln!(writer, "{}", CSV_HEADER)?;
    for row in project(records) {
        writeln!(
            writer,
            "{},{},{},{:.2},{:.2},{:.2},{:.2},{:.2},{},{},{}",
            csv_field(&row.mine),
            row.date,
            row.production,
            row.moving_avg,
            row.median,
            row.iqr,
            row.std_dev,
            row.z_score,
            row.is_outlier,
            csv_field(&row.classification),
            row.detection_method,
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the projection as pretty-printed JSON.
pub fn write_json<W: Write>(writer: W, records: &[EnrichedRecord]) -> Result<()> {
    serde_json::to_writer_pretty(writer, &project(records))?;
    Ok(())
}

/// Export to a CSV file.
pub fn to_csv_file(path: impl AsRef<Path>, records: &[EnrichedRecord]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_csv(&mut writer, records)
}

/// Export to a JSON file.
pub fn to_json_file(path: impl AsRef<Path>, records: &[EnrichedRecord]) -> Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    write_json(writer, records)
}
