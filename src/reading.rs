// Minestat - Mine production statistics and anomaly detection
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Input readings and validated per-mine series.
//!
//! `ingest` is the first half of the two-phase API: it groups raw readings
//! into per-mine series and enforces the input invariants (dates unique and
//! ascending per mine). The second half, [`crate::processor::classify`],
//! can then be re-run against the same series under different policies.

use crate::error::{IngestError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Severity of a ground-truth anomaly label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

/// Ground-truth anomaly label attached to a reading at the source.
///
/// Presence of the label means the reading was flagged as an anomaly
/// upstream; absence means no flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundTruthLabel {
    /// Free-text anomaly kind, e.g. "Major Production Spike".
    pub kind: String,
    /// Severity assigned at the source.
    pub severity: Severity,
}

/// One production measurement for one mine on one day. Immutable input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Mine identifier.
    pub mine: String,
    /// Calendar day of the measurement.
    pub date: NaiveDate,
    /// Production units. Non-negative by construction.
    pub production: u32,
    /// Ground-truth anomaly label, if the source flagged this reading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<GroundTruthLabel>,
}

impl Reading {
    /// Create an unlabeled reading.
    pub fn new(mine: &str, date: NaiveDate, production: u32) -> Self {
        Self {
            mine: mine.to_string(),
            date,
            production,
            label: None,
        }
    }

    /// Attach a ground-truth label.
    pub fn with_label(mut self, kind: &str, severity: Severity) -> Self {
        self.label = Some(GroundTruthLabel {
            kind: kind.to_string(),
            severity,
        });
        self
    }
}

/// Validated, date-ascending series of readings for one mine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MineSeries {
    /// Mine identifier.
    pub mine: String,
    /// Readings in ascending date order, unique dates.
    readings: Vec<Reading>,
}

impl MineSeries {
    /// Readings in chronological order.
    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    /// Production values in chronological order.
    pub fn values(&self) -> Vec<f64> {
        self.readings.iter().map(|r| r.production as f64).collect()
    }

    /// Number of readings.
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

/// All validated series, keyed by mine name.
///
/// A `BTreeMap` keeps mine iteration order stable so reprocessing the same
/// input always yields identical output.
pub type RawSeries = BTreeMap<String, MineSeries>;

/// Group raw readings into validated per-mine series.
///
/// Readings for each mine must arrive in ascending date order with no
/// duplicate days. Input order across mines is irrelevant.
pub fn ingest(readings: &[Reading]) -> Result<RawSeries> {
    if readings.is_empty() {
        return Err(IngestError::Empty.into());
    }

    let mut series: RawSeries = BTreeMap::new();

    for reading in readings {
        let entry = series
            .entry(reading.mine.clone())
            .or_insert_with(|| MineSeries {
                mine: reading.mine.clone(),
                readings: Vec::new(),
            });

        if let Some(last) = entry.readings.last() {
            if reading.date == last.date {
                return Err(IngestError::DuplicateDate {
                    mine: reading.mine.clone(),
                    date: reading.date,
                }
                .into());
            }
            if reading.date < last.date {
                return Err(IngestError::OutOfOrder {
                    mine: reading.mine.clone(),
                    date: reading.date,
                    previous: last.date,
                }
                .into());
            }
        }

        entry.readings.push(reading.clone());
    }

    log::debug!(
        "ingested {} readings across {} mines",
        readings.len(),
        series.len()
    );

    Ok(series)
}
