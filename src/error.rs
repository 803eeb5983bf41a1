//! Error types for Minestat
//!
//! Insufficient window data and degenerate statistics are *states*, not
//! errors: they surface as `TriggerMethod::InsufficientData` verdicts and
//! `Option<f64>` summary fields. Only precondition violations (bad input,
//! bad policy) and export I/O reach this module.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias for Minestat operations
pub type Result<T> = std::result::Result<T, MinestatError>;

/// Main error type for Minestat operations
#[derive(Error, Debug)]
pub enum MinestatError {
    /// Ingestion error
    #[error("Ingest error: {0}")]
    Ingest(#[from] IngestError),

    /// Detection policy rejected at validation
    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    /// Export I/O failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Export serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors while validating raw readings into per-mine series
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IngestError {
    /// No readings supplied at all
    #[error("Empty input: no readings to process")]
    Empty,

    /// Same calendar day appears twice for one mine
    #[error("Duplicate date {date} for mine {mine}")]
    DuplicateDate { mine: String, date: NaiveDate },

    /// Readings for a mine are not in date order
    #[error("Out-of-order date {date} for mine {mine}: expected after {previous}")]
    OutOfOrder {
        mine: String,
        date: NaiveDate,
        previous: NaiveDate,
    },
}
