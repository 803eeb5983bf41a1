// Minestat Testdata - Dataset persistence
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Saving and loading generated reading sets as JSON fixtures.

use minestat::Reading;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write readings to a pretty-printed JSON file.
pub fn save_readings(path: impl AsRef<Path>, readings: &[Reading]) -> Result<(), DatasetError> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, readings)?;
    Ok(())
}

/// Load readings from a JSON file produced by [`save_readings`].
pub fn load_readings(path: impl AsRef<Path>) -> Result<Vec<Reading>, DatasetError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let readings = serde_json::from_reader(reader)?;
    Ok(readings)
}
