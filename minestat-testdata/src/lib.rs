// Minestat Testdata - Realistic production dataset generator
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # Minestat Testdata
//!
//! Synthetic daily production series for the minestat ecosystem.
//!
//! Generated series combine:
//!
//! - **Calendar structure**: Day-of-week and monthly seasonal factors
//! - **Long-term trend**: Slow linear growth per mine
//! - **Bounded noise**: Pseudo-normal factor in [0.7, 1.3]
//! - **Anomaly injection**: Labeled spikes and dips at a per-mine rate
//!
//! ## Quick Start
//!
//! ```rust
//! use minestat::{classify, ingest, DetectionPolicy};
//! use minestat_testdata::{generate, GeneratorConfig};
//!
//! let config = GeneratorConfig::new().with_num_days(90).with_seed(42);
//! let readings = generate(&config);
//!
//! let series = ingest(&readings).unwrap();
//! let records = classify(&series, &DetectionPolicy::default()).unwrap();
//! assert_eq!(records.len(), readings.len());
//! ```

pub mod dataset;
pub mod generator;
pub mod profiles;

pub use dataset::{load_readings, save_readings, DatasetError};
pub use generator::{generate, GeneratorConfig};
pub use profiles::{day_factor, standard_mines, MineProfile, MONTHLY_FACTORS};
