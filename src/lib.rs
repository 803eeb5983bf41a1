//! # Minestat - Mine Production Statistics & Anomaly Detection
//!
//! Rolling statistics and multi-method anomaly detection for daily mine
//! production series.
//!
//! ## Key Features
//!
//! - **Trailing-Window Metrics**: Moving average, median, quartiles,
//!   population standard deviation and z-score per reading
//! - **Multi-Method Detection**: Z-score, Tukey/IQR fences, moving-average
//!   deviation, or an ensemble of all three
//! - **Label Fusion**: Statistical verdicts fused with ground-truth labels
//!   into a five-way classification
//! - **Deterministic**: Pure full recompute; identical input and policy
//!   always yield identical output
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use minestat::{classify, ingest, DetectionMethod, DetectionPolicy, Reading};
//!
//! let readings: Vec<Reading> = (0..8)
//!     .map(|i| {
//!         let date = NaiveDate::from_ymd_opt(2024, 1, i + 1).unwrap();
//!         let production = if i == 7 { 500 } else { 100 };
//!         Reading::new("North Pit", date, production)
//!     })
//!     .collect();
//!
//! let series = ingest(&readings).unwrap();
//! let policy = DetectionPolicy::default()
//!     .with_method(DetectionMethod::All)
//!     .with_z_threshold(2.0);
//! let records = classify(&series, &policy).unwrap();
//!
//! assert!(records[7].outlier);
//! ```
//!
//! ## Modules
//!
//! - [`reading`]: Input readings and validated per-mine series
//! - [`quartiles`]: Nearest-rank quartile extraction
//! - [`window`]: Trailing-window rolling statistics
//! - [`policy`]: Detection policy configuration
//! - [`classifier`]: Anomaly detection methods and verdicts
//! - [`processor`]: Series processing and label fusion
//! - [`summary`]: Per-mine and overall aggregate statistics
//! - [`chart`]: Weekly buckets, daily slices and trendline fitting
//! - [`export`]: Stable CSV/JSON projection

// Modules
pub mod chart;
pub mod classifier;
pub mod error;
pub mod export;
pub mod policy;
pub mod processor;
pub mod quartiles;
pub mod reading;
pub mod summary;
pub mod window;

// Re-exports for convenient access
pub use chart::{daily_series, linear_trend, weekly_buckets, DailyPoint, WeeklyBucket};
pub use classifier::{AnomalyVerdict, ThresholdsUsed, TriggerMethod, MIN_DETECTION_SAMPLES};
pub use error::{IngestError, MinestatError, Result};
pub use export::ExportRow;
pub use policy::{DetectionMethod, DetectionPolicy};
pub use processor::{classify, AnomalyClassification, EnrichedRecord, MineBaseline};
pub use quartiles::Quartiles;
pub use reading::{ingest, GroundTruthLabel, MineSeries, RawSeries, Reading, Severity};
pub use summary::{EntitySummary, OverallSummary};
pub use window::{WindowMetrics, STD_EPSILON};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
