// Minestat - Mine production statistics and anomaly detection
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Detection policy configuration.
//!
//! The policy is the only externally tunable surface. It is replaced
//! wholesale on change; any change triggers a full re-derivation of all
//! enriched records (there is no incremental update path).

use crate::error::{MinestatError, Result};
use serde::{Deserialize, Serialize};

/// Detection method selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMethod {
    /// Z-score of the current value against its trailing window.
    ZScore,
    /// Tukey fences: value outside [Q1 - m*IQR, Q3 + m*IQR].
    Iqr,
    /// Percentage deviation from the trailing moving average.
    MovingAvg,
    /// Ensemble: evaluate IQR, then z-score, then moving average,
    /// reporting the first test that fires.
    All,
}

impl DetectionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionMethod::ZScore => "zscore",
            DetectionMethod::Iqr => "iqr",
            DetectionMethod::MovingAvg => "movingavg",
            DetectionMethod::All => "all",
        }
    }
}

/// Anomaly detection policy.
///
/// Process-wide configuration value. Classification depends on nothing
/// else that is tunable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionPolicy {
    /// Active detection method.
    pub method: DetectionMethod,

    /// Z-score threshold (|z| above this fires the z-score test).
    pub z_threshold: f64,

    /// Trailing window size in samples (days).
    pub window_size: usize,

    /// IQR fence multiplier.
    pub iqr_multiplier: f64,
}

impl Default for DetectionPolicy {
    fn default() -> Self {
        Self {
            method: DetectionMethod::ZScore,
            z_threshold: 2.5,
            window_size: 7,
            iqr_multiplier: 1.5,
        }
    }
}

impl DetectionPolicy {
    /// Create the default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the detection method.
    pub fn with_method(mut self, method: DetectionMethod) -> Self {
        self.method = method;
        self
    }

    /// Set the z-score threshold.
    pub fn with_z_threshold(mut self, threshold: f64) -> Self {
        self.z_threshold = threshold;
        self
    }

    /// Set the trailing window size.
    pub fn with_window_size(mut self, size: usize) -> Self {
        self.window_size = size;
        self
    }

    /// Set the IQR fence multiplier.
    pub fn with_iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = multiplier;
        self
    }

    /// Validate the policy fields.
    ///
    /// Rejects non-finite or non-positive thresholds and windows smaller
    /// than 2 samples (a window of 1 has no spread to measure).
    pub fn validate(&self) -> Result<()> {
        if !self.z_threshold.is_finite() || self.z_threshold <= 0.0 {
            return Err(MinestatError::InvalidPolicy(format!(
                "z_threshold must be a positive finite number, got {}",
                self.z_threshold
            )));
        }
        if self.window_size < 2 {
            return Err(MinestatError::InvalidPolicy(format!(
                "window_size must be at least 2, got {}",
                self.window_size
            )));
        }
        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier <= 0.0 {
            return Err(MinestatError::InvalidPolicy(format!(
                "iqr_multiplier must be a positive finite number, got {}",
                self.iqr_multiplier
            )));
        }
        Ok(())
    }
}
