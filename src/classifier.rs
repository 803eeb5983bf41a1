// Minestat - Mine production statistics and anomaly detection
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Multi-method anomaly classification.
//!
//! Three independent tests (IQR fences, z-score, moving-average deviation)
//! are evaluated against a reading and its window metrics. Under the
//! ensemble method the tests are checked in fixed priority order
//! IQR -> z-score -> moving average and only the first hit is reported.

use crate::policy::{DetectionMethod, DetectionPolicy};
use crate::window::{WindowMetrics, STD_EPSILON};
use serde::{Deserialize, Serialize};

/// Minimum available window samples before any statistical verdict is
/// trusted. Below this the classifier always reports insufficient data.
pub const MIN_DETECTION_SAMPLES: usize = 7;

/// Moving-average deviation threshold (%) when the active method is
/// exactly MovingAvg.
const MA_THRESHOLD_STRICT: f64 = 30.0;
/// Moving-average deviation threshold (%) on every other path, including
/// the ensemble.
const MA_THRESHOLD_LOOSE: f64 = 50.0;

/// Which test produced the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerMethod {
    #[serde(rename = "iqr")]
    Iqr,
    #[serde(rename = "zscore")]
    ZScore,
    #[serde(rename = "movingavg")]
    MovingAvg,
    /// No test fired; the reading is within normal range.
    #[serde(rename = "none")]
    None,
    /// Window too short for any statistical call. Not an anomaly.
    #[serde(rename = "insufficient_data")]
    InsufficientData,
}

impl TriggerMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerMethod::Iqr => "iqr",
            TriggerMethod::ZScore => "zscore",
            TriggerMethod::MovingAvg => "movingavg",
            TriggerMethod::None => "none",
            TriggerMethod::InsufficientData => "insufficient_data",
        }
    }
}

/// Raw threshold values the classifier evaluated, kept for audit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ThresholdsUsed {
    /// Lower IQR fence: Q1 - m*IQR.
    pub iqr_lower: f64,
    /// Upper IQR fence: Q3 + m*IQR.
    pub iqr_upper: f64,
    /// Z-score threshold.
    pub z_threshold: f64,
    /// Moving-average deviation threshold in percent.
    pub ma_threshold_pct: f64,
}

/// Anomaly decision for one reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyVerdict {
    /// Whether any considered test fired.
    pub is_anomaly: bool,
    /// The test that fired, or None / InsufficientData.
    pub method: TriggerMethod,
    /// Human-readable rationale embedding the computed bounds/score.
    pub reason: String,
    /// Threshold values in effect when the verdict was made.
    pub thresholds: ThresholdsUsed,
}

impl AnomalyVerdict {
    fn insufficient_data(thresholds: ThresholdsUsed) -> Self {
        Self {
            is_anomaly: false,
            method: TriggerMethod::InsufficientData,
            reason: "Insufficient data for detection".to_string(),
            thresholds,
        }
    }

    fn normal(thresholds: ThresholdsUsed) -> Self {
        Self {
            is_anomaly: false,
            method: TriggerMethod::None,
            reason: "Within normal range".to_string(),
            thresholds,
        }
    }
}

/// Signed percentage deviation of `value` from the moving average
/// (negative for dips), or `None` when the average is too close to zero
/// for the ratio to mean anything. The detection test applies `abs`.
pub fn percent_from_moving_avg(value: f64, moving_avg: f64) -> Option<f64> {
    if moving_avg.abs() <= STD_EPSILON {
        return None;
    }
    Some((value - moving_avg) / moving_avg * 100.0)
}

/// Classify one reading against its window metrics under the given policy.
pub fn classify(value: f64, metrics: &WindowMetrics, policy: &DetectionPolicy) -> AnomalyVerdict {
    let ma_threshold = if policy.method == DetectionMethod::MovingAvg {
        MA_THRESHOLD_STRICT
    } else {
        MA_THRESHOLD_LOOSE
    };

    let iqr_lower = metrics.quartiles.q1 - policy.iqr_multiplier * metrics.quartiles.iqr;
    let iqr_upper = metrics.quartiles.q3 + policy.iqr_multiplier * metrics.quartiles.iqr;

    let thresholds = ThresholdsUsed {
        iqr_lower,
        iqr_upper,
        z_threshold: policy.z_threshold,
        ma_threshold_pct: ma_threshold,
    };

    if metrics.available < MIN_DETECTION_SAMPLES {
        return AnomalyVerdict::insufficient_data(thresholds);
    }

    let iqr_hit = value < iqr_lower || value > iqr_upper;
    let z_hit = metrics.z_score.abs() > policy.z_threshold;
    let percent_dev = percent_from_moving_avg(value, metrics.moving_avg);
    let ma_hit = percent_dev.map(|p| p.abs() > ma_threshold).unwrap_or(false);

    let iqr_verdict = || AnomalyVerdict {
        is_anomaly: true,
        method: TriggerMethod::Iqr,
        reason: format!("Outside IQR range ({:.0} - {:.0})", iqr_lower, iqr_upper),
        thresholds: thresholds.clone(),
    };
    let z_verdict = || AnomalyVerdict {
        is_anomaly: true,
        method: TriggerMethod::ZScore,
        reason: format!(
            "Z-Score {} threshold (|{:.2}| > {})",
            if metrics.z_score > 0.0 { "above" } else { "below" },
            metrics.z_score,
            policy.z_threshold
        ),
        thresholds: thresholds.clone(),
    };
    let ma_verdict = || AnomalyVerdict {
        is_anomaly: true,
        method: TriggerMethod::MovingAvg,
        reason: format!(
            "Deviation from moving average ({:.1}% > {}%)",
            percent_dev.map(f64::abs).unwrap_or(0.0),
            ma_threshold
        ),
        thresholds: thresholds.clone(),
    };

    match policy.method {
        DetectionMethod::All => {
            if iqr_hit {
                iqr_verdict()
            } else if z_hit {
                z_verdict()
            } else if ma_hit {
                ma_verdict()
            } else {
                AnomalyVerdict::normal(thresholds)
            }
        }
        DetectionMethod::Iqr if iqr_hit => iqr_verdict(),
        DetectionMethod::ZScore if z_hit => z_verdict(),
        DetectionMethod::MovingAvg if ma_hit => ma_verdict(),
        _ => AnomalyVerdict::normal(thresholds),
    }
}
