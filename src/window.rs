// Minestat - Mine production statistics and anomaly detection
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Trailing-window rolling statistics.

use crate::quartiles::Quartiles;
use serde::{Deserialize, Serialize};

/// Standard deviations below this are treated as zero spread; the z-score
/// is forced to 0 instead of blowing up on near-constant windows.
pub const STD_EPSILON: f64 = 1e-4;

/// Rolling statistics for one reading against its trailing window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowMetrics {
    /// Samples actually available (<= configured window size; grows from 1
    /// at the start of a series).
    pub available: usize,
    /// Moving average over the window.
    pub moving_avg: f64,
    /// Window median (nearest rank).
    pub median: f64,
    /// Window quartiles.
    pub quartiles: Quartiles,
    /// Population standard deviation over the window.
    pub std_dev: f64,
    /// Z-score of the current value against the window; 0 when the spread
    /// is undefined or below [`STD_EPSILON`].
    pub z_score: f64,
    /// Window has not yet reached the configured size.
    pub is_early_data: bool,
    /// Window holds exactly the configured number of samples.
    pub is_full_window: bool,
}

/// Compute rolling statistics for `values[index]` over the trailing window
/// of up to `window_size` samples ending at and including `index`.
///
/// With fewer than 2 available samples every dispersion metric is zero and
/// the current value stands in for its own mean and median.
///
/// # Panics
///
/// Panics if `index` is out of bounds (caller iterates indices of the same
/// slice, so this is unreachable from the pipeline).
pub fn compute(values: &[f64], index: usize, window_size: usize) -> WindowMetrics {
    let start = index.saturating_sub(window_size.saturating_sub(1));
    let window = &values[start..=index];
    let available = window.len();
    let current = values[index];

    if available < 2 {
        return WindowMetrics {
            available,
            moving_avg: current,
            median: current,
            quartiles: Quartiles {
                q1: current,
                median: current,
                q3: current,
                iqr: 0.0,
            },
            std_dev: 0.0,
            z_score: 0.0,
            is_early_data: true,
            is_full_window: available >= window_size,
        };
    }

    let n = available as f64;
    let mean = window.iter().sum::<f64>() / n;
    let variance = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    let z_score = if std_dev > STD_EPSILON {
        (current - mean) / std_dev
    } else {
        0.0
    };

    // Window is non-empty, so quartiles always exist here.
    let quartiles = Quartiles::nearest_rank(window).unwrap_or_default();

    WindowMetrics {
        available,
        moving_avg: mean,
        median: quartiles.median,
        quartiles,
        std_dev,
        z_score,
        is_early_data: available < window_size,
        is_full_window: available >= window_size,
    }
}
