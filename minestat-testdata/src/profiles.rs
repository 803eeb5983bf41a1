// Minestat Testdata - Mine profiles
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Built-in mine production profiles and calendar factors.

use serde::{Deserialize, Serialize};

/// Production profile of a single simulated mine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MineProfile {
    /// Mine name used in generated readings.
    pub name: String,
    /// Baseline daily production in units.
    pub base: f64,
    /// Relative variability of the random factor (informational).
    pub variability: f64,
    /// Per-day linear growth factor.
    pub trend: f64,
    /// Probability of injecting an anomaly on any given day.
    pub anomaly_rate: f64,
}

impl MineProfile {
    pub fn new(name: &str, base: f64, variability: f64, trend: f64, anomaly_rate: f64) -> Self {
        Self {
            name: name.to_string(),
            base,
            variability,
            trend,
            anomaly_rate,
        }
    }
}

/// The six standard mine profiles.
pub fn standard_mines() -> Vec<MineProfile> {
    vec![
        MineProfile::new("Mine A", 1200.0, 0.3, 0.0008, 0.02),
        MineProfile::new("Mine B", 1100.0, 0.25, 0.0006, 0.018),
        MineProfile::new("Mine C", 1300.0, 0.35, 0.001, 0.015),
        MineProfile::new("Mine D", 900.0, 0.2, 0.0004, 0.01),
        MineProfile::new("Mine E", 1400.0, 0.4, 0.0012, 0.025),
        MineProfile::new("Mine F", 1000.0, 0.28, 0.0007, 0.03),
    ]
}

/// Monthly seasonal factors, January through December.
pub const MONTHLY_FACTORS: [f64; 12] = [
    1.1, 1.0, 1.05, 1.1, 1.15, 1.2, 1.1, 1.05, 1.0, 0.95, 0.9, 0.95,
];

/// Day-of-week factor: reduced output on weekends, slightly reduced on
/// Fridays.
pub fn day_factor(weekday: chrono::Weekday) -> f64 {
    match weekday {
        chrono::Weekday::Sun => 0.55,
        chrono::Weekday::Sat => 0.75,
        chrono::Weekday::Fri => 0.9,
        _ => 1.0,
    }
}
