// Minestat Testdata - Core generator
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Synthetic production series generation.
//!
//! Each simulated day combines a mine's baseline with day-of-week and
//! monthly seasonal factors, a slow linear trend and bounded pseudo-normal
//! noise. A per-mine anomaly rate occasionally replaces the value with a
//! spike or dip and attaches a matching ground-truth label.

use crate::profiles::{day_factor, standard_mines, MineProfile, MONTHLY_FACTORS};
use chrono::{Datelike, NaiveDate};
use minestat::{Reading, Severity};
use rand::prelude::*;
use rand::rngs::StdRng;

/// Generator configuration.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// First simulated day.
    pub start_date: NaiveDate,
    /// Number of days per mine.
    pub num_days: usize,
    /// Mines to simulate.
    pub mines: Vec<MineProfile>,
    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or(NaiveDate::MIN),
            num_days: 488,
            mines: standard_mines(),
            seed: None,
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the first simulated day.
    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = date;
        self
    }

    /// Set the number of days per mine.
    pub fn with_num_days(mut self, days: usize) -> Self {
        self.num_days = days;
        self
    }

    /// Replace the mine profiles.
    pub fn with_mines(mut self, mines: Vec<MineProfile>) -> Self {
        self.mines = mines;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Bounded pseudo-normal factor in [0.7, 1.3], centered on 1.0. The sum
/// of three uniforms gives a cheap bell-ish shape without long tails.
fn noise_factor(rng: &mut StdRng) -> f64 {
    let r: f64 = rng.gen::<f64>() + rng.gen::<f64>() + rng.gen::<f64>();
    0.7 + r / 3.0 * 0.6
}

fn inject_anomaly(production: f64, rng: &mut StdRng) -> (f64, &'static str, Severity) {
    let roll: f64 = rng.gen();
    if roll > 0.6 {
        (
            production * (2.0 + rng.gen::<f64>() * 0.5),
            "Major Production Spike",
            Severity::High,
        )
    } else if roll > 0.3 {
        (
            production * (1.3 + rng.gen::<f64>() * 0.3),
            "Minor Production Spike",
            Severity::Medium,
        )
    } else if roll > 0.15 {
        (
            production * (0.1 + rng.gen::<f64>() * 0.2),
            "Major Production Dip",
            Severity::High,
        )
    } else {
        (
            production * (0.4 + rng.gen::<f64>() * 0.3),
            "Minor Production Dip",
            Severity::Medium,
        )
    }
}

/// Generate readings for every configured mine, day by day.
///
/// Output is ordered mine by mine with ascending dates inside each mine,
/// ready for `minestat::ingest`.
pub fn generate(config: &GeneratorConfig) -> Vec<Reading> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut readings = Vec::with_capacity(config.mines.len() * config.num_days);

    for mine in &config.mines {
        for i in 0..config.num_days {
            let date = config.start_date + chrono::Duration::days(i as i64);
            let seasonal = MONTHLY_FACTORS[date.month0() as usize];
            let trend = 1.0 + i as f64 * mine.trend;

            let mut production =
                mine.base * day_factor(date.weekday()) * seasonal * trend * noise_factor(&mut rng);

            let mut label = None;
            if rng.gen::<f64>() < mine.anomaly_rate {
                let (adjusted, kind, severity) = inject_anomaly(production, &mut rng);
                production = adjusted;
                label = Some((kind, severity));
            }

            let reading = Reading::new(&mine.name, date, production.round().max(0.0) as u32);
            readings.push(match label {
                Some((kind, severity)) => reading.with_label(kind, severity),
                None => reading,
            });
        }
    }

    readings
}
