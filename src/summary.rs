// Minestat - Mine production statistics and anomaly detection
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Aggregate statistics over enriched records.
//!
//! Summary statistics are computed over full series and therefore do not
//! depend on the detection policy's window size. Ratio-style metrics whose
//! denominator is (near) zero are reported as `None` rather than NaN or
//! infinity, so serialized summaries never carry non-finite numbers.

use crate::processor::EnrichedRecord;
use crate::quartiles::Quartiles;
use crate::window::STD_EPSILON;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate statistics for one mine's full series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySummary {
    pub mine: String,
    pub count: usize,
    pub total: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub quartiles: Quartiles,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    /// Coefficient of variation in percent; None when the mean is ~0.
    pub cv: Option<f64>,
    pub anomalies: usize,
    /// Anomalies as a percentage of count.
    pub anomaly_rate: f64,
    /// Percent change of the second half's mean over the first half's;
    /// None when the first half's mean is ~0 or the series is a single
    /// sample.
    pub trend: Option<f64>,
    /// Mean as a percentage of Q3; None when Q3 is ~0.
    pub efficiency: Option<f64>,
    /// 100 minus the coefficient of variation; None when CV is undefined.
    pub stability: Option<f64>,
}

/// Aggregate statistics across all mines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallSummary {
    pub mines: usize,
    pub records: usize,
    pub total_production: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub quartiles: Quartiles,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    /// Coefficient of variation in percent; None when the mean is ~0.
    pub cv: Option<f64>,
    pub anomalies: usize,
    pub anomaly_rate: f64,
}

fn mean_of(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn population_std(values: &[f64], mean: f64) -> f64 {
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

fn guard_ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator.abs() > STD_EPSILON {
        Some(numerator / denominator)
    } else {
        None
    }
}

fn summarize_mine(mine: &str, records: &[&EnrichedRecord]) -> EntitySummary {
    let values: Vec<f64> = records
        .iter()
        .map(|r| r.reading.production as f64)
        .collect();
    let count = values.len();
    let total: f64 = values.iter().sum();
    let mean = total / count as f64;
    let std_dev = population_std(&values, mean);
    let quartiles = Quartiles::nearest_rank(&values).unwrap_or_default();

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let cv = guard_ratio(std_dev, mean).map(|r| r * 100.0);

    let anomalies = records.iter().filter(|r| r.outlier).count();
    let anomaly_rate = anomalies as f64 / count as f64 * 100.0;

    // Trend compares the second half's mean against the first half's.
    // The first half is values[..n/2], which is empty for n = 1.
    let trend = if count >= 2 {
        let first = mean_of(&values[..count / 2]);
        let second = mean_of(&values[count / 2..]);
        guard_ratio(second - first, first).map(|r| r * 100.0)
    } else {
        None
    };

    let efficiency = guard_ratio(mean, quartiles.q3).map(|r| r * 100.0);
    let stability = cv.map(|c| 100.0 - c);

    EntitySummary {
        mine: mine.to_string(),
        count,
        total,
        mean,
        median: quartiles.median,
        std_dev,
        quartiles,
        min,
        max,
        range: max - min,
        cv,
        anomalies,
        anomaly_rate,
        trend,
        efficiency,
        stability,
    }
}

/// Build per-mine summaries from enriched records, sorted by mine name.
///
/// Returns an empty vector for empty input.
pub fn per_mine(records: &[EnrichedRecord]) -> Vec<EntitySummary> {
    let mut grouped: BTreeMap<&str, Vec<&EnrichedRecord>> = BTreeMap::new();
    for record in records {
        grouped
            .entry(record.reading.mine.as_str())
            .or_default()
            .push(record);
    }

    grouped
        .iter()
        .map(|(mine, group)| summarize_mine(mine, group))
        .collect()
}

/// Build the cross-mine summary. Returns `None` for empty input.
pub fn overall(records: &[EnrichedRecord]) -> Option<OverallSummary> {
    if records.is_empty() {
        return None;
    }

    let values: Vec<f64> = records
        .iter()
        .map(|r| r.reading.production as f64)
        .collect();
    let total_production: f64 = values.iter().sum();
    let mean = total_production / values.len() as f64;
    let std_dev = population_std(&values, mean);
    let quartiles = Quartiles::nearest_rank(&values)?;

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let cv = guard_ratio(std_dev, mean).map(|r| r * 100.0);

    let mines = records
        .iter()
        .map(|r| r.reading.mine.as_str())
        .collect::<std::collections::BTreeSet<_>>()
        .len();
    let anomalies = records.iter().filter(|r| r.outlier).count();

    Some(OverallSummary {
        mines,
        records: records.len(),
        total_production,
        mean,
        median: quartiles.median,
        std_dev,
        quartiles,
        min,
        max,
        range: max - min,
        cv,
        anomalies,
        anomaly_rate: anomalies as f64 / records.len() as f64 * 100.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::DetectionPolicy;
    use crate::processor::classify;
    use crate::reading::{ingest, Reading};
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn records_for(values: &[u32]) -> Vec<EnrichedRecord> {
        let readings: Vec<Reading> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| Reading::new("Mine A", day(i as u32 + 1), v))
            .collect();
        let series = ingest(&readings).unwrap();
        classify(&series, &DetectionPolicy::default()).unwrap()
    }

    #[test]
    fn test_basic_summary() {
        let records = records_for(&[10, 20, 30, 40, 50, 60, 70, 80]);
        let summaries = per_mine(&records);
        assert_eq!(summaries.len(), 1);

        let s = &summaries[0];
        assert_eq!(s.count, 8);
        assert_relative_eq!(s.mean, 45.0);
        assert_eq!(s.min, 10.0);
        assert_eq!(s.max, 80.0);
        assert_eq!(s.range, 70.0);
        // Nearest rank over 8 sorted values: median index 4
        assert_eq!(s.median, 50.0);
    }

    #[test]
    fn test_trend_split() {
        // First half [10, 20] mean 15, second half [30, 40] mean 35:
        // trend = (35 - 15) / 15 * 100
        let records = records_for(&[10, 20, 30, 40]);
        let s = &per_mine(&records)[0];
        assert_relative_eq!(s.trend.unwrap(), 400.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_trend_odd_count_smaller_first_half() {
        // n = 5: first half is values[..2], second half values[2..]
        let records = records_for(&[10, 20, 30, 40, 50]);
        let s = &per_mine(&records)[0];
        let expected = (40.0 - 15.0) / 15.0 * 100.0;
        assert_relative_eq!(s.trend.unwrap(), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_denominators_yield_none() {
        let records = records_for(&[0, 0, 0, 0]);
        let s = &per_mine(&records)[0];
        assert!(s.cv.is_none());
        assert!(s.trend.is_none());
        assert!(s.efficiency.is_none());
        assert!(s.stability.is_none());
        // Nothing non-finite leaks into serialization.
        let json = serde_json::to_string(s).unwrap();
        assert!(!json.contains("NaN"));
        assert!(!json.contains("inf"));
    }

    #[test]
    fn test_single_sample_has_no_trend() {
        let records = records_for(&[42]);
        let s = &per_mine(&records)[0];
        assert_eq!(s.count, 1);
        assert!(s.trend.is_none());
        assert_eq!(s.std_dev, 0.0);
    }

    #[test]
    fn test_stability_complements_cv() {
        let records = records_for(&[90, 100, 110, 100, 95, 105, 100, 100]);
        let s = &per_mine(&records)[0];
        let cv = s.cv.unwrap();
        assert_relative_eq!(s.stability.unwrap(), 100.0 - cv, epsilon = 1e-9);
    }

    #[test]
    fn test_overall_counts_mines() {
        let readings = vec![
            Reading::new("Mine A", day(1), 100),
            Reading::new("Mine A", day(2), 120),
            Reading::new("Mine B", day(1), 300),
        ];
        let series = ingest(&readings).unwrap();
        let records = classify(&series, &DetectionPolicy::default()).unwrap();
        let o = overall(&records).unwrap();
        assert_eq!(o.mines, 2);
        assert_eq!(o.records, 3);
        assert_relative_eq!(o.total_production, 520.0);
    }

    #[test]
    fn test_overall_dispersion_fields() {
        let readings = vec![
            Reading::new("Mine A", day(1), 100),
            Reading::new("Mine A", day(2), 200),
            Reading::new("Mine B", day(1), 300),
            Reading::new("Mine B", day(2), 400),
        ];
        let series = ingest(&readings).unwrap();
        let records = classify(&series, &DetectionPolicy::default()).unwrap();
        let o = overall(&records).unwrap();

        assert_eq!(o.min, 100.0);
        assert_eq!(o.max, 400.0);
        assert_eq!(o.range, 300.0);
        // Nearest rank over [100, 200, 300, 400]: q1 idx 1, q3 idx 3
        assert_eq!(o.quartiles.q1, 200.0);
        assert_eq!(o.quartiles.q3, 400.0);
        assert_eq!(o.quartiles.iqr, 200.0);
        assert_relative_eq!(o.cv.unwrap(), o.std_dev / o.mean * 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_overall_zero_mean_has_no_cv() {
        let readings = vec![
            Reading::new("Mine A", day(1), 0),
            Reading::new("Mine A", day(2), 0),
        ];
        let series = ingest(&readings).unwrap();
        let records = classify(&series, &DetectionPolicy::default()).unwrap();
        let o = overall(&records).unwrap();
        assert!(o.cv.is_none());
    }

    #[test]
    fn test_overall_empty_is_none() {
        assert!(overall(&[]).is_none());
    }
}
