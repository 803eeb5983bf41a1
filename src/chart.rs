// Minestat - Mine production statistics and anomaly detection
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Chart-oriented projections of enriched records.
//!
//! Two shapes: weekly aggregate buckets across all mines, and a per-mine
//! daily slice. Both are capped so downstream renderers get a bounded
//! payload regardless of how much history was processed.

use crate::processor::EnrichedRecord;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maximum number of weekly buckets returned.
pub const MAX_WEEKLY_BUCKETS: usize = 20;

/// Maximum number of daily points returned.
pub const MAX_DAILY_POINTS: usize = 60;

/// One weekly aggregate bucket across all mines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyBucket {
    /// 1-based week number within the year (seven-day blocks counted from
    /// January 1st, not ISO weeks).
    pub week: u32,
    pub total: f64,
    pub count: usize,
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub anomalies: usize,
    pub anomaly_rate: f64,
}

/// One point of a single mine's daily series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub production: f64,
    pub moving_avg: f64,
    pub z_score: f64,
    pub is_anomaly: bool,
    pub classification: String,
}

/// Seven-day block index counted from January 1st, 1-based.
fn week_of(date: NaiveDate) -> u32 {
    date.ordinal0() / 7 + 1
}

/// Aggregate records into weekly buckets, ascending by week, capped at
/// [`MAX_WEEKLY_BUCKETS`].
pub fn weekly_buckets(records: &[EnrichedRecord]) -> Vec<WeeklyBucket> {
    struct Acc {
        total: f64,
        count: usize,
        min: f64,
        max: f64,
        anomalies: usize,
    }

    let mut buckets: BTreeMap<u32, Acc> = BTreeMap::new();
    for record in records {
        let value = record.reading.production as f64;
        let acc = buckets.entry(week_of(record.reading.date)).or_insert(Acc {
            total: 0.0,
            count: 0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            anomalies: 0,
        });
        acc.total += value;
        acc.count += 1;
        acc.min = acc.min.min(value);
        acc.max = acc.max.max(value);
        if record.outlier {
            acc.anomalies += 1;
        }
    }

    buckets
        .into_iter()
        .take(MAX_WEEKLY_BUCKETS)
        .map(|(week, acc)| WeeklyBucket {
            week,
            total: acc.total,
            average: acc.total / acc.count as f64,
            min: acc.min,
            max: acc.max,
            anomaly_rate: acc.anomalies as f64 / acc.count as f64 * 100.0,
            count: acc.count,
            anomalies: acc.anomalies,
        })
        .collect()
}

/// Project one mine's records into daily chart points, capped at
/// [`MAX_DAILY_POINTS`] from the start of the series.
pub fn daily_series(records: &[EnrichedRecord], mine: &str) -> Vec<DailyPoint> {
    records
        .iter()
        .filter(|r| r.reading.mine == mine)
        .take(MAX_DAILY_POINTS)
        .map(|r| DailyPoint {
            date: r.reading.date,
            production: r.reading.production as f64,
            moving_avg: r.metrics.moving_avg,
            z_score: r.metrics.z_score,
            is_anomaly: r.outlier,
            classification: r.classification.label(),
        })
        .collect()
}

/// Least-squares line fit over a series indexed 0..n.
///
/// Returns `(slope, intercept)`, or `None` for fewer than 2 points or a
/// degenerate x spread (unreachable with index-based x). Only a linear
/// fit is offered; higher polynomial degrees are out of scope.
pub fn linear_trend(values: &[f64]) -> Option<(f64, f64)> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let nf = n as f64;
    let sum_x: f64 = (0..n).map(|i| i as f64).sum();
    let sum_y: f64 = values.iter().sum();
    let sum_xy: f64 = values.iter().enumerate().map(|(i, y)| i as f64 * y).sum();
    let sum_xx: f64 = (0..n).map(|i| (i * i) as f64).sum();

    let denom = nf * sum_xx - sum_x * sum_x;
    if denom.abs() < f64::EPSILON {
        return None;
    }

    let slope = (nf * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / nf;
    Some((slope, intercept))
}
