// Minestat - Mine production statistics and anomaly detection
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! End-to-end pipeline properties: determinism, window-size independence
//! of the summaries, detection method priority, and the small-sample
//! guard rails.

use chrono::NaiveDate;
use minestat::{
    classify, ingest, summary, weekly_buckets, AnomalyClassification, DetectionMethod,
    DetectionPolicy, Reading, Severity, TriggerMethod, MIN_DETECTION_SAMPLES,
};

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(day as i64 - 1)
}

fn series_of(mine: &str, values: &[u32]) -> Vec<Reading> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| Reading::new(mine, date(i as u32 + 1), v))
        .collect()
}

#[test]
fn test_full_recompute_is_deterministic() {
    let mut readings = series_of("North Pit", &[120, 118, 125, 119, 122, 117, 121, 260, 120, 119]);
    readings.extend(series_of("South Shaft", &[300, 310, 290, 305, 295, 315, 300, 80]));
    readings[7] = readings[7]
        .clone()
        .with_label("Major Production Spike", Severity::High);

    let series = ingest(&readings).unwrap();
    let policy = DetectionPolicy::default()
        .with_method(DetectionMethod::All)
        .with_z_threshold(2.0);

    let first = classify(&series, &policy).unwrap();
    let second = classify(&series, &policy).unwrap();
    assert_eq!(first, second);

    let json_a = serde_json::to_string(&first).unwrap();
    let json_b = serde_json::to_string(&second).unwrap();
    assert_eq!(json_a, json_b);

    // Mines are processed in sorted name order regardless of input order
    assert_eq!(first[0].reading.mine, "North Pit");
    assert_eq!(first.last().unwrap().reading.mine, "South Shaft");
}

#[test]
fn test_summary_independent_of_window_size() {
    let readings = series_of("North Pit", &[100, 140, 90, 130, 110, 95, 125, 105, 115, 120]);
    let series = ingest(&readings).unwrap();

    let mut snapshots = Vec::new();
    for window in [3, 7, 10] {
        let policy = DetectionPolicy::default().with_window_size(window);
        let records = classify(&series, &policy).unwrap();
        let s = summary::per_mine(&records).remove(0);
        snapshots.push((s.mean, s.median, s.min, s.max, s.std_dev));
    }

    assert_eq!(snapshots[0], snapshots[1]);
    assert_eq!(snapshots[1], snapshots[2]);
}

#[test]
fn test_spike_fires_zscore_below_cap() {
    // Seven steady days then a spike. The trailing window includes the
    // current value, which caps |z| at sqrt(n - 1) ~ 2.449 for n = 7, so
    // the spike is detectable at threshold 2.0.
    let readings = series_of("North Pit", &[100, 102, 98, 101, 99, 97, 103, 500]);
    let series = ingest(&readings).unwrap();
    let policy = DetectionPolicy::default().with_z_threshold(2.0);
    let records = classify(&series, &policy).unwrap();

    let spike = &records[7];
    assert!(spike.outlier);
    assert_eq!(
        spike.classification,
        AnomalyClassification::StatisticalAnomaly(TriggerMethod::ZScore)
    );
    assert!(spike.metrics.z_score > 2.0);
}

#[test]
fn test_z_score_capped_by_window_membership() {
    // No spike, however extreme, can push |z| past sqrt(n - 1) when the
    // value is part of its own window.
    for spike in [500u32, 5_000, 500_000] {
        let readings = series_of("North Pit", &[100, 100, 100, 100, 100, 100, spike]);
        let series = ingest(&readings).unwrap();
        let records = classify(&series, &DetectionPolicy::default()).unwrap();
        let z = records[6].metrics.z_score;
        assert!(
            z <= 6.0_f64.sqrt() + 1e-9,
            "spike {} produced z {}",
            spike,
            z
        );
    }
}

#[test]
fn test_constant_series_has_no_anomalies() {
    let readings = series_of("North Pit", &[150; 30]);
    let series = ingest(&readings).unwrap();

    for method in [
        DetectionMethod::ZScore,
        DetectionMethod::Iqr,
        DetectionMethod::MovingAvg,
        DetectionMethod::All,
    ] {
        let policy = DetectionPolicy::default().with_method(method);
        let records = classify(&series, &policy).unwrap();
        assert!(
            records.iter().all(|r| !r.outlier),
            "method {:?} flagged a constant series",
            method
        );
    }
}

#[test]
fn test_weekly_bucketizer_fourteen_days() {
    let readings = series_of("North Pit", &[100; 14]);
    let series = ingest(&readings).unwrap();
    let records = classify(&series, &DetectionPolicy::default()).unwrap();

    let buckets = weekly_buckets(&records);
    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[0].count, 7);
    assert_eq!(buckets[1].count, 7);
    assert_eq!(buckets[0].total, 700.0);
}

#[test]
fn test_ensemble_reports_first_firing_method() {
    // A spike beyond both the IQR fences and the z threshold must be
    // attributed to IQR, which runs first in the ensemble.
    let readings = series_of("North Pit", &[90, 95, 100, 105, 110, 100, 400]);
    let series = ingest(&readings).unwrap();
    let policy = DetectionPolicy::default()
        .with_method(DetectionMethod::All)
        .with_z_threshold(2.0);
    let records = classify(&series, &policy).unwrap();

    let spike = &records[6];
    assert!(spike.outlier);
    assert_eq!(spike.verdict.method, TriggerMethod::Iqr);
}

#[test]
fn test_small_sample_guard() {
    // Fewer than MIN_DETECTION_SAMPLES available: never a statistical
    // anomaly, whatever the values look like.
    let readings = series_of("North Pit", &[100, 100, 100, 100, 100, 9000]);
    let series = ingest(&readings).unwrap();
    let policy = DetectionPolicy::default().with_method(DetectionMethod::All);
    let records = classify(&series, &policy).unwrap();

    assert!(records.len() < MIN_DETECTION_SAMPLES + 1);
    for record in &records {
        assert!(!record.outlier);
        assert_eq!(record.verdict.method, TriggerMethod::InsufficientData);
        assert_eq!(
            record.classification,
            AnomalyClassification::EstablishingBaseline
        );
    }
}

#[test]
fn test_marked_and_detected_fuse_to_confirmed() {
    let mut readings = series_of("North Pit", &[100, 102, 98, 101, 99, 97, 103, 500]);
    readings[7] = readings[7]
        .clone()
        .with_label("Major Production Spike", Severity::High);
    let series = ingest(&readings).unwrap();
    let policy = DetectionPolicy::default().with_z_threshold(2.0);
    let records = classify(&series, &policy).unwrap();

    assert_eq!(
        records[7].classification,
        AnomalyClassification::ConfirmedCriticalAnomaly
    );
    assert!(records[7]
        .explanation
        .starts_with("Major Production Spike - Also detected by"));
}

#[test]
fn test_moving_average_deviation_method() {
    // ~40% deviation from the trailing average: fires under the strict
    // 30% threshold used when moving-average is the selected method.
    let readings = series_of("North Pit", &[100, 100, 100, 100, 100, 100, 100, 150]);
    let series = ingest(&readings).unwrap();
    let policy = DetectionPolicy::default().with_method(DetectionMethod::MovingAvg);
    let records = classify(&series, &policy).unwrap();

    let last = &records[7];
    assert!(last.outlier);
    assert_eq!(last.verdict.method, TriggerMethod::MovingAvg);
}

#[test]
fn test_reprocessing_under_new_policy_is_clean() {
    // Switching policies re-derives from the untouched raw series; the
    // stricter run's flags do not leak into the looser run.
    let readings = series_of("North Pit", &[100, 102, 98, 101, 99, 97, 103, 500, 101, 99]);
    let series = ingest(&readings).unwrap();

    let strict = DetectionPolicy::default().with_z_threshold(2.0);
    let loose = DetectionPolicy::default().with_z_threshold(2.45);

    let strict_records = classify(&series, &strict).unwrap();
    let loose_records = classify(&series, &loose).unwrap();

    assert!(strict_records[7].outlier);
    assert!(!loose_records[7].outlier);

    // Raw readings are unchanged in both outputs
    for (a, b) in strict_records.iter().zip(&loose_records) {
        assert_eq!(a.reading, b.reading);
    }
}
