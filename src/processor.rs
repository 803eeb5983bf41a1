// Minestat - Mine production statistics and anomaly detection
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Per-mine series processing and label fusion.
//!
//! This is the second half of the two-phase API: [`classify`] takes the
//! validated series from [`crate::reading::ingest`] plus a policy and
//! re-derives every enriched record from scratch. Policy changes never
//! patch records in place; callers simply run [`classify`] again.

use crate::classifier::{self, AnomalyVerdict, TriggerMethod};
use crate::error::Result;
use crate::policy::DetectionPolicy;
use crate::quartiles::Quartiles;
use crate::reading::{RawSeries, Reading};
use crate::window::{self, WindowMetrics};
use serde::{Deserialize, Serialize};

/// Final classification tag after fusing the statistical verdict with the
/// ground-truth label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "method", rename_all = "snake_case")]
pub enum AnomalyClassification {
    /// Window still short of full size, nothing flagged.
    EstablishingBaseline,
    /// Full window, nothing flagged.
    NormalOperation,
    /// Ground truth and the classifier agree.
    ConfirmedCriticalAnomaly,
    /// Only the ground-truth label flags the reading.
    MarkedAnomaly,
    /// Only the classifier flags the reading.
    StatisticalAnomaly(TriggerMethod),
}

impl AnomalyClassification {
    /// Display label matching the stable export vocabulary.
    pub fn label(&self) -> String {
        match self {
            AnomalyClassification::EstablishingBaseline => "Establishing Baseline".to_string(),
            AnomalyClassification::NormalOperation => "Normal Operation".to_string(),
            AnomalyClassification::ConfirmedCriticalAnomaly => {
                "Confirmed Critical Anomaly".to_string()
            }
            AnomalyClassification::MarkedAnomaly => "Marked Anomaly".to_string(),
            AnomalyClassification::StatisticalAnomaly(method) => {
                format!("Statistical Anomaly ({})", method.as_str().to_uppercase())
            }
        }
    }
}

/// Entity-wide baseline statistics over one mine's full series.
///
/// Informational only; classification always runs against the trailing
/// window, never against these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MineBaseline {
    pub mean: f64,
    pub std_dev: f64,
    pub quartiles: Quartiles,
}

impl MineBaseline {
    fn of(values: &[f64]) -> Self {
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Self {
            mean,
            std_dev: variance.sqrt(),
            quartiles: Quartiles::nearest_rank(values).unwrap_or_default(),
        }
    }
}

/// A reading enriched with rolling metrics, verdict and fused
/// classification. Recomputed in full whenever the policy changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    /// The original reading, unchanged.
    pub reading: Reading,
    /// Chronological index within the mine's series.
    pub index: usize,
    /// Rolling window statistics at this index.
    pub metrics: WindowMetrics,
    /// Classifier verdict.
    pub verdict: AnomalyVerdict,
    /// Final outlier flag: statistical verdict OR ground-truth label.
    pub outlier: bool,
    /// Fused classification tag.
    pub classification: AnomalyClassification,
    /// Human-readable explanation for the classification.
    pub explanation: String,
    /// Signed percentage deviation from the moving average (negative for
    /// dips); None when the average is too close to zero to divide by.
    pub percent_from_ma: Option<f64>,
    /// Entity-wide baseline over the mine's full series.
    pub overall: MineBaseline,
}

/// Fuse the statistical verdict with the ground-truth label.
fn fuse(
    reading: &Reading,
    metrics: &WindowMetrics,
    verdict: &AnomalyVerdict,
    policy: &DetectionPolicy,
) -> (bool, AnomalyClassification, String) {
    let marked = reading.label.is_some();
    let detected = verdict.is_anomaly;

    match (marked, detected) {
        (true, true) => {
            let kind = reading
                .label
                .as_ref()
                .map(|l| l.kind.as_str())
                .unwrap_or_default();
            (
                true,
                AnomalyClassification::ConfirmedCriticalAnomaly,
                format!("{} - Also detected by {}", kind, verdict.method.as_str()),
            )
        }
        (true, false) => {
            let kind = reading
                .label
                .as_ref()
                .map(|l| l.kind.clone())
                .filter(|k| !k.is_empty())
                .unwrap_or_else(|| "Manually flagged issue".to_string());
            (true, AnomalyClassification::MarkedAnomaly, kind)
        }
        (false, true) => (
            true,
            AnomalyClassification::StatisticalAnomaly(verdict.method),
            verdict.reason.clone(),
        ),
        (false, false) => {
            if metrics.is_early_data {
                (
                    false,
                    AnomalyClassification::EstablishingBaseline,
                    format!(
                        "Collecting data ({}/{} days)",
                        metrics.available, policy.window_size
                    ),
                )
            } else {
                (
                    false,
                    AnomalyClassification::NormalOperation,
                    "Within expected parameters".to_string(),
                )
            }
        }
    }
}

/// Derive enriched records for every reading in every mine series.
///
/// Pure full recompute: identical input always yields identical output,
/// and the caller's series are left untouched. Mines are processed in
/// sorted name order; within a mine, records preserve chronological order.
pub fn classify(series: &RawSeries, policy: &DetectionPolicy) -> Result<Vec<EnrichedRecord>> {
    policy.validate()?;

    let total: usize = series.values().map(|s| s.len()).sum();
    let mut records = Vec::with_capacity(total);

    for mine_series in series.values() {
        if mine_series.is_empty() {
            continue;
        }
        let values = mine_series.values();
        let overall = MineBaseline::of(&values);

        for (index, reading) in mine_series.readings().iter().enumerate() {
            let metrics = window::compute(&values, index, policy.window_size);
            let verdict = classifier::classify(values[index], &metrics, policy);
            let (outlier, classification, explanation) = fuse(reading, &metrics, &verdict, policy);
            let percent_from_ma =
                classifier::percent_from_moving_avg(values[index], metrics.moving_avg);

            records.push(EnrichedRecord {
                reading: reading.clone(),
                index,
                metrics,
                verdict,
                outlier,
                classification,
                explanation,
                percent_from_ma,
                overall: overall.clone(),
            });
        }

        log::debug!(
            "classified {} readings for {} ({} policy)",
            mine_series.len(),
            mine_series.mine,
            policy.method.as_str()
        );
    }

    Ok(records)
}
