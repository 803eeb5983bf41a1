// Minestat - Mine production statistics and anomaly detection
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Nearest-rank quartile extraction.

use serde::{Deserialize, Serialize};

/// Quartile summary of a numeric set.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Quartiles {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub iqr: f64,
}

impl Quartiles {
    /// Compute quartiles over a non-empty set using the nearest-rank method:
    /// sort ascending, take the elements at `floor(n*0.25)`, `floor(n*0.5)`
    /// and `floor(n*0.75)`. No interpolation between ranks.
    ///
    /// Returns `None` for an empty input. A single value yields q1 = median
    /// = q3 = value and iqr = 0.
    pub fn nearest_rank(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let n = sorted.len();
        let q1 = sorted[n / 4];
        let median = sorted[n / 2];
        let q3 = sorted[3 * n / 4];

        Some(Self {
            q1,
            median,
            q3,
            iqr: q3 - q1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(Quartiles::nearest_rank(&[]).is_none());
    }

    #[test]
    fn test_single_value() {
        let q = Quartiles::nearest_rank(&[42.0]).unwrap();
        assert_eq!(q.q1, 42.0);
        assert_eq!(q.median, 42.0);
        assert_eq!(q.q3, 42.0);
        assert_eq!(q.iqr, 0.0);
    }

    #[test]
    fn test_nearest_rank_indices() {
        // n = 8: q1 index 2, median index 4, q3 index 6
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let q = Quartiles::nearest_rank(&values).unwrap();
        assert_eq!(q.q1, 3.0);
        assert_eq!(q.median, 5.0);
        assert_eq!(q.q3, 7.0);
        assert_eq!(q.iqr, 4.0);
    }

    #[test]
    fn test_unsorted_input() {
        let values = [8.0, 1.0, 5.0, 3.0, 7.0, 2.0, 6.0, 4.0];
        let q = Quartiles::nearest_rank(&values).unwrap();
        assert_eq!(q.q1, 3.0);
        assert_eq!(q.q3, 7.0);
    }

    #[test]
    fn test_ordering_invariant() {
        // q1 <= median <= q3 and iqr >= 0, for assorted lengths
        for n in 1..30usize {
            let values: Vec<f64> = (0..n).map(|i| ((i * 37) % 19) as f64).collect();
            let q = Quartiles::nearest_rank(&values).unwrap();
            assert!(q.q1 <= q.median, "n={}", n);
            assert!(q.median <= q.q3, "n={}", n);
            assert!(q.iqr >= 0.0, "n={}", n);
        }
    }

    #[test]
    fn test_duplicates_stable() {
        let values = [5.0, 5.0, 5.0, 5.0, 5.0];
        let q = Quartiles::nearest_rank(&values).unwrap();
        assert_eq!(q.q1, 5.0);
        assert_eq!(q.median, 5.0);
        assert_eq!(q.q3, 5.0);
        assert_eq!(q.iqr, 0.0);
    }
}
