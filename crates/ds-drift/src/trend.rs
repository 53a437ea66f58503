//! Trend-change detection for time-series columns.

use ds_core::{Error, Result};
use serde::Serialize;

use crate::decompose::seasonal_decompose;
use crate::wilcoxon::wilcoxon_signed_rank;

/// Significance level for the trend-change flag.
pub const TREND_SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Drift fact for a time-series column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendChange {
    /// Whether the trend shifted significantly after the new rows.
    pub trend_significant_change: bool,
}

/// Detect a significant trend change after appending `new` to `original`.
///
/// The two series are concatenated in their existing row order (original
/// rows first, then new rows, never re-sorted by time value), decomposed
/// with the given seasonal `period`, and the edge positions without a trend
/// value are dropped. If more than one trend point remains, consecutive
/// trend values form the pairs of a signed-rank test and the column is
/// flagged when the p-value falls below [`TREND_SIGNIFICANCE_LEVEL`].
///
/// A trend of one or zero points, a series too short to decompose, or a
/// degenerate test (all paired differences zero, e.g. a constant series)
/// all yield "no significant change" rather than an error.
pub fn detect_trend_change(original: &[f64], new: &[f64], period: usize) -> Result<TrendChange> {
    if period == 0 {
        return Err(Error::Validation("period must be >= 1".to_string()));
    }

    let mut combined = Vec::with_capacity(original.len() + new.len());
    combined.extend_from_slice(original);
    combined.extend_from_slice(new);

    if combined.len() < 2 * period {
        tracing::debug!(
            observations = combined.len(),
            period,
            "series too short for decomposition; no trend change"
        );
        return Ok(TrendChange { trend_significant_change: false });
    }

    let decomposition = seasonal_decompose(&combined, period)?;
    let trend = decomposition.trend_values();
    if trend.len() <= 1 {
        return Ok(TrendChange { trend_significant_change: false });
    }

    match wilcoxon_signed_rank(&trend[..trend.len() - 1], &trend[1..]) {
        Ok(result) => Ok(TrendChange {
            trend_significant_change: result.pvalue < TREND_SIGNIFICANCE_LEVEL,
        }),
        Err(Error::Computation(_)) => {
            // Constant trend: the signed-rank statistic is undefined, which
            // counts as no detectable change.
            tracing::debug!("degenerate signed-rank test on constant trend");
            Ok(TrendChange { trend_significant_change: false })
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_series_is_never_significant() {
        for len in 0..=6 {
            let series: Vec<f64> = (0..len).map(|i| i as f64).collect();
            let r = detect_trend_change(&series, &[], 6).unwrap();
            assert!(!r.trend_significant_change, "len {len}");
        }
    }

    #[test]
    fn constant_series_is_not_significant() {
        // Identical constant value over two full periods: the decomposition
        // trend is constant and every paired difference is zero.
        let original = vec![3.0; 12];
        let new = vec![3.0; 12];
        let r = detect_trend_change(&original, &new, 4).unwrap();
        assert!(!r.trend_significant_change);
    }

    #[test]
    fn level_shift_after_insertion_is_significant() {
        // Flat original, steadily climbing new rows.
        let original = vec![0.0; 24];
        let new: Vec<f64> = (0..24).map(|i| i as f64).collect();
        let r = detect_trend_change(&original, &new, 4).unwrap();
        assert!(r.trend_significant_change);
    }

    #[test]
    fn stable_seasonal_pattern_is_not_significant() {
        let cycle = [1.0, 2.0, 3.0, 2.0];
        let original: Vec<f64> = (0..24).map(|i| cycle[i % 4]).collect();
        let new: Vec<f64> = (24..48).map(|i| cycle[i % 4]).collect();
        let r = detect_trend_change(&original, &new, 4).unwrap();
        assert!(!r.trend_significant_change);
    }

    #[test]
    fn zero_period_is_rejected() {
        assert!(detect_trend_change(&[1.0, 2.0], &[3.0], 0).is_err());
    }
}
