//! Classical additive seasonal-trend decomposition.
//!
//! Trend is a centered moving average over one period (the standard 2xMA
//! with half-weight endpoints when the period is even); seasonal is the
//! re-centered per-phase mean of the detrended series. The leading and
//! trailing `period / 2` positions carry no trend value, an edge effect of
//! the smoothing window.

use ds_core::{Error, Result};

/// Output of [`seasonal_decompose`]: `series = trend + seasonal + residual`
/// wherever the trend is defined.
#[derive(Debug, Clone)]
pub struct Decomposition {
    /// Trend component; `None` where the smoothing window does not fit.
    pub trend: Vec<Option<f64>>,
    /// Seasonal component, one value per input position.
    pub seasonal: Vec<f64>,
    /// Residual component; `None` wherever the trend is undefined.
    pub residual: Vec<Option<f64>>,
}

impl Decomposition {
    /// Trend values that the decomposition could produce, in order, with
    /// undefined and non-finite positions dropped.
    pub fn trend_values(&self) -> Vec<f64> {
        self.trend.iter().filter_map(|t| t.filter(|v| v.is_finite())).collect()
    }
}

/// Decompose `series` additively with the given seasonal `period`.
///
/// Requires at least two full periods of data; NaN inputs propagate into
/// the window means covering them.
pub fn seasonal_decompose(series: &[f64], period: usize) -> Result<Decomposition> {
    if period == 0 {
        return Err(Error::Validation("period must be >= 1".to_string()));
    }
    if series.len() < 2 * period {
        return Err(Error::Validation(format!(
            "series has {} observations, need at least two full periods ({})",
            series.len(),
            2 * period
        )));
    }

    let n = series.len();
    let trend = centered_moving_average(series, period);

    // Per-phase means of the detrended series, re-centered to sum to zero.
    let mut phase_sums = vec![0.0f64; period];
    let mut phase_counts = vec![0usize; period];
    for (i, t) in trend.iter().enumerate() {
        if let Some(t) = t {
            let detrended = series[i] - t;
            if detrended.is_finite() {
                phase_sums[i % period] += detrended;
                phase_counts[i % period] += 1;
            }
        }
    }
    let mut phase_means: Vec<f64> = phase_sums
        .iter()
        .zip(&phase_counts)
        .map(|(&s, &c)| if c > 0 { s / c as f64 } else { 0.0 })
        .collect();
    let grand_mean = phase_means.iter().sum::<f64>() / period as f64;
    for m in &mut phase_means {
        *m -= grand_mean;
    }

    let seasonal: Vec<f64> = (0..n).map(|i| phase_means[i % period]).collect();
    let residual: Vec<Option<f64>> = trend
        .iter()
        .enumerate()
        .map(|(i, t)| t.map(|t| series[i] - t - seasonal[i]))
        .collect();

    Ok(Decomposition { trend, seasonal, residual })
}

/// Centered moving average over one period.
///
/// Odd periods use a plain window of `period` points; even periods use the
/// 2xMA over `period + 1` points with half weights at both ends, keeping
/// the window centered.
fn centered_moving_average(series: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = series.len();
    let half = period / 2;
    let mut out = vec![None; n];

    for i in half..n - half {
        let value = if period % 2 == 1 {
            series[i - half..=i + half].iter().sum::<f64>() / period as f64
        } else {
            let lo = i - half;
            let hi = i + half;
            let mut acc = 0.5 * (series[lo] + series[hi]);
            acc += series[lo + 1..hi].iter().sum::<f64>();
            acc / period as f64
        };
        out[i] = Some(value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_period_and_short_series() {
        assert!(seasonal_decompose(&[1.0, 2.0], 0).is_err());
        assert!(seasonal_decompose(&[1.0, 2.0, 3.0], 2).is_err());
    }

    #[test]
    fn edge_positions_have_no_trend() {
        let series: Vec<f64> = (0..12).map(|i| i as f64).collect();
        let d = seasonal_decompose(&series, 3).unwrap();
        assert!(d.trend[0].is_none());
        assert!(d.trend[11].is_none());
        assert!(d.trend[1].is_some());
        assert_eq!(d.trend_values().len(), 10);
    }

    #[test]
    fn even_period_trims_half_period_each_side() {
        let series: Vec<f64> = (0..12).map(|i| (i % 4) as f64).collect();
        let d = seasonal_decompose(&series, 4).unwrap();
        let defined = d.trend.iter().filter(|t| t.is_some()).count();
        assert_eq!(defined, 12 - 4);
    }

    #[test]
    fn linear_series_has_linear_trend() {
        let series: Vec<f64> = (0..20).map(|i| 2.0 * i as f64).collect();
        let d = seasonal_decompose(&series, 5).unwrap();
        // A moving average of a linear series reproduces it away from edges.
        for (i, t) in d.trend.iter().enumerate() {
            if let Some(t) = t {
                assert!((t - series[i]).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn constant_series_has_constant_trend_and_zero_seasonal() {
        let series = vec![5.0; 16];
        let d = seasonal_decompose(&series, 4).unwrap();
        for t in d.trend_values() {
            assert!((t - 5.0).abs() < 1e-12);
        }
        for s in &d.seasonal {
            assert!(s.abs() < 1e-12);
        }
    }

    #[test]
    fn seasonal_component_recovers_cycle_shape() {
        // Period-4 sawtooth around zero; no trend.
        let cycle = [0.0, 3.0, 0.0, -3.0];
        let series: Vec<f64> = (0..24).map(|i| cycle[i % 4]).collect();
        let d = seasonal_decompose(&series, 4).unwrap();
        for (i, s) in d.seasonal.iter().enumerate() {
            assert!((s - cycle[i % 4]).abs() < 1e-9, "phase {i}");
        }
    }
}
