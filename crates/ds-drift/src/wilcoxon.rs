//! Wilcoxon signed-rank test for paired samples.
//!
//! Non-parametric test for a systematic shift between paired observations.
//! Zero differences are discarded before ranking; absolute differences get
//! midranks, and the two-sided p-value comes from the tie-corrected normal
//! approximation of the rank-sum statistic.

use ds_core::{Error, Result};
use statrs::distribution::{ContinuousCDF, Normal};

/// Outcome of a signed-rank test.
#[derive(Debug, Clone, Copy)]
pub struct WilcoxonResult {
    /// The smaller of the positive and negative rank sums.
    pub statistic: f64,
    /// Two-sided p-value under the normal approximation.
    pub pvalue: f64,
}

/// Run the signed-rank test on paired samples `x` and `y`.
///
/// Fails with `Validation` on length mismatch, empty, or non-finite input,
/// and with `Computation` when every paired difference is exactly zero:
/// the test statistic is undefined in that case and callers must decide a
/// policy for it.
pub fn wilcoxon_signed_rank(x: &[f64], y: &[f64]) -> Result<WilcoxonResult> {
    if x.len() != y.len() {
        return Err(Error::Validation("paired samples must have equal length".to_string()));
    }
    if x.is_empty() {
        return Err(Error::Validation("paired samples must be non-empty".to_string()));
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(Error::Validation("paired samples must be finite".to_string()));
    }

    let diffs: Vec<f64> = x.iter().zip(y).map(|(a, b)| a - b).filter(|d| *d != 0.0).collect();
    if diffs.is_empty() {
        return Err(Error::Computation("all paired differences are zero".to_string()));
    }

    let n = diffs.len();
    let (ranks, tie_term) = midranks(&diffs);

    let mut rank_sum_positive = 0.0f64;
    let mut rank_sum_negative = 0.0f64;
    for (d, r) in diffs.iter().zip(&ranks) {
        if *d > 0.0 {
            rank_sum_positive += r;
        } else {
            rank_sum_negative += r;
        }
    }
    let statistic = rank_sum_positive.min(rank_sum_negative);

    let nf = n as f64;
    let mean = nf * (nf + 1.0) / 4.0;
    let variance = nf * (nf + 1.0) * (2.0 * nf + 1.0) / 24.0 - tie_term / 48.0;
    if variance <= 0.0 {
        return Err(Error::Computation("zero variance in signed-rank statistic".to_string()));
    }
    let z = (statistic - mean) / variance.sqrt();

    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| Error::Computation(format!("failed to construct normal distribution: {e}")))?;
    let pvalue = (2.0 * normal.cdf(z)).clamp(0.0, 1.0);

    Ok(WilcoxonResult { statistic, pvalue })
}

/// Midranks of the absolute differences, plus the tie-correction term
/// `sum(t^3 - t)` over tie groups.
fn midranks(diffs: &[f64]) -> (Vec<f64>, f64) {
    let n = diffs.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        diffs[a].abs().partial_cmp(&diffs[b].abs()).unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut ranks = vec![0.0f64; n];
    let mut tie_term = 0.0f64;
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && diffs[order[j + 1]].abs() == diffs[order[i]].abs() {
            j += 1;
        }
        // Positions i..=j share one midrank.
        let midrank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = midrank;
        }
        let ties = (j - i + 1) as f64;
        tie_term += ties * ties * ties - ties;
        i = j + 1;
    }
    (ranks, tie_term)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_input_shapes() {
        assert!(wilcoxon_signed_rank(&[1.0], &[1.0, 2.0]).is_err());
        assert!(wilcoxon_signed_rank(&[], &[]).is_err());
        assert!(wilcoxon_signed_rank(&[f64::NAN], &[1.0]).is_err());
    }

    #[test]
    fn all_zero_differences_are_degenerate() {
        let x = [1.0, 2.0, 3.0];
        let err = wilcoxon_signed_rank(&x, &x).unwrap_err();
        assert!(matches!(err, Error::Computation(_)));
    }

    #[test]
    fn one_sided_shift_is_significant() {
        // Every difference positive: the negative rank sum is zero and the
        // approximation pushes the p-value well below 0.05 for n = 12.
        let x: Vec<f64> = (0..12).map(|i| i as f64 + 1.0).collect();
        let y: Vec<f64> = (0..12).map(|i| i as f64).collect();
        let result = wilcoxon_signed_rank(&x, &y).unwrap();
        assert_eq!(result.statistic, 0.0);
        assert!(result.pvalue < 0.01, "p = {}", result.pvalue);
    }

    #[test]
    fn symmetric_differences_are_not_significant() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y = [2.0, 1.0, 4.0, 3.0, 6.0, 5.0];
        let result = wilcoxon_signed_rank(&x, &y).unwrap();
        assert!(result.pvalue > 0.5, "p = {}", result.pvalue);
    }

    #[test]
    fn midranks_average_tied_positions() {
        let (ranks, tie_term) = midranks(&[1.0, -1.0, 2.0]);
        assert_eq!(ranks, vec![1.5, 1.5, 3.0]);
        assert_eq!(tie_term, 6.0);
    }
}
