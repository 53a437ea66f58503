//! Descriptive-statistic kernels shared by the profiling engine.
//!
//! All kernels return NaN (rather than erroring) when the input is too
//! small for the statistic; the profiler maps non-finite values to the
//! JSON undefined marker.

use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Arithmetic mean; NaN for an empty slice.
pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return f64::NAN;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Sample variance (n - 1 denominator); NaN below two observations.
pub fn variance(xs: &[f64]) -> f64 {
    let n = xs.len();
    if n < 2 {
        return f64::NAN;
    }
    let mu = mean(xs);
    xs.iter()
        .map(|&v| {
            let d = v - mu;
            d * d
        })
        .sum::<f64>()
        / (n - 1) as f64
}

/// Sample standard deviation.
pub fn std_dev(xs: &[f64]) -> f64 {
    variance(xs).sqrt()
}

/// Bias-adjusted Fisher-Pearson skewness; NaN below three observations or
/// for a constant sample.
pub fn skewness(xs: &[f64]) -> f64 {
    let n = xs.len() as f64;
    if xs.len() < 3 {
        return f64::NAN;
    }
    let mu = mean(xs);
    let m2 = xs.iter().map(|&v| (v - mu).powi(2)).sum::<f64>() / n;
    let m3 = xs.iter().map(|&v| (v - mu).powi(3)).sum::<f64>() / n;
    if m2 <= 0.0 {
        return f64::NAN;
    }
    let g1 = m3 / m2.powf(1.5);
    g1 * (n * (n - 1.0)).sqrt() / (n - 2.0)
}

/// Bias-adjusted excess kurtosis; NaN below four observations or for a
/// constant sample.
pub fn kurtosis(xs: &[f64]) -> f64 {
    let n = xs.len() as f64;
    if xs.len() < 4 {
        return f64::NAN;
    }
    let mu = mean(xs);
    let m2 = xs.iter().map(|&v| (v - mu).powi(2)).sum::<f64>() / n;
    let m4 = xs.iter().map(|&v| (v - mu).powi(4)).sum::<f64>() / n;
    if m2 <= 0.0 {
        return f64::NAN;
    }
    let g2 = m4 / (m2 * m2) - 3.0;
    ((n - 1.0) / ((n - 2.0) * (n - 3.0))) * ((n + 1.0) * g2 + 6.0)
}

/// Median; NaN for an empty slice.
pub fn median(xs: &[f64]) -> f64 {
    quantile(xs, 0.5)
}

/// Median absolute deviation around the median.
pub fn mad(xs: &[f64]) -> f64 {
    let med = median(xs);
    let deviations: Vec<f64> = xs.iter().map(|&v| (v - med).abs()).collect();
    median(&deviations)
}

/// Linearly interpolated quantile `q` in [0, 1]; NaN for an empty slice.
pub fn quantile(xs: &[f64], q: f64) -> f64 {
    if xs.is_empty() || !(0.0..=1.0).contains(&q) {
        return f64::NAN;
    }
    let mut sorted = xs.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = pos - lo as f64;
        sorted[lo] * (1.0 - frac) + sorted[hi] * frac
    }
}

/// Chi-squared test of uniformity over observed category counts.
///
/// Returns `(statistic, pvalue)`, or `None` when there are no observations.
/// A single category is trivially uniform.
pub fn chi_squared_uniform(counts: &[usize]) -> Option<(f64, f64)> {
    let total: usize = counts.iter().sum();
    if counts.is_empty() || total == 0 {
        return None;
    }
    if counts.len() == 1 {
        return Some((0.0, 1.0));
    }

    let expected = total as f64 / counts.len() as f64;
    let statistic: f64 =
        counts.iter().map(|&o| (o as f64 - expected).powi(2) / expected).sum();

    let df = (counts.len() - 1) as f64;
    let pvalue = match ChiSquared::new(df) {
        Ok(dist) => (1.0 - dist.cdf(statistic)).clamp(0.0, 1.0),
        Err(_) => return None,
    };
    Some((statistic, pvalue))
}

/// Autocorrelation of `xs` at `lag`; NaN when the series is too short or
/// has no variance.
pub fn autocorrelation(xs: &[f64], lag: usize) -> f64 {
    if lag == 0 || xs.len() <= lag {
        return f64::NAN;
    }
    let mu = mean(xs);
    let denom: f64 = xs.iter().map(|&v| (v - mu).powi(2)).sum();
    if denom <= 0.0 {
        return f64::NAN;
    }
    let numer: f64 =
        xs.windows(lag + 1).map(|w| (w[0] - mu) * (w[lag] - mu)).sum();
    numer / denom
}
