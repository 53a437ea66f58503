//! Built-in profiling engine.
//!
//! Produces the raw nested statistics report consumed by the reduction
//! pipeline: one entry per variable with a `"type"` key naming the
//! statistics family and the family's field battery. Columns not declared
//! in the type schema are reported as `Unsupported` and fall out of the
//! report during filtering.

use std::collections::HashMap;

use ds_core::{Column, Dataset, ProfileReport, Profiler, Result, SemanticType, TypeSchema, Value};
use serde_json::{json, Map};

use crate::stats;

/// Profiling engine computing the per-type statistics batteries natively.
#[derive(Debug, Clone)]
pub struct NativeProfiler {
    /// Seasonality used for the time-series `seasonal` flag.
    period: usize,
}

impl NativeProfiler {
    /// Create a profiler with the given seasonality.
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Default for NativeProfiler {
    fn default() -> Self {
        Self::new(12)
    }
}

impl Profiler for NativeProfiler {
    fn profile(&self, dataset: &Dataset, schema: &TypeSchema) -> Result<ProfileReport> {
        let mut report = ProfileReport::new();
        for (name, column) in dataset.iter() {
            let variable = match schema.get(name) {
                Some(SemanticType::Categorical) => categorical_variable(column),
                Some(SemanticType::Numeric) => numeric_variable(column),
                Some(SemanticType::TimeSeries) => timeseries_variable(column, self.period),
                None => {
                    tracing::debug!(column = %name, "column missing from type schema");
                    unsupported_variable(column)
                }
            };
            report.variables.insert(name.clone(), serde_json::Value::Object(variable));
        }
        Ok(report)
    }
}

/// Finite float to JSON, mapping NaN/inf to the undefined marker.
fn num(value: f64) -> serde_json::Value {
    serde_json::Value::from(value)
}

fn common_stats(column: &Column) -> Map<String, serde_json::Value> {
    let n = column.len();
    let n_missing = column.null_count();
    let non_missing = n - n_missing;

    let mut counts: HashMap<&Value, usize> = HashMap::new();
    for value in column.values.iter().filter(|v| !v.is_null()) {
        *counts.entry(value).or_insert(0) += 1;
    }
    let n_distinct = counts.len();
    let n_unique = counts.values().filter(|&&c| c == 1).count();

    let mut out = Map::new();
    out.insert("n".to_string(), json!(n));
    out.insert("n_distinct".to_string(), json!(n_distinct));
    out.insert("p_distinct".to_string(), num(n_distinct as f64 / non_missing as f64));
    out.insert("is_unique".to_string(), json!(non_missing > 0 && n_distinct == non_missing));
    out.insert("n_unique".to_string(), json!(n_unique));
    out.insert("p_unique".to_string(), num(n_unique as f64 / non_missing as f64));
    out.insert("ordering".to_string(), json!(is_ordered(column)));
    out.insert("n_missing".to_string(), json!(n_missing));
    out.insert("p_missing".to_string(), num(n_missing as f64 / n as f64));
    out.insert("memory_size".to_string(), json!(memory_size(column)));
    out
}

/// Whether the non-missing cells are non-decreasing (numeric order where
/// both sides are numeric, lexical order otherwise).
fn is_ordered(column: &Column) -> bool {
    let cells: Vec<&Value> = column.values.iter().filter(|v| !v.is_null()).collect();
    cells.windows(2).all(|w| value_cmp(w[0], w[1]) != std::cmp::Ordering::Greater)
}

fn value_cmp(a: &Value, b: &Value) -> std::cmp::Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

/// Approximate resident size of the column in bytes.
fn memory_size(column: &Column) -> usize {
    let strings: usize = column
        .values
        .iter()
        .map(|v| match v {
            Value::Str(s) => s.len(),
            _ => 0,
        })
        .sum();
    std::mem::size_of::<Value>() * column.len() + strings
}

fn chi_squared_field(column: &Column) -> Option<serde_json::Value> {
    let mut counts: HashMap<&Value, usize> = HashMap::new();
    for value in column.values.iter().filter(|v| !v.is_null()) {
        *counts.entry(value).or_insert(0) += 1;
    }
    let counts: Vec<usize> = counts.into_values().collect();
    stats::chi_squared_uniform(&counts)
        .map(|(statistic, pvalue)| json!({ "statistic": statistic, "pvalue": pvalue }))
}

fn categorical_variable(column: &Column) -> Map<String, serde_json::Value> {
    let mut out = Map::new();
    out.insert("type".to_string(), json!("Categorical"));
    out.extend(common_stats(column));

    let rendered: Vec<String> = column
        .values
        .iter()
        .filter(|v| !v.is_null())
        .map(ToString::to_string)
        .collect();
    let lengths: Vec<f64> = rendered.iter().map(|s| s.chars().count() as f64).collect();
    out.insert("imbalance".to_string(), num(imbalance(&rendered)));
    out.insert("max_length".to_string(), num(lengths.iter().copied().fold(f64::NAN, f64::max)));
    out.insert("mean_length".to_string(), num(stats::mean(&lengths)));
    out.insert("median_length".to_string(), num(stats::median(&lengths)));
    out.insert("min_length".to_string(), num(lengths.iter().copied().fold(f64::NAN, f64::min)));
    if let Some(chi) = chi_squared_field(column) {
        out.insert("chi_squared".to_string(), chi);
    }
    out
}

/// Category imbalance: 1 minus the normalized count entropy. 0 for a
/// perfectly balanced column, approaching 1 as one category dominates.
fn imbalance(rendered: &[String]) -> f64 {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for s in rendered {
        *counts.entry(s.as_str()).or_insert(0) += 1;
    }
    let k = counts.len();
    if k <= 1 {
        return 0.0;
    }
    let total = rendered.len() as f64;
    let entropy: f64 = counts
        .values()
        .map(|&c| {
            let p = c as f64 / total;
            -p * p.ln()
        })
        .sum();
    1.0 - entropy / (k as f64).ln()
}

fn numeric_battery(values: &[f64]) -> Map<String, serde_json::Value> {
    let mut out = Map::new();
    let min = values.iter().copied().fold(f64::NAN, f64::min);
    let max = values.iter().copied().fold(f64::NAN, f64::max);
    let mean = stats::mean(values);
    let std = stats::std_dev(values);
    out.insert("mean".to_string(), num(mean));
    out.insert("std".to_string(), num(std));
    out.insert("variance".to_string(), num(stats::variance(values)));
    out.insert("min".to_string(), num(min));
    out.insert("max".to_string(), num(max));
    out.insert("kurtosis".to_string(), num(stats::kurtosis(values)));
    out.insert("skewness".to_string(), num(stats::skewness(values)));
    out.insert("sum".to_string(), num(values.iter().sum()));
    out.insert("mad".to_string(), num(stats::mad(values)));
    out.insert("range".to_string(), num(max - min));
    out
}

fn numeric_variable(column: &Column) -> Map<String, serde_json::Value> {
    let values = column.finite_values();

    let mut out = Map::new();
    out.insert("type".to_string(), json!("Numeric"));
    out.extend(common_stats(column));
    out.extend(numeric_battery(&values));
    out.insert(
        "iqr".to_string(),
        num(stats::quantile(&values, 0.75) - stats::quantile(&values, 0.25)),
    );
    out.insert("cv".to_string(), num(stats::std_dev(&values) / stats::mean(&values)));
    let zeros = values.iter().filter(|&&v| v == 0.0).count();
    out.insert("p_zeros".to_string(), num(zeros as f64 / column.len() as f64));
    if let Some(chi) = chi_squared_field(column) {
        out.insert("chi_squared".to_string(), chi);
    }
    out
}

fn timeseries_variable(column: &Column, period: usize) -> Map<String, serde_json::Value> {
    let values = column.finite_values();

    let mut out = Map::new();
    out.insert("type".to_string(), json!("TimeSeries"));
    out.extend(common_stats(column));
    out.extend(numeric_battery(&values));

    let seasonal = stats::autocorrelation(&values, period) > 0.5;
    out.insert("seasonal".to_string(), json!(seasonal));
    out.insert("stationary".to_string(), json!(is_stationary(&values)));
    if let Some(chi) = chi_squared_field(column) {
        out.insert("chi_squared".to_string(), chi);
    }
    out.insert("gap_stats".to_string(), gap_stats(column));
    out
}

/// Split-half stationarity heuristic: the two halves must agree in mean
/// (within a tenth of the overall spread) and not differ in variance by
/// more than a factor of four.
fn is_stationary(values: &[f64]) -> bool {
    if values.len() < 4 {
        return false;
    }
    let mid = values.len() / 2;
    let (first, second) = values.split_at(mid);
    let mean_shift = (stats::mean(first) - stats::mean(second)).abs();
    let spread = stats::std_dev(values);
    let mean_ok = if spread > 0.0 { mean_shift <= 0.1 * spread } else { mean_shift == 0.0 };

    let (v1, v2) = (stats::variance(first), stats::variance(second));
    let variance_ok = if v1 == 0.0 && v2 == 0.0 {
        true
    } else {
        let (lo, hi) = if v1 < v2 { (v1, v2) } else { (v2, v1) };
        lo > 0.0 && hi / lo <= 4.0
    };
    mean_ok && variance_ok
}

/// Gap statistics over maximal runs of missing cells.
fn gap_stats(column: &Column) -> serde_json::Value {
    let mut gaps: Vec<f64> = Vec::new();
    let mut run = 0usize;
    for value in &column.values {
        if value.is_null() {
            run += 1;
        } else if run > 0 {
            gaps.push(run as f64);
            run = 0;
        }
    }
    if run > 0 {
        gaps.push(run as f64);
    }

    json!({
        "min": gaps.iter().copied().fold(f64::NAN, f64::min),
        "max": gaps.iter().copied().fold(f64::NAN, f64::max),
        "mean": stats::mean(&gaps),
        "std": stats::std_dev(&gaps),
        "n_gaps": gaps.len(),
    })
}

fn unsupported_variable(column: &Column) -> Map<String, serde_json::Value> {
    let mut out = Map::new();
    out.insert("type".to_string(), json!("Unsupported"));
    out.extend(common_stats(column));
    out
}
