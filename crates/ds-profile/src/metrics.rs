//! Derived observability metrics over flattened profile records.
//!
//! Every metric is computed row-wise from the record's own fields. A record
//! missing a required input, or a computation with a non-finite result
//! (division by zero), yields the JSON undefined marker for that metric
//! rather than an error.

use serde_json::Map;

/// Significance level for the categorical chi-squared alert.
pub const CHI_SQUARED_ALERT_LEVEL: f64 = 0.05;

/// Numeric view of a record field.
fn field(record: &Map<String, serde_json::Value>, key: &str) -> Option<f64> {
    record.get(key).and_then(serde_json::Value::as_f64)
}

/// Finite float to JSON; NaN/inf (and `None`) become the undefined marker.
fn undef_or(value: Option<f64>) -> serde_json::Value {
    value.map_or(serde_json::Value::Null, serde_json::Value::from)
}

/// Append the derived metric columns to a flattened profile record.
pub fn derive_metrics(record: &mut Map<String, serde_json::Value>) {
    let n = field(record, "n");
    let n_distinct = field(record, "n_distinct");
    let p_missing = field(record, "p_missing");
    let chi_squared_pvalue = field(record, "chi_squared_pvalue");
    let gap_count = field(record, "gap_stats_n_gaps");
    let mean = field(record, "mean");
    let std = field(record, "std");
    let range = field(record, "range");
    let p_zeros = field(record, "p_zeros");
    let skewness = field(record, "skewness");
    let cv = field(record, "cv");

    record.insert(
        "categorical_cardinality_ratio".to_string(),
        undef_or(n_distinct.zip(n).map(|(d, n)| d / n)),
    );
    record.insert(
        "categorical_missingness_impact".to_string(),
        undef_or(p_missing.zip(n_distinct).map(|(p, d)| p * d)),
    );
    record.insert(
        "categorical_chi_squared_alert".to_string(),
        chi_squared_pvalue
            .map_or(serde_json::Value::Null, |p| (p < CHI_SQUARED_ALERT_LEVEL).into()),
    );

    record.insert(
        "timeseries_gap_ratio".to_string(),
        undef_or(gap_count.zip(n).map(|(g, n)| g / n)),
    );
    let volatility = std.zip(mean).map(|(s, m)| s / m);
    record.insert("timeseries_volatility_index".to_string(), undef_or(volatility));
    // Same formula as the volatility index, preserving the source behavior.
    record.insert("timeseries_trend_consistency".to_string(), undef_or(volatility));

    record.insert("numeric_zero_ratio".to_string(), undef_or(p_zeros));
    record.insert(
        "numeric_outlier_indicator".to_string(),
        undef_or(range.zip(std).map(|(r, s)| r / s)),
    );
    record.insert("numeric_skewness_indicator".to_string(), undef_or(skewness));
    record.insert("numeric_cv".to_string(), undef_or(cv));
    record.insert(
        "numeric_missing_impact".to_string(),
        undef_or(p_missing.zip(mean).map(|(p, m)| p * m)),
    );

    record.insert("data_completeness".to_string(), undef_or(p_missing.map(|p| 1.0 - p)));
}
