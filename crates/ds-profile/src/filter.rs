//! Whitelist filtering of the raw profiling report.
//!
//! Each statistics family keeps a fixed field set; everything else in the
//! report, including the `type` tag itself, is projected away. Variables
//! whose family is unknown are dropped entirely.

use ds_core::ProfileReport;
use indexmap::IndexMap;
use serde_json::Map;

/// Whitelist entry: keep a terminal field as-is, or recurse into a nested
/// mapping keeping only the listed sub-fields.
#[derive(Debug, Clone, Copy)]
pub enum FieldFilter {
    /// Keep the reported value unchanged.
    Keep,
    /// Recurse when the reported value is a nested mapping; keep it
    /// unchanged otherwise.
    Nested(&'static [(&'static str, FieldFilter)]),
}

const CHI_SQUARED_FIELDS: &[(&str, FieldFilter)] =
    &[("statistic", FieldFilter::Keep), ("pvalue", FieldFilter::Keep)];

const GAP_STATS_FIELDS: &[(&str, FieldFilter)] = &[
    ("min", FieldFilter::Keep),
    ("max", FieldFilter::Keep),
    ("mean", FieldFilter::Keep),
    ("std", FieldFilter::Keep),
    ("n_gaps", FieldFilter::Keep),
];

/// Fields kept for `Categorical` variables.
pub const CATEGORICAL_FIELDS: &[(&str, FieldFilter)] = &[
    ("n", FieldFilter::Keep),
    ("n_distinct", FieldFilter::Keep),
    ("p_distinct", FieldFilter::Keep),
    ("is_unique", FieldFilter::Keep),
    ("n_unique", FieldFilter::Keep),
    ("p_unique", FieldFilter::Keep),
    ("ordering", FieldFilter::Keep),
    ("n_missing", FieldFilter::Keep),
    ("p_missing", FieldFilter::Keep),
    ("memory_size", FieldFilter::Keep),
    ("imbalance", FieldFilter::Keep),
    ("max_length", FieldFilter::Keep),
    ("mean_length", FieldFilter::Keep),
    ("median_length", FieldFilter::Keep),
    ("min_length", FieldFilter::Keep),
    ("chi_squared", FieldFilter::Nested(CHI_SQUARED_FIELDS)),
];

/// Fields kept for `TimeSeries` variables.
pub const TIMESERIES_FIELDS: &[(&str, FieldFilter)] = &[
    ("n", FieldFilter::Keep),
    ("n_distinct", FieldFilter::Keep),
    ("p_distinct", FieldFilter::Keep),
    ("is_unique", FieldFilter::Keep),
    ("n_unique", FieldFilter::Keep),
    ("p_unique", FieldFilter::Keep),
    ("ordering", FieldFilter::Keep),
    ("n_missing", FieldFilter::Keep),
    ("p_missing", FieldFilter::Keep),
    ("memory_size", FieldFilter::Keep),
    ("mean", FieldFilter::Keep),
    ("std", FieldFilter::Keep),
    ("variance", FieldFilter::Keep),
    ("min", FieldFilter::Keep),
    ("max", FieldFilter::Keep),
    ("kurtosis", FieldFilter::Keep),
    ("skewness", FieldFilter::Keep),
    ("sum", FieldFilter::Keep),
    ("mad", FieldFilter::Keep),
    ("range", FieldFilter::Keep),
    ("seasonal", FieldFilter::Keep),
    ("stationary", FieldFilter::Keep),
    ("chi_squared", FieldFilter::Nested(CHI_SQUARED_FIELDS)),
    ("gap_stats", FieldFilter::Nested(GAP_STATS_FIELDS)),
];

/// Fields kept for `Numeric` variables.
pub const NUMERIC_FIELDS: &[(&str, FieldFilter)] = &[
    ("n", FieldFilter::Keep),
    ("n_distinct", FieldFilter::Keep),
    ("p_distinct", FieldFilter::Keep),
    ("is_unique", FieldFilter::Keep),
    ("n_unique", FieldFilter::Keep),
    ("p_unique", FieldFilter::Keep),
    ("ordering", FieldFilter::Keep),
    ("n_missing", FieldFilter::Keep),
    ("p_missing", FieldFilter::Keep),
    ("memory_size", FieldFilter::Keep),
    ("mean", FieldFilter::Keep),
    ("std", FieldFilter::Keep),
    ("variance", FieldFilter::Keep),
    ("min", FieldFilter::Keep),
    ("max", FieldFilter::Keep),
    ("kurtosis", FieldFilter::Keep),
    ("skewness", FieldFilter::Keep),
    ("sum", FieldFilter::Keep),
    ("mad", FieldFilter::Keep),
    ("range", FieldFilter::Keep),
    ("iqr", FieldFilter::Keep),
    ("cv", FieldFilter::Keep),
    ("p_zeros", FieldFilter::Keep),
    ("chi_squared", FieldFilter::Nested(CHI_SQUARED_FIELDS)),
];

/// Whitelist for a reported family name, if the family is known.
pub fn fields_for_type(type_name: &str) -> Option<&'static [(&'static str, FieldFilter)]> {
    match type_name {
        "Categorical" => Some(CATEGORICAL_FIELDS),
        "TimeSeries" => Some(TIMESERIES_FIELDS),
        "Numeric" => Some(NUMERIC_FIELDS),
        _ => None,
    }
}

/// Project a variable's statistics against a whitelist.
///
/// A key survives only if listed; when both the reported value and the
/// whitelist entry are nested mappings the projection recurses, otherwise
/// the reported value is kept as-is.
pub fn filter_nested_fields(
    details: &Map<String, serde_json::Value>,
    keep: &[(&str, FieldFilter)],
) -> Map<String, serde_json::Value> {
    let mut filtered = Map::new();
    for (key, value) in details {
        let Some((_, filter)) = keep.iter().find(|(name, _)| *name == key.as_str()) else {
            continue;
        };
        let kept = match (value, filter) {
            (serde_json::Value::Object(nested), FieldFilter::Nested(sub)) => {
                serde_json::Value::Object(filter_nested_fields(nested, sub))
            }
            _ => value.clone(),
        };
        filtered.insert(key.clone(), kept);
    }
    filtered
}

/// Filter a whole report: per-variable whitelist projection by reported
/// type; variables of unknown type (or with a malformed entry) are dropped.
pub fn filter_report(report: &ProfileReport) -> IndexMap<String, Map<String, serde_json::Value>> {
    let mut filtered = IndexMap::new();
    for (variable, details) in &report.variables {
        let Some(details) = details.as_object() else {
            continue;
        };
        let Some(type_name) = details.get("type").and_then(|t| t.as_str()) else {
            continue;
        };
        if let Some(keep) = fields_for_type(type_name) {
            filtered.insert(variable.clone(), filter_nested_fields(details, keep));
        }
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: serde_json::Value) -> Map<String, serde_json::Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn keeps_only_whitelisted_fields() {
        let details = as_map(json!({
            "type": "Categorical",
            "n": 10,
            "histogram": [1, 2, 3],
            "chi_squared": {"statistic": 1.0, "pvalue": 0.5, "dof": 2},
        }));
        let filtered = filter_nested_fields(&details, CATEGORICAL_FIELDS);
        assert_eq!(filtered.get("n"), Some(&json!(10)));
        assert!(filtered.get("type").is_none());
        assert!(filtered.get("histogram").is_none());
        assert_eq!(filtered.get("chi_squared"), Some(&json!({"statistic": 1.0, "pvalue": 0.5})));
    }

    #[test]
    fn non_nested_value_under_nested_filter_is_kept_as_is() {
        let details = as_map(json!({"chi_squared": "not computed"}));
        let filtered = filter_nested_fields(&details, CATEGORICAL_FIELDS);
        assert_eq!(filtered.get("chi_squared"), Some(&json!("not computed")));
    }

    #[test]
    fn filtering_is_idempotent() {
        let details = as_map(json!({
            "type": "Numeric",
            "n": 5,
            "mean": 2.0,
            "extra": true,
            "chi_squared": {"statistic": 0.1, "pvalue": 0.9, "junk": 1},
        }));
        let once = filter_nested_fields(&details, NUMERIC_FIELDS);
        let twice = filter_nested_fields(&once, NUMERIC_FIELDS);
        assert_eq!(once, twice);
    }

    #[test]
    fn unknown_variable_types_are_dropped() {
        let mut report = ProfileReport::new();
        report.variables.insert("good".to_string(), json!({"type": "Numeric", "n": 1}));
        report.variables.insert("bad".to_string(), json!({"type": "Image", "n": 1}));
        report.variables.insert("untyped".to_string(), json!({"n": 1}));
        let filtered = filter_report(&report);
        assert_eq!(filtered.len(), 1);
        assert!(filtered.contains_key("good"));
    }
}
