//! The three-stage report reduction: filter, flatten, derive.

use ds_core::ProfileReport;
use serde_json::{json, Map};

use crate::filter::filter_report;
use crate::flatten::flatten_fields;
use crate::metrics::derive_metrics;

/// Reduce a raw profiling report to one flat record per variable.
///
/// Each record starts with `column_name`, carries the whitelisted and
/// flattened statistics for the variable's type family, and ends with the
/// derived observability metrics. Variables of unknown type produce no
/// record.
pub fn reduce_report(report: &ProfileReport) -> Vec<Map<String, serde_json::Value>> {
    let filtered = filter_report(report);
    filtered
        .into_iter()
        .map(|(variable, details)| {
            let mut record = Map::new();
            record.insert("column_name".to_string(), json!(variable));
            for (key, value) in flatten_fields(&details) {
                record.insert(key, value);
            }
            derive_metrics(&mut record);
            record
        })
        .collect()
}
