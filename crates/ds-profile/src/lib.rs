//! # ds-profile
//!
//! Column profiling for driftscan: a native engine producing the nested
//! per-variable statistics report, and the reduction pipeline that filters
//! the report against per-type field whitelists, flattens it, and derives
//! the observability metrics.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod filter;
pub mod flatten;
pub mod metrics;
pub mod profiler;
pub mod reduce;
pub mod stats;

pub use filter::{filter_nested_fields, filter_report, FieldFilter};
pub use flatten::flatten_fields;
pub use metrics::{derive_metrics, CHI_SQUARED_ALERT_LEVEL};
pub use profiler::NativeProfiler;
pub use reduce::reduce_report;
