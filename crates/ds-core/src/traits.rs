//! Core traits for driftscan
//!
//! The profiling engine sits behind a trait so that orchestration depends
//! on the report schema, not on a concrete engine implementation.

use crate::error::Result;
use crate::schema::TypeSchema;
use crate::types::{Dataset, ProfileReport};

/// Profiling collaborator: produces the raw nested statistics report for a
/// dataset's columns.
///
/// Implementations emit one entry per variable with a `"type"` key naming
/// the statistics family (`Categorical`, `Numeric`, `TimeSeries`, ...); the
/// report reduction pipeline decides which fields survive.
pub trait Profiler {
    /// Profile `dataset` under the declared `schema`.
    fn profile(&self, dataset: &Dataset, schema: &TypeSchema) -> Result<ProfileReport>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EmptyProfiler;

    impl Profiler for EmptyProfiler {
        fn profile(&self, _dataset: &Dataset, _schema: &TypeSchema) -> Result<ProfileReport> {
            Ok(ProfileReport::new())
        }
    }

    #[test]
    fn trait_object_is_usable() {
        let profiler: &dyn Profiler = &EmptyProfiler;
        let report = profiler.profile(&Dataset::new(), &TypeSchema::new()).unwrap();
        assert!(report.variables.is_empty());
    }
}
