//! Analysis configuration shared across per-column operations.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::TypeSchema;

/// Configuration for analyzing the columns of a dataset pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Name of the time column; excluded from per-column analysis.
    pub time_column: String,
    /// Seasonality of the time-series columns (e.g. 12 for monthly data
    /// with yearly seasonality).
    pub period: usize,
    /// Declared semantic type per column.
    pub schema: TypeSchema,
}

impl AnalysisConfig {
    /// Create a validated configuration. `period` must be at least 1.
    pub fn new(time_column: &str, period: usize, schema: TypeSchema) -> Result<Self> {
        if period == 0 {
            return Err(Error::Validation("period must be >= 1".to_string()));
        }
        Ok(Self { time_column: time_column.to_string(), period, schema })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_period() {
        assert!(AnalysisConfig::new("ts", 0, TypeSchema::new()).is_err());
        assert!(AnalysisConfig::new("ts", 12, TypeSchema::new()).is_ok());
    }
}
