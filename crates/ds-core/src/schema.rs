//! Declared semantic column types and the shared type schema.

use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Declared semantic type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    /// Discrete labels; drift analysis looks for newly observed values.
    Categorical,
    /// Plain numeric measurements.
    Numeric,
    /// Time-ordered numeric series; drift analysis looks for trend shifts.
    #[serde(rename = "timeseries")]
    TimeSeries,
}

impl FromStr for SemanticType {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_lowercase().as_str() {
            "categorical" => Ok(SemanticType::Categorical),
            "numeric" => Ok(SemanticType::Numeric),
            "timeseries" => Ok(SemanticType::TimeSeries),
            _ => Err(Error::Validation(format!("'{input}' is not a valid semantic type"))),
        }
    }
}

impl std::fmt::Display for SemanticType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SemanticType::Categorical => write!(f, "categorical"),
            SemanticType::Numeric => write!(f, "numeric"),
            SemanticType::TimeSeries => write!(f, "timeseries"),
        }
    }
}

/// Read-only column name → declared type mapping.
///
/// Shared by reference through every per-column operation; never mutated
/// during a run. A column missing from the schema is skipped by drift
/// analysis but still receives profiling-derived fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeSchema {
    types: IndexMap<String, SemanticType>,
}

impl TypeSchema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion.
    pub fn with(mut self, name: &str, semantic_type: SemanticType) -> Self {
        self.types.insert(name.to_string(), semantic_type);
        self
    }

    /// Declared type for a column, if any.
    pub fn get(&self, name: &str) -> Option<SemanticType> {
        self.types.get(name).copied()
    }

    /// Number of declared columns.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the schema declares no columns.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
