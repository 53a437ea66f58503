//! Dataset model: cell values, columns, and ordered column collections.

use std::hash::{Hash, Hasher};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A single cell of a column.
///
/// `Float` compares and hashes by bit pattern so that value sets (e.g. the
/// categorical set difference) are well-defined even for NaN payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    /// Missing value.
    Null,
    /// Boolean.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit float.
    Float(f64),
    /// UTF-8 string.
    Str(String),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Str(s) => s.hash(state),
        }
    }
}

impl Value {
    /// Whether this cell is missing.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the cell, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Convert to a JSON value. Non-finite floats become JSON null (the
    /// undefined marker used throughout report records).
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Value::from(*f),
            Value::Str(s) => serde_json::Value::from(s.clone()),
        }
    }

    /// Convert from a JSON value. Arrays and objects are rendered to their
    /// JSON text, matching how heterogeneous report cells are written to
    /// tabular outputs.
    pub fn from_json(value: &serde_json::Value) -> Value {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::Str(s.clone()),
            other => Value::Str(other.to_string()),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

/// One ordered sequence of cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Cell values, one per row.
    pub values: Vec<Value>,
}

impl Column {
    /// Create a column from cell values.
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Create a column from floats.
    pub fn from_f64(values: &[f64]) -> Self {
        Self { values: values.iter().map(|&v| Value::Float(v)).collect() }
    }

    /// Create a column from strings.
    pub fn from_strs(values: &[&str]) -> Self {
        Self { values: values.iter().map(|&v| Value::Str(v.to_string())).collect() }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of missing cells.
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    /// All rows as floats, keeping row positions: missing or non-numeric
    /// cells become NaN.
    pub fn numeric_values(&self) -> Vec<f64> {
        self.values.iter().map(|v| v.as_f64().unwrap_or(f64::NAN)).collect()
    }

    /// Non-missing numeric cells, in order, with non-finite values dropped.
    pub fn finite_values(&self) -> Vec<f64> {
        self.values.iter().filter_map(Value::as_f64).filter(|v| v.is_finite()).collect()
    }
}

/// An ordered, named collection of equal-length columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    columns: IndexMap<String, Column>,
}

impl Dataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dataset from named columns, preserving their order.
    ///
    /// Fails with `Validation` if the columns do not share one row count or
    /// if a name repeats.
    pub fn from_columns<I>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, Column)>,
    {
        let mut dataset = Self::new();
        for (name, column) in columns {
            dataset.push_column(name, column)?;
        }
        Ok(dataset)
    }

    /// Append a column, validating the shared row count and name uniqueness.
    pub fn push_column(&mut self, name: String, column: Column) -> Result<()> {
        if self.columns.contains_key(&name) {
            return Err(Error::Validation(format!("duplicate column name: {name}")));
        }
        if let Some(expected) = self.columns.values().next().map(Column::len) {
            if column.len() != expected {
                return Err(Error::Validation(format!(
                    "column '{name}' has {} rows, expected {expected}",
                    column.len()
                )));
            }
        }
        self.columns.insert(name, column);
        Ok(())
    }

    /// Look up a column by name.
    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Look up a column by name, failing with `ColumnNotFound`.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns.get(name).ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.keys().cloned().collect()
    }

    /// Whether a column with this name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Iterate `(name, column)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Column)> {
        self.columns.iter()
    }

    /// Number of columns.
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows (0 for a dataset with no columns).
    pub fn n_rows(&self) -> usize {
        self.columns.values().next().map_or(0, Column::len)
    }

    /// Project the dataset onto the given columns, in the given order.
    pub fn select(&self, names: &[&str]) -> Result<Dataset> {
        let mut out = Self::new();
        for &name in names {
            let column = self.column(name)?;
            out.push_column(name.to_string(), column.clone())?;
        }
        Ok(out)
    }
}

/// Raw nested profiling report: variable name → nested statistics object.
///
/// Read-only input to report reduction; produced by a [`crate::Profiler`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileReport {
    /// Per-variable nested statistics, keyed by variable name.
    pub variables: IndexMap<String, serde_json::Value>,
}

impl ProfileReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }
}
