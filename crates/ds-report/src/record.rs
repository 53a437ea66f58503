//! Sparse analysis records and their union-of-columns accumulation.

use ds_core::{Column, Dataset, Result, Value};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

/// One row of the final report: field name → value, with `column_name`
/// always present. Fields a record never produced are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisRecord {
    #[serde(flatten)]
    fields: IndexMap<String, serde_json::Value>,
}

impl AnalysisRecord {
    /// Start a record for the named column.
    pub fn new(column_name: &str) -> Self {
        let mut fields = IndexMap::new();
        fields.insert("column_name".to_string(), serde_json::Value::from(column_name));
        Self { fields }
    }

    /// Set one field, replacing any existing value.
    pub fn insert(&mut self, field: &str, value: serde_json::Value) {
        self.fields.insert(field.to_string(), value);
    }

    /// Overlay a batch of fields onto the record.
    pub fn merge<I>(&mut self, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        for (field, value) in fields {
            self.fields.insert(field, value);
        }
    }

    /// Value of one field, if the record carries it.
    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.fields.get(field)
    }

    /// The column this record describes.
    pub fn column_name(&self) -> &str {
        self.fields.get("column_name").and_then(|v| v.as_str()).unwrap_or_default()
    }

    /// Iterate fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
        self.fields.iter()
    }

    /// Number of fields the record carries.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

static NO_VALUE: serde_json::Value = serde_json::Value::Null;

/// Accumulating report table with heterogeneous-schema rows.
///
/// The column set is the union of every field any record produced, in
/// first-seen order; a row missing a column has an explicit "no value"
/// cell, not zero.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResultTable {
    rows: Vec<AnalysisRecord>,
}

impl ResultTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record.
    pub fn push(&mut self, record: AnalysisRecord) {
        self.rows.push(record);
    }

    /// The accumulated rows.
    pub fn rows(&self) -> &[AnalysisRecord] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Union of all fields across rows, in first-seen order.
    pub fn columns(&self) -> Vec<String> {
        let mut seen = IndexSet::new();
        for row in &self.rows {
            for (field, _) in row.fields() {
                if !seen.contains(field) {
                    seen.insert(field.clone());
                }
            }
        }
        seen.into_iter().collect()
    }

    /// Cell at `(row, column)`; the "no value" marker for absent fields.
    pub fn cell(&self, row: usize, column: &str) -> &serde_json::Value {
        self.rows.get(row).and_then(|r| r.get(column)).unwrap_or(&NO_VALUE)
    }

    /// Materialize into a rectangular dataset for tabular output.
    ///
    /// Cells holding JSON arrays or objects (e.g. `new_values`) are
    /// rendered to their JSON text; absent cells become missing values.
    pub fn to_dataset(&self) -> Result<Dataset> {
        let mut dataset = Dataset::new();
        for column in self.columns() {
            let cells: Vec<Value> =
                (0..self.rows.len()).map(|i| Value::from_json(self.cell(i, &column))).collect();
            dataset.push_column(column, Column::new(cells))?;
        }
        Ok(dataset)
    }
}
