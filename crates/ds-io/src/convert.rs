//! Arrow `RecordBatch` ↔ `Dataset` conversion.

use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, BooleanArray, Float32Array, Float64Array, Int16Array, Int32Array,
    Int64Array, Int8Array, LargeStringArray, StringArray, UInt16Array, UInt32Array, UInt64Array,
    UInt8Array,
};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use ds_core::{Column, Dataset, Error, Result, Value};

pub(crate) fn table_err(e: impl std::fmt::Display) -> Error {
    Error::Table(e.to_string())
}

/// Assemble a dataset from Arrow record batches sharing one schema.
pub fn dataset_from_batches(batches: &[RecordBatch]) -> Result<Dataset> {
    let Some(first) = batches.first() else {
        return Ok(Dataset::new());
    };
    let schema = first.schema();

    let mut dataset = Dataset::new();
    for (index, field) in schema.fields().iter().enumerate() {
        let mut values = Vec::new();
        for batch in batches {
            extract_values(field.name(), batch.column(index), &mut values)?;
        }
        dataset.push_column(field.name().clone(), Column::new(values))?;
    }
    Ok(dataset)
}

fn extract_values(name: &str, array: &ArrayRef, values: &mut Vec<Value>) -> Result<()> {
    macro_rules! extract {
        ($array_type:ty, $variant:expr) => {{
            let typed = array.as_any().downcast_ref::<$array_type>().ok_or_else(|| {
                Error::Table(format!("column '{name}' does not match its declared Arrow type"))
            })?;
            for i in 0..typed.len() {
                if typed.is_null(i) {
                    values.push(Value::Null);
                } else {
                    values.push($variant(typed.value(i)));
                }
            }
        }};
    }

    match array.data_type() {
        DataType::Utf8 => extract!(StringArray, |v: &str| Value::Str(v.to_string())),
        DataType::LargeUtf8 => extract!(LargeStringArray, |v: &str| Value::Str(v.to_string())),
        DataType::Boolean => extract!(BooleanArray, Value::Bool),
        DataType::Int8 => extract!(Int8Array, |v| Value::Int(i64::from(v))),
        DataType::Int16 => extract!(Int16Array, |v| Value::Int(i64::from(v))),
        DataType::Int32 => extract!(Int32Array, |v| Value::Int(i64::from(v))),
        DataType::Int64 => extract!(Int64Array, Value::Int),
        DataType::UInt8 => extract!(UInt8Array, |v| Value::Int(i64::from(v))),
        DataType::UInt16 => extract!(UInt16Array, |v| Value::Int(i64::from(v))),
        DataType::UInt32 => extract!(UInt32Array, |v| Value::Int(i64::from(v))),
        DataType::UInt64 => extract!(UInt64Array, |v: u64| Value::Int(v as i64)),
        DataType::Float32 => extract!(Float32Array, |v| Value::Float(f64::from(v))),
        DataType::Float64 => extract!(Float64Array, Value::Float),
        other => {
            return Err(Error::Table(format!(
                "column '{name}' has unsupported Arrow type {other}"
            )));
        }
    }
    Ok(())
}

/// Arrow column type inferred from the cells actually present.
enum InferredType {
    Boolean,
    Int,
    Float,
    Text,
}

fn infer_type(column: &Column) -> InferredType {
    let mut saw_bool = false;
    let mut saw_int = false;
    let mut saw_float = false;
    for value in &column.values {
        match value {
            Value::Null => {}
            Value::Bool(_) => saw_bool = true,
            Value::Int(_) => saw_int = true,
            Value::Float(_) => saw_float = true,
            Value::Str(_) => return InferredType::Text,
        }
    }
    match (saw_bool, saw_int, saw_float) {
        (true, false, false) => InferredType::Boolean,
        (false, true, false) => InferredType::Int,
        // Mixed integers and floats widen; mixed booleans and numbers (and
        // all-null columns) fall back to text.
        (false, _, true) => InferredType::Float,
        _ => InferredType::Text,
    }
}

/// Render a dataset as a single Arrow record batch.
///
/// Column types are inferred from the cells: homogeneous booleans, integers,
/// or floats map to the matching Arrow type (integers widen to float when
/// mixed); anything else is rendered as text. Missing cells become Arrow
/// nulls.
pub fn record_batch_from_dataset(dataset: &Dataset) -> Result<RecordBatch> {
    if dataset.n_columns() == 0 {
        return Ok(RecordBatch::new_empty(Arc::new(Schema::empty())));
    }

    let mut fields = Vec::with_capacity(dataset.n_columns());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(dataset.n_columns());

    for (name, column) in dataset.iter() {
        let (data_type, array): (DataType, ArrayRef) = match infer_type(column) {
            InferredType::Boolean => {
                let cells: Vec<Option<bool>> = column
                    .values
                    .iter()
                    .map(|v| match v {
                        Value::Bool(b) => Some(*b),
                        _ => None,
                    })
                    .collect();
                (DataType::Boolean, Arc::new(BooleanArray::from(cells)))
            }
            InferredType::Int => {
                let cells: Vec<Option<i64>> = column
                    .values
                    .iter()
                    .map(|v| match v {
                        Value::Int(i) => Some(*i),
                        _ => None,
                    })
                    .collect();
                (DataType::Int64, Arc::new(Int64Array::from(cells)))
            }
            InferredType::Float => {
                let cells: Vec<Option<f64>> = column.values.iter().map(Value::as_f64).collect();
                (DataType::Float64, Arc::new(Float64Array::from(cells)))
            }
            InferredType::Text => {
                let cells: StringArray = column
                    .values
                    .iter()
                    .map(|v| if v.is_null() { None } else { Some(v.to_string()) })
                    .collect();
                (DataType::Utf8, Arc::new(cells))
            }
        };
        fields.push(Field::new(name, data_type, true));
        arrays.push(array);
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).map_err(table_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixed_dataset() -> Dataset {
        Dataset::from_columns(vec![
            ("label".to_string(), Column::from_strs(&["a", "b", "c"])),
            (
                "count".to_string(),
                Column::new(vec![Value::Int(1), Value::Null, Value::Int(3)]),
            ),
            ("ratio".to_string(), Column::from_f64(&[0.5, 1.5, 2.5])),
            (
                "flag".to_string(),
                Column::new(vec![Value::Bool(true), Value::Bool(false), Value::Null]),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn dataset_survives_batch_round_trip() {
        let dataset = mixed_dataset();
        let batch = record_batch_from_dataset(&dataset).unwrap();
        let back = dataset_from_batches(&[batch]).unwrap();
        assert_eq!(back, dataset);
    }

    #[test]
    fn empty_dataset_round_trips() {
        let batch = record_batch_from_dataset(&Dataset::new()).unwrap();
        assert_eq!(batch.num_columns(), 0);
        let back = dataset_from_batches(&[batch]).unwrap();
        assert_eq!(back.n_columns(), 0);
    }

    #[test]
    fn mixed_ints_and_floats_widen_to_float() {
        let dataset = Dataset::from_columns(vec![(
            "x".to_string(),
            Column::new(vec![Value::Int(1), Value::Float(2.5)]),
        )])
        .unwrap();
        let batch = record_batch_from_dataset(&dataset).unwrap();
        assert_eq!(batch.schema().field(0).data_type(), &DataType::Float64);
        let back = dataset_from_batches(&[batch]).unwrap();
        assert_eq!(
            back.column("x").unwrap().values,
            vec![Value::Float(1.0), Value::Float(2.5)]
        );
    }

    #[test]
    fn heterogeneous_cells_render_as_text() {
        let dataset = Dataset::from_columns(vec![(
            "x".to_string(),
            Column::new(vec![Value::Bool(true), Value::Int(2)]),
        )])
        .unwrap();
        let batch = record_batch_from_dataset(&dataset).unwrap();
        assert_eq!(batch.schema().field(0).data_type(), &DataType::Utf8);
    }

    #[test]
    fn multiple_batches_concatenate_rows() {
        let dataset = mixed_dataset();
        let batch = record_batch_from_dataset(&dataset).unwrap();
        let back = dataset_from_batches(&[batch.clone(), batch]).unwrap();
        assert_eq!(back.n_rows(), 6);
        assert_eq!(back.n_columns(), 4);
    }
}
