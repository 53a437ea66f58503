//! Columnar-binary read/write via the `parquet` crate's Arrow bridge.

use std::fs::File;
use std::path::Path;

use arrow::record_batch::RecordBatch;
use ds_core::{Dataset, Result};
use ::parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use ::parquet::arrow::ArrowWriter;
use ::parquet::basic::Compression;
use ::parquet::file::properties::WriterProperties;

use crate::convert::{dataset_from_batches, record_batch_from_dataset, table_err};
use crate::handler::TableHandler;

/// Parquet handler (Snappy-compressed on write).
#[derive(Debug, Default)]
pub struct ParquetHandler;

impl TableHandler for ParquetHandler {
    fn read(&self, path: &Path) -> Result<Dataset> {
        let file = File::open(path)?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(table_err)?;
        let reader = builder.build().map_err(table_err)?;
        let batches: Vec<RecordBatch> =
            reader.collect::<std::result::Result<_, _>>().map_err(table_err)?;
        dataset_from_batches(&batches)
    }

    fn write(&self, dataset: &Dataset, path: &Path) -> Result<()> {
        let batch = record_batch_from_dataset(dataset)?;
        let props = WriterProperties::builder().set_compression(Compression::SNAPPY).build();

        let file = File::create(path)?;
        let mut writer =
            ArrowWriter::try_new(file, batch.schema(), Some(props)).map_err(table_err)?;
        writer.write(&batch).map_err(table_err)?;
        writer.close().map_err(table_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ds_core::{Column, Value};
    use std::path::PathBuf;

    fn temp_path(stem: &str) -> PathBuf {
        std::env::temp_dir().join(format!("{stem}_{}.parquet", std::process::id()))
    }

    #[test]
    fn parquet_round_trip_preserves_values() {
        let dataset = Dataset::from_columns(vec![
            (
                "id".to_string(),
                Column::new(vec![Value::Int(1), Value::Int(2), Value::Null]),
            ),
            ("value".to_string(), Column::from_f64(&[0.25, 0.5, 0.75])),
            ("label".to_string(), Column::from_strs(&["x", "y", "z"])),
        ])
        .unwrap();

        let path = temp_path("ds_parquet_roundtrip");
        ParquetHandler.write(&dataset, &path).unwrap();
        let back = ParquetHandler.read(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(back, dataset);
    }
}
