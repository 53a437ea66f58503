//! Delimited-text read/write via the Arrow CSV kernels.

use std::fs::File;
use std::io::Seek;
use std::path::Path;
use std::sync::Arc;

use arrow::csv::reader::Format;
use arrow::csv::{ReaderBuilder, WriterBuilder};
use arrow::record_batch::RecordBatch;
use ds_core::{Dataset, Result};

use crate::convert::{dataset_from_batches, record_batch_from_dataset, table_err};
use crate::handler::TableHandler;

/// CSV handler with header rows and inferred column types.
#[derive(Debug, Default)]
pub struct CsvHandler;

impl TableHandler for CsvHandler {
    fn read(&self, path: &Path) -> Result<Dataset> {
        let mut file = File::open(path)?;
        let format = Format::default().with_header(true);
        let (schema, _) = format.infer_schema(&mut file, None).map_err(table_err)?;
        file.rewind()?;

        let reader = ReaderBuilder::new(Arc::new(schema))
            .with_format(format)
            .build(file)
            .map_err(table_err)?;
        let batches: Vec<RecordBatch> =
            reader.collect::<std::result::Result<_, _>>().map_err(table_err)?;
        dataset_from_batches(&batches)
    }

    fn write(&self, dataset: &Dataset, path: &Path) -> Result<()> {
        let batch = record_batch_from_dataset(dataset)?;
        let file = File::create(path)?;
        let mut writer = WriterBuilder::new().with_header(true).build(file);
        writer.write(&batch).map_err(table_err)?;
        Ok(())
    }
}
