//! # ds-io
//!
//! Tabular I/O for driftscan: CSV and Parquet handlers over Arrow record
//! batches, with remote HTTP(S) sources downloaded to a local temporary
//! path before format dispatch.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod convert;
pub mod csv;
pub mod handler;
pub mod parquet;
pub mod remote;

pub use convert::{dataset_from_batches, record_batch_from_dataset};
pub use csv::CsvHandler;
pub use handler::{handler_for, read_table, write_table, SourceConfig, TableFormat, TableHandler};
pub use remote::{download_to_temp, is_remote};
pub use self::parquet::ParquetHandler;
