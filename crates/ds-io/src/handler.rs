//! Format handlers and their dispatch.

use std::path::Path;
use std::str::FromStr;

use ds_core::{Dataset, Error, Result};
use serde::{Deserialize, Serialize};

use crate::csv::CsvHandler;
use crate::parquet::ParquetHandler;
use crate::remote::{download_to_temp, is_remote};

/// Declared tabular format of a source or destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    /// Delimited text with a header row.
    Csv,
    /// Columnar binary.
    Parquet,
}

impl FromStr for TableFormat {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        match input.to_lowercase().as_str() {
            "csv" => Ok(TableFormat::Csv),
            "parquet" => Ok(TableFormat::Parquet),
            _ => Err(Error::Validation(format!("'{input}' is not a supported table format"))),
        }
    }
}

impl std::fmt::Display for TableFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableFormat::Csv => write!(f, "csv"),
            TableFormat::Parquet => write!(f, "parquet"),
        }
    }
}

/// Where a dataset lives and how it is encoded.
///
/// Locality is decided from the location string, orthogonally to the
/// format: `http(s)://` sources are downloaded to a local temporary path
/// and then read by the same format handler a local path would use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Tabular format of the data.
    pub format: TableFormat,
    /// Local path or remote URI.
    pub location: String,
}

impl SourceConfig {
    /// Create a source/destination description.
    pub fn new(format: TableFormat, location: &str) -> Self {
        Self { format, location: location.to_string() }
    }

    /// Whether the location is a remote URI.
    pub fn is_remote(&self) -> bool {
        is_remote(&self.location)
    }
}

/// One tabular format's read/write capability.
pub trait TableHandler {
    /// Read a dataset from a local path.
    fn read(&self, path: &Path) -> Result<Dataset>;
    /// Write a dataset to a local path.
    fn write(&self, dataset: &Dataset, path: &Path) -> Result<()>;
}

/// The handler for a declared format.
pub fn handler_for(format: TableFormat) -> Box<dyn TableHandler> {
    match format {
        TableFormat::Csv => Box::new(CsvHandler),
        TableFormat::Parquet => Box::new(ParquetHandler),
    }
}

/// Read a dataset, downloading remote sources to a temporary file first.
pub fn read_table(config: &SourceConfig) -> Result<Dataset> {
    let handler = handler_for(config.format);
    if config.is_remote() {
        let local = download_to_temp(&config.location)?;
        let result = handler.read(&local);
        if let Err(e) = std::fs::remove_file(&local) {
            tracing::debug!(path = %local.display(), error = %e, "downloaded file cleanup failed");
        }
        result
    } else {
        handler.read(Path::new(&config.location))
    }
}

/// Write a dataset to a local destination.
pub fn write_table(dataset: &Dataset, config: &SourceConfig) -> Result<()> {
    if config.is_remote() {
        return Err(Error::Validation(format!(
            "cannot write to remote location '{}'",
            config.location
        )));
    }
    handler_for(config.format).write(dataset, Path::new(&config.location))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parses_case_insensitively() {
        assert_eq!("CSV".parse::<TableFormat>().unwrap(), TableFormat::Csv);
        assert_eq!("parquet".parse::<TableFormat>().unwrap(), TableFormat::Parquet);
        assert!("delta".parse::<TableFormat>().is_err());
    }

    #[test]
    fn source_config_detects_locality() {
        assert!(SourceConfig::new(TableFormat::Csv, "https://host/data.csv").is_remote());
        assert!(!SourceConfig::new(TableFormat::Csv, "/tmp/data.csv").is_remote());
    }

    #[test]
    fn remote_write_is_rejected() {
        let config = SourceConfig::new(TableFormat::Csv, "https://host/out.csv");
        let err = write_table(&Dataset::new(), &config).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
