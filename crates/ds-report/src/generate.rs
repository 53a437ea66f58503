//! End-to-end report generation: read both snapshots, analyze every
//! column, write the final table.

use ds_core::{AnalysisConfig, Dataset, Result};
use ds_io::{read_table, write_table, SourceConfig};
use ds_profile::NativeProfiler;
use ds_store::ColumnStore;

use crate::column::{analyze_columns, DatasetSource};
use crate::record::ResultTable;

/// Options for a report run.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Where to read the original (pre-insertion) snapshot.
    pub original: SourceConfig,
    /// Where to read the new (post-insertion) snapshot.
    pub new: SourceConfig,
    /// Where to write the final report; `None` keeps it in memory only.
    pub output: Option<SourceConfig>,
    /// Spill both snapshots to column stores so at most one column of each
    /// is resident during analysis.
    pub spill_columns: bool,
}

/// Generate the full drift report for a dataset pair.
///
/// Reads both snapshots, analyzes each column with the built-in profiler,
/// and writes the materialized table to `output` when configured. The
/// returned table is the same one written.
pub fn generate_report(options: &ReportOptions, config: &AnalysisConfig) -> Result<ResultTable> {
    let mut original = make_source(read_table(&options.original)?, options.spill_columns)?;
    let mut new = make_source(read_table(&options.new)?, options.spill_columns)?;

    let profiler = NativeProfiler::new(config.period);
    let table = analyze_columns(&mut original, &mut new, config, &profiler)?;
    tracing::info!(rows = table.len(), columns = table.columns().len(), "report assembled");

    if let Some(destination) = &options.output {
        write_table(&table.to_dataset()?, destination)?;
    }
    Ok(table)
}

fn make_source(dataset: Dataset, spill: bool) -> Result<DatasetSource> {
    if spill {
        // The in-memory snapshot is dropped here; from now on only one of
        // its columns is resident at a time.
        Ok(DatasetSource::Spilled(ColumnStore::create(&dataset)?))
    } else {
        Ok(DatasetSource::InMemory(dataset))
    }
}
