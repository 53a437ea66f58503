//! Per-column orchestration of drift analysis and profile reduction.
//!
//! Columns are processed strictly one at a time, in dataset order. This is
//! intentional: a spilled snapshot's active slot is a capacity-1 cache, and
//! overlapping two "active" columns would break its memory bound. A worker
//! that parallelizes across columns must use an independent store per
//! worker.

use ds_core::{
    AnalysisConfig, Column, Dataset, Error, Profiler, Result, SemanticType,
};
use ds_drift::{detect_new_categories, detect_trend_change};
use ds_profile::reduce_report;
use ds_store::ColumnStore;

use crate::record::{AnalysisRecord, ResultTable};

/// A dataset snapshot as presented to the orchestrator: fully in memory,
/// or spilled to a column store holding one resident column at a time.
pub enum DatasetSource {
    /// Snapshot held entirely in memory.
    InMemory(Dataset),
    /// Snapshot spilled to disk; column access goes through the store.
    Spilled(ColumnStore),
}

impl DatasetSource {
    /// Column names in snapshot order.
    pub fn column_names(&self) -> Vec<String> {
        match self {
            DatasetSource::InMemory(dataset) => dataset.column_names(),
            DatasetSource::Spilled(store) => store.column_names().to_vec(),
        }
    }

    /// Whether the snapshot holds a column with this name.
    pub fn has_column(&self, name: &str) -> bool {
        match self {
            DatasetSource::InMemory(dataset) => dataset.has_column(name),
            DatasetSource::Spilled(store) => store.column_names().iter().any(|n| n == name),
        }
    }

    /// Materialize one column. For a spilled snapshot this swaps the store's
    /// active slot, so at most one column of the snapshot is resident.
    pub fn load_column(&mut self, name: &str) -> Result<Column> {
        match self {
            DatasetSource::InMemory(dataset) => Ok(dataset.column(name)?.clone()),
            DatasetSource::Spilled(store) => Ok(store.load_column(name)?.clone()),
        }
    }
}

impl From<Dataset> for DatasetSource {
    fn from(dataset: Dataset) -> Self {
        DatasetSource::InMemory(dataset)
    }
}

/// Analyze a single column of the dataset pair.
///
/// Drift facts are dispatched on the column's declared type: time-series
/// columns get the trend-change flag, categorical columns get new-value
/// detection, and every column gets the reduced profile of its new-snapshot
/// slice. A column missing from the schema (or of any other type) receives
/// profiling-derived fields only.
pub fn analyze_column(
    original: &Column,
    new: &Column,
    name: &str,
    config: &AnalysisConfig,
    profiler: &dyn Profiler,
) -> Result<AnalysisRecord> {
    let mut record = AnalysisRecord::new(name);

    match config.schema.get(name) {
        Some(SemanticType::TimeSeries) => {
            let trend = detect_trend_change(
                &original.numeric_values(),
                &new.numeric_values(),
                config.period,
            )?;
            record.insert(
                "trend_significant_change",
                serde_json::Value::from(trend.trend_significant_change),
            );
        }
        Some(SemanticType::Categorical) => {
            let drift = detect_new_categories(&original.values, &new.values);
            if let Some(values) = drift.new_values {
                let rendered: Vec<serde_json::Value> =
                    values.iter().map(|v| v.to_json()).collect();
                record.insert("new_values", serde_json::Value::from(rendered));
            }
        }
        Some(SemanticType::Numeric) | None => {}
    }

    let single = Dataset::from_columns(vec![(name.to_string(), new.clone())])?;
    let report = profiler.profile(&single, &config.schema)?;
    if let Some(profile_record) = reduce_report(&report).into_iter().next() {
        record.merge(profile_record);
    }

    Ok(record)
}

/// Analyze every column of the dataset pair and accumulate one record per
/// column.
///
/// Columns are enumerated in the original snapshot's order, skipping the
/// time column. Spilled snapshots are walked in lockstep, one column of
/// each resident at a time. The first failing column aborts the run.
pub fn analyze_columns(
    original: &mut DatasetSource,
    new: &mut DatasetSource,
    config: &AnalysisConfig,
    profiler: &dyn Profiler,
) -> Result<ResultTable> {
    let mut table = ResultTable::new();

    for name in original.column_names() {
        if name == config.time_column {
            continue;
        }
        match analyze_one(original, new, &name, config, profiler) {
            Ok(record) => table.push(record),
            Err(e) => {
                tracing::error!(column = %name, error = %e, "column analysis failed; aborting run");
                return Err(e);
            }
        }
    }
    Ok(table)
}

fn analyze_one(
    original: &mut DatasetSource,
    new: &mut DatasetSource,
    name: &str,
    config: &AnalysisConfig,
    profiler: &dyn Profiler,
) -> Result<AnalysisRecord> {
    if config.schema.get(name) == Some(SemanticType::TimeSeries)
        && !new.has_column(&config.time_column)
    {
        return Err(Error::Validation(format!(
            "new snapshot is missing time column '{}' required by time-series column '{name}'",
            config.time_column
        )));
    }

    tracing::debug!(column = %name, "analyzing column");
    let original_column = original.load_column(name)?;
    let new_column = new.load_column(name)?;
    analyze_column(&original_column, &new_column, name, config, profiler)
}
