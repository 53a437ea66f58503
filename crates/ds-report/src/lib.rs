//! # ds-report
//!
//! Report orchestration for driftscan: walks the columns of an
//! original/new dataset pair, gathers type-dispatched drift facts and
//! reduced profile metrics per column, and accumulates the
//! heterogeneous-schema result table.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod column;
pub mod generate;
pub mod record;

pub use column::{analyze_column, analyze_columns, DatasetSource};
pub use generate::{generate_report, ReportOptions};
pub use record::{AnalysisRecord, ResultTable};
