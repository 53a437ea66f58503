//! # ds-core
//!
//! Core types for driftscan: the dataset/column/value model, the declared
//! type schema, the analysis configuration, the raw profiling report, and
//! the workspace-wide error type.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod schema;
pub mod traits;
pub mod types;

pub use config::AnalysisConfig;
pub use error::{Error, Result};
pub use schema::{SemanticType, TypeSchema};
pub use traits::Profiler;
pub use types::{Column, Dataset, ProfileReport, Value};
