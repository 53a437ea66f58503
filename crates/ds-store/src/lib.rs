//! # ds-store
//!
//! Disk-backed column storage for driftscan: every column of a dataset is
//! persisted to an exclusively-owned directory, and at most one column is
//! resident in memory at any instant.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod store;

pub use store::{ColumnIter, ColumnStore, StoreStats};
