//! Disk-backed column store with a single resident column.
//!
//! Bounds peak memory to O(one column) regardless of dataset width, at the
//! cost of O(columns) disk round trips; the right trade when columns, not
//! rows, are the scaling dimension.
//!
//! # Design decisions
//!
//! - **Capacity**: exactly one resident column (the "active slot"). A
//!   capacity-1 cache keyed by column name; everything else lives on disk.
//! - **Write-back on every swap**: the store cannot know whether the
//!   resident column was mutated, so eviction always persists it.
//! - **Storage**: one JSON file per column, keyed by ordinal (column names
//!   are not trusted as file names), under a directory owned exclusively by
//!   this store instance.
//! - **Disposal**: explicit [`ColumnStore::close`] plus a `Drop` backstop;
//!   the directory is removed exactly once on every exit path.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use ds_core::{Column, Dataset, Error, Result};

/// Per-process sequence number so concurrent stores never share a directory.
static STORE_SEQ: AtomicU64 = AtomicU64::new(0);

/// The resident column and where it came from.
struct ActiveSlot {
    name: String,
    ordinal: usize,
    column: Column,
}

/// Counters for the store's disk traffic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of columns read from disk into the active slot.
    pub loads: u64,
    /// Number of evictions that wrote the resident column back to disk.
    pub write_backs: u64,
}

/// Disk-backed store over one dataset's columns, holding at most one column
/// in memory at any instant.
pub struct ColumnStore {
    dir: PathBuf,
    names: Vec<String>,
    slot: Option<ActiveSlot>,
    stats: StoreStats,
    closed: bool,
}

impl ColumnStore {
    /// Snapshot every column of `dataset` to a freshly allocated storage
    /// directory. The active slot starts empty.
    pub fn create(dataset: &Dataset) -> Result<Self> {
        let dir = std::env::temp_dir().join(format!(
            "ds-store-{}-{}",
            std::process::id(),
            STORE_SEQ.fetch_add(1, Ordering::Relaxed)
        ));
        fs::create_dir_all(&dir)
            .map_err(|e| Error::Storage { path: dir.clone(), message: e.to_string() })?;

        let store = Self {
            dir,
            names: dataset.column_names(),
            slot: None,
            stats: StoreStats::default(),
            closed: false,
        };
        for (ordinal, (_, column)) in dataset.iter().enumerate() {
            if let Err(e) = store.write_slot(ordinal, column) {
                // Creation failed part-way: release the directory now rather
                // than handing out a half-populated store.
                let mut store = store;
                store.dispose_dir();
                return Err(e);
            }
        }
        tracing::debug!(dir = %store.dir.display(), columns = store.names.len(), "column store created");
        Ok(store)
    }

    /// Column names in their original dataset order, stable for the life of
    /// the store.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Load a column into the active slot and return it.
    ///
    /// If the slot holds a different column, that column is first written
    /// back to its file; the requested column is then read from disk. An
    /// unknown name fails with [`Error::ColumnNotFound`]; an I/O failure
    /// invalidates the slot and fails with [`Error::Storage`].
    pub fn load_column(&mut self, name: &str) -> Result<&Column> {
        let ordinal = self
            .names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))?;

        // Taking the slot up front keeps it invalidated on every error path.
        if let Some(previous) = self.slot.take() {
            if previous.name != name {
                self.write_slot(previous.ordinal, &previous.column)?;
                self.stats.write_backs += 1;
            }
        }

        let column = self.read_slot(ordinal)?;
        self.stats.loads += 1;
        let slot = self.slot.insert(ActiveSlot { name: name.to_string(), ordinal, column });
        Ok(&slot.column)
    }

    /// Lazy single-pass iteration over all columns in stored order.
    ///
    /// Each step evicts the previous column to disk before yielding the
    /// next. The sequence is finite and not restartable; iterating again
    /// repeats the disk round trips in the same order.
    pub fn iter_columns(&mut self) -> ColumnIter<'_> {
        ColumnIter { store: self, next: 0 }
    }

    /// Disk-traffic counters since creation.
    pub fn stats(&self) -> StoreStats {
        self.stats
    }

    /// Release the storage directory. Idempotent; after the first call the
    /// store refuses further loads.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.slot = None;
        fs::remove_dir_all(&self.dir)
            .map_err(|e| Error::Storage { path: self.dir.clone(), message: e.to_string() })?;
        Ok(())
    }

    fn dispose_dir(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.slot = None;
        if let Err(e) = fs::remove_dir_all(&self.dir) {
            tracing::debug!(dir = %self.dir.display(), error = %e, "column store cleanup failed");
        }
    }

    fn slot_path(&self, ordinal: usize) -> PathBuf {
        self.dir.join(format!("{ordinal}.json"))
    }

    fn write_slot(&self, ordinal: usize, column: &Column) -> Result<()> {
        if self.closed {
            return Err(Error::Storage {
                path: self.dir.clone(),
                message: "store is closed".to_string(),
            });
        }
        let path = self.slot_path(ordinal);
        let file = File::create(&path)
            .map_err(|e| Error::Storage { path: path.clone(), message: e.to_string() })?;
        serde_json::to_writer(BufWriter::new(file), column)
            .map_err(|e| Error::Storage { path, message: e.to_string() })
    }

    fn read_slot(&self, ordinal: usize) -> Result<Column> {
        if self.closed {
            return Err(Error::Storage {
                path: self.dir.clone(),
                message: "store is closed".to_string(),
            });
        }
        let path = self.slot_path(ordinal);
        let file = File::open(&path)
            .map_err(|e| Error::Storage { path: path.clone(), message: e.to_string() })?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| Error::Storage { path, message: e.to_string() })
    }
}

impl Drop for ColumnStore {
    fn drop(&mut self) {
        self.dispose_dir();
    }
}

/// Iterator produced by [`ColumnStore::iter_columns`].
pub struct ColumnIter<'a> {
    store: &'a mut ColumnStore,
    next: usize,
}

impl Iterator for ColumnIter<'_> {
    type Item = Result<(String, Column)>;

    fn next(&mut self) -> Option<Self::Item> {
        let name = self.store.names.get(self.next)?.clone();
        self.next += 1;
        Some(self.store.load_column(&name).map(|column| (name, column.clone())))
    }
}
