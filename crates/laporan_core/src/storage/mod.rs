//! Snapshot persistence adapters.
//!
//! # Responsibility
//! - Define the read-snapshot/write-snapshot contract injected into stores.
//! - Provide an in-memory fake for tests and composition without durability.
//!
//! # Invariants
//! - Snapshots are opaque UTF-8 documents addressed by a stable name.
//! - `write_snapshot` replaces the named snapshot wholesale.

use std::cell::RefCell;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod sqlite;

pub use sqlite::SqliteSnapshotStorage;

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure while reading or writing a persisted snapshot.
#[derive(Debug)]
pub enum StorageError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "storage schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Read-snapshot/write-snapshot persistence contract.
///
/// Stores hydrate once from this adapter at construction and write through
/// on every mutation. Implementations must make a completed write visible
/// to every later read, including after process restart for durable ones.
pub trait SnapshotStorage {
    /// Returns the named snapshot body, or `None` when never written.
    fn read_snapshot(&self, name: &str) -> StorageResult<Option<String>>;

    /// Replaces the named snapshot body wholesale.
    fn write_snapshot(&self, name: &str, body: &str) -> StorageResult<()>;
}

/// Lets several stores share one adapter instance.
impl<S: SnapshotStorage + ?Sized> SnapshotStorage for &S {
    fn read_snapshot(&self, name: &str) -> StorageResult<Option<String>> {
        (**self).read_snapshot(name)
    }

    fn write_snapshot(&self, name: &str, body: &str) -> StorageResult<()> {
        (**self).write_snapshot(name, body)
    }
}

/// Non-durable adapter backed by a process-local map.
///
/// The store layer is single-threaded by design, so interior mutability via
/// `RefCell` is sufficient here.
#[derive(Debug, Default)]
pub struct MemorySnapshotStorage {
    cells: RefCell<HashMap<String, String>>,
}

impl MemorySnapshotStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStorage for MemorySnapshotStorage {
    fn read_snapshot(&self, name: &str) -> StorageResult<Option<String>> {
        Ok(self.cells.borrow().get(name).cloned())
    }

    fn write_snapshot(&self, name: &str, body: &str) -> StorageResult<()> {
        self.cells
            .borrow_mut()
            .insert(name.to_string(), body.to_string());
        Ok(())
    }
}
