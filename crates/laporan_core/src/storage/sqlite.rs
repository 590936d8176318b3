//! SQLite-backed snapshot storage.
//!
//! # Responsibility
//! - Persist named snapshots durably in a single-file database.
//! - Apply schema migrations in deterministic order before first use.
//!
//! # Invariants
//! - Applied migration version is mirrored to `PRAGMA user_version`.
//! - A database newer than this binary's latest migration is rejected.
//! - No snapshot is read or written before migrations succeed.

use super::{SnapshotStorage, StorageError, StorageResult};
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: "CREATE TABLE IF NOT EXISTS snapshots (
            name       TEXT PRIMARY KEY,
            body       TEXT NOT NULL,
            updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now') * 1000)
          );",
}];

/// Latest schema version known by this binary.
pub fn latest_schema_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Durable snapshot adapter over a single SQLite `snapshots` table.
///
/// One row per store snapshot; bodies are opaque JSON documents owned by
/// the store layer.
#[derive(Debug)]
pub struct SqliteSnapshotStorage {
    conn: Connection,
}

impl SqliteSnapshotStorage {
    /// Opens a database file and applies all pending migrations.
    ///
    /// # Side effects
    /// - Emits `storage_open` logging events with duration and status.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let started_at = Instant::now();
        info!("event=storage_open module=storage status=start mode=file");
        let conn = Connection::open(path).map_err(StorageError::from);
        Self::finish_open(conn, "file", started_at)
    }

    /// Opens an in-memory database and applies all pending migrations.
    ///
    /// Useful for tests needing real SQL behavior without a file.
    pub fn open_in_memory() -> StorageResult<Self> {
        let started_at = Instant::now();
        info!("event=storage_open module=storage status=start mode=memory");
        let conn = Connection::open_in_memory().map_err(StorageError::from);
        Self::finish_open(conn, "memory", started_at)
    }

    fn finish_open(
        conn: Result<Connection, StorageError>,
        mode: &str,
        started_at: Instant,
    ) -> StorageResult<Self> {
        let result = conn.and_then(|mut conn| {
            bootstrap_connection(&mut conn)?;
            Ok(Self { conn })
        });
        match &result {
            Ok(_) => info!(
                "event=storage_open module=storage status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=storage_open module=storage status=error mode={mode} duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            ),
        }
        result
    }
}

impl SnapshotStorage for SqliteSnapshotStorage {
    fn read_snapshot(&self, name: &str) -> StorageResult<Option<String>> {
        let body = self
            .conn
            .query_row(
                "SELECT body FROM snapshots WHERE name = ?1;",
                [name],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(body)
    }

    fn write_snapshot(&self, name: &str, body: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO snapshots (name, body, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(name) DO UPDATE SET
                body = excluded.body,
                updated_at = excluded.updated_at;",
            params![name, body],
        )?;
        Ok(())
    }
}

fn bootstrap_connection(conn: &mut Connection) -> StorageResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    apply_migrations(conn)
}

fn apply_migrations(conn: &mut Connection) -> StorageResult<()> {
    let current_version =
        conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    let latest = latest_schema_version();

    if current_version > latest {
        return Err(StorageError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }
    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }
        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{latest_schema_version, SqliteSnapshotStorage, StorageError};
    use crate::storage::SnapshotStorage;

    #[test]
    fn open_applies_latest_schema_version() {
        let storage = SqliteSnapshotStorage::open_in_memory().unwrap();
        let version: u32 = storage
            .conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, latest_schema_version());
    }

    #[test]
    fn write_then_read_roundtrips_body() {
        let storage = SqliteSnapshotStorage::open_in_memory().unwrap();
        storage.write_snapshot("laporan-storage", "{}").unwrap();
        storage
            .write_snapshot("laporan-storage", "{\"nextId\":3}")
            .unwrap();
        assert_eq!(
            storage.read_snapshot("laporan-storage").unwrap().as_deref(),
            Some("{\"nextId\":3}")
        );
    }

    #[test]
    fn newer_schema_version_is_rejected() {
        let storage = SqliteSnapshotStorage::open_in_memory().unwrap();
        storage
            .conn
            .execute_batch("PRAGMA user_version = 99;")
            .unwrap();

        let mut conn = storage.conn;
        let err = super::apply_migrations(&mut conn).unwrap_err();
        assert!(matches!(
            err,
            StorageError::UnsupportedSchemaVersion { db_version: 99, .. }
        ));
    }
}
