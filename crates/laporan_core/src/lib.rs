//! Core domain logic for drafting official travel/duty reports (laporan).
//! This crate is the single source of truth for business invariants.

pub mod export;
pub mod logging;
pub mod model;
pub mod storage;
pub mod store;

pub use export::{format_rentang_tanggal, format_tanggal, laporan_placeholders};
pub use logging::{init_logging, logging_status};
pub use model::identitas::{Identitas, IdentitasValidationError};
pub use model::ketua_tim::{KetuaTim, KetuaTimDraft, KetuaTimId, KetuaTimValidationError};
pub use model::laporan::{
    DetailId, Laporan, LaporanDetail, LaporanDetailDraft, LaporanDraft, LaporanId,
    LaporanValidationError,
};
pub use storage::{
    MemorySnapshotStorage, SnapshotStorage, SqliteSnapshotStorage, StorageError, StorageResult,
};
pub use store::identitas_store::IdentitasStore;
pub use store::ketua_tim_store::KetuaTimStore;
pub use store::laporan_store::LaporanStore;
pub use store::{StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
