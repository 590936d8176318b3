//! Identitas singleton store.
//!
//! # Responsibility
//! - Persist the single author-identity record across sessions.
//! - Answer the identity-gate question for the UI shell's guard.
//!
//! # Invariants
//! - Exactly one identitas exists; `set_identitas` replaces it wholesale.
//! - Hydration completes inside the constructor; callers never observe a
//!   half-loaded store.

use crate::model::identitas::Identitas;
use crate::storage::SnapshotStorage;
use crate::store::{decode_snapshot, encode_snapshot, StoreResult};
use log::info;

/// Snapshot name for the identitas record.
pub const IDENTITAS_SNAPSHOT: &str = "identitas-storage";

/// Store holding the author-identity singleton.
pub struct IdentitasStore<S: SnapshotStorage> {
    storage: S,
    identitas: Identitas,
}

impl<S: SnapshotStorage> IdentitasStore<S> {
    /// Hydrates the store from the adapter.
    ///
    /// A missing snapshot yields the empty (unconfigured) identitas; a
    /// snapshot that exists but cannot be decoded is a hard error rather
    /// than silent data loss.
    pub fn new(storage: S) -> StoreResult<Self> {
        let identitas = match storage.read_snapshot(IDENTITAS_SNAPSHOT)? {
            Some(body) => decode_snapshot(IDENTITAS_SNAPSHOT, &body)?,
            None => Identitas::default(),
        };
        Ok(Self { storage, identitas })
    }

    /// Replaces the identitas wholesale and persists it.
    ///
    /// Schema validation happens upstream at the form layer; this operation
    /// accepts any record.
    pub fn set_identitas(&mut self, identitas: Identitas) -> StoreResult<()> {
        let body = encode_snapshot(IDENTITAS_SNAPSHOT, &identitas)?;
        self.storage.write_snapshot(IDENTITAS_SNAPSHOT, &body)?;
        self.identitas = identitas;
        info!("event=identitas_set module=store status=ok");
        Ok(())
    }

    /// Current identitas record (empty fields when never configured).
    pub fn identitas(&self) -> &Identitas {
        &self.identitas
    }

    /// Whether all five identity fields are non-empty.
    pub fn is_configured(&self) -> bool {
        self.identitas.is_configured()
    }
}
