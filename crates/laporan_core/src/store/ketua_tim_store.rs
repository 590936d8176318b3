//! Ketua-tim registry store.
//!
//! # Responsibility
//! - Maintain the team-lead reference records in insertion order.
//! - Assign max+1 identifiers on creation.
//!
//! # Invariants
//! - `id` is unique within the registry and immutable once assigned.
//! - Deleting a ketua tim never touches laporan that reference it; the
//!   reference is soft and may dangle.
//! - Ids assigned by `add` follow `max(existing ids ∪ {0}) + 1`, so an id
//!   freed by deletion may be handed out again (unlike the laporan counter).

use crate::model::ketua_tim::{KetuaTim, KetuaTimDraft, KetuaTimId};
use crate::storage::SnapshotStorage;
use crate::store::{decode_snapshot, encode_snapshot, StoreError, StoreResult};
use log::info;
use serde::{Deserialize, Serialize};

/// Snapshot name for the ketua-tim registry.
pub const KETUA_TIM_SNAPSHOT: &str = "ketua-tim-storage";

#[derive(Debug, Default, Serialize, Deserialize)]
struct KetuaTimSnapshot {
    #[serde(rename = "ketuaList")]
    ketua_list: Vec<KetuaTim>,
}

/// Registry of team-lead reference records.
pub struct KetuaTimStore<S: SnapshotStorage> {
    storage: S,
    ketua_list: Vec<KetuaTim>,
}

impl<S: SnapshotStorage> KetuaTimStore<S> {
    /// Hydrates the registry from the adapter; missing snapshot means empty.
    pub fn new(storage: S) -> StoreResult<Self> {
        let snapshot: KetuaTimSnapshot = match storage.read_snapshot(KETUA_TIM_SNAPSHOT)? {
            Some(body) => decode_snapshot(KETUA_TIM_SNAPSHOT, &body)?,
            None => KetuaTimSnapshot::default(),
        };
        Ok(Self {
            storage,
            ketua_list: snapshot.ketua_list,
        })
    }

    /// Appends a new record with id `max(existing ids ∪ {0}) + 1`.
    pub fn add(&mut self, draft: &KetuaTimDraft) -> StoreResult<KetuaTimId> {
        let next_id = self
            .ketua_list
            .iter()
            .map(|ketua| ketua.id)
            .max()
            .unwrap_or(0)
            + 1;
        let mut next_list = self.ketua_list.clone();
        next_list.push(draft.clone().into_record(next_id));
        self.persist(&next_list)?;
        self.ketua_list = next_list;
        info!("event=ketua_tim_add module=store status=ok id={next_id}");
        Ok(next_id)
    }

    /// Replaces the record matching `id` in place, keeping list order.
    pub fn update(&mut self, id: KetuaTimId, draft: &KetuaTimDraft) -> StoreResult<()> {
        let position = self.position(id)?;
        let mut next_list = self.ketua_list.clone();
        next_list[position] = draft.clone().into_record(id);
        self.persist(&next_list)?;
        self.ketua_list = next_list;
        Ok(())
    }

    /// Removes the record matching `id`, leaving every other record intact.
    pub fn delete(&mut self, id: KetuaTimId) -> StoreResult<()> {
        let position = self.position(id)?;
        let mut next_list = self.ketua_list.clone();
        next_list.remove(position);
        self.persist(&next_list)?;
        self.ketua_list = next_list;
        info!("event=ketua_tim_delete module=store status=ok id={id}");
        Ok(())
    }

    /// All records in insertion order.
    pub fn list(&self) -> &[KetuaTim] {
        &self.ketua_list
    }

    /// Resolves a (possibly dangling) soft reference by id.
    pub fn get(&self, id: KetuaTimId) -> Option<&KetuaTim> {
        self.ketua_list.iter().find(|ketua| ketua.id == id)
    }

    fn position(&self, id: KetuaTimId) -> StoreResult<usize> {
        self.ketua_list
            .iter()
            .position(|ketua| ketua.id == id)
            .ok_or(StoreError::KetuaTimNotFound(id))
    }

    fn persist(&self, list: &[KetuaTim]) -> StoreResult<()> {
        let snapshot = KetuaTimSnapshot {
            ketua_list: list.to_vec(),
        };
        let body = encode_snapshot(KETUA_TIM_SNAPSHOT, &snapshot)?;
        self.storage.write_snapshot(KETUA_TIM_SNAPSHOT, &body)?;
        Ok(())
    }
}
