//! Laporan store with embedded detail lists.
//!
//! # Responsibility
//! - Maintain the report records and their owned activity details.
//! - Assign laporan ids from a persisted monotonic counter and detail ids
//!   per parent laporan.
//!
//! # Invariants
//! - The laporan counter never reuses an id, even after deletion; this is
//!   deliberately different from the registry's max+1 policy.
//! - `update_laporan` cannot overwrite the detail list; details are managed
//!   only through the detail operations.
//! - Deleting a laporan discards its details structurally (they live inside
//!   the record, nothing references them from outside).
//! - Detail ids are unique within their parent laporan only.

use crate::model::laporan::{
    DetailId, Laporan, LaporanDetailDraft, LaporanDraft, LaporanId,
};
use crate::storage::SnapshotStorage;
use crate::store::{decode_snapshot, encode_snapshot, now_epoch_ms, StoreError, StoreResult};
use log::info;
use serde::{Deserialize, Serialize};

/// Snapshot name for the laporan store.
pub const LAPORAN_SNAPSHOT: &str = "laporan-storage";

#[derive(Debug, Serialize, Deserialize)]
struct LaporanSnapshot {
    #[serde(rename = "laporanList")]
    laporan_list: Vec<Laporan>,
    #[serde(rename = "nextId")]
    next_id: LaporanId,
}

impl Default for LaporanSnapshot {
    fn default() -> Self {
        Self {
            laporan_list: Vec::new(),
            next_id: 1,
        }
    }
}

/// Store owning the laporan records and their embedded details.
#[derive(Debug)]
pub struct LaporanStore<S: SnapshotStorage> {
    storage: S,
    laporan_list: Vec<Laporan>,
    next_id: LaporanId,
}

impl<S: SnapshotStorage> LaporanStore<S> {
    /// Hydrates the store from the adapter; missing snapshot means empty
    /// with the counter at 1.
    pub fn new(storage: S) -> StoreResult<Self> {
        let snapshot: LaporanSnapshot = match storage.read_snapshot(LAPORAN_SNAPSHOT)? {
            Some(body) => decode_snapshot(LAPORAN_SNAPSHOT, &body)?,
            None => LaporanSnapshot::default(),
        };
        Ok(Self {
            storage,
            laporan_list: snapshot.laporan_list,
            next_id: snapshot.next_id,
        })
    }

    /// Appends a new laporan with the next counter id, an empty detail list
    /// and `modified_at` stamped to call time, then advances the counter.
    pub fn add_laporan(&mut self, draft: &LaporanDraft) -> StoreResult<LaporanId> {
        let id = self.next_id;
        let laporan = Laporan {
            id,
            kecamatan_tujuan: draft.kecamatan_tujuan.clone(),
            tanggal_mulai: draft.tanggal_mulai,
            tanggal_selesai: draft.tanggal_selesai,
            perihal: draft.perihal.clone(),
            id_ketua: draft.id_ketua,
            is_spd: draft.is_spd,
            details: Vec::new(),
            modified_at: now_epoch_ms(),
        };
        let mut next_list = self.laporan_list.clone();
        next_list.push(laporan);
        self.persist(&next_list, id + 1)?;
        self.laporan_list = next_list;
        self.next_id = id + 1;
        info!("event=laporan_add module=store status=ok id={id}");
        Ok(id)
    }

    /// Replaces every field of the matching laporan except its detail list,
    /// which is preserved, and restamps `modified_at`.
    pub fn update_laporan(&mut self, id: LaporanId, draft: &LaporanDraft) -> StoreResult<()> {
        let position = self.position(id)?;
        let mut next_list = self.laporan_list.clone();
        let existing = &mut next_list[position];
        existing.kecamatan_tujuan = draft.kecamatan_tujuan.clone();
        existing.tanggal_mulai = draft.tanggal_mulai;
        existing.tanggal_selesai = draft.tanggal_selesai;
        existing.perihal = draft.perihal.clone();
        existing.id_ketua = draft.id_ketua;
        existing.is_spd = draft.is_spd;
        existing.modified_at = now_epoch_ms();
        self.persist(&next_list, self.next_id)?;
        self.laporan_list = next_list;
        Ok(())
    }

    /// Removes the matching laporan; its details die with it. The counter
    /// keeps advancing, so the freed id is never handed out again.
    pub fn delete_laporan(&mut self, id: LaporanId) -> StoreResult<()> {
        let position = self.position(id)?;
        let mut next_list = self.laporan_list.clone();
        next_list.remove(position);
        self.persist(&next_list, self.next_id)?;
        self.laporan_list = next_list;
        info!("event=laporan_delete module=store status=ok id={id}");
        Ok(())
    }

    /// Appends a detail to the matching laporan with id
    /// `max(detail ids in that laporan ∪ {0}) + 1`.
    pub fn add_detail(
        &mut self,
        laporan_id: LaporanId,
        draft: &LaporanDetailDraft,
    ) -> StoreResult<DetailId> {
        let position = self.position(laporan_id)?;
        let mut next_list = self.laporan_list.clone();
        let laporan = &mut next_list[position];
        let detail_id = laporan
            .details
            .iter()
            .map(|detail| detail.id)
            .max()
            .unwrap_or(0)
            + 1;
        laporan.details.push(draft.clone().into_record(detail_id));
        laporan.modified_at = now_epoch_ms();
        self.persist(&next_list, self.next_id)?;
        self.laporan_list = next_list;
        Ok(detail_id)
    }

    /// Replaces the matching detail's fields, preserving its id.
    pub fn update_detail(
        &mut self,
        laporan_id: LaporanId,
        detail_id: DetailId,
        draft: &LaporanDetailDraft,
    ) -> StoreResult<()> {
        let position = self.position(laporan_id)?;
        let mut next_list = self.laporan_list.clone();
        let laporan = &mut next_list[position];
        let detail_position = laporan
            .details
            .iter()
            .position(|detail| detail.id == detail_id)
            .ok_or(StoreError::DetailNotFound {
                laporan_id,
                detail_id,
            })?;
        laporan.details[detail_position] = draft.clone().into_record(detail_id);
        laporan.modified_at = now_epoch_ms();
        self.persist(&next_list, self.next_id)?;
        self.laporan_list = next_list;
        Ok(())
    }

    /// Removes the matching detail from its parent laporan.
    pub fn delete_detail(
        &mut self,
        laporan_id: LaporanId,
        detail_id: DetailId,
    ) -> StoreResult<()> {
        let position = self.position(laporan_id)?;
        let mut next_list = self.laporan_list.clone();
        let laporan = &mut next_list[position];
        let detail_position = laporan
            .details
            .iter()
            .position(|detail| detail.id == detail_id)
            .ok_or(StoreError::DetailNotFound {
                laporan_id,
                detail_id,
            })?;
        laporan.details.remove(detail_position);
        laporan.modified_at = now_epoch_ms();
        self.persist(&next_list, self.next_id)?;
        self.laporan_list = next_list;
        Ok(())
    }

    /// All laporan in insertion order.
    pub fn list(&self) -> &[Laporan] {
        &self.laporan_list
    }

    /// Looks up one laporan by id.
    pub fn get(&self, id: LaporanId) -> Option<&Laporan> {
        self.laporan_list.iter().find(|laporan| laporan.id == id)
    }

    fn position(&self, id: LaporanId) -> StoreResult<usize> {
        self.laporan_list
            .iter()
            .position(|laporan| laporan.id == id)
            .ok_or(StoreError::LaporanNotFound(id))
    }

    fn persist(&self, list: &[Laporan], next_id: LaporanId) -> StoreResult<()> {
        let snapshot = LaporanSnapshot {
            laporan_list: list.to_vec(),
            next_id,
        };
        let body = encode_snapshot(LAPORAN_SNAPSHOT, &snapshot)?;
        self.storage.write_snapshot(LAPORAN_SNAPSHOT, &body)?;
        Ok(())
    }
}
