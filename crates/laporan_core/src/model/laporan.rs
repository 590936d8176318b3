//! Laporan (travel/duty report) aggregate and its owned activity details.
//!
//! # Responsibility
//! - Define the report record and its embedded, ordered detail list.
//! - Validate report and detail form submissions.
//! - Derive chained start times and activity durations for the form layer.
//!
//! # Invariants
//! - A laporan exclusively owns its details; deleting the laporan discards
//!   them structurally, and a detail never moves to another laporan.
//! - Detail ids are unique within their parent laporan only.
//! - `tanggal_selesai >= tanggal_mulai` and `waktu_selesai >= waktu_mulai`
//!   are enforced at input time, not on direct store mutation.

use crate::model::ketua_tim::KetuaTimId;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned identifier for a laporan (monotonic, never reused).
pub type LaporanId = i64;

/// Identifier of a detail, unique within its parent laporan only.
pub type DetailId = i64;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// One timestamped activity entry owned by a laporan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaporanDetail {
    /// Unique within the parent laporan, immutable once assigned.
    pub id: DetailId,
    /// Free-text activity description.
    pub uraian: String,
    /// Activity start.
    pub waktu_mulai: NaiveDateTime,
    /// Activity end, never earlier than `waktu_mulai` at input time.
    pub waktu_selesai: NaiveDateTime,
}

impl LaporanDetail {
    /// Activity duration in hours, derived from the time range.
    pub fn durasi_jam(&self) -> f64 {
        let millis = self
            .waktu_selesai
            .signed_duration_since(self.waktu_mulai)
            .num_milliseconds();
        millis as f64 / MILLIS_PER_HOUR
    }
}

/// Travel/duty report aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Laporan {
    /// Unique store id from the persisted monotonic counter.
    pub id: LaporanId,
    /// Destination sub-district.
    pub kecamatan_tujuan: String,
    /// First day of the duty travel.
    pub tanggal_mulai: NaiveDate,
    /// Last day, never earlier than `tanggal_mulai` at input time.
    pub tanggal_selesai: NaiveDate,
    /// Subject/purpose of the travel.
    pub perihal: String,
    /// Soft reference into the ketua-tim registry. May dangle after the
    /// referenced ketua tim is deleted; resolve via registry lookup.
    pub id_ketua: Option<KetuaTimId>,
    /// Whether the travel qualifies as multi-day duty (SPD).
    pub is_spd: bool,
    /// Owned, ordered activity entries.
    pub details: Vec<LaporanDetail>,
    /// Last-modified stamp in epoch milliseconds, set by the store.
    pub modified_at: i64,
}

impl Laporan {
    /// Suggested `waktu_mulai` for the next activity entry: the end time of
    /// the last recorded detail, or `None` when the laporan has no details
    /// yet (the first entry starts a fresh chain).
    pub fn next_waktu_mulai(&self) -> Option<NaiveDateTime> {
        self.details.last().map(|detail| detail.waktu_selesai)
    }
}

/// Laporan fields as submitted by a form, before an id exists.
///
/// The detail list is absent on purpose: details are managed through their
/// own store operations and survive whole-record updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaporanDraft {
    pub kecamatan_tujuan: String,
    pub tanggal_mulai: NaiveDate,
    pub tanggal_selesai: NaiveDate,
    pub perihal: String,
    pub id_ketua: Option<KetuaTimId>,
    pub is_spd: bool,
}

/// Detail fields as submitted by a form, before an id exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaporanDetailDraft {
    pub uraian: String,
    pub waktu_mulai: NaiveDateTime,
    pub waktu_selesai: NaiveDateTime,
}

/// Validation failure for laporan and detail form submissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaporanValidationError {
    /// A required text field was submitted empty.
    EmptyField(&'static str),
    /// `tanggal_selesai` is earlier than `tanggal_mulai`.
    TanggalRange,
    /// `waktu_selesai` is earlier than `waktu_mulai`.
    WaktuRange,
}

impl Display for LaporanValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "laporan field `{field}` must not be empty"),
            Self::TanggalRange => {
                write!(f, "tanggal_selesai must not be earlier than tanggal_mulai")
            }
            Self::WaktuRange => write!(f, "waktu_selesai must not be earlier than waktu_mulai"),
        }
    }
}

impl Error for LaporanValidationError {}

impl LaporanDraft {
    /// Validates a report form submission before it reaches the store.
    pub fn validate(&self) -> Result<(), LaporanValidationError> {
        if self.kecamatan_tujuan.trim().is_empty() {
            return Err(LaporanValidationError::EmptyField("kecamatan_tujuan"));
        }
        if self.perihal.trim().is_empty() {
            return Err(LaporanValidationError::EmptyField("perihal"));
        }
        if self.tanggal_selesai < self.tanggal_mulai {
            return Err(LaporanValidationError::TanggalRange);
        }
        Ok(())
    }
}

impl LaporanDetailDraft {
    /// Validates a detail form submission before it reaches the store.
    pub fn validate(&self) -> Result<(), LaporanValidationError> {
        if self.uraian.trim().is_empty() {
            return Err(LaporanValidationError::EmptyField("uraian"));
        }
        if self.waktu_selesai < self.waktu_mulai {
            return Err(LaporanValidationError::WaktuRange);
        }
        Ok(())
    }

    /// Attaches a store-assigned id to this draft.
    pub fn into_record(self, id: DetailId) -> LaporanDetail {
        LaporanDetail {
            id,
            uraian: self.uraian,
            waktu_mulai: self.waktu_mulai,
            waktu_selesai: self.waktu_selesai,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Laporan, LaporanDetail, LaporanDetailDraft, LaporanDraft, LaporanValidationError};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    fn detail(id: i64, start_hour: u32, end_hour: u32) -> LaporanDetail {
        LaporanDetail {
            id,
            uraian: format!("kegiatan {id}"),
            waktu_mulai: date(2025, 2, 1).and_hms_opt(start_hour, 0, 0).unwrap(),
            waktu_selesai: date(2025, 2, 1).and_hms_opt(end_hour, 0, 0).unwrap(),
        }
    }

    fn laporan_with_details(details: Vec<LaporanDetail>) -> Laporan {
        Laporan {
            id: 1,
            kecamatan_tujuan: "Biau".to_string(),
            tanggal_mulai: date(2025, 2, 1),
            tanggal_selesai: date(2025, 2, 3),
            perihal: "Survei".to_string(),
            id_ketua: Some(1),
            is_spd: true,
            details,
            modified_at: 0,
        }
    }

    #[test]
    fn draft_accepts_equal_start_and_end_dates() {
        let draft = LaporanDraft {
            kecamatan_tujuan: "Biau".to_string(),
            tanggal_mulai: date(2025, 2, 1),
            tanggal_selesai: date(2025, 2, 1),
            perihal: "Rapat koordinasi".to_string(),
            id_ketua: None,
            is_spd: false,
        };
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn draft_rejects_reversed_date_range() {
        let draft = LaporanDraft {
            kecamatan_tujuan: "Biau".to_string(),
            tanggal_mulai: date(2025, 2, 3),
            tanggal_selesai: date(2025, 2, 1),
            perihal: "Survei".to_string(),
            id_ketua: None,
            is_spd: true,
        };
        assert_eq!(draft.validate(), Err(LaporanValidationError::TanggalRange));
    }

    #[test]
    fn detail_draft_rejects_reversed_time_range() {
        let draft = LaporanDetailDraft {
            uraian: "Rapat".to_string(),
            waktu_mulai: date(2025, 2, 1).and_hms_opt(10, 0, 0).unwrap(),
            waktu_selesai: date(2025, 2, 1).and_hms_opt(8, 0, 0).unwrap(),
        };
        assert_eq!(draft.validate(), Err(LaporanValidationError::WaktuRange));
    }

    #[test]
    fn durasi_jam_is_derived_from_the_time_range() {
        let entry = detail(1, 8, 10);
        assert!((entry.durasi_jam() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn next_waktu_mulai_chains_from_the_last_detail() {
        let laporan = laporan_with_details(vec![detail(1, 8, 10), detail(2, 10, 12)]);
        assert_eq!(
            laporan.next_waktu_mulai(),
            Some(date(2025, 2, 1).and_hms_opt(12, 0, 0).unwrap())
        );
    }

    #[test]
    fn next_waktu_mulai_is_none_without_details() {
        let laporan = laporan_with_details(Vec::new());
        assert_eq!(laporan.next_waktu_mulai(), None);
    }
}
