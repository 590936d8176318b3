//! Ketua tim (team lead) reference records.
//!
//! # Responsibility
//! - Define the team-lead record selectable by a laporan.
//! - Validate team-lead form submissions.
//!
//! # Invariants
//! - `id` is assigned once by the registry and never changes.
//! - Laporan reference ketua tim by id only; deleting a ketua tim does not
//!   touch laporan that point at it.

use crate::model::is_valid_nip;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Registry-assigned identifier for a ketua tim.
pub type KetuaTimId = i64;

const NAMA_MIN_CHARS: usize = 3;
const NAMA_MAX_CHARS: usize = 64;

/// Team-lead reference record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KetuaTim {
    /// Unique registry id, immutable once assigned.
    pub id: KetuaTimId,
    /// Full name.
    pub nama: String,
    /// Position title.
    pub jabatan: String,
    /// Employee number, fixed 18 digits.
    pub nip: String,
}

/// Team-lead record as submitted by a form, before an id exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KetuaTimDraft {
    pub nama: String,
    pub jabatan: String,
    pub nip: String,
}

/// Validation failure for ketua-tim form submissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KetuaTimValidationError {
    /// `nama` or `jabatan` outside the 3..=64 character range.
    FieldLength(&'static str),
    /// NIP does not match the 18-digit format.
    InvalidNip,
}

impl Display for KetuaTimValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FieldLength(field) => write!(
                f,
                "ketua tim field `{field}` must be {NAMA_MIN_CHARS}..={NAMA_MAX_CHARS} characters"
            ),
            Self::InvalidNip => write!(f, "ketua tim nip must be exactly 18 digits"),
        }
    }
}

impl Error for KetuaTimValidationError {}

impl KetuaTimDraft {
    /// Validates a form submission before it reaches the registry.
    pub fn validate(&self) -> Result<(), KetuaTimValidationError> {
        for (field, value) in [("nama", &self.nama), ("jabatan", &self.jabatan)] {
            let chars = value.trim().chars().count();
            if !(NAMA_MIN_CHARS..=NAMA_MAX_CHARS).contains(&chars) {
                return Err(KetuaTimValidationError::FieldLength(field));
            }
        }
        if !is_valid_nip(&self.nip) {
            return Err(KetuaTimValidationError::InvalidNip);
        }
        Ok(())
    }

    /// Attaches a registry-assigned id to this draft.
    pub fn into_record(self, id: KetuaTimId) -> KetuaTim {
        KetuaTim {
            id,
            nama: self.nama,
            jabatan: self.jabatan,
            nip: self.nip,
        }
    }
}
