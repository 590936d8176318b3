//! Author identity (identitas) singleton record.
//!
//! # Responsibility
//! - Hold the report author's civil-service identity fields.
//! - Decide whether the application identity gate may open.
//!
//! # Invariants
//! - At most one identitas exists; writes replace it wholesale.
//! - "Configured" means all five fields are non-empty.

use crate::model::is_valid_nip;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Singleton record describing the report author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identitas {
    /// Full name.
    pub nama: String,
    /// Employee number, fixed 18 digits.
    pub nip: String,
    /// Rank and grade, e.g. `III/a`.
    pub pangkat_golongan: String,
    /// Position title.
    pub jabatan: String,
    /// Work unit, e.g. `BPS Kabupaten Buol`.
    pub unit_kerja: String,
}

/// Validation failure for identitas form submissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentitasValidationError {
    /// A required field was submitted empty.
    EmptyField(&'static str),
    /// NIP does not match the 18-digit format.
    InvalidNip,
}

impl Display for IdentitasValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "identitas field `{field}` must not be empty"),
            Self::InvalidNip => write!(f, "identitas nip must be exactly 18 digits"),
        }
    }
}

impl Error for IdentitasValidationError {}

impl Identitas {
    /// Returns whether all five identity fields are non-empty.
    ///
    /// Consumed by the UI shell's navigation guard; the gate itself lives
    /// outside this crate.
    pub fn is_configured(&self) -> bool {
        !self.nama.is_empty()
            && !self.nip.is_empty()
            && !self.pangkat_golongan.is_empty()
            && !self.jabatan.is_empty()
            && !self.unit_kerja.is_empty()
    }

    /// Validates a form submission before it reaches the store.
    ///
    /// Stores never re-run this check; it belongs to the input path only.
    pub fn validate(&self) -> Result<(), IdentitasValidationError> {
        for (field, value) in [
            ("nama", &self.nama),
            ("nip", &self.nip),
            ("pangkat_golongan", &self.pangkat_golongan),
            ("jabatan", &self.jabatan),
            ("unit_kerja", &self.unit_kerja),
        ] {
            if value.trim().is_empty() {
                return Err(IdentitasValidationError::EmptyField(field));
            }
        }
        if !is_valid_nip(&self.nip) {
            return Err(IdentitasValidationError::InvalidNip);
        }
        Ok(())
    }
}
