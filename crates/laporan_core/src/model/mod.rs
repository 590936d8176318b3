//! Domain model for travel/duty report drafting.
//!
//! # Responsibility
//! - Define the canonical records persisted by the three stores.
//! - Provide input-time validation for form submissions.
//!
//! # Invariants
//! - Record identifiers are small sequential integers assigned by stores.
//! - Validation runs at input time; store mutations never re-validate.

pub mod identitas;
pub mod ketua_tim;
pub mod laporan;

use once_cell::sync::Lazy;
use regex::Regex;

/// NIP (employee number) is a fixed 18-digit string.
static NIP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{18}$").expect("NIP pattern is a valid regex"));

/// Returns whether `nip` matches the 18-digit employee-number format.
pub fn is_valid_nip(nip: &str) -> bool {
    NIP_PATTERN.is_match(nip)
}
