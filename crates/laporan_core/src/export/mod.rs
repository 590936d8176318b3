//! Document-export placeholder boundary.
//!
//! # Responsibility
//! - Build the flat placeholder map consumed by the external docx templater.
//! - Format dates in Indonesian long form for document text.
//!
//! # Invariants
//! - Keys are stable template placeholder names; values are plain strings.
//! - A dangling ketua-tim reference yields empty ketua placeholders; the
//!   caller decides how to render the gap.
//! - The template binary and generated artifact are out of scope here.

use crate::model::identitas::Identitas;
use crate::model::ketua_tim::KetuaTim;
use crate::model::laporan::Laporan;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

const NAMA_BULAN: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Formats a date in Indonesian long form, e.g. `12 Februari 2025`.
pub fn format_tanggal(date: NaiveDate) -> String {
    let bulan = NAMA_BULAN[date.month0() as usize];
    format!("{} {} {}", date.day(), bulan, date.year())
}

/// Formats a date range for document text.
///
/// A single-day range collapses to one date; a multi-day range is joined
/// with `s.d.` (sampai dengan).
pub fn format_rentang_tanggal(mulai: NaiveDate, selesai: NaiveDate) -> String {
    if mulai == selesai {
        format_tanggal(mulai)
    } else {
        format!("{} s.d. {}", format_tanggal(mulai), format_tanggal(selesai))
    }
}

/// Builds the placeholder map for one laporan document.
///
/// `ketua` is the resolved soft reference; pass `None` when the referenced
/// ketua tim no longer exists.
pub fn laporan_placeholders(
    identitas: &Identitas,
    laporan: &Laporan,
    ketua: Option<&KetuaTim>,
) -> BTreeMap<String, String> {
    let mut data = BTreeMap::new();
    data.insert("nama".to_string(), identitas.nama.clone());
    data.insert("nip".to_string(), identitas.nip.clone());
    data.insert(
        "pangkat_golongan".to_string(),
        identitas.pangkat_golongan.clone(),
    );
    data.insert("jabatan".to_string(), identitas.jabatan.clone());
    data.insert("unit_kerja".to_string(), identitas.unit_kerja.clone());
    data.insert("perihal".to_string(), laporan.perihal.clone());
    data.insert(
        "kecamatan_tujuan".to_string(),
        laporan.kecamatan_tujuan.clone(),
    );
    data.insert(
        "tanggal_kegiatan".to_string(),
        format_rentang_tanggal(laporan.tanggal_mulai, laporan.tanggal_selesai),
    );
    data.insert(
        "nama_ketua".to_string(),
        ketua.map(|k| k.nama.clone()).unwrap_or_default(),
    );
    data.insert(
        "jabatan_ketua".to_string(),
        ketua.map(|k| k.jabatan.clone()).unwrap_or_default(),
    );
    data.insert(
        "nip_ketua".to_string(),
        ketua.map(|k| k.nip.clone()).unwrap_or_default(),
    );
    data
}
