//! FFI use-case API for shell-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to the UI shell via FRB.
//! - Parse date/time strings at the boundary and validate form input
//!   before any store mutation.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Each call opens storage at the process-wide configured path, hydrates
//!   the stores it needs, and runs to completion synchronously.

use chrono::{NaiveDate, NaiveDateTime};
use laporan_core::{
    core_version as core_version_inner, init_logging as init_logging_inner,
    laporan_placeholders, ping as ping_inner, Identitas, IdentitasStore, KetuaTimDraft,
    KetuaTimStore, Laporan, LaporanDetail, LaporanDetailDraft, LaporanDraft, LaporanStore,
    SqliteSnapshotStorage,
};
use std::path::PathBuf;
use std::sync::OnceLock;

const STORE_DB_FILE_NAME: &str = "laporan_store.sqlite3";
const TANGGAL_FORMAT: &str = "%Y-%m-%d";
const WAKTU_FORMAT: &str = "%Y-%m-%dT%H:%M";
const WAKTU_FORMAT_WITH_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";
static STORE_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on
///   failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Generic action response envelope for store mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Assigned record id for create operations.
    pub id: Option<i64>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: Option<i64>) -> Self {
        Self {
            ok: true,
            id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

/// Identity-gate envelope consumed by the shell's navigation guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentitasGateResponse {
    /// `None` when the answer is unknown (storage unavailable); the guard
    /// shows its loading state instead of redirecting.
    pub configured: Option<bool>,
    pub message: String,
}

/// Identitas record view for the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentitasView {
    pub nama: String,
    pub nip: String,
    pub pangkat_golongan: String,
    pub jabatan: String,
    pub unit_kerja: String,
}

/// Identitas read envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentitasResponse {
    pub identitas: Option<IdentitasView>,
    pub message: String,
}

/// Answers whether the identity gate may open.
///
/// # FFI contract
/// - Never panics; storage failure maps to `configured = None`.
#[flutter_rust_bridge::frb(sync)]
pub fn identitas_is_configured() -> IdentitasGateResponse {
    match load_identitas_store() {
        Ok(store) => IdentitasGateResponse {
            configured: Some(store.is_configured()),
            message: String::new(),
        },
        Err(err) => IdentitasGateResponse {
            configured: None,
            message: format!("identitas_is_configured failed: {err}"),
        },
    }
}

/// Reads the current identitas record.
#[flutter_rust_bridge::frb(sync)]
pub fn identitas_get() -> IdentitasResponse {
    match load_identitas_store() {
        Ok(store) => {
            let identitas = store.identitas();
            IdentitasResponse {
                identitas: Some(IdentitasView {
                    nama: identitas.nama.clone(),
                    nip: identitas.nip.clone(),
                    pangkat_golongan: identitas.pangkat_golongan.clone(),
                    jabatan: identitas.jabatan.clone(),
                    unit_kerja: identitas.unit_kerja.clone(),
                }),
                message: String::new(),
            }
        }
        Err(err) => IdentitasResponse {
            identitas: None,
            message: format!("identitas_get failed: {err}"),
        },
    }
}

/// Replaces the identitas record after validating the submission.
#[flutter_rust_bridge::frb(sync)]
pub fn identitas_set(
    nama: String,
    nip: String,
    pangkat_golongan: String,
    jabatan: String,
    unit_kerja: String,
) -> ActionResponse {
    let identitas = Identitas {
        nama: nama.trim().to_string(),
        nip: nip.trim().to_string(),
        pangkat_golongan: pangkat_golongan.trim().to_string(),
        jabatan: jabatan.trim().to_string(),
        unit_kerja: unit_kerja.trim().to_string(),
    };
    if let Err(err) = identitas.validate() {
        return ActionResponse::failure(format!("identitas_set rejected: {err}"));
    }

    let result = load_identitas_store().and_then(|mut store| {
        store.set_identitas(identitas).map_err(|err| err.to_string())
    });
    match result {
        Ok(()) => ActionResponse::success("Identitas saved.", None),
        Err(err) => ActionResponse::failure(format!("identitas_set failed: {err}")),
    }
}

/// Ketua-tim record view for the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KetuaTimItem {
    pub id: i64,
    pub nama: String,
    pub jabatan: String,
    pub nip: String,
}

/// Ketua-tim list envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KetuaTimListResponse {
    pub items: Vec<KetuaTimItem>,
    pub message: String,
}

/// Lists the ketua-tim registry in insertion order.
#[flutter_rust_bridge::frb(sync)]
pub fn ketua_tim_list() -> KetuaTimListResponse {
    match load_ketua_tim_store() {
        Ok(store) => KetuaTimListResponse {
            items: store
                .list()
                .iter()
                .map(|ketua| KetuaTimItem {
                    id: ketua.id,
                    nama: ketua.nama.clone(),
                    jabatan: ketua.jabatan.clone(),
                    nip: ketua.nip.clone(),
                })
                .collect(),
            message: String::new(),
        },
        Err(err) => KetuaTimListResponse {
            items: Vec::new(),
            message: format!("ketua_tim_list failed: {err}"),
        },
    }
}

/// Adds a ketua tim after validating the submission.
#[flutter_rust_bridge::frb(sync)]
pub fn ketua_tim_add(nama: String, jabatan: String, nip: String) -> ActionResponse {
    let draft = KetuaTimDraft {
        nama: nama.trim().to_string(),
        jabatan: jabatan.trim().to_string(),
        nip: nip.trim().to_string(),
    };
    if let Err(err) = draft.validate() {
        return ActionResponse::failure(format!("ketua_tim_add rejected: {err}"));
    }

    match with_ketua_tim_store(|store| store.add(&draft)) {
        Ok(id) => ActionResponse::success("Ketua tim created.", Some(id)),
        Err(err) => ActionResponse::failure(format!("ketua_tim_add failed: {err}")),
    }
}

/// Updates a ketua tim in place.
#[flutter_rust_bridge::frb(sync)]
pub fn ketua_tim_update(id: i64, nama: String, jabatan: String, nip: String) -> ActionResponse {
    let draft = KetuaTimDraft {
        nama: nama.trim().to_string(),
        jabatan: jabatan.trim().to_string(),
        nip: nip.trim().to_string(),
    };
    if let Err(err) = draft.validate() {
        return ActionResponse::failure(format!("ketua_tim_update rejected: {err}"));
    }

    match with_ketua_tim_store(|store| store.update(id, &draft).map(|()| id)) {
        Ok(id) => ActionResponse::success("Ketua tim updated.", Some(id)),
        Err(err) => ActionResponse::failure(format!("ketua_tim_update failed: {err}")),
    }
}

/// Deletes a ketua tim. Laporan referencing it keep their raw id.
#[flutter_rust_bridge::frb(sync)]
pub fn ketua_tim_delete(id: i64) -> ActionResponse {
    match with_ketua_tim_store(|store| store.delete(id).map(|()| id)) {
        Ok(id) => ActionResponse::success("Ketua tim deleted.", Some(id)),
        Err(err) => ActionResponse::failure(format!("ketua_tim_delete failed: {err}")),
    }
}

/// Activity-detail view embedded in a laporan item.
#[derive(Debug, Clone, PartialEq)]
pub struct LaporanDetailItem {
    pub id: i64,
    pub uraian: String,
    /// `YYYY-MM-DDTHH:MM` local datetime string.
    pub waktu_mulai: String,
    pub waktu_selesai: String,
    /// Derived duration in hours.
    pub durasi_jam: f64,
}

/// Laporan record view for the shell.
#[derive(Debug, Clone, PartialEq)]
pub struct LaporanItem {
    pub id: i64,
    pub kecamatan_tujuan: String,
    /// `YYYY-MM-DD` date string.
    pub tanggal_mulai: String,
    pub tanggal_selesai: String,
    pub perihal: String,
    pub id_ketua: Option<i64>,
    pub is_spd: bool,
    pub details: Vec<LaporanDetailItem>,
    /// Epoch milliseconds.
    pub modified_at: i64,
}

/// Laporan list envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct LaporanListResponse {
    pub items: Vec<LaporanItem>,
    pub message: String,
}

/// Lists all laporan in insertion order.
#[flutter_rust_bridge::frb(sync)]
pub fn laporan_list() -> LaporanListResponse {
    match load_laporan_store() {
        Ok(store) => LaporanListResponse {
            items: store.list().iter().map(to_laporan_item).collect(),
            message: String::new(),
        },
        Err(err) => LaporanListResponse {
            items: Vec::new(),
            message: format!("laporan_list failed: {err}"),
        },
    }
}

/// Creates a laporan after parsing dates and validating the submission.
#[flutter_rust_bridge::frb(sync)]
pub fn laporan_add(
    kecamatan_tujuan: String,
    tanggal_mulai: String,
    tanggal_selesai: String,
    perihal: String,
    id_ketua: Option<i64>,
    is_spd: bool,
) -> ActionResponse {
    let draft = match parse_laporan_draft(
        kecamatan_tujuan,
        tanggal_mulai,
        tanggal_selesai,
        perihal,
        id_ketua,
        is_spd,
    ) {
        Ok(draft) => draft,
        Err(err) => return ActionResponse::failure(format!("laporan_add rejected: {err}")),
    };

    match with_laporan_store(|store| store.add_laporan(&draft)) {
        Ok(id) => ActionResponse::success("Laporan created.", Some(id)),
        Err(err) => ActionResponse::failure(format!("laporan_add failed: {err}")),
    }
}

/// Updates a laporan; its detail list is preserved by the store.
#[flutter_rust_bridge::frb(sync)]
pub fn laporan_update(
    id: i64,
    kecamatan_tujuan: String,
    tanggal_mulai: String,
    tanggal_selesai: String,
    perihal: String,
    id_ketua: Option<i64>,
    is_spd: bool,
) -> ActionResponse {
    let draft = match parse_laporan_draft(
        kecamatan_tujuan,
        tanggal_mulai,
        tanggal_selesai,
        perihal,
        id_ketua,
        is_spd,
    ) {
        Ok(draft) => draft,
        Err(err) => return ActionResponse::failure(format!("laporan_update rejected: {err}")),
    };

    match with_laporan_store(|store| store.update_laporan(id, &draft).map(|()| id)) {
        Ok(id) => ActionResponse::success("Laporan updated.", Some(id)),
        Err(err) => ActionResponse::failure(format!("laporan_update failed: {err}")),
    }
}

/// Deletes a laporan together with its owned details.
#[flutter_rust_bridge::frb(sync)]
pub fn laporan_delete(id: i64) -> ActionResponse {
    match with_laporan_store(|store| store.delete_laporan(id).map(|()| id)) {
        Ok(id) => ActionResponse::success("Laporan deleted.", Some(id)),
        Err(err) => ActionResponse::failure(format!("laporan_delete failed: {err}")),
    }
}

/// Appends an activity detail to a laporan.
#[flutter_rust_bridge::frb(sync)]
pub fn laporan_detail_add(
    laporan_id: i64,
    uraian: String,
    waktu_mulai: String,
    waktu_selesai: String,
) -> ActionResponse {
    let draft = match parse_detail_draft(uraian, waktu_mulai, waktu_selesai) {
        Ok(draft) => draft,
        Err(err) => return ActionResponse::failure(format!("laporan_detail_add rejected: {err}")),
    };

    match with_laporan_store(|store| store.add_detail(laporan_id, &draft)) {
        Ok(id) => ActionResponse::success("Detail created.", Some(id)),
        Err(err) => ActionResponse::failure(format!("laporan_detail_add failed: {err}")),
    }
}

/// Replaces an activity detail's fields, preserving its id.
#[flutter_rust_bridge::frb(sync)]
pub fn laporan_detail_update(
    laporan_id: i64,
    detail_id: i64,
    uraian: String,
    waktu_mulai: String,
    waktu_selesai: String,
) -> ActionResponse {
    let draft = match parse_detail_draft(uraian, waktu_mulai, waktu_selesai) {
        Ok(draft) => draft,
        Err(err) => {
            return ActionResponse::failure(format!("laporan_detail_update rejected: {err}"))
        }
    };

    match with_laporan_store(|store| {
        store
            .update_detail(laporan_id, detail_id, &draft)
            .map(|()| detail_id)
    }) {
        Ok(id) => ActionResponse::success("Detail updated.", Some(id)),
        Err(err) => ActionResponse::failure(format!("laporan_detail_update failed: {err}")),
    }
}

/// Removes an activity detail from its laporan.
#[flutter_rust_bridge::frb(sync)]
pub fn laporan_detail_delete(laporan_id: i64, detail_id: i64) -> ActionResponse {
    match with_laporan_store(|store| {
        store.delete_detail(laporan_id, detail_id).map(|()| detail_id)
    }) {
        Ok(id) => ActionResponse::success("Detail deleted.", Some(id)),
        Err(err) => ActionResponse::failure(format!("laporan_detail_delete failed: {err}")),
    }
}

/// Chained start-time suggestion envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextWaktuResponse {
    /// End time of the last detail, or `None` for the first entry.
    pub waktu_mulai: Option<String>,
    pub message: String,
}

/// Suggests the next detail's start time from the previous detail's end.
#[flutter_rust_bridge::frb(sync)]
pub fn laporan_next_waktu_mulai(laporan_id: i64) -> NextWaktuResponse {
    let result = load_laporan_store().and_then(|store| {
        let laporan = store
            .get(laporan_id)
            .ok_or_else(|| format!("laporan not found: {laporan_id}"))?;
        Ok(laporan.next_waktu_mulai().map(format_waktu))
    });
    match result {
        Ok(waktu_mulai) => NextWaktuResponse {
            waktu_mulai,
            message: String::new(),
        },
        Err(err) => NextWaktuResponse {
            waktu_mulai: None,
            message: format!("laporan_next_waktu_mulai failed: {err}"),
        },
    }
}

/// One placeholder entry for the shell-side document templater.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderEntry {
    pub key: String,
    pub value: String,
}

/// Export-data envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDataResponse {
    pub entries: Vec<PlaceholderEntry>,
    pub message: String,
}

/// Builds the flat placeholder data for one laporan document.
///
/// The shell feeds these entries and the binary template to its docx
/// templating library; this crate never touches the template itself.
#[flutter_rust_bridge::frb(sync)]
pub fn laporan_export_data(laporan_id: i64) -> ExportDataResponse {
    match build_export_data(laporan_id) {
        Ok(data) => ExportDataResponse {
            entries: data
                .into_iter()
                .map(|(key, value)| PlaceholderEntry { key, value })
                .collect(),
            message: String::new(),
        },
        Err(err) => ExportDataResponse {
            entries: Vec::new(),
            message: format!("laporan_export_data failed: {err}"),
        },
    }
}

fn build_export_data(
    laporan_id: i64,
) -> Result<std::collections::BTreeMap<String, String>, String> {
    let identitas_store = load_identitas_store()?;
    let registry = load_ketua_tim_store()?;
    let laporan_store = load_laporan_store()?;
    let laporan = laporan_store
        .get(laporan_id)
        .ok_or_else(|| format!("laporan not found: {laporan_id}"))?;
    let ketua = laporan.id_ketua.and_then(|id| registry.get(id));
    Ok(laporan_placeholders(
        identitas_store.identitas(),
        laporan,
        ketua,
    ))
}

fn resolve_store_db_path() -> PathBuf {
    STORE_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("LAPORAN_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(STORE_DB_FILE_NAME)
        })
        .clone()
}

fn open_storage() -> Result<SqliteSnapshotStorage, String> {
    SqliteSnapshotStorage::open(resolve_store_db_path())
        .map_err(|err| format!("store DB open failed: {err}"))
}

fn load_identitas_store() -> Result<IdentitasStore<SqliteSnapshotStorage>, String> {
    let storage = open_storage()?;
    IdentitasStore::new(storage).map_err(|err| err.to_string())
}

fn load_ketua_tim_store() -> Result<KetuaTimStore<SqliteSnapshotStorage>, String> {
    let storage = open_storage()?;
    KetuaTimStore::new(storage).map_err(|err| err.to_string())
}

fn load_laporan_store() -> Result<LaporanStore<SqliteSnapshotStorage>, String> {
    let storage = open_storage()?;
    LaporanStore::new(storage).map_err(|err| err.to_string())
}

fn with_ketua_tim_store<T>(
    f: impl FnOnce(&mut KetuaTimStore<SqliteSnapshotStorage>) -> laporan_core::StoreResult<T>,
) -> Result<T, String> {
    let mut store = load_ketua_tim_store()?;
    f(&mut store).map_err(|err| err.to_string())
}

fn with_laporan_store<T>(
    f: impl FnOnce(&mut LaporanStore<SqliteSnapshotStorage>) -> laporan_core::StoreResult<T>,
) -> Result<T, String> {
    let mut store = load_laporan_store()?;
    f(&mut store).map_err(|err| err.to_string())
}

fn parse_laporan_draft(
    kecamatan_tujuan: String,
    tanggal_mulai: String,
    tanggal_selesai: String,
    perihal: String,
    id_ketua: Option<i64>,
    is_spd: bool,
) -> Result<LaporanDraft, String> {
    let draft = LaporanDraft {
        kecamatan_tujuan: kecamatan_tujuan.trim().to_string(),
        tanggal_mulai: parse_tanggal(&tanggal_mulai)?,
        tanggal_selesai: parse_tanggal(&tanggal_selesai)?,
        perihal: perihal.trim().to_string(),
        id_ketua,
        is_spd,
    };
    draft.validate().map_err(|err| err.to_string())?;
    Ok(draft)
}

fn parse_detail_draft(
    uraian: String,
    waktu_mulai: String,
    waktu_selesai: String,
) -> Result<LaporanDetailDraft, String> {
    let draft = LaporanDetailDraft {
        uraian: uraian.trim().to_string(),
        waktu_mulai: parse_waktu(&waktu_mulai)?,
        waktu_selesai: parse_waktu(&waktu_selesai)?,
    };
    draft.validate().map_err(|err| err.to_string())?;
    Ok(draft)
}

fn parse_tanggal(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), TANGGAL_FORMAT)
        .map_err(|_| format!("invalid date `{value}`; expected YYYY-MM-DD"))
}

fn parse_waktu(value: &str) -> Result<NaiveDateTime, String> {
    let trimmed = value.trim();
    NaiveDateTime::parse_from_str(trimmed, WAKTU_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, WAKTU_FORMAT_WITH_SECONDS))
        .map_err(|_| format!("invalid datetime `{value}`; expected YYYY-MM-DDTHH:MM"))
}

fn format_waktu(value: NaiveDateTime) -> String {
    value.format(WAKTU_FORMAT).to_string()
}

fn to_laporan_item(laporan: &Laporan) -> LaporanItem {
    LaporanItem {
        id: laporan.id,
        kecamatan_tujuan: laporan.kecamatan_tujuan.clone(),
        tanggal_mulai: laporan.tanggal_mulai.format(TANGGAL_FORMAT).to_string(),
        tanggal_selesai: laporan.tanggal_selesai.format(TANGGAL_FORMAT).to_string(),
        perihal: laporan.perihal.clone(),
        id_ketua: laporan.id_ketua,
        is_spd: laporan.is_spd,
        details: laporan.details.iter().map(to_detail_item).collect(),
        modified_at: laporan.modified_at,
    }
}

fn to_detail_item(detail: &LaporanDetail) -> LaporanDetailItem {
    LaporanDetailItem {
        id: detail.id,
        uraian: detail.uraian.clone(),
        waktu_mulai: format_waktu(detail.waktu_mulai),
        waktu_selesai: format_waktu(detail.waktu_selesai),
        durasi_jam: detail.durasi_jam(),
    }
}
