use chrono::NaiveDate;
use laporan_core::{
    LaporanDetailDraft, LaporanDraft, LaporanStore, MemorySnapshotStorage, StoreError,
};
use std::time::{SystemTime, UNIX_EPOCH};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

fn survei_biau() -> LaporanDraft {
    LaporanDraft {
        kecamatan_tujuan: "Biau".to_string(),
        tanggal_mulai: date(2025, 2, 1),
        tanggal_selesai: date(2025, 2, 3),
        perihal: "Survei".to_string(),
        id_ketua: Some(1),
        is_spd: true,
    }
}

fn detail(uraian: &str, start_hour: u32, end_hour: u32) -> LaporanDetailDraft {
    LaporanDetailDraft {
        uraian: uraian.to_string(),
        waktu_mulai: date(2025, 2, 1).and_hms_opt(start_hour, 0, 0).unwrap(),
        waktu_selesai: date(2025, 2, 1).and_hms_opt(end_hour, 0, 0).unwrap(),
    }
}

fn epoch_ms_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time should be after unix epoch")
        .as_millis() as i64
}

#[test]
fn add_sets_id_empty_details_and_modified_at() {
    let storage = MemorySnapshotStorage::new();
    let mut store = LaporanStore::new(&storage).unwrap();

    let before = epoch_ms_now();
    let id = store.add_laporan(&survei_biau()).unwrap();
    let after = epoch_ms_now();

    assert_eq!(id, 1);
    let laporan = store.get(1).unwrap();
    assert_eq!(laporan.kecamatan_tujuan, "Biau");
    assert_eq!(laporan.perihal, "Survei");
    assert_eq!(laporan.id_ketua, Some(1));
    assert!(laporan.is_spd);
    assert!(laporan.details.is_empty());
    assert!(laporan.modified_at >= before && laporan.modified_at <= after);
}

#[test]
fn counter_never_reuses_an_id_after_deletion() {
    let storage = MemorySnapshotStorage::new();
    let mut store = LaporanStore::new(&storage).unwrap();

    let first = store.add_laporan(&survei_biau()).unwrap();
    assert_eq!(first, 1);
    store.delete_laporan(1).unwrap();

    let second = store.add_laporan(&survei_biau()).unwrap();
    assert_eq!(second, 2);
    assert!(store.get(1).is_none());
}

#[test]
fn counter_survives_rehydration() {
    let storage = MemorySnapshotStorage::new();
    {
        let mut store = LaporanStore::new(&storage).unwrap();
        store.add_laporan(&survei_biau()).unwrap();
        store.add_laporan(&survei_biau()).unwrap();
        store.delete_laporan(1).unwrap();
        store.delete_laporan(2).unwrap();
    }

    let mut store = LaporanStore::new(&storage).unwrap();
    assert!(store.list().is_empty());
    assert_eq!(store.add_laporan(&survei_biau()).unwrap(), 3);
}

#[test]
fn update_replaces_fields_but_preserves_details() {
    let storage = MemorySnapshotStorage::new();
    let mut store = LaporanStore::new(&storage).unwrap();

    store.add_laporan(&survei_biau()).unwrap();
    store.add_detail(1, &detail("Rapat", 8, 10)).unwrap();
    store.add_detail(1, &detail("Pendataan", 10, 12)).unwrap();

    let changed = LaporanDraft {
        kecamatan_tujuan: "Momunu".to_string(),
        tanggal_mulai: date(2025, 3, 1),
        tanggal_selesai: date(2025, 3, 2),
        perihal: "Pengawasan".to_string(),
        id_ketua: None,
        is_spd: false,
    };
    store.update_laporan(1, &changed).unwrap();

    let laporan = store.get(1).unwrap();
    assert_eq!(laporan.kecamatan_tujuan, "Momunu");
    assert_eq!(laporan.perihal, "Pengawasan");
    assert_eq!(laporan.id_ketua, None);
    assert!(!laporan.is_spd);
    // The detail list cannot be overwritten through this path.
    assert_eq!(laporan.details.len(), 2);
    assert_eq!(laporan.details[0].uraian, "Rapat");
    assert_eq!(laporan.details[1].uraian, "Pendataan");
}

#[test]
fn delete_discards_owned_details_with_the_parent() {
    let storage = MemorySnapshotStorage::new();
    let mut store = LaporanStore::new(&storage).unwrap();

    store.add_laporan(&survei_biau()).unwrap();
    store.add_detail(1, &detail("Rapat", 8, 10)).unwrap();
    store.delete_laporan(1).unwrap();

    assert!(store.get(1).is_none());
    assert!(store.list().is_empty());

    let rehydrated = LaporanStore::new(&storage).unwrap();
    assert!(rehydrated.list().is_empty());
}

#[test]
fn mutations_on_missing_id_report_not_found() {
    let storage = MemorySnapshotStorage::new();
    let mut store = LaporanStore::new(&storage).unwrap();

    let err = store.update_laporan(5, &survei_biau()).unwrap_err();
    assert!(matches!(err, StoreError::LaporanNotFound(5)));

    let err = store.delete_laporan(5).unwrap_err();
    assert!(matches!(err, StoreError::LaporanNotFound(5)));

    let err = store.add_detail(5, &detail("Rapat", 8, 10)).unwrap_err();
    assert!(matches!(err, StoreError::LaporanNotFound(5)));
}

#[test]
fn list_returns_laporan_in_insertion_order() {
    let storage = MemorySnapshotStorage::new();
    let mut store = LaporanStore::new(&storage).unwrap();

    for kecamatan in ["Biau", "Momunu", "Lakea"] {
        let mut draft = survei_biau();
        draft.kecamatan_tujuan = kecamatan.to_string();
        store.add_laporan(&draft).unwrap();
    }

    let order: Vec<&str> = store
        .list()
        .iter()
        .map(|l| l.kecamatan_tujuan.as_str())
        .collect();
    assert_eq!(order, vec!["Biau", "Momunu", "Lakea"]);
}

#[test]
fn dangling_ketua_reference_is_kept_as_is() {
    let storage = MemorySnapshotStorage::new();
    let mut store = LaporanStore::new(&storage).unwrap();

    store.add_laporan(&survei_biau()).unwrap();
    // The registry entry behind id_ketua=1 may be deleted independently;
    // the laporan keeps the raw reference and resolution happens at read
    // time against the registry.
    assert_eq!(store.get(1).unwrap().id_ketua, Some(1));
}
