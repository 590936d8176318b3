use chrono::{NaiveDate, NaiveDateTime};
use laporan_core::{
    LaporanDetailDraft, LaporanDraft, LaporanStore, MemorySnapshotStorage, StoreError,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

fn at(hour: u32, minute: u32) -> NaiveDateTime {
    date(2025, 2, 1).and_hms_opt(hour, minute, 0).unwrap()
}

fn laporan_draft() -> LaporanDraft {
    LaporanDraft {
        kecamatan_tujuan: "Biau".to_string(),
        tanggal_mulai: date(2025, 2, 1),
        tanggal_selesai: date(2025, 2, 3),
        perihal: "Survei".to_string(),
        id_ketua: Some(1),
        is_spd: true,
    }
}

fn detail(uraian: &str, start: NaiveDateTime, end: NaiveDateTime) -> LaporanDetailDraft {
    LaporanDetailDraft {
        uraian: uraian.to_string(),
        waktu_mulai: start,
        waktu_selesai: end,
    }
}

#[test]
fn detail_ids_count_up_within_one_laporan() {
    let storage = MemorySnapshotStorage::new();
    let mut store = LaporanStore::new(&storage).unwrap();
    store.add_laporan(&laporan_draft()).unwrap();

    let first = store
        .add_detail(1, &detail("Rapat", at(8, 0), at(10, 0)))
        .unwrap();
    let second = store
        .add_detail(1, &detail("Pendataan", at(10, 0), at(12, 0)))
        .unwrap();

    assert_eq!(first, 1);
    assert_eq!(second, 2);
}

#[test]
fn detail_ids_are_scoped_per_laporan() {
    let storage = MemorySnapshotStorage::new();
    let mut store = LaporanStore::new(&storage).unwrap();
    store.add_laporan(&laporan_draft()).unwrap();
    store.add_laporan(&laporan_draft()).unwrap();

    let in_first = store
        .add_detail(1, &detail("Rapat", at(8, 0), at(10, 0)))
        .unwrap();
    let in_second = store
        .add_detail(2, &detail("Rapat", at(8, 0), at(10, 0)))
        .unwrap();

    // Both laporan independently start their detail ids at 1.
    assert_eq!(in_first, 1);
    assert_eq!(in_second, 1);
}

#[test]
fn delete_detail_leaves_the_others() {
    let storage = MemorySnapshotStorage::new();
    let mut store = LaporanStore::new(&storage).unwrap();
    store.add_laporan(&laporan_draft()).unwrap();
    store
        .add_detail(1, &detail("Rapat", at(8, 0), at(10, 0)))
        .unwrap();
    store
        .add_detail(1, &detail("Pendataan", at(10, 0), at(12, 0)))
        .unwrap();

    store.delete_detail(1, 1).unwrap();

    let details = &store.get(1).unwrap().details;
    assert_eq!(details.len(), 1);
    assert_eq!(details[0].id, 2);
    assert_eq!(details[0].uraian, "Pendataan");
}

#[test]
fn update_detail_preserves_its_id() {
    let storage = MemorySnapshotStorage::new();
    let mut store = LaporanStore::new(&storage).unwrap();
    store.add_laporan(&laporan_draft()).unwrap();
    store
        .add_detail(1, &detail("Rapat", at(8, 0), at(10, 0)))
        .unwrap();

    store
        .update_detail(1, 1, &detail("Rapat koordinasi", at(8, 30), at(10, 30)))
        .unwrap();

    let entry = &store.get(1).unwrap().details[0];
    assert_eq!(entry.id, 1);
    assert_eq!(entry.uraian, "Rapat koordinasi");
    assert_eq!(entry.waktu_mulai, at(8, 30));
}

#[test]
fn detail_id_after_delete_follows_max_plus_one() {
    let storage = MemorySnapshotStorage::new();
    let mut store = LaporanStore::new(&storage).unwrap();
    store.add_laporan(&laporan_draft()).unwrap();
    store
        .add_detail(1, &detail("Rapat", at(8, 0), at(10, 0)))
        .unwrap();
    store
        .add_detail(1, &detail("Pendataan", at(10, 0), at(12, 0)))
        .unwrap();
    store.delete_detail(1, 2).unwrap();

    // Unlike the laporan counter, detail ids reuse a freed maximum.
    let id = store
        .add_detail(1, &detail("Evaluasi", at(13, 0), at(14, 0)))
        .unwrap();
    assert_eq!(id, 2);
}

#[test]
fn missing_detail_or_laporan_reports_not_found() {
    let storage = MemorySnapshotStorage::new();
    let mut store = LaporanStore::new(&storage).unwrap();
    store.add_laporan(&laporan_draft()).unwrap();

    let err = store
        .update_detail(1, 9, &detail("Rapat", at(8, 0), at(10, 0)))
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::DetailNotFound {
            laporan_id: 1,
            detail_id: 9
        }
    ));

    let err = store.delete_detail(7, 1).unwrap_err();
    assert!(matches!(err, StoreError::LaporanNotFound(7)));
}

#[test]
fn detail_mutations_restamp_parent_modified_at() {
    let storage = MemorySnapshotStorage::new();
    let mut store = LaporanStore::new(&storage).unwrap();
    store.add_laporan(&laporan_draft()).unwrap();
    let created_at = store.get(1).unwrap().modified_at;

    store
        .add_detail(1, &detail("Rapat", at(8, 0), at(10, 0)))
        .unwrap();
    assert!(store.get(1).unwrap().modified_at >= created_at);
}

#[test]
fn next_waktu_mulai_chains_across_store_mutations() {
    let storage = MemorySnapshotStorage::new();
    let mut store = LaporanStore::new(&storage).unwrap();
    store.add_laporan(&laporan_draft()).unwrap();

    assert_eq!(store.get(1).unwrap().next_waktu_mulai(), None);

    store
        .add_detail(1, &detail("Rapat", at(8, 0), at(10, 0)))
        .unwrap();
    assert_eq!(store.get(1).unwrap().next_waktu_mulai(), Some(at(10, 0)));

    store
        .add_detail(1, &detail("Pendataan", at(10, 0), at(12, 15)))
        .unwrap();
    assert_eq!(store.get(1).unwrap().next_waktu_mulai(), Some(at(12, 15)));
}

#[test]
fn details_survive_rehydration() {
    let storage = MemorySnapshotStorage::new();
    {
        let mut store = LaporanStore::new(&storage).unwrap();
        store.add_laporan(&laporan_draft()).unwrap();
        store
            .add_detail(1, &detail("Rapat", at(8, 0), at(10, 0)))
            .unwrap();
    }

    let store = LaporanStore::new(&storage).unwrap();
    let details = &store.get(1).unwrap().details;
    assert_eq!(details.len(), 1);
    assert_eq!(details[0].uraian, "Rapat");
    assert_eq!(details[0].waktu_selesai, at(10, 0));
}
