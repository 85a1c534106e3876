use std::io::Write;

use ehm_core::{EhmError, SchemaVersion, StateTag};
use ehm_node::{FileStore, StoreManifest, StoredImage};
use tempfile::tempdir;

fn put_blob(store: &FileStore, key: &str, report_step: i32, state_tag: StateTag, iens: usize) {
    let mut writer = store
        .writer(key, report_step, state_tag, iens)
        .expect("writer");
    writer.write_all(b"blob").expect("write blob");
}

#[test]
fn blob_paths_follow_the_layout() {
    let dir = tempdir().expect("tempdir");
    let store = FileStore::create(dir.path()).expect("create");
    let path = store.blob_path("PORO", 12, StateTag::Forecast, 7);
    assert!(path.ends_with("step_0012/forecast/PORO/real_007.bin"));
    assert!(path.starts_with(dir.path()));
}

#[test]
fn scan_returns_a_sorted_index() {
    let dir = tempdir().expect("tempdir");
    let store = FileStore::create(dir.path()).expect("create");

    put_blob(&store, "AKEY", 0, StateTag::Analyzed, 1);
    put_blob(&store, "BKEY", 2, StateTag::Forecast, 3);
    put_blob(&store, "AKEY", 0, StateTag::Analyzed, 0);
    put_blob(&store, "AKEY", 1, StateTag::Forecast, 2);

    let images = store.scan().expect("scan");
    let expected = vec![
        StoredImage {
            key: "AKEY".into(),
            report_step: 0,
            state_tag: StateTag::Analyzed,
            iens: 0,
        },
        StoredImage {
            key: "AKEY".into(),
            report_step: 0,
            state_tag: StateTag::Analyzed,
            iens: 1,
        },
        StoredImage {
            key: "AKEY".into(),
            report_step: 1,
            state_tag: StateTag::Forecast,
            iens: 2,
        },
        StoredImage {
            key: "BKEY".into(),
            report_step: 2,
            state_tag: StateTag::Forecast,
            iens: 3,
        },
    ];
    assert_eq!(images, expected);
}

#[test]
fn scan_skips_foreign_files() {
    let dir = tempdir().expect("tempdir");
    let store = FileStore::create(dir.path()).expect("create");
    put_blob(&store, "AKEY", 0, StateTag::Analyzed, 0);

    std::fs::write(dir.path().join("notes.txt"), "scratch").expect("write");
    let blob_dir = dir.path().join("step_0000/analyzed/AKEY");
    std::fs::write(blob_dir.join("readme.md"), "not a blob").expect("write");
    let odd_dir = dir.path().join("step_x/analyzed/AKEY");
    std::fs::create_dir_all(&odd_dir).expect("mkdir");
    std::fs::write(odd_dir.join("real_000.bin"), "blob").expect("write");

    let images = store.scan().expect("scan");
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].key, "AKEY");
}

#[test]
fn open_validates_the_manifest() {
    let dir = tempdir().expect("tempdir");
    FileStore::create(dir.path()).expect("create");
    FileStore::open(dir.path()).expect("reopen");

    let manifest = StoreManifest::load(&dir.path().join("manifest.json")).expect("load");
    assert!(SchemaVersion::default().is_compatible_with(&manifest.schema));
    assert!(manifest.created_at.contains('T'));
}

#[test]
fn open_without_a_manifest_fails() {
    let dir = tempdir().expect("tempdir");
    let err = FileStore::open(dir.path()).unwrap_err();
    assert!(matches!(err, EhmError::Config(_)));
    assert_eq!(err.info().code, "manifest-read");
}

#[test]
fn open_rejects_an_incompatible_schema() {
    let dir = tempdir().expect("tempdir");
    let manifest = StoreManifest {
        schema: SchemaVersion::new(9, 9, 9),
        created_at: "2026-01-01T00:00:00Z".into(),
    };
    manifest
        .write(&dir.path().join("manifest.json"))
        .expect("write manifest");

    let err = FileStore::open(dir.path()).unwrap_err();
    assert!(matches!(err, EhmError::Config(_)));
    assert!(!err.is_realization_recoverable());
    let info = err.info();
    assert_eq!(info.code, "store-schema");
    assert_eq!(info.context.get("found").map(String::as_str), Some("9.9.9"));
}

#[test]
fn remove_is_idempotent() {
    let dir = tempdir().expect("tempdir");
    let store = FileStore::create(dir.path()).expect("create");
    put_blob(&store, "AKEY", 0, StateTag::Analyzed, 0);

    store.remove("AKEY", 0, StateTag::Analyzed, 0).expect("first");
    store.remove("AKEY", 0, StateTag::Analyzed, 0).expect("second");
    assert!(store.scan().expect("scan").is_empty());
}
