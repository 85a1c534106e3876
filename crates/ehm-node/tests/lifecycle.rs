use std::sync::Arc;

use ehm_core::{EhmError, StateTag};
use ehm_node::{EnsembleNode, FileStore, NO_REPORT_STEP};
use ehm_param::{InitialDraw, NodeConfig, VariantSpec};
use tempfile::tempdir;

fn assert_send<T: Send>() {}

fn multiplier_config() -> Arc<NodeConfig> {
    Arc::new(
        NodeConfig::new(
            "MULTZ",
            VariantSpec::ScalarMultiplier {
                size: 4,
                prior: InitialDraw::Gaussian {
                    mean: 1.0,
                    std_dev: 0.2,
                },
            },
        )
        .with_seed(77),
    )
}

#[test]
fn nodes_move_between_threads() {
    assert_send::<EnsembleNode>();
}

#[test]
fn initialize_is_reproducible_per_member() {
    let config = multiplier_config();
    let mut first = EnsembleNode::new(config.clone());
    let mut again = EnsembleNode::new(config.clone());
    let mut other = EnsembleNode::new(config);

    first.initialize(3).expect("initialize");
    again.initialize(3).expect("initialize");
    other.initialize(4).expect("initialize");

    assert_eq!(first.payload(), again.payload());
    assert_ne!(first.payload(), other.payload());

    let freshness = first.freshness();
    assert_eq!(freshness.report_step, 0);
    assert_eq!(freshness.state_tag, StateTag::Analyzed);
    assert!(freshness.dirty);
}

#[test]
fn ensure_memory_is_idempotent() {
    let mut node = EnsembleNode::new(multiplier_config());
    node.initialize(0).expect("initialize");
    let payload_before = node.payload().cloned();
    let freshness_before = node.freshness();

    node.ensure_memory();

    assert_eq!(node.payload().cloned(), payload_before);
    assert_eq!(node.freshness(), freshness_before);
}

#[test]
fn persisted_image_round_trips_through_the_store() {
    let dir = tempdir().expect("tempdir");
    let store = FileStore::create(&dir.path().join("store")).expect("create store");
    let config = multiplier_config();

    let mut node = EnsembleNode::new(config.clone());
    node.initialize(3).expect("initialize");
    let mut writer = store
        .writer("MULTZ", 0, StateTag::Analyzed, 3)
        .expect("writer");
    let wrote = node
        .write(&mut writer, 0, StateTag::Analyzed)
        .expect("write");
    assert!(wrote);
    drop(writer);

    let mut replica = EnsembleNode::new(config);
    let mut reader = store
        .reader("MULTZ", 0, StateTag::Analyzed, 3)
        .expect("reader");
    replica
        .read(&mut reader, 0, StateTag::Analyzed)
        .expect("read");

    assert_eq!(replica.payload(), node.payload());
    let freshness = replica.freshness();
    assert_eq!(freshness.report_step, 0);
    assert_eq!(freshness.state_tag, StateTag::Analyzed);
    assert!(!freshness.dirty);
}

#[test]
fn missing_member_blob_is_recoverable() {
    let dir = tempdir().expect("tempdir");
    let store = FileStore::create(dir.path()).expect("create store");
    let err = store
        .reader("MULTZ", 0, StateTag::Analyzed, 12)
        .unwrap_err();
    assert!(matches!(err, EhmError::IoFailure(_)));
    assert!(err.is_realization_recoverable());
}

#[test]
fn free_data_releases_and_resets() {
    let mut node = EnsembleNode::new(multiplier_config());
    node.initialize(1).expect("initialize");
    assert!(node.memory_allocated());

    node.free_data();

    assert!(!node.memory_allocated());
    let freshness = node.freshness();
    assert_eq!(freshness.report_step, NO_REPORT_STEP);
    assert_eq!(freshness.state_tag, StateTag::Undefined);
    assert!(freshness.dirty);
    assert_eq!(node.serial_cursor().emitted(), 0);
    assert!(!node.serial_cursor().is_complete());

    let mut sink = Vec::new();
    let err = node.write(&mut sink, 0, StateTag::Analyzed).unwrap_err();
    assert!(matches!(err, EhmError::MemoryNotAllocated(_)));
    assert!(sink.is_empty());

    node.initialize(1).expect("reinitialize");
    assert!(node.memory_allocated());
}

#[test]
fn free_data_twice_is_harmless() {
    let mut node = EnsembleNode::new(multiplier_config());
    node.free_data();
    node.free_data();
    assert!(!node.memory_allocated());
}

#[test]
fn empty_payload_writes_nothing() {
    let dir = tempdir().expect("tempdir");
    let store = FileStore::create(dir.path()).expect("create store");
    let config = Arc::new(NodeConfig::new(
        "GDATA",
        VariantSpec::GeneralDataArray {
            size: 0,
            prior: InitialDraw::default(),
        },
    ));

    let mut node = EnsembleNode::new(config);
    node.ensure_memory();
    let mut writer = store
        .writer("GDATA", 1, StateTag::Forecast, 0)
        .expect("writer");
    let wrote = node
        .write(&mut writer, 1, StateTag::Forecast)
        .expect("write");
    drop(writer);
    assert!(!wrote, "empty payload has no stored form");

    let path = store.blob_path("GDATA", 1, StateTag::Forecast, 0);
    assert_eq!(
        std::fs::metadata(&path).expect("stat").len(),
        0,
        "nothing reached the writer"
    );
    store.remove("GDATA", 1, StateTag::Forecast, 0).expect("remove");
    assert!(!path.exists());

    let freshness = node.freshness();
    assert_eq!(freshness.report_step, 1);
    assert_eq!(freshness.state_tag, StateTag::Forecast);
    assert!(!freshness.dirty);
}

#[test]
fn simulator_write_renders_under_the_run_path() {
    let dir = tempdir().expect("tempdir");
    let config = Arc::new(
        NodeConfig::new(
            "MULTZ",
            VariantSpec::ScalarMultiplier {
                size: 2,
                prior: InitialDraw::Constant { value: 0.5 },
            },
        )
        .with_output_file("multz.inc"),
    );

    let mut node = EnsembleNode::new(config);
    node.initialize(0).expect("initialize");
    let written = node.simulator_write(dir.path()).expect("simulator write");
    assert_eq!(written, dir.path().join("multz.inc"));

    let text = std::fs::read_to_string(&written).expect("read rendered file");
    assert!(text.starts_with("MULTZ\n"));
    assert!(text.contains("0.500000"));
}

#[test]
fn simulator_write_requires_allocated_memory() {
    let dir = tempdir().expect("tempdir");
    let node = EnsembleNode::new(multiplier_config());
    let err = node.simulator_write(dir.path()).unwrap_err();
    assert!(matches!(err, EhmError::MemoryNotAllocated(_)));
}
