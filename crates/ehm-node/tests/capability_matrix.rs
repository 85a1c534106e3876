use std::path::Path;
use std::sync::Arc;

use ehm_core::{EhmError, Variant};
use ehm_node::{Capability, CapabilityTable, EnsembleNode, SerialVector, SimulatorOutput};
use ehm_param::{InitialDraw, NamedPrior, NodeConfig, VariantSpec};

fn spec_for(variant: Variant) -> VariantSpec {
    match variant {
        Variant::ScalarMultiplier => VariantSpec::ScalarMultiplier {
            size: 3,
            prior: InitialDraw::default(),
        },
        Variant::FaultMultiplier => VariantSpec::FaultMultiplier {
            faults: vec!["F_NORTH".into(), "F_SOUTH".into()],
            prior: InitialDraw::default(),
        },
        Variant::TabulatedRelPerm => VariantSpec::TabulatedRelPerm {
            phases: vec!["WATER".into(), "OIL".into()],
            saturation_rows: 4,
            prior: InitialDraw::default(),
        },
        Variant::EquilibrationTable => VariantSpec::EquilibrationTable {
            regions: 2,
            prior: InitialDraw::default(),
        },
        Variant::Field3D => VariantSpec::Field3D {
            nx: 2,
            ny: 2,
            nz: 2,
            prior: InitialDraw::default(),
        },
        Variant::Well => VariantSpec::Well {
            variables: vec!["WOPR".into()],
        },
        Variant::SummaryVector => VariantSpec::SummaryVector,
        Variant::StaticKeyword => VariantSpec::StaticKeyword,
        Variant::GeneralKeyword => VariantSpec::GeneralKeyword {
            parameters: vec![NamedPrior {
                name: "ALPHA".into(),
                prior: InitialDraw::default(),
            }],
        },
        Variant::GeneralDataArray => VariantSpec::GeneralDataArray {
            size: 2,
            prior: InitialDraw::default(),
        },
    }
}

fn node_for(variant: Variant) -> EnsembleNode {
    EnsembleNode::new(Arc::new(NodeConfig::new("KEY", spec_for(variant))))
}

struct UntouchedOutputs;

impl SimulatorOutput for UntouchedOutputs {
    fn restart_field(&self, _name: &str, _report_step: i32) -> Result<Vec<f64>, EhmError> {
        panic!("capability check must reject the call before outputs are read");
    }

    fn summary_value(&self, _name: &str, _report_step: i32) -> Result<f64, EhmError> {
        panic!("capability check must reject the call before outputs are read");
    }

    fn well_values(
        &self,
        _well: &str,
        _variables: &[String],
        _report_step: i32,
    ) -> Result<Vec<f64>, EhmError> {
        panic!("capability check must reject the call before outputs are read");
    }
}

#[test]
fn universal_slots_cover_every_variant() {
    for variant in Variant::ALL {
        let table = CapabilityTable::for_variant(variant);
        for capability in [
            Capability::Allocate,
            Capability::Release,
            Capability::Read,
            Capability::Write,
        ] {
            assert!(table.supports(capability), "{variant} lacks {capability:?}");
        }
    }
}

#[test]
fn registry_matches_variant_matrix() {
    let extra: [(Variant, &[Capability]); 10] = [
        (
            Variant::ScalarMultiplier,
            &[
                Capability::Initialize,
                Capability::Serialize,
                Capability::Deserialize,
                Capability::Numeric,
                Capability::SimulatorWrite,
            ],
        ),
        (
            Variant::FaultMultiplier,
            &[
                Capability::Initialize,
                Capability::Serialize,
                Capability::Deserialize,
                Capability::Numeric,
                Capability::AggregateReport,
                Capability::SimulatorWrite,
            ],
        ),
        (
            Variant::TabulatedRelPerm,
            &[
                Capability::Initialize,
                Capability::Serialize,
                Capability::Deserialize,
                Capability::Numeric,
                Capability::SimulatorWrite,
            ],
        ),
        (
            Variant::EquilibrationTable,
            &[
                Capability::Initialize,
                Capability::Serialize,
                Capability::Deserialize,
                Capability::Numeric,
                Capability::SimulatorWrite,
            ],
        ),
        (
            Variant::Field3D,
            &[
                Capability::Initialize,
                Capability::Serialize,
                Capability::Deserialize,
                Capability::Numeric,
                Capability::SimulatorLoad,
                Capability::SimulatorWrite,
                Capability::IndexedAccess,
            ],
        ),
        (
            Variant::Well,
            &[
                Capability::Serialize,
                Capability::Deserialize,
                Capability::Numeric,
                Capability::AggregateReport,
                Capability::SimulatorLoad,
            ],
        ),
        (
            Variant::SummaryVector,
            &[
                Capability::Serialize,
                Capability::Deserialize,
                Capability::Numeric,
                Capability::SimulatorLoad,
            ],
        ),
        (Variant::StaticKeyword, &[Capability::SimulatorWrite]),
        (
            Variant::GeneralKeyword,
            &[
                Capability::Initialize,
                Capability::Serialize,
                Capability::Deserialize,
                Capability::Numeric,
                Capability::AggregateReport,
                Capability::SimulatorWrite,
            ],
        ),
        (
            Variant::GeneralDataArray,
            &[
                Capability::Initialize,
                Capability::Serialize,
                Capability::Deserialize,
                Capability::Numeric,
                Capability::SimulatorWrite,
            ],
        ),
    ];

    for (variant, extras) in extra {
        let table = CapabilityTable::for_variant(variant);
        assert_eq!(table.variant(), variant);
        for capability in Capability::ALL {
            let universal = matches!(
                capability,
                Capability::Allocate
                    | Capability::Release
                    | Capability::Read
                    | Capability::Write
            );
            let expected = universal || extras.contains(&capability);
            assert_eq!(
                table.supports(capability),
                expected,
                "{variant} vs {capability:?}"
            );
        }
    }
}

#[test]
fn unsupported_initialize_leaves_node_untouched() {
    let mut node = node_for(Variant::Well);
    let before = node.freshness();
    let err = node.initialize(0).unwrap_err();
    assert!(matches!(err, EhmError::UnsupportedOperation(_)));
    assert!(!node.memory_allocated());
    assert_eq!(node.freshness(), before);
}

#[test]
fn unsupported_serialize_leaves_cursor_untouched() {
    let mut node = node_for(Variant::StaticKeyword);
    node.ensure_memory();
    let mut column = SerialVector::new(8);
    let err = node.serialize(0, &mut column).unwrap_err();
    assert!(matches!(err, EhmError::UnsupportedOperation(_)));
    assert_eq!(node.serial_cursor().emitted(), 0);
    assert!(!node.serial_cursor().is_complete());
}

#[test]
fn unsupported_simulator_write_for_responses() {
    let mut node = node_for(Variant::Well);
    node.ensure_memory();
    let err = node.simulator_write(Path::new("unused")).unwrap_err();
    assert!(matches!(err, EhmError::UnsupportedOperation(_)));
}

#[test]
fn unsupported_simulator_load_never_touches_outputs() {
    let mut node = node_for(Variant::ScalarMultiplier);
    node.ensure_memory();
    let err = node.simulator_load(&UntouchedOutputs, 4).unwrap_err();
    assert!(matches!(err, EhmError::UnsupportedOperation(_)));
    assert!(node.freshness().dirty);
}

#[test]
fn unsupported_indexed_access_outside_fields() {
    let mut node = node_for(Variant::ScalarMultiplier);
    node.ensure_memory();
    let err = node.element_at(0, 0, 0).unwrap_err();
    assert!(matches!(err, EhmError::UnsupportedOperation(_)));
}

#[test]
fn unsupported_numeric_on_static_keyword() {
    let mut node = node_for(Variant::StaticKeyword);
    node.ensure_memory();
    let err = node.scale(2.0).unwrap_err();
    assert!(matches!(err, EhmError::UnsupportedOperation(_)));
}

#[test]
fn capability_error_names_variant_and_operation() {
    let mut node = node_for(Variant::SummaryVector);
    let err = node.initialize(0).unwrap_err();
    assert!(!err.is_realization_recoverable());
    let info = err.info();
    assert_eq!(info.code, "capability-missing");
    assert_eq!(
        info.context.get("variant").map(String::as_str),
        Some("summary-vector")
    );
    assert_eq!(
        info.context.get("operation").map(String::as_str),
        Some("initialize")
    );
}
