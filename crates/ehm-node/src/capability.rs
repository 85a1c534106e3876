//! Static per-variant operation registry.
//!
//! Every operation a node can dispatch is declared here for each variant.
//! Dispatch consults the table before touching payload state, so an
//! unsupported operation fails without side effects.

use ehm_core::{EhmError, ErrorInfo, Variant};

/// Operation slots a variant may register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Build in-memory storage for the payload.
    Allocate,
    /// Release in-memory storage.
    Release,
    /// Load a payload image from a byte stream.
    Read,
    /// Persist the payload to a byte stream.
    Write,
    /// Flatten elements into an analysis-matrix column.
    Serialize,
    /// Scatter an analysis-matrix column back into elements.
    Deserialize,
    /// Draw a fresh prior realization.
    Initialize,
    /// In-place element arithmetic.
    Numeric,
    /// Cross-realization report rendering.
    AggregateReport,
    /// Ingest simulator results for one realization.
    SimulatorLoad,
    /// Render simulator input into a run directory.
    SimulatorWrite,
    /// Grid-indexed element lookup.
    IndexedAccess,
}

impl Capability {
    /// Every operation slot, in declaration order.
    pub const ALL: [Capability; 12] = [
        Capability::Allocate,
        Capability::Release,
        Capability::Read,
        Capability::Write,
        Capability::Serialize,
        Capability::Deserialize,
        Capability::Initialize,
        Capability::Numeric,
        Capability::AggregateReport,
        Capability::SimulatorLoad,
        Capability::SimulatorWrite,
        Capability::IndexedAccess,
    ];

    /// Stable name used in error context.
    pub fn name(&self) -> &'static str {
        match self {
            Capability::Allocate => "allocate",
            Capability::Release => "release",
            Capability::Read => "read",
            Capability::Write => "write",
            Capability::Serialize => "serialize",
            Capability::Deserialize => "deserialize",
            Capability::Initialize => "initialize",
            Capability::Numeric => "numeric",
            Capability::AggregateReport => "aggregate-report",
            Capability::SimulatorLoad => "simulator-load",
            Capability::SimulatorWrite => "simulator-write",
            Capability::IndexedAccess => "indexed-access",
        }
    }
}

/// Immutable operation registry for one variant.
///
/// Allocate, release, read, and write are universal; the remaining slots
/// vary by variant. The table for a variant never changes at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityTable {
    variant: Variant,
    initialize: bool,
    serialize: bool,
    deserialize: bool,
    numeric: bool,
    aggregate_report: bool,
    simulator_load: bool,
    simulator_write: bool,
    indexed_access: bool,
}

static SCALAR_MULTIPLIER: CapabilityTable = CapabilityTable {
    variant: Variant::ScalarMultiplier,
    initialize: true,
    serialize: true,
    deserialize: true,
    numeric: true,
    aggregate_report: false,
    simulator_load: false,
    simulator_write: true,
    indexed_access: false,
};

static FAULT_MULTIPLIER: CapabilityTable = CapabilityTable {
    variant: Variant::FaultMultiplier,
    initialize: true,
    serialize: true,
    deserialize: true,
    numeric: true,
    aggregate_report: true,
    simulator_load: false,
    simulator_write: true,
    indexed_access: false,
};

static TABULATED_REL_PERM: CapabilityTable = CapabilityTable {
    variant: Variant::TabulatedRelPerm,
    initialize: true,
    serialize: true,
    deserialize: true,
    numeric: true,
    aggregate_report: false,
    simulator_load: false,
    simulator_write: true,
    indexed_access: false,
};

static EQUILIBRATION_TABLE: CapabilityTable = CapabilityTable {
    variant: Variant::EquilibrationTable,
    initialize: true,
    serialize: true,
    deserialize: true,
    numeric: true,
    aggregate_report: false,
    simulator_load: false,
    simulator_write: true,
    indexed_access: false,
};

static FIELD3D: CapabilityTable = CapabilityTable {
    variant: Variant::Field3D,
    initialize: true,
    serialize: true,
    deserialize: true,
    numeric: true,
    aggregate_report: false,
    simulator_load: true,
    simulator_write: true,
    indexed_access: true,
};

static WELL: CapabilityTable = CapabilityTable {
    variant: Variant::Well,
    initialize: false,
    serialize: true,
    deserialize: true,
    numeric: true,
    aggregate_report: true,
    simulator_load: true,
    simulator_write: false,
    indexed_access: false,
};

static SUMMARY_VECTOR: CapabilityTable = CapabilityTable {
    variant: Variant::SummaryVector,
    initialize: false,
    serialize: true,
    deserialize: true,
    numeric: true,
    aggregate_report: false,
    simulator_load: true,
    simulator_write: false,
    indexed_access: false,
};

static STATIC_KEYWORD: CapabilityTable = CapabilityTable {
    variant: Variant::StaticKeyword,
    initialize: false,
    serialize: false,
    deserialize: false,
    numeric: false,
    aggregate_report: false,
    simulator_load: false,
    simulator_write: true,
    indexed_access: false,
};

static GENERAL_KEYWORD: CapabilityTable = CapabilityTable {
    variant: Variant::GeneralKeyword,
    initialize: true,
    serialize: true,
    deserialize: true,
    numeric: true,
    aggregate_report: true,
    simulator_load: false,
    simulator_write: true,
    indexed_access: false,
};

static GENERAL_DATA_ARRAY: CapabilityTable = CapabilityTable {
    variant: Variant::GeneralDataArray,
    initialize: true,
    serialize: true,
    deserialize: true,
    numeric: true,
    aggregate_report: false,
    simulator_load: false,
    simulator_write: true,
    indexed_access: false,
};

impl CapabilityTable {
    /// Registry for `variant`.
    pub const fn for_variant(variant: Variant) -> &'static CapabilityTable {
        match variant {
            Variant::ScalarMultiplier => &SCALAR_MULTIPLIER,
            Variant::FaultMultiplier => &FAULT_MULTIPLIER,
            Variant::TabulatedRelPerm => &TABULATED_REL_PERM,
            Variant::EquilibrationTable => &EQUILIBRATION_TABLE,
            Variant::Field3D => &FIELD3D,
            Variant::Well => &WELL,
            Variant::SummaryVector => &SUMMARY_VECTOR,
            Variant::StaticKeyword => &STATIC_KEYWORD,
            Variant::GeneralKeyword => &GENERAL_KEYWORD,
            Variant::GeneralDataArray => &GENERAL_DATA_ARRAY,
        }
    }

    /// Variant this table belongs to.
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// True when `capability` is registered for this variant.
    pub fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Allocate
            | Capability::Release
            | Capability::Read
            | Capability::Write => true,
            Capability::Serialize => self.serialize,
            Capability::Deserialize => self.deserialize,
            Capability::Initialize => self.initialize,
            Capability::Numeric => self.numeric,
            Capability::AggregateReport => self.aggregate_report,
            Capability::SimulatorLoad => self.simulator_load,
            Capability::SimulatorWrite => self.simulator_write,
            Capability::IndexedAccess => self.indexed_access,
        }
    }

    /// Fails with `UnsupportedOperation` unless `capability` is registered.
    pub fn require(&self, capability: Capability) -> Result<(), EhmError> {
        if self.supports(capability) {
            Ok(())
        } else {
            Err(unsupported(self.variant, capability))
        }
    }
}

pub(crate) fn unsupported(variant: Variant, capability: Capability) -> EhmError {
    EhmError::UnsupportedOperation(
        ErrorInfo::new(
            "capability-missing",
            "operation is not registered for this variant",
        )
        .with_context("variant", variant.name())
        .with_context("operation", capability.name()),
    )
}
