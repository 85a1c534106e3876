#![deny(missing_docs)]
#![doc = "Shared vocabulary for the EHM engine: parameter variants, checkpoint state tags, errors, and deterministic seeding."]

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod errors;
pub mod provenance;
pub mod rng;

pub use errors::{EhmError, ErrorInfo};
pub use provenance::SchemaVersion;
pub use rng::{derive_substream_seed, RngHandle};

/// Closed set of concrete parameter kinds an ensemble node can wrap.
///
/// The tag is fixed when a node is constructed and never changes for the
/// life of the node. Adding a kind means extending this enum, its entry in
/// [`VARIANT_NAMES`], the capability table, and the payload dispatch; all
/// of those are exhaustive matches, so a missing arm fails to compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Block of scalar transmissibility multipliers.
    ScalarMultiplier,
    /// One multiplier per named fault.
    FaultMultiplier,
    /// Tabulated relative-permeability curves.
    TabulatedRelPerm,
    /// Per-region equilibration table rows.
    EquilibrationTable,
    /// Full 3D grid property field.
    #[serde(rename = "field3d")]
    Field3D,
    /// Per-well simulator response values.
    Well,
    /// Single summary-vector response value.
    SummaryVector,
    /// Opaque static keyword carried through restart files.
    StaticKeyword,
    /// Named scalar parameters substituted into simulator input.
    GeneralKeyword,
    /// Untyped flat parameter array.
    GeneralDataArray,
}

/// Immutable table pairing every variant with its stable text tag.
///
/// Built once at startup as a module-scope constant; safe for concurrent
/// reads because it is never mutated. The tags double as the serde names
/// and as directory components in the on-disk store.
pub const VARIANT_NAMES: [(Variant, &str); 10] = [
    (Variant::ScalarMultiplier, "scalar-multiplier"),
    (Variant::FaultMultiplier, "fault-multiplier"),
    (Variant::TabulatedRelPerm, "tabulated-rel-perm"),
    (Variant::EquilibrationTable, "equilibration-table"),
    (Variant::Field3D, "field3d"),
    (Variant::Well, "well"),
    (Variant::SummaryVector, "summary-vector"),
    (Variant::StaticKeyword, "static-keyword"),
    (Variant::GeneralKeyword, "general-keyword"),
    (Variant::GeneralDataArray, "general-data-array"),
];

impl Variant {
    /// Every variant in declaration order.
    pub const ALL: [Variant; 10] = [
        Variant::ScalarMultiplier,
        Variant::FaultMultiplier,
        Variant::TabulatedRelPerm,
        Variant::EquilibrationTable,
        Variant::Field3D,
        Variant::Well,
        Variant::SummaryVector,
        Variant::StaticKeyword,
        Variant::GeneralKeyword,
        Variant::GeneralDataArray,
    ];

    /// Returns the stable text tag for this variant.
    pub fn name(&self) -> &'static str {
        match self {
            Variant::ScalarMultiplier => "scalar-multiplier",
            Variant::FaultMultiplier => "fault-multiplier",
            Variant::TabulatedRelPerm => "tabulated-rel-perm",
            Variant::EquilibrationTable => "equilibration-table",
            Variant::Field3D => "field3d",
            Variant::Well => "well",
            Variant::SummaryVector => "summary-vector",
            Variant::StaticKeyword => "static-keyword",
            Variant::GeneralKeyword => "general-keyword",
            Variant::GeneralDataArray => "general-data-array",
        }
    }

    /// Resolves a text tag back to its variant.
    ///
    /// Unrecognized tags fail with [`EhmError::UnknownVariant`]; this is the
    /// single place where an open-world name becomes a closed-world tag.
    pub fn from_name(name: &str) -> Result<Variant, EhmError> {
        for (variant, known) in VARIANT_NAMES {
            if known == name {
                return Ok(variant);
            }
        }
        Err(EhmError::UnknownVariant(
            ErrorInfo::new("unknown-variant-name", "variant tag not recognized")
                .with_context("name", name.to_string()),
        ))
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Checkpoint state a node's in-memory payload was loaded from or written as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StateTag {
    /// No meaningful image: freshly allocated or released data.
    Undefined,
    /// Posterior image produced by initialization or an analysis update.
    Analyzed,
    /// Prior image produced by a simulator forward run.
    Forecast,
}

impl StateTag {
    /// Returns the stable text tag, also used as a store directory name.
    pub fn name(&self) -> &'static str {
        match self {
            StateTag::Undefined => "undefined",
            StateTag::Analyzed => "analyzed",
            StateTag::Forecast => "forecast",
        }
    }

    /// Resolves a store directory name back to a state tag.
    pub fn from_name(name: &str) -> Option<StateTag> {
        match name {
            "undefined" => Some(StateTag::Undefined),
            "analyzed" => Some(StateTag::Analyzed),
            "forecast" => Some(StateTag::Forecast),
            _ => None,
        }
    }
}

impl fmt::Display for StateTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
