#![deny(missing_docs)]
#![doc = "Concrete parameter payloads for the EHM engine: per-variant shapes and priors, the shared element kernel, and the storage blob codec."]

/// Storage blob encode/decode with checksum and schema verification.
pub mod codec;
/// YAML configuration schema for parameter sets.
pub mod config;
/// 3D grid field payload.
pub mod field;
/// General keyword and data-array payloads.
pub mod general;
/// Multiplier payloads.
pub mod multiplier;
/// The payload enum uniting every variant's concrete data.
pub mod payload;
/// Simulator response payloads.
pub mod response;
/// Opaque static keyword payload.
pub mod static_kw;
/// Shared flat element kernel.
pub mod store;
/// Tabulated payloads.
pub mod table;

pub use codec::{decode_payload, encode_payload, read_payload, write_payload};
pub use config::{InitialDraw, NamedPrior, NodeConfig, ParameterSetConfig, VariantSpec};
pub use field::GridField;
pub use general::{DataArray, ParameterVector};
pub use multiplier::MultiplierSet;
pub use payload::Payload;
pub use response::{SummaryResponse, WellResponse};
pub use static_kw::RawKeyword;
pub use store::ElementStore;
pub use table::{EquilTable, SaturationTable, EQUIL_COLUMNS};
