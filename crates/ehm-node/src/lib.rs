#![deny(missing_docs)]
#![doc = "Per-realization ensemble nodes for the EHM engine: capability dispatch, freshness-cached storage I/O, simulator exchange, and analysis-matrix flattening."]

/// Static per-variant operation registry.
pub mod capability;
/// Cache-validity record for in-memory payloads.
pub mod freshness;
/// Node lifecycle and operation dispatch.
pub mod node;
/// Cross-realization aggregate report.
pub mod report;
/// Flattened element vector and serialization cursor.
pub mod serial;
/// Boundary to parsed simulator results.
pub mod sim;
/// On-disk ensemble store.
pub mod storage;

pub use capability::{Capability, CapabilityTable};
pub use freshness::{Freshness, NO_REPORT_STEP};
pub use node::EnsembleNode;
pub use report::ensemble_report;
pub use serial::{SerialCursor, SerialVector};
pub use sim::SimulatorOutput;
pub use storage::{FileStore, StoreManifest, StoredImage};
