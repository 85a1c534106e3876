//! Schema versioning for persisted artifacts.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic version stamped into every stored blob and manifest.
///
/// Readers accept an artifact when the major component matches their own;
/// minor and patch changes are additive and remain readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Incompatible layout changes.
    pub major: u32,
    /// Backwards-compatible additions.
    pub minor: u32,
    /// Cosmetic or documentation-only changes.
    pub patch: u32,
}

impl SchemaVersion {
    /// Creates a version from its components.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        SchemaVersion {
            major,
            minor,
            patch,
        }
    }

    /// True when an artifact written at `other` is readable by this code.
    pub fn is_compatible_with(&self, other: &SchemaVersion) -> bool {
        self.major == other.major
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        SchemaVersion::new(1, 0, 0)
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
