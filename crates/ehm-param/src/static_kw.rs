//! Opaque static keyword payload.
//!
//! Static keywords are carried through restart files untouched: the engine
//! never interprets their bytes and they contribute no elements to the
//! analysis matrix.

/// Raw keyword bytes, copied verbatim between store and simulator input.
#[derive(Debug, Clone, PartialEq)]
pub struct RawKeyword {
    bytes: Vec<u8>,
}

impl RawKeyword {
    /// Creates an empty keyword with no stored form.
    pub fn empty() -> Self {
        RawKeyword { bytes: Vec::new() }
    }

    /// Wraps existing keyword bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        RawKeyword { bytes }
    }

    /// The raw bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Replaces the raw bytes.
    pub fn set_bytes(&mut self, bytes: Vec<u8>) {
        self.bytes = bytes;
    }

    /// True when the keyword carries no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Default for RawKeyword {
    fn default() -> Self {
        RawKeyword::empty()
    }
}
