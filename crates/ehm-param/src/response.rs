//! Simulator response payloads: per-well values and summary vectors.
//!
//! These variants are populated from simulator output rather than drawn
//! from priors; they still flatten into the analysis matrix like every
//! other numeric payload.

use crate::store::ElementStore;

/// Per-well response values, one element per configured well variable.
#[derive(Debug, Clone, PartialEq)]
pub struct WellResponse {
    values: ElementStore,
}

impl WellResponse {
    /// Creates a zeroed response for `count` variables.
    pub fn zeroed(count: usize) -> Self {
        WellResponse {
            values: ElementStore::zeroed(count),
        }
    }

    /// Element view in configured variable order.
    pub fn values(&self) -> &ElementStore {
        &self.values
    }

    /// Mutable element view in configured variable order.
    pub fn values_mut(&mut self) -> &mut ElementStore {
        &mut self.values
    }
}

/// Single summary-vector value.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryResponse {
    values: ElementStore,
}

impl SummaryResponse {
    /// Creates a zeroed one-element response.
    pub fn new() -> Self {
        SummaryResponse {
            values: ElementStore::zeroed(1),
        }
    }

    /// The current value.
    pub fn value(&self) -> f64 {
        self.values.as_slice()[0]
    }

    /// Overwrites the value.
    pub fn set_value(&mut self, value: f64) {
        self.values.as_mut_slice()[0] = value;
    }

    /// Element view (always one element).
    pub fn values(&self) -> &ElementStore {
        &self.values
    }

    /// Mutable element view (always one element).
    pub fn values_mut(&mut self) -> &mut ElementStore {
        &mut self.values
    }
}

impl Default for SummaryResponse {
    fn default() -> Self {
        SummaryResponse::new()
    }
}
