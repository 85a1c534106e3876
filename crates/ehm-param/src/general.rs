//! General-purpose payloads: named scalar parameters and untyped arrays.

use crate::config::NamedPrior;
use crate::store::ElementStore;

/// Named scalar parameters, one element per configured parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterVector {
    values: ElementStore,
}

impl ParameterVector {
    /// Creates a zeroed vector for `count` parameters.
    pub fn zeroed(count: usize) -> Self {
        ParameterVector {
            values: ElementStore::zeroed(count),
        }
    }

    /// Element view in configured parameter order.
    pub fn values(&self) -> &ElementStore {
        &self.values
    }

    /// Mutable element view in configured parameter order.
    pub fn values_mut(&mut self) -> &mut ElementStore {
        &mut self.values
    }

    /// Renders one `name value` assignment line per parameter.
    pub fn render_assignments(&self, parameters: &[NamedPrior]) -> String {
        let mut out = String::new();
        for (parameter, value) in parameters.iter().zip(self.values.as_slice()) {
            out.push_str(&format!("{} {value:.6}\n", parameter.name));
        }
        out
    }
}

/// Untyped flat array; a zero-length array is a legal empty payload with
/// no stored form.
#[derive(Debug, Clone, PartialEq)]
pub struct DataArray {
    values: ElementStore,
}

impl DataArray {
    /// Creates a zeroed array of `count` elements.
    pub fn zeroed(count: usize) -> Self {
        DataArray {
            values: ElementStore::zeroed(count),
        }
    }

    /// Element view in index order.
    pub fn values(&self) -> &ElementStore {
        &self.values
    }

    /// Mutable element view in index order.
    pub fn values_mut(&mut self) -> &mut ElementStore {
        &mut self.values
    }

    /// Renders a bare value column, one element per line, consumed through
    /// simulator input templates.
    pub fn render_column(&self) -> String {
        let mut out = String::new();
        for value in self.values.as_slice() {
            out.push_str(&format!("{value:.6}\n"));
        }
        out
    }
}
