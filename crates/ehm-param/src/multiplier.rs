//! Multiplier payloads: anonymous scalar blocks and per-fault multipliers.
//!
//! Both variants carry a flat set of multiplier values; the fault flavor
//! pairs each element with a fault name held by the configuration, in
//! declaration order.

use crate::store::ElementStore;

/// Flat block of multiplier values.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiplierSet {
    values: ElementStore,
}

impl MultiplierSet {
    /// Creates a zeroed set of `count` multipliers.
    pub fn zeroed(count: usize) -> Self {
        MultiplierSet {
            values: ElementStore::zeroed(count),
        }
    }

    /// Element view in declaration order.
    pub fn values(&self) -> &ElementStore {
        &self.values
    }

    /// Mutable element view in declaration order.
    pub fn values_mut(&mut self) -> &mut ElementStore {
        &mut self.values
    }

    /// Renders the keyword block with one anonymous value per line.
    pub fn render_block(&self, key: &str) -> String {
        let mut out = String::new();
        out.push_str(key);
        out.push('\n');
        for value in self.values.as_slice() {
            out.push_str(&format!("{value:.6}\n"));
        }
        out
    }

    /// Renders the keyword block with one `name value` line per entry.
    ///
    /// Names come from the configuration and must be in element order.
    pub fn render_named(&self, key: &str, names: &[String]) -> String {
        let mut out = String::new();
        out.push_str(key);
        out.push('\n');
        for (name, value) in names.iter().zip(self.values.as_slice()) {
            out.push_str(&format!("{name} {value:.6}\n"));
        }
        out
    }
}
