//! Tabulated payloads: relative-permeability curves and equilibration rows.

use crate::store::ElementStore;

/// Columns in an equilibration row: datum depth, datum pressure, water
/// contact depth, gas contact depth.
pub const EQUIL_COLUMNS: usize = 4;

/// Relative-permeability table, one column per phase.
///
/// Elements are stored row-major by saturation row: all phase values of
/// row 0, then row 1, and so on. That order is the canonical flattening
/// order and must not change while any stored image exists.
#[derive(Debug, Clone, PartialEq)]
pub struct SaturationTable {
    phase_count: usize,
    values: ElementStore,
}

impl SaturationTable {
    /// Creates a zeroed table for the given phases and row count.
    pub fn zeroed(phase_count: usize, saturation_rows: usize) -> Self {
        SaturationTable {
            phase_count,
            values: ElementStore::zeroed(phase_count * saturation_rows),
        }
    }

    /// Number of phases (columns).
    pub fn phase_count(&self) -> usize {
        self.phase_count
    }

    /// Number of saturation rows.
    pub fn row_count(&self) -> usize {
        if self.phase_count == 0 {
            0
        } else {
            self.values.len() / self.phase_count
        }
    }

    /// Returns the cell at (`row`, `phase`), if in range.
    pub fn cell(&self, row: usize, phase: usize) -> Option<f64> {
        if phase >= self.phase_count {
            return None;
        }
        self.values.get(row * self.phase_count + phase)
    }

    /// Element view in canonical row-major order.
    pub fn values(&self) -> &ElementStore {
        &self.values
    }

    /// Mutable element view in canonical row-major order.
    pub fn values_mut(&mut self) -> &mut ElementStore {
        &mut self.values
    }

    /// Renders the table: key line, phase-name header, one line per row.
    pub fn render_table(&self, key: &str, phases: &[String]) -> String {
        let mut out = String::new();
        out.push_str(key);
        out.push('\n');
        out.push_str(&phases.join(" "));
        out.push('\n');
        for row in self.values.as_slice().chunks(self.phase_count.max(1)) {
            let line: Vec<String> = row.iter().map(|value| format!("{value:.6}")).collect();
            out.push_str(&line.join(" "));
            out.push('\n');
        }
        out
    }
}

/// Equilibration table with [`EQUIL_COLUMNS`] values per region.
///
/// Elements are stored row-major by region.
#[derive(Debug, Clone, PartialEq)]
pub struct EquilTable {
    values: ElementStore,
}

impl EquilTable {
    /// Creates a zeroed table for `regions` regions.
    pub fn zeroed(regions: usize) -> Self {
        EquilTable {
            values: ElementStore::zeroed(regions * EQUIL_COLUMNS),
        }
    }

    /// Number of regions (rows).
    pub fn region_count(&self) -> usize {
        self.values.len() / EQUIL_COLUMNS
    }

    /// Returns one region's row, if in range.
    pub fn region_row(&self, region: usize) -> Option<&[f64]> {
        let start = region.checked_mul(EQUIL_COLUMNS)?;
        let end = start.checked_add(EQUIL_COLUMNS)?;
        self.values.as_slice().get(start..end)
    }

    /// Element view in canonical region-major order.
    pub fn values(&self) -> &ElementStore {
        &self.values
    }

    /// Mutable element view in canonical region-major order.
    pub fn values_mut(&mut self) -> &mut ElementStore {
        &mut self.values
    }

    /// Renders the table: key line, then one line per region.
    pub fn render_table(&self, key: &str) -> String {
        let mut out = String::new();
        out.push_str(key);
        out.push('\n');
        for row in self.values.as_slice().chunks(EQUIL_COLUMNS) {
            let line: Vec<String> = row.iter().map(|value| format!("{value:.6}")).collect();
            out.push_str(&line.join(" "));
            out.push('\n');
        }
        out
    }
}
