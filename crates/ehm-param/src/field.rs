//! 3D grid field payload.

use ehm_core::{EhmError, ErrorInfo};

use crate::store::ElementStore;

/// Full 3D grid property, one value per cell.
///
/// Elements are stored in canonical grid order: the `i` index varies
/// fastest, then `j`, then `k`. Flattening, storage, and simulator
/// exchange all use this order; it is load-bearing for the inverse
/// mapping from the analysis matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct GridField {
    nx: usize,
    ny: usize,
    nz: usize,
    values: ElementStore,
}

impl GridField {
    /// Creates a zeroed field of `nx * ny * nz` cells.
    pub fn zeroed(nx: usize, ny: usize, nz: usize) -> Self {
        GridField {
            nx,
            ny,
            nz,
            values: ElementStore::zeroed(nx * ny * nz),
        }
    }

    /// Grid extents as `(nx, ny, nz)`.
    pub fn dims(&self) -> (usize, usize, usize) {
        (self.nx, self.ny, self.nz)
    }

    /// Flat offset of cell `(i, j, k)` in canonical grid order.
    pub fn linear_index(&self, i: usize, j: usize, k: usize) -> Result<usize, EhmError> {
        if i >= self.nx || j >= self.ny || k >= self.nz {
            return Err(EhmError::IncompatibleOperand(
                ErrorInfo::new("index-out-of-range", "cell index outside the grid")
                    .with_context("index", format!("({i}, {j}, {k})"))
                    .with_context("dims", format!("({}, {}, {})", self.nx, self.ny, self.nz)),
            ));
        }
        Ok(i + self.nx * (j + self.ny * k))
    }

    /// Returns the value of cell `(i, j, k)`.
    pub fn cell(&self, i: usize, j: usize, k: usize) -> Result<f64, EhmError> {
        let index = self.linear_index(i, j, k)?;
        Ok(self.values.as_slice()[index])
    }

    /// Element view in canonical grid order.
    pub fn values(&self) -> &ElementStore {
        &self.values
    }

    /// Mutable element view in canonical grid order.
    pub fn values_mut(&mut self) -> &mut ElementStore {
        &mut self.values
    }

    /// Renders the field: key line, then one cell value per line in
    /// canonical grid order.
    pub fn render_column(&self, key: &str) -> String {
        let mut out = String::new();
        out.push_str(key);
        out.push('\n');
        for value in self.values.as_slice() {
            out.push_str(&format!("{value:.6}\n"));
        }
        out
    }
}
