//! Flat element kernel shared by every numeric payload.
//!
//! All element-bearing payloads keep their values in one [`ElementStore`],
//! a flat `f64` buffer in the payload's canonical element order. The
//! in-place numeric operations the analysis layer needs (scale, add,
//! multiply, square, square root, clear) live here once; binary operations
//! check operand length before touching any element so a failed call
//! leaves both stores unchanged.

use ehm_core::{EhmError, ErrorInfo};
use serde::{Deserialize, Serialize};

/// Flat, exclusively-owned buffer of `f64` elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementStore {
    values: Vec<f64>,
}

impl ElementStore {
    /// Creates a store of `len` zeroed elements.
    pub fn zeroed(len: usize) -> Self {
        ElementStore {
            values: vec![0.0; len],
        }
    }

    /// Wraps an existing value buffer.
    pub fn from_values(values: Vec<f64>) -> Self {
        ElementStore { values }
    }

    /// Number of elements held.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the store holds no elements.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Read-only view in canonical order.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Mutable view in canonical order.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Returns the element at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Overwrites all elements from `data`, which must match the store
    /// length exactly.
    pub fn fill_from(&mut self, data: &[f64]) -> Result<(), EhmError> {
        if data.len() != self.values.len() {
            return Err(EhmError::IoFailure(
                ErrorInfo::new("short-read", "element count does not match payload shape")
                    .with_context("expected", self.values.len().to_string())
                    .with_context("actual", data.len().to_string()),
            ));
        }
        self.values.copy_from_slice(data);
        Ok(())
    }

    /// Sets every element to zero.
    pub fn clear(&mut self) {
        for value in &mut self.values {
            *value = 0.0;
        }
    }

    /// Multiplies every element by `factor`.
    pub fn scale(&mut self, factor: f64) {
        for value in &mut self.values {
            *value *= factor;
        }
    }

    /// Squares every element in place.
    pub fn square(&mut self) {
        for value in &mut self.values {
            *value *= *value;
        }
    }

    /// Takes the square root of every element in place.
    ///
    /// Negative entries produce NaN, as IEEE square root does.
    pub fn sqrt(&mut self) {
        for value in &mut self.values {
            *value = value.sqrt();
        }
    }

    /// Adds `other` element-wise.
    pub fn add(&mut self, other: &ElementStore) -> Result<(), EhmError> {
        self.check_same_length(other)?;
        for (value, rhs) in self.values.iter_mut().zip(other.values.iter()) {
            *value += rhs;
        }
        Ok(())
    }

    /// Adds `factor * other` element-wise.
    pub fn add_scaled(&mut self, other: &ElementStore, factor: f64) -> Result<(), EhmError> {
        self.check_same_length(other)?;
        for (value, rhs) in self.values.iter_mut().zip(other.values.iter()) {
            *value += factor * rhs;
        }
        Ok(())
    }

    /// Multiplies by `other` element-wise.
    pub fn multiply(&mut self, other: &ElementStore) -> Result<(), EhmError> {
        self.check_same_length(other)?;
        for (value, rhs) in self.values.iter_mut().zip(other.values.iter()) {
            *value *= rhs;
        }
        Ok(())
    }

    fn check_same_length(&self, other: &ElementStore) -> Result<(), EhmError> {
        if self.values.len() != other.values.len() {
            return Err(EhmError::IncompatibleOperand(
                ErrorInfo::new("length-mismatch", "operand element count differs")
                    .with_context("expected", self.values.len().to_string())
                    .with_context("actual", other.values.len().to_string()),
            ));
        }
        Ok(())
    }
}
