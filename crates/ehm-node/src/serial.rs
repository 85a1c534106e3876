//! Flattened element vector and the resumable serialization cursor.
//!
//! Analysis updates operate on a matrix whose columns hold the flattened
//! elements of every node in one realization. The driver owns the column
//! buffers; nodes fill them slab by slab through a cursor that remembers
//! how far the current pass has progressed.

use ehm_core::{EhmError, ErrorInfo};

/// Fixed-capacity, stride-aware view of one analysis-matrix column.
///
/// Logical slot `i` lives at raw index `i * stride`, so a node can write
/// straight into an interleaved matrix buffer without copying.
#[derive(Debug, Clone, PartialEq)]
pub struct SerialVector {
    values: Vec<f64>,
    stride: usize,
}

impl SerialVector {
    /// Contiguous vector with `capacity` slots.
    pub fn new(capacity: usize) -> SerialVector {
        SerialVector {
            values: vec![0.0; capacity],
            stride: 1,
        }
    }

    /// Vector with `slots` logical slots spaced `stride` raw elements apart.
    pub fn with_stride(slots: usize, stride: usize) -> Result<SerialVector, EhmError> {
        if stride == 0 {
            return Err(EhmError::IncompatibleOperand(ErrorInfo::new(
                "zero-stride",
                "a serial vector needs a stride of at least one",
            )));
        }
        Ok(SerialVector {
            values: vec![0.0; slots * stride],
            stride,
        })
    }

    /// Number of logical slots.
    pub fn slot_count(&self) -> usize {
        self.values.len() / self.stride
    }

    /// Raw spacing between consecutive slots.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Value at logical slot `slot`, if in range.
    pub fn read_slot(&self, slot: usize) -> Option<f64> {
        self.values.get(slot * self.stride).copied()
    }

    /// Stores `value` at logical slot `slot`.
    pub fn write_slot(&mut self, slot: usize, value: f64) -> Result<(), EhmError> {
        let index = slot * self.stride;
        match self.values.get_mut(index) {
            Some(cell) => {
                *cell = value;
                Ok(())
            }
            None => Err(EhmError::IncompatibleOperand(
                ErrorInfo::new("slot-out-of-range", "serial vector slot is out of range")
                    .with_context("slot", slot.to_string())
                    .with_context("slots", self.slot_count().to_string()),
            )),
        }
    }

    /// Raw backing storage, stride included.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Mutable raw backing storage, stride included.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.values
    }

    fn set_raw_slot(&mut self, slot: usize, value: f64) {
        self.values[slot * self.stride] = value;
    }
}

/// Progress of one node's flattening pass.
///
/// `emitted` counts elements already placed in output vectors during the
/// current pass; `complete` flips once every element has been emitted.
/// The cursor survives across calls so a large payload can be carried
/// through several driver buffers, and resets when a new pass begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SerialCursor {
    emitted: usize,
    complete: bool,
}

impl SerialCursor {
    /// Cursor at the start of a pass.
    pub fn new() -> SerialCursor {
        SerialCursor::default()
    }

    /// Elements emitted so far in the current pass.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// True once every element of the payload has been emitted.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Rewinds to the start of a fresh pass.
    pub fn reset(&mut self) {
        self.emitted = 0;
        self.complete = false;
    }

    pub(crate) fn advance(&mut self, count: usize, total: usize) {
        self.emitted += count;
        self.complete = self.emitted >= total;
    }
}

/// Emits as many pending elements as fit into `output` from `output_offset`
/// onward, advancing the cursor. Returns the number of elements written.
pub(crate) fn flatten_elements(
    elements: &[f64],
    cursor: &mut SerialCursor,
    output_offset: usize,
    output: &mut SerialVector,
) -> usize {
    let pending = elements.len().saturating_sub(cursor.emitted());
    let room = output.slot_count().saturating_sub(output_offset);
    let count = pending.min(room);
    let start = cursor.emitted();
    for offset in 0..count {
        output.set_raw_slot(output_offset + offset, elements[start + offset]);
    }
    cursor.advance(count, elements.len());
    count
}

/// Scatters the first `elements.len()` slots of `input` back into the
/// payload. The full row must be available in one call.
pub(crate) fn unflatten_elements(
    input: &SerialVector,
    elements: &mut [f64],
) -> Result<(), EhmError> {
    if input.slot_count() < elements.len() {
        return Err(EhmError::IoFailure(
            ErrorInfo::new(
                "insufficient-input",
                "serial vector holds fewer slots than the payload has elements",
            )
            .with_context("expected", elements.len().to_string())
            .with_context("actual", input.slot_count().to_string()),
        ));
    }
    for (slot, element) in elements.iter_mut().enumerate() {
        *element = input.values[slot * input.stride];
    }
    Ok(())
}
