//! One realization's parameter node.
//!
//! An [`EnsembleNode`] pairs a shared read-only descriptor with at most one
//! owned payload, a freshness record, and a serialization cursor. Every
//! operation checks the variant's capability table before touching state,
//! so a failed call leaves the node exactly as it was.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ehm_core::{EhmError, ErrorInfo, RngHandle, StateTag, Variant};
use ehm_param::codec;
use ehm_param::{NodeConfig, Payload, VariantSpec};

use crate::capability::{unsupported, Capability, CapabilityTable};
use crate::freshness::Freshness;
use crate::serial::{flatten_elements, unflatten_elements, SerialCursor, SerialVector};
use crate::sim::SimulatorOutput;

pub(crate) fn memory_not_allocated(key: &str, operation: &'static str) -> EhmError {
    EhmError::MemoryNotAllocated(
        ErrorInfo::new(
            "memory-not-allocated",
            "operation needs allocated payload memory",
        )
        .with_context("key", key.to_string())
        .with_context("operation", operation),
    )
}

/// Per-realization instance of one configured parameter.
///
/// Nodes are `Send`: a driver may move each realization's nodes to a worker
/// thread. Nothing here is shared mutably; the descriptor is behind `Arc`
/// and the payload is exclusively owned.
#[derive(Debug)]
pub struct EnsembleNode {
    config: Arc<NodeConfig>,
    table: &'static CapabilityTable,
    payload: Option<Payload>,
    freshness: Freshness,
    cursor: SerialCursor,
}

impl EnsembleNode {
    /// Creates an unallocated node bound to `config`.
    pub fn new(config: Arc<NodeConfig>) -> EnsembleNode {
        let table = CapabilityTable::for_variant(config.variant());
        EnsembleNode {
            config,
            table,
            payload: None,
            freshness: Freshness::undefined(),
            cursor: SerialCursor::new(),
        }
    }

    /// The node's identifying key.
    pub fn key(&self) -> &str {
        &self.config.key
    }

    /// The node's variant.
    pub fn variant(&self) -> Variant {
        self.table.variant()
    }

    /// The shared descriptor this node was built from.
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// The variant's operation registry.
    pub fn capabilities(&self) -> &'static CapabilityTable {
        self.table
    }

    /// Flattened element count of this node's payload shape.
    pub fn element_count(&self) -> usize {
        self.config.element_count()
    }

    /// True while payload memory is allocated.
    pub fn memory_allocated(&self) -> bool {
        self.payload.is_some()
    }

    /// Read-only view of the payload, while allocated.
    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    /// Current cache-validity record.
    pub fn freshness(&self) -> Freshness {
        self.freshness
    }

    /// Progress of the current flattening pass.
    pub fn serial_cursor(&self) -> SerialCursor {
        self.cursor
    }

    /// Rewinds the flattening cursor to start a fresh pass.
    pub fn reset_serial_cursor(&mut self) {
        self.cursor.reset();
    }

    /// Allocates payload memory if it is not already allocated.
    ///
    /// Fresh memory is zeroed and marked dirty with no checkpoint, so it
    /// can never satisfy a read from cache. Calling this on an allocated
    /// node changes nothing.
    pub fn ensure_memory(&mut self) {
        if self.payload.is_none() {
            self.payload = Some(Payload::allocate(&self.config.spec));
            self.freshness = Freshness::undefined();
        }
    }

    /// Releases payload memory and forgets any checkpoint affinity.
    ///
    /// The node stays usable; the next data-bearing operation allocates
    /// again. Releasing an unallocated node changes nothing.
    pub fn free_data(&mut self) {
        self.payload = None;
        self.freshness = Freshness::undefined();
        self.cursor.reset();
    }

    /// Draws a fresh prior realization for ensemble member `iens`.
    ///
    /// Sampling uses a substream derived from the descriptor seed and
    /// `iens`, so every member draws an independent, reproducible stream.
    /// Afterwards the node sits at report step zero in the analyzed state,
    /// dirty until persisted.
    pub fn initialize(&mut self, iens: usize) -> Result<(), EhmError> {
        self.table.require(Capability::Initialize)?;
        self.ensure_memory();
        let payload = self
            .payload
            .as_mut()
            .ok_or_else(|| memory_not_allocated(&self.config.key, "initialize"))?;
        let mut rng = RngHandle::from_seed(self.config.realization_seed(iens));
        payload.initialize(&self.config.spec, &mut rng)?;
        self.freshness = Freshness {
            report_step: 0,
            state_tag: StateTag::Analyzed,
            dirty: true,
        };
        Ok(())
    }

    /// Loads the payload image for `(report_step, state_tag)` from `reader`.
    ///
    /// When memory already mirrors exactly that image the call returns
    /// without touching the reader. Otherwise the stream is decoded,
    /// verified, and installed, and the freshness record is synchronized.
    pub fn read(
        &mut self,
        reader: &mut dyn Read,
        report_step: i32,
        state_tag: StateTag,
    ) -> Result<(), EhmError> {
        if self.payload.is_some() && self.freshness.satisfies(report_step, state_tag) {
            return Ok(());
        }
        let payload = codec::read_payload(reader, &self.config)?;
        self.payload = Some(payload);
        self.freshness.mark_synced(report_step, state_tag);
        Ok(())
    }

    /// Persists the payload image for `(report_step, state_tag)` to `writer`.
    ///
    /// Returns `false` without touching the writer when the payload has no
    /// stored form; the caller should then remove any stale backing file.
    /// The freshness record synchronizes either way, since memory and
    /// storage agree after the call.
    pub fn write(
        &mut self,
        writer: &mut dyn Write,
        report_step: i32,
        state_tag: StateTag,
    ) -> Result<bool, EhmError> {
        let payload = self
            .payload
            .as_ref()
            .ok_or_else(|| memory_not_allocated(&self.config.key, "write"))?;
        let wrote = codec::write_payload(writer, payload, &self.config.key)?;
        self.freshness.mark_synced(report_step, state_tag);
        Ok(wrote)
    }

    /// Ingests simulator results for this node at `report_step`.
    ///
    /// Always refreshes from `outputs`, even when the freshness record
    /// already matches: simulator output is the authority on forecast
    /// state. The source name is the descriptor's input file when set,
    /// otherwise the key. Afterwards the node is clean forecast state at
    /// `report_step`.
    pub fn simulator_load(
        &mut self,
        outputs: &dyn SimulatorOutput,
        report_step: i32,
    ) -> Result<(), EhmError> {
        self.table.require(Capability::SimulatorLoad)?;
        self.ensure_memory();
        let source = self.config.input_file.as_deref().unwrap_or(&self.config.key);
        let payload = self
            .payload
            .as_mut()
            .ok_or_else(|| memory_not_allocated(&self.config.key, "simulator_load"))?;
        match payload {
            Payload::Field3D(field) => {
                let data = outputs.restart_field(source, report_step)?;
                field.values_mut().fill_from(&data)?;
            }
            Payload::Well(response) => {
                let variables = match &self.config.spec {
                    VariantSpec::Well { variables } => variables.as_slice(),
                    _ => return Err(spec_drift(&self.config, Variant::Well)),
                };
                let data = outputs.well_values(source, variables, report_step)?;
                response.values_mut().fill_from(&data)?;
            }
            Payload::SummaryVector(response) => {
                let value = outputs.summary_value(source, report_step)?;
                response.set_value(value);
            }
            _ => return Err(unsupported(self.table.variant(), Capability::SimulatorLoad)),
        }
        self.freshness = Freshness {
            report_step,
            state_tag: StateTag::Forecast,
            dirty: false,
        };
        Ok(())
    }

    /// Renders the payload's simulator-input form under `run_path`.
    ///
    /// The target file name is the descriptor's output file when set,
    /// otherwise the key. Returns the path written. Freshness is
    /// unaffected; rendering input does not move the node between
    /// checkpoints.
    pub fn simulator_write(&self, run_path: &Path) -> Result<PathBuf, EhmError> {
        self.table.require(Capability::SimulatorWrite)?;
        let payload = self
            .payload
            .as_ref()
            .ok_or_else(|| memory_not_allocated(&self.config.key, "simulator_write"))?;
        let contents = payload.render_simulator_input(&self.config)?;
        let name = self.config.output_file.as_deref().unwrap_or(&self.config.key);
        let target = run_path.join(name);
        std::fs::write(&target, contents).map_err(|err| {
            EhmError::IoFailure(
                ErrorInfo::new("simulator-write", err.to_string())
                    .with_context("path", target.display().to_string()),
            )
        })?;
        Ok(target)
    }

    /// Emits pending elements into `output` starting at `output_offset`.
    ///
    /// Returns how many elements were written: as many as both the payload
    /// and the vector's remaining capacity allow. The cursor carries the
    /// pass across calls; once a pass completes, the next call starts a
    /// fresh pass from the first element.
    pub fn serialize(
        &mut self,
        output_offset: usize,
        output: &mut SerialVector,
    ) -> Result<usize, EhmError> {
        self.table.require(Capability::Serialize)?;
        let payload = self
            .payload
            .as_ref()
            .ok_or_else(|| memory_not_allocated(&self.config.key, "serialize"))?;
        let elements = payload
            .elements()
            .ok_or_else(|| unsupported(self.table.variant(), Capability::Serialize))?;
        if self.cursor.is_complete() {
            self.cursor.reset();
        }
        let count = flatten_elements(elements.as_slice(), &mut self.cursor, output_offset, output);
        Ok(count)
    }

    /// Scatters an updated column back into the payload in one call.
    ///
    /// The full row must be present from the start of `input`; a vector
    /// with fewer slots than the payload has elements is an I/O failure.
    /// Afterwards memory is dirty relative to every stored image.
    pub fn deserialize(&mut self, input: &SerialVector) -> Result<(), EhmError> {
        self.table.require(Capability::Deserialize)?;
        let payload = self
            .payload
            .as_mut()
            .ok_or_else(|| memory_not_allocated(&self.config.key, "deserialize"))?;
        let elements = payload
            .elements_mut()
            .ok_or_else(|| unsupported(self.table.variant(), Capability::Deserialize))?;
        unflatten_elements(input, elements.as_mut_slice())?;
        self.freshness.mark_dirty();
        Ok(())
    }

    /// Multiplies every element by `factor`.
    pub fn scale(&mut self, factor: f64) -> Result<(), EhmError> {
        self.numeric_elements_mut("scale")?.scale(factor);
        self.freshness.mark_dirty();
        Ok(())
    }

    /// Squares every element in place.
    pub fn square(&mut self) -> Result<(), EhmError> {
        self.numeric_elements_mut("square")?.square();
        self.freshness.mark_dirty();
        Ok(())
    }

    /// Takes the square root of every element in place.
    pub fn sqrt(&mut self) -> Result<(), EhmError> {
        self.numeric_elements_mut("sqrt")?.sqrt();
        self.freshness.mark_dirty();
        Ok(())
    }

    /// Sets every element to zero.
    pub fn clear(&mut self) -> Result<(), EhmError> {
        self.numeric_elements_mut("clear")?.clear();
        self.freshness.mark_dirty();
        Ok(())
    }

    /// Adds `other`'s elements to this node's, element-wise.
    pub fn add(&mut self, other: &EnsembleNode) -> Result<(), EhmError> {
        let (mine, theirs) = self.binary_operands(other, "add")?;
        mine.add(theirs)?;
        self.freshness.mark_dirty();
        Ok(())
    }

    /// Adds `factor * other` element-wise.
    pub fn add_scaled(&mut self, other: &EnsembleNode, factor: f64) -> Result<(), EhmError> {
        let (mine, theirs) = self.binary_operands(other, "add_scaled")?;
        mine.add_scaled(theirs, factor)?;
        self.freshness.mark_dirty();
        Ok(())
    }

    /// Multiplies by `other` element-wise.
    pub fn multiply(&mut self, other: &EnsembleNode) -> Result<(), EhmError> {
        let (mine, theirs) = self.binary_operands(other, "multiply")?;
        mine.multiply(theirs)?;
        self.freshness.mark_dirty();
        Ok(())
    }

    /// Grid-indexed element lookup at `(i, j, k)`.
    pub fn element_at(&self, i: usize, j: usize, k: usize) -> Result<f64, EhmError> {
        self.table.require(Capability::IndexedAccess)?;
        let payload = self
            .payload
            .as_ref()
            .ok_or_else(|| memory_not_allocated(&self.config.key, "element_at"))?;
        match payload {
            Payload::Field3D(field) => field.cell(i, j, k),
            _ => Err(unsupported(
                self.table.variant(),
                Capability::IndexedAccess,
            )),
        }
    }

    fn numeric_elements_mut(
        &mut self,
        operation: &'static str,
    ) -> Result<&mut ehm_param::ElementStore, EhmError> {
        self.table.require(Capability::Numeric)?;
        let variant = self.table.variant();
        let payload = match self.payload.as_mut() {
            Some(payload) => payload,
            None => return Err(memory_not_allocated(&self.config.key, operation)),
        };
        payload
            .elements_mut()
            .ok_or_else(|| unsupported(variant, Capability::Numeric))
    }

    fn binary_operands<'a>(
        &'a mut self,
        other: &'a EnsembleNode,
        operation: &'static str,
    ) -> Result<(&'a mut ehm_param::ElementStore, &'a ehm_param::ElementStore), EhmError> {
        self.table.require(Capability::Numeric)?;
        if other.variant() != self.variant() {
            return Err(EhmError::IncompatibleOperand(
                ErrorInfo::new("variant-mismatch", "operand belongs to a different variant")
                    .with_context("expected", self.variant().name())
                    .with_context("actual", other.variant().name()),
            ));
        }
        let theirs = match other.payload.as_ref() {
            Some(payload) => payload
                .elements()
                .ok_or_else(|| unsupported(other.variant(), Capability::Numeric))?,
            None => return Err(memory_not_allocated(&other.config.key, operation)),
        };
        let variant = self.table.variant();
        let mine = match self.payload.as_mut() {
            Some(payload) => payload
                .elements_mut()
                .ok_or_else(|| unsupported(variant, Capability::Numeric))?,
            None => return Err(memory_not_allocated(&self.config.key, operation)),
        };
        Ok((mine, theirs))
    }
}

fn spec_drift(config: &NodeConfig, expected: Variant) -> EhmError {
    EhmError::IncompatibleOperand(
        ErrorInfo::new("spec-mismatch", "payload does not match the configured variant")
            .with_context("payload", expected.name())
            .with_context("spec", config.variant().name()),
    )
}
