//! The payload enum uniting every variant's concrete data.
//!
//! A node owns at most one [`Payload`]; all per-variant behavior the node
//! needs (allocation, prior draws, the flat element view, simulator text
//! rendering) dispatches through exhaustive matches here, so adding a
//! variant without extending every operation fails to compile.

use ehm_core::{EhmError, ErrorInfo, RngHandle, Variant};

use crate::config::{InitialDraw, NodeConfig, VariantSpec};
use crate::field::GridField;
use crate::general::{DataArray, ParameterVector};
use crate::multiplier::MultiplierSet;
use crate::response::{SummaryResponse, WellResponse};
use crate::static_kw::RawKeyword;
use crate::store::ElementStore;

/// One realization's concrete parameter data.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Anonymous multiplier block.
    ScalarMultiplier(MultiplierSet),
    /// Per-fault multipliers.
    FaultMultiplier(MultiplierSet),
    /// Relative-permeability table.
    TabulatedRelPerm(crate::table::SaturationTable),
    /// Equilibration table.
    EquilibrationTable(crate::table::EquilTable),
    /// 3D grid field.
    Field3D(GridField),
    /// Per-well response values.
    Well(WellResponse),
    /// Summary-vector response value.
    SummaryVector(SummaryResponse),
    /// Opaque static keyword bytes.
    StaticKeyword(RawKeyword),
    /// Named scalar parameters.
    GeneralKeyword(ParameterVector),
    /// Untyped flat array.
    GeneralDataArray(DataArray),
}

fn spec_mismatch(payload: Variant, spec: Variant) -> EhmError {
    EhmError::IncompatibleOperand(
        ErrorInfo::new("spec-mismatch", "payload does not match the configured variant")
            .with_context("payload", payload.name())
            .with_context("spec", spec.name()),
    )
}

fn fill_with_prior(
    store: &mut ElementStore,
    prior: &InitialDraw,
    rng: &mut RngHandle,
) -> Result<(), EhmError> {
    for value in store.as_mut_slice() {
        *value = prior.sample(rng)?;
    }
    Ok(())
}

impl Payload {
    /// Allocates a zeroed payload shaped by `spec`.
    pub fn allocate(spec: &VariantSpec) -> Payload {
        match spec {
            VariantSpec::ScalarMultiplier { size, .. } => {
                Payload::ScalarMultiplier(MultiplierSet::zeroed(*size))
            }
            VariantSpec::FaultMultiplier { faults, .. } => {
                Payload::FaultMultiplier(MultiplierSet::zeroed(faults.len()))
            }
            VariantSpec::TabulatedRelPerm {
                phases,
                saturation_rows,
                ..
            } => Payload::TabulatedRelPerm(crate::table::SaturationTable::zeroed(
                phases.len(),
                *saturation_rows,
            )),
            VariantSpec::EquilibrationTable { regions, .. } => {
                Payload::EquilibrationTable(crate::table::EquilTable::zeroed(*regions))
            }
            VariantSpec::Field3D { nx, ny, nz, .. } => {
                Payload::Field3D(GridField::zeroed(*nx, *ny, *nz))
            }
            VariantSpec::Well { variables } => Payload::Well(WellResponse::zeroed(variables.len())),
            VariantSpec::SummaryVector => Payload::SummaryVector(SummaryResponse::new()),
            VariantSpec::StaticKeyword => Payload::StaticKeyword(RawKeyword::empty()),
            VariantSpec::GeneralKeyword { parameters } => {
                Payload::GeneralKeyword(ParameterVector::zeroed(parameters.len()))
            }
            VariantSpec::GeneralDataArray { size, .. } => {
                Payload::GeneralDataArray(DataArray::zeroed(*size))
            }
        }
    }

    /// The variant this payload belongs to.
    pub fn variant(&self) -> Variant {
        match self {
            Payload::ScalarMultiplier(_) => Variant::ScalarMultiplier,
            Payload::FaultMultiplier(_) => Variant::FaultMultiplier,
            Payload::TabulatedRelPerm(_) => Variant::TabulatedRelPerm,
            Payload::EquilibrationTable(_) => Variant::EquilibrationTable,
            Payload::Field3D(_) => Variant::Field3D,
            Payload::Well(_) => Variant::Well,
            Payload::SummaryVector(_) => Variant::SummaryVector,
            Payload::StaticKeyword(_) => Variant::StaticKeyword,
            Payload::GeneralKeyword(_) => Variant::GeneralKeyword,
            Payload::GeneralDataArray(_) => Variant::GeneralDataArray,
        }
    }

    /// Flat element view in the variant's canonical order; `None` for
    /// payloads that contribute no elements to the analysis matrix.
    pub fn elements(&self) -> Option<&ElementStore> {
        match self {
            Payload::ScalarMultiplier(set) | Payload::FaultMultiplier(set) => Some(set.values()),
            Payload::TabulatedRelPerm(table) => Some(table.values()),
            Payload::EquilibrationTable(table) => Some(table.values()),
            Payload::Field3D(field) => Some(field.values()),
            Payload::Well(response) => Some(response.values()),
            Payload::SummaryVector(response) => Some(response.values()),
            Payload::StaticKeyword(_) => None,
            Payload::GeneralKeyword(vector) => Some(vector.values()),
            Payload::GeneralDataArray(array) => Some(array.values()),
        }
    }

    /// Mutable flat element view; `None` for element-free payloads.
    pub fn elements_mut(&mut self) -> Option<&mut ElementStore> {
        match self {
            Payload::ScalarMultiplier(set) | Payload::FaultMultiplier(set) => {
                Some(set.values_mut())
            }
            Payload::TabulatedRelPerm(table) => Some(table.values_mut()),
            Payload::EquilibrationTable(table) => Some(table.values_mut()),
            Payload::Field3D(field) => Some(field.values_mut()),
            Payload::Well(response) => Some(response.values_mut()),
            Payload::SummaryVector(response) => Some(response.values_mut()),
            Payload::StaticKeyword(_) => None,
            Payload::GeneralKeyword(vector) => Some(vector.values_mut()),
            Payload::GeneralDataArray(array) => Some(array.values_mut()),
        }
    }

    /// Number of elements this payload flattens to.
    pub fn element_count(&self) -> usize {
        self.elements().map(ElementStore::len).unwrap_or(0)
    }

    /// True when a write would emit bytes: the payload has elements, or
    /// carries raw keyword bytes.
    pub fn has_stored_form(&self) -> bool {
        match self {
            Payload::StaticKeyword(raw) => !raw.is_empty(),
            other => other.element_count() > 0,
        }
    }

    /// Draws every element from the prior distributions named in `spec`.
    pub fn initialize(&mut self, spec: &VariantSpec, rng: &mut RngHandle) -> Result<(), EhmError> {
        let variant = self.variant();
        match (self, spec) {
            (Payload::ScalarMultiplier(set), VariantSpec::ScalarMultiplier { prior, .. }) => {
                fill_with_prior(set.values_mut(), prior, rng)
            }
            (Payload::FaultMultiplier(set), VariantSpec::FaultMultiplier { prior, .. }) => {
                fill_with_prior(set.values_mut(), prior, rng)
            }
            (Payload::TabulatedRelPerm(table), VariantSpec::TabulatedRelPerm { prior, .. }) => {
                fill_with_prior(table.values_mut(), prior, rng)
            }
            (
                Payload::EquilibrationTable(table),
                VariantSpec::EquilibrationTable { prior, .. },
            ) => fill_with_prior(table.values_mut(), prior, rng),
            (Payload::Field3D(field), VariantSpec::Field3D { prior, .. }) => {
                fill_with_prior(field.values_mut(), prior, rng)
            }
            (Payload::GeneralKeyword(vector), VariantSpec::GeneralKeyword { parameters }) => {
                for (value, parameter) in vector
                    .values_mut()
                    .as_mut_slice()
                    .iter_mut()
                    .zip(parameters)
                {
                    *value = parameter.prior.sample(rng)?;
                }
                Ok(())
            }
            (Payload::GeneralDataArray(array), VariantSpec::GeneralDataArray { prior, .. }) => {
                fill_with_prior(array.values_mut(), prior, rng)
            }
            (Payload::Well(_) | Payload::SummaryVector(_) | Payload::StaticKeyword(_), _) => {
                Err(EhmError::UnsupportedOperation(
                    ErrorInfo::new("no-initializer", "variant has no prior to draw from")
                        .with_context("variant", variant.name()),
                ))
            }
            _ => Err(spec_mismatch(variant, spec.variant())),
        }
    }

    /// Renders the simulator-input form of the payload.
    ///
    /// Text variants produce their keyword block; static keywords pass
    /// their bytes through verbatim. Response variants have no input form.
    pub fn render_simulator_input(&self, config: &NodeConfig) -> Result<Vec<u8>, EhmError> {
        let variant = self.variant();
        match (self, &config.spec) {
            (Payload::ScalarMultiplier(set), VariantSpec::ScalarMultiplier { .. }) => {
                Ok(set.render_block(&config.key).into_bytes())
            }
            (Payload::FaultMultiplier(set), VariantSpec::FaultMultiplier { faults, .. }) => {
                Ok(set.render_named(&config.key, faults).into_bytes())
            }
            (
                Payload::TabulatedRelPerm(table),
                VariantSpec::TabulatedRelPerm { phases, .. },
            ) => Ok(table.render_table(&config.key, phases).into_bytes()),
            (Payload::EquilibrationTable(table), VariantSpec::EquilibrationTable { .. }) => {
                Ok(table.render_table(&config.key).into_bytes())
            }
            (Payload::Field3D(field), VariantSpec::Field3D { .. }) => {
                Ok(field.render_column(&config.key).into_bytes())
            }
            (Payload::StaticKeyword(raw), VariantSpec::StaticKeyword) => Ok(raw.bytes().to_vec()),
            (Payload::GeneralKeyword(vector), VariantSpec::GeneralKeyword { parameters }) => {
                Ok(vector.render_assignments(parameters).into_bytes())
            }
            (Payload::GeneralDataArray(array), VariantSpec::GeneralDataArray { .. }) => {
                Ok(array.render_column().into_bytes())
            }
            (Payload::Well(_) | Payload::SummaryVector(_), _) => {
                Err(EhmError::UnsupportedOperation(
                    ErrorInfo::new("no-simulator-form", "variant has no simulator input form")
                        .with_context("variant", variant.name()),
                ))
            }
            _ => Err(spec_mismatch(variant, config.spec.variant())),
        }
    }
}
