//! Configuration descriptors for ensemble parameter nodes.
//!
//! A node is constructed from a shared, read-only [`NodeConfig`]: the key,
//! the per-variant shape, the master seed for prior sampling, and optional
//! file templates used when exchanging data with the simulator. A whole
//! ensemble's worth of descriptors loads from one YAML document as a
//! [`ParameterSetConfig`].

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use ehm_core::{derive_substream_seed, EhmError, ErrorInfo, RngHandle, SchemaVersion, Variant};
use rand_distr::{Distribution, LogNormal, Normal, Uniform};
use serde::{Deserialize, Serialize};

use crate::table::EQUIL_COLUMNS;

/// Prior distribution drawn during node initialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InitialDraw {
    /// Every draw yields the same value.
    Constant {
        /// The value assigned to each element.
        value: f64,
    },
    /// Uniform draw over the half-open interval `[low, high)`.
    Uniform {
        /// Inclusive lower bound.
        low: f64,
        /// Exclusive upper bound; must exceed `low`.
        high: f64,
    },
    /// Normal draw.
    Gaussian {
        /// Distribution mean.
        mean: f64,
        /// Standard deviation; zero yields the mean on every draw.
        std_dev: f64,
    },
    /// Log-normal draw.
    LogNormal {
        /// Mean of the underlying normal.
        location: f64,
        /// Standard deviation of the underlying normal.
        scale: f64,
    },
}

impl Default for InitialDraw {
    fn default() -> Self {
        InitialDraw::Constant { value: 0.0 }
    }
}

fn invalid_prior(detail: &str) -> EhmError {
    EhmError::Config(ErrorInfo::new("invalid-prior", detail.to_string()))
}

impl InitialDraw {
    /// Draws one value from the distribution.
    pub fn sample(&self, rng: &mut RngHandle) -> Result<f64, EhmError> {
        match self {
            InitialDraw::Constant { value } => Ok(*value),
            InitialDraw::Uniform { low, high } => {
                if !(low < high) {
                    return Err(invalid_bounds("uniform prior needs low < high", *low, *high));
                }
                Ok(Uniform::new(*low, *high).sample(rng))
            }
            InitialDraw::Gaussian { mean, std_dev } => {
                let normal = Normal::new(*mean, *std_dev)
                    .map_err(|err| invalid_prior(&err.to_string()))?;
                Ok(normal.sample(rng))
            }
            InitialDraw::LogNormal { location, scale } => {
                let log_normal = LogNormal::new(*location, *scale)
                    .map_err(|err| invalid_prior(&err.to_string()))?;
                Ok(log_normal.sample(rng))
            }
        }
    }

    /// Checks the distribution parameters without drawing.
    pub fn validate(&self) -> Result<(), EhmError> {
        match self {
            InitialDraw::Constant { value } => {
                if !value.is_finite() {
                    return Err(invalid_prior("constant prior value must be finite"));
                }
            }
            InitialDraw::Uniform { low, high } => {
                if !low.is_finite() || !high.is_finite() || !(low < high) {
                    return Err(invalid_bounds(
                        "uniform prior needs finite low < high",
                        *low,
                        *high,
                    ));
                }
            }
            InitialDraw::Gaussian { mean, std_dev } => {
                if !mean.is_finite() || !std_dev.is_finite() || *std_dev < 0.0 {
                    return Err(invalid_prior(
                        "gaussian prior needs finite mean and non-negative std_dev",
                    ));
                }
            }
            InitialDraw::LogNormal { location, scale } => {
                if !location.is_finite() || !scale.is_finite() || *scale < 0.0 {
                    return Err(invalid_prior(
                        "log-normal prior needs finite location and non-negative scale",
                    ));
                }
            }
        }
        Ok(())
    }
}

fn invalid_bounds(detail: &str, low: f64, high: f64) -> EhmError {
    EhmError::Config(
        ErrorInfo::new("invalid-prior", detail.to_string())
            .with_context("low", low.to_string())
            .with_context("high", high.to_string()),
    )
}

/// A scalar parameter with its own name and prior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedPrior {
    /// Parameter name, substituted into simulator input.
    pub name: String,
    /// Prior drawn for this parameter at initialization.
    #[serde(default)]
    pub prior: InitialDraw,
}

/// Per-variant shape and prior description.
///
/// The tag doubles as the variant name, so a spec block in YAML reads
/// `variant: scalar-multiplier` followed by that variant's fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "kebab-case")]
pub enum VariantSpec {
    /// Anonymous block of multipliers.
    ScalarMultiplier {
        /// Number of multiplier elements.
        size: usize,
        /// Prior shared by every element.
        #[serde(default)]
        prior: InitialDraw,
    },
    /// One multiplier per named fault.
    FaultMultiplier {
        /// Fault names, one multiplier each; order is the element order.
        faults: Vec<String>,
        /// Prior shared by every fault multiplier.
        #[serde(default)]
        prior: InitialDraw,
    },
    /// Relative-permeability table, one column per phase.
    TabulatedRelPerm {
        /// Phase names, one column each.
        phases: Vec<String>,
        /// Number of saturation rows in the table.
        saturation_rows: usize,
        /// Prior shared by every table cell.
        #[serde(default)]
        prior: InitialDraw,
    },
    /// Equilibration table with four columns per region.
    EquilibrationTable {
        /// Number of equilibration regions.
        regions: usize,
        /// Prior shared by every table cell.
        #[serde(default)]
        prior: InitialDraw,
    },
    /// Full 3D grid property.
    #[serde(rename = "field3d")]
    Field3D {
        /// Grid extent along i.
        nx: usize,
        /// Grid extent along j.
        ny: usize,
        /// Grid extent along k.
        nz: usize,
        /// Prior shared by every cell.
        #[serde(default)]
        prior: InitialDraw,
    },
    /// Per-well response values loaded from simulator output.
    Well {
        /// Well variable names, one element each; order is the element order.
        variables: Vec<String>,
    },
    /// Single summary-vector response value.
    SummaryVector,
    /// Opaque static keyword carried through restart files.
    StaticKeyword,
    /// Named scalar parameters, each with its own prior.
    GeneralKeyword {
        /// The parameters in element order.
        parameters: Vec<NamedPrior>,
    },
    /// Untyped flat parameter array; zero size is a legal empty payload.
    GeneralDataArray {
        /// Number of elements; may be zero.
        size: usize,
        /// Prior shared by every element.
        #[serde(default)]
        prior: InitialDraw,
    },
}

fn empty_spec(key: &str, detail: &str) -> EhmError {
    EhmError::Config(
        ErrorInfo::new("empty-spec", detail.to_string()).with_context("key", key.to_string()),
    )
}

fn duplicate_name(key: &str, name: &str) -> EhmError {
    EhmError::Config(
        ErrorInfo::new("duplicate-name", "names within a spec must be unique")
            .with_context("key", key.to_string())
            .with_context("name", name.to_string()),
    )
}

fn check_unique<'a>(key: &str, names: impl Iterator<Item = &'a str>) -> Result<(), EhmError> {
    let mut seen = BTreeSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(duplicate_name(key, name));
        }
    }
    Ok(())
}

impl VariantSpec {
    /// The variant this spec shapes.
    pub fn variant(&self) -> Variant {
        match self {
            VariantSpec::ScalarMultiplier { .. } => Variant::ScalarMultiplier,
            VariantSpec::FaultMultiplier { .. } => Variant::FaultMultiplier,
            VariantSpec::TabulatedRelPerm { .. } => Variant::TabulatedRelPerm,
            VariantSpec::EquilibrationTable { .. } => Variant::EquilibrationTable,
            VariantSpec::Field3D { .. } => Variant::Field3D,
            VariantSpec::Well { .. } => Variant::Well,
            VariantSpec::SummaryVector => Variant::SummaryVector,
            VariantSpec::StaticKeyword => Variant::StaticKeyword,
            VariantSpec::GeneralKeyword { .. } => Variant::GeneralKeyword,
            VariantSpec::GeneralDataArray { .. } => Variant::GeneralDataArray,
        }
    }

    /// Number of flattened elements a payload of this shape contributes to
    /// the analysis matrix.
    pub fn element_count(&self) -> usize {
        match self {
            VariantSpec::ScalarMultiplier { size, .. } => *size,
            VariantSpec::FaultMultiplier { faults, .. } => faults.len(),
            VariantSpec::TabulatedRelPerm {
                phases,
                saturation_rows,
                ..
            } => phases.len() * saturation_rows,
            VariantSpec::EquilibrationTable { regions, .. } => regions * EQUIL_COLUMNS,
            VariantSpec::Field3D { nx, ny, nz, .. } => nx * ny * nz,
            VariantSpec::Well { variables } => variables.len(),
            VariantSpec::SummaryVector => 1,
            VariantSpec::StaticKeyword => 0,
            VariantSpec::GeneralKeyword { parameters } => parameters.len(),
            VariantSpec::GeneralDataArray { size, .. } => *size,
        }
    }

    /// Checks shape and prior parameters.
    pub fn validate(&self, key: &str) -> Result<(), EhmError> {
        match self {
            VariantSpec::ScalarMultiplier { size, prior } => {
                if *size == 0 {
                    return Err(empty_spec(key, "scalar multiplier needs at least one element"));
                }
                prior.validate()
            }
            VariantSpec::FaultMultiplier { faults, prior } => {
                if faults.is_empty() {
                    return Err(empty_spec(key, "fault multiplier needs at least one fault"));
                }
                check_unique(key, faults.iter().map(String::as_str))?;
                prior.validate()
            }
            VariantSpec::TabulatedRelPerm {
                phases,
                saturation_rows,
                prior,
            } => {
                if phases.is_empty() || *saturation_rows == 0 {
                    return Err(empty_spec(
                        key,
                        "rel-perm table needs at least one phase and one saturation row",
                    ));
                }
                check_unique(key, phases.iter().map(String::as_str))?;
                prior.validate()
            }
            VariantSpec::EquilibrationTable { regions, prior } => {
                if *regions == 0 {
                    return Err(empty_spec(key, "equilibration table needs at least one region"));
                }
                prior.validate()
            }
            VariantSpec::Field3D { nx, ny, nz, prior } => {
                if *nx == 0 || *ny == 0 || *nz == 0 {
                    return Err(empty_spec(key, "field dimensions must all be positive"));
                }
                prior.validate()
            }
            VariantSpec::Well { variables } => {
                if variables.is_empty() {
                    return Err(empty_spec(key, "well needs at least one variable"));
                }
                check_unique(key, variables.iter().map(String::as_str))
            }
            VariantSpec::SummaryVector | VariantSpec::StaticKeyword => Ok(()),
            VariantSpec::GeneralKeyword { parameters } => {
                if parameters.is_empty() {
                    return Err(empty_spec(key, "general keyword needs at least one parameter"));
                }
                check_unique(key, parameters.iter().map(|p| p.name.as_str()))?;
                for parameter in parameters {
                    parameter.prior.validate()?;
                }
                Ok(())
            }
            VariantSpec::GeneralDataArray { prior, .. } => prior.validate(),
        }
    }
}

fn default_node_seed() -> u64 {
    0xE45E_5EED_E45E_5EED
}

/// Read-only descriptor one node is constructed from.
///
/// The driver owns these behind `Arc`; a node never mutates its descriptor
/// and never outlives the configuration it was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Stable identifying name of the parameter.
    pub key: String,
    /// Shape and prior description.
    pub spec: VariantSpec,
    /// Master seed for prior sampling; realization substreams derive from it.
    #[serde(default = "default_node_seed")]
    pub seed: u64,
    /// Simulator artifact the node reads under the run path, when it
    /// differs from the key.
    #[serde(default)]
    pub input_file: Option<String>,
    /// File name rendered under the run path by simulator-input writes,
    /// when it differs from the key.
    #[serde(default)]
    pub output_file: Option<String>,
}

impl NodeConfig {
    /// Creates a descriptor with the default seed and no file templates.
    pub fn new(key: impl Into<String>, spec: VariantSpec) -> Self {
        NodeConfig {
            key: key.into(),
            spec,
            seed: default_node_seed(),
            input_file: None,
            output_file: None,
        }
    }

    /// Replaces the master seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the simulator artifact name the node loads from.
    pub fn with_input_file(mut self, name: impl Into<String>) -> Self {
        self.input_file = Some(name.into());
        self
    }

    /// Sets the file name rendered by simulator-input writes.
    pub fn with_output_file(mut self, name: impl Into<String>) -> Self {
        self.output_file = Some(name.into());
        self
    }

    /// The variant this node carries.
    pub fn variant(&self) -> Variant {
        self.spec.variant()
    }

    /// Flattened element count of this node's payload.
    pub fn element_count(&self) -> usize {
        self.spec.element_count()
    }

    /// The sampling seed for one realization's substream.
    pub fn realization_seed(&self, iens: usize) -> u64 {
        derive_substream_seed(self.seed, iens as u64)
    }

    /// Checks the key and the spec.
    pub fn validate(&self) -> Result<(), EhmError> {
        if self.key.is_empty() {
            return Err(EhmError::Config(ErrorInfo::new(
                "empty-key",
                "node key must not be empty",
            )));
        }
        self.spec.validate(&self.key)
    }
}

/// A whole ensemble's node descriptors, loaded from one YAML document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSetConfig {
    /// Schema the document was written against.
    #[serde(default)]
    pub schema: SchemaVersion,
    /// Node descriptors in declaration order.
    pub nodes: Vec<NodeConfig>,
}

impl ParameterSetConfig {
    /// Parses a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self, EhmError> {
        serde_yaml::from_str(text)
            .map_err(|err| EhmError::Config(ErrorInfo::new("config-parse", err.to_string())))
    }

    /// Loads and parses a YAML file.
    pub fn load(path: &Path) -> Result<Self, EhmError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            EhmError::Config(
                ErrorInfo::new("config-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        Self::from_yaml_str(&contents).map_err(|err| match err {
            EhmError::Config(info) => {
                EhmError::Config(info.with_context("path", path.display().to_string()))
            }
            other => other,
        })
    }

    /// Checks schema compatibility, key uniqueness, and every node.
    pub fn validate(&self) -> Result<(), EhmError> {
        let supported = SchemaVersion::default();
        if !supported.is_compatible_with(&self.schema) {
            return Err(EhmError::Config(
                ErrorInfo::new("schema-incompatible", "configuration schema is not readable")
                    .with_context("found", self.schema.to_string())
                    .with_context("supported", supported.to_string()),
            ));
        }
        let mut seen = BTreeSet::new();
        for node in &self.nodes {
            if !seen.insert(node.key.as_str()) {
                return Err(EhmError::Config(
                    ErrorInfo::new("duplicate-key", "node keys must be unique")
                        .with_context("key", node.key.clone()),
                ));
            }
        }
        for node in &self.nodes {
            node.validate()?;
        }
        Ok(())
    }

    /// Finds a descriptor by key.
    pub fn node(&self, key: &str) -> Option<&NodeConfig> {
        self.nodes.iter().find(|node| node.key == key)
    }
}
