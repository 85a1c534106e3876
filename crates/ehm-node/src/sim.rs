//! Boundary between nodes and parsed simulator results.
//!
//! Nodes never parse simulator files themselves. A driver hands each
//! realization an implementation of [`SimulatorOutput`] scoped to that
//! realization's run directory, and the node pulls exactly the values its
//! variant needs.

use ehm_core::EhmError;

/// Parsed simulator results for one realization.
pub trait SimulatorOutput {
    /// Full grid field published under `name` at `report_step`, in
    /// canonical grid order with the first axis varying fastest.
    fn restart_field(&self, name: &str, report_step: i32) -> Result<Vec<f64>, EhmError>;

    /// Single summary value published under `name` at `report_step`.
    fn summary_value(&self, name: &str, report_step: i32) -> Result<f64, EhmError>;

    /// Values of `variables` for the well `well` at `report_step`, in the
    /// same order as `variables`.
    fn well_values(
        &self,
        well: &str,
        variables: &[String],
        report_step: i32,
    ) -> Result<Vec<f64>, EhmError>;
}
