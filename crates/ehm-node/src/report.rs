//! Cross-realization aggregate report.
//!
//! Writes one CSV per node key summarizing a whole ensemble at one report
//! step: a report-step line, a header naming every element column, and one
//! row per realization. Only variants whose elements carry stable names
//! register the aggregate-report capability.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use ehm_core::{EhmError, ErrorInfo};
use ehm_param::VariantSpec;

use crate::capability::{unsupported, Capability};
use crate::node::{memory_not_allocated, EnsembleNode};

/// Renders the aggregate CSV for a uniform collection of nodes.
///
/// Every node must share the first node's key and variant and hold
/// allocated memory; the row index is the node's position in `nodes`. The
/// file lands at `output_dir/<key>.csv` and its path is returned.
pub fn ensemble_report(
    nodes: &[EnsembleNode],
    report_step: i32,
    output_dir: &Path,
) -> Result<PathBuf, EhmError> {
    let first = match nodes.first() {
        Some(node) => node,
        None => {
            return Err(EhmError::IncompatibleOperand(ErrorInfo::new(
                "empty-ensemble",
                "aggregate report needs at least one node",
            )))
        }
    };
    first.capabilities().require(Capability::AggregateReport)?;
    for node in nodes {
        if node.variant() != first.variant() || node.key() != first.key() {
            return Err(EhmError::IncompatibleOperand(
                ErrorInfo::new("mixed-ensemble", "aggregate report needs uniform nodes")
                    .with_context("expected", format!("{} ({})", first.key(), first.variant()))
                    .with_context("actual", format!("{} ({})", node.key(), node.variant())),
            ));
        }
    }

    let columns = column_names(&first.config().spec)
        .ok_or_else(|| unsupported(first.variant(), Capability::AggregateReport))?;

    let mut rows: Vec<&[f64]> = Vec::with_capacity(nodes.len());
    for node in nodes {
        let payload = node
            .payload()
            .ok_or_else(|| memory_not_allocated(node.key(), "ensemble_report"))?;
        let elements = payload
            .elements()
            .ok_or_else(|| unsupported(node.variant(), Capability::AggregateReport))?;
        rows.push(elements.as_slice());
    }

    fs::create_dir_all(output_dir).map_err(|err| {
        EhmError::IoFailure(
            ErrorInfo::new("report-mkdir", err.to_string())
                .with_context("path", output_dir.display().to_string()),
        )
    })?;
    let path = output_dir.join(format!("{}.csv", first.key()));
    let mut file = File::create(&path).map_err(|err| {
        EhmError::IoFailure(
            ErrorInfo::new("report-create", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;
    write_csv(&mut file, report_step, &columns, &rows).map_err(|err| {
        EhmError::IoFailure(
            ErrorInfo::new("report-write", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;
    Ok(path)
}

fn column_names(spec: &VariantSpec) -> Option<Vec<String>> {
    match spec {
        VariantSpec::FaultMultiplier { faults, .. } => Some(faults.clone()),
        VariantSpec::Well { variables } => Some(variables.clone()),
        VariantSpec::GeneralKeyword { parameters } => {
            Some(parameters.iter().map(|p| p.name.clone()).collect())
        }
        _ => None,
    }
}

fn write_csv(
    file: &mut File,
    report_step: i32,
    columns: &[String],
    rows: &[&[f64]],
) -> std::io::Result<()> {
    writeln!(file, "report_step,{report_step}")?;
    writeln!(file, "realization,{}", columns.join(","))?;
    for (iens, row) in rows.iter().enumerate() {
        let cells: Vec<String> = row.iter().map(|value| format!("{value:.6}")).collect();
        writeln!(file, "{iens},{}", cells.join(","))?;
    }
    Ok(())
}
