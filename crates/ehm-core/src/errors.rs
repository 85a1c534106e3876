//! Error families for node operations and their shared structured payload.
//!
//! Every failure carries an [`ErrorInfo`] with a stable machine-readable
//! code, a human-readable message, and optional context pairs, so callers
//! can branch on codes while operators read messages. The family partitions
//! failures by contract: [`EhmError::IoFailure`] is the only family a
//! driver may absorb per realization; the rest indicate caller bugs and
//! must abort the run.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload shared by every error family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine-readable code, kebab-case.
    pub code: String,
    /// Human-readable description of the failure.
    pub message: String,
    /// Sorted key/value context pairs for diagnostics.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, String>,
    /// Optional remediation hint for operators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a payload with the given code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        ErrorInfo {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds one context pair, replacing any prior value for the key.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets the remediation hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if !self.context.is_empty() {
            write!(f, " (")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, ")")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " hint: {hint}")?;
        }
        Ok(())
    }
}

/// Error families raised by node operations and their supporting layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail", rename_all = "kebab-case")]
pub enum EhmError {
    /// The node's variant does not support the requested operation.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(ErrorInfo),

    /// A data-dependent operation ran against a released payload.
    #[error("memory not allocated: {0}")]
    MemoryNotAllocated(ErrorInfo),

    /// Operand shape or bounds incompatible with the node's data.
    #[error("incompatible operand: {0}")]
    IncompatibleOperand(ErrorInfo),

    /// Storage or simulator output could not be read or written.
    #[error("io failure: {0}")]
    IoFailure(ErrorInfo),

    /// A variant tag could not be resolved.
    #[error("unknown variant: {0}")]
    UnknownVariant(ErrorInfo),

    /// Ensemble or node configuration is invalid.
    #[error("config error: {0}")]
    Config(ErrorInfo),
}

impl EhmError {
    /// Returns the structured payload regardless of family.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            EhmError::UnsupportedOperation(info)
            | EhmError::MemoryNotAllocated(info)
            | EhmError::IncompatibleOperand(info)
            | EhmError::IoFailure(info)
            | EhmError::UnknownVariant(info)
            | EhmError::Config(info) => info,
        }
    }

    /// True when a driver may record the failure and continue with the
    /// remaining realizations instead of aborting the run.
    pub fn is_realization_recoverable(&self) -> bool {
        matches!(self, EhmError::IoFailure(_))
    }
}
