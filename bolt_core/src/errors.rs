//! # Error Types
//!
//! Structured error types for bolt_core. These errors carry enough context
//! to identify the offending input or candidate programmatically, not just
//! a message string.
//!
//! Failing to converge is *not* an error: the search engine returns
//! `SearchStatus::Exhausted` / `SearchStatus::Stalled` as ordinary values,
//! since a driver is expected to branch on them. Log-write failures are
//! likewise reported (via `tracing`) rather than raised; see
//! [`crate::logstore`].
//!
//! ## Example
//!
//! ```rust
//! use bolt_core::errors::{JointError, JointResult};
//!
//! fn validate_diameter(d_mm: f64) -> JointResult<()> {
//!     if d_mm <= 0.0 {
//!         return Err(JointError::invalid_input(
//!             "bolt_diameter_mm",
//!             d_mm.to_string(),
//!             "Diameter must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for bolt_core operations
pub type JointResult<T> = Result<T, JointError>;

/// Structured error type for joint evaluation operations.
///
/// `InvalidInput` means a malformed or missing physical parameter;
/// `Domain` means a mathematically undefined operation on otherwise
/// well-formed inputs (zero-length grip, zero-area section). Both always
/// propagate to the caller - the search must never silently coerce a
/// configuration it cannot evaluate.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum JointError {
    /// An input value is malformed, missing, or out of range
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A mathematically undefined operation (division by zero geometry)
    #[error("Domain error in {operation}: {reason}")]
    Domain { operation: String, reason: String },

    /// An evaluation step failed; carries the candidate that was being tried
    /// so the search history stays an accurate record
    #[error("Evaluation of {num_bolts} x {bolt_diameter_mm} mm failed: {reason}")]
    EvaluationFailed {
        num_bolts: u32,
        bolt_diameter_mm: f64,
        reason: String,
    },

    /// Iteration log store failure on the attach/read path.
    /// Write failures are reported, not raised (see `logstore`).
    #[error("Log store error: {operation} on '{path}' - {reason}")]
    LogStore {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },
}

impl JointError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        JointError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a Domain error
    pub fn domain(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        JointError::Domain {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Create a LogStore error
    pub fn log_store(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        JointError::LogStore {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Wrap an error with the candidate that was being evaluated
    pub fn during_evaluation(num_bolts: u32, bolt_diameter_mm: f64, source: &JointError) -> Self {
        JointError::EvaluationFailed {
            num_bolts,
            bolt_diameter_mm,
            reason: source.to_string(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            JointError::InvalidInput { .. } => "INVALID_INPUT",
            JointError::Domain { .. } => "DOMAIN_ERROR",
            JointError::EvaluationFailed { .. } => "EVALUATION_FAILED",
            JointError::LogStore { .. } => "LOG_STORE_ERROR",
            JointError::Serialization { .. } => "SERIALIZATION_ERROR",
        }
    }
}
