//! Errors raised by the unit engine
//!
//! Every error is a caller-input problem. Nothing is retried internally,
//! so each variant carries enough context to diagnose the call that failed.

use thiserror::Error;

/// Machine-readable error codes
pub mod codes {
    pub const DIMENSION_MISMATCH: &str = "DIMENSION_MISMATCH";
    pub const INVALID_OPERAND: &str = "INVALID_OPERAND";
    pub const MALFORMED_UNIT: &str = "MALFORMED_UNIT";
    pub const UNKNOWN_UNIT: &str = "UNKNOWN_UNIT";
    pub const DUPLICATE_UNIT: &str = "DUPLICATE_UNIT";
    pub const INVALID_FACTOR: &str = "INVALID_FACTOR";
    pub const EMPTY_UNIT: &str = "EMPTY_UNIT";
    pub const INVALID_EXPONENT: &str = "INVALID_EXPONENT";
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitError {
    /// Canonical constituent lists differ. Both sides are rendered.
    #[error("dimension mismatch: [{left}] is not compatible with [{right}]")]
    DimensionMismatch { left: String, right: String },

    #[error("{operation}: expected {expected}, got {found}")]
    InvalidOperandType {
        operation: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// A named definition reaches itself while being expanded.
    #[error("malformed unit definition `{symbol}`: {}", .cycle.join(" -> "))]
    MalformedUnitDefinition { symbol: String, cycle: Vec<String> },

    #[error("unknown unit: {0}")]
    UnknownUnit(String),

    #[error("unit already defined: {0}")]
    DuplicateUnit(String),

    #[error("invalid unit factor {0}: must be finite and positive")]
    InvalidFactor(f64),

    /// Every term cancelled; the result is the number carried here.
    #[error("unit terms cancel to the plain number {0}")]
    EmptyUnit(f64),

    #[error("invalid exponent: {0}")]
    InvalidExponent(String),
}

impl UnitError {
    /// Mismatch between two rendered constituent lists
    pub fn mismatch(left: impl Into<String>, right: impl Into<String>) -> Self {
        UnitError::DimensionMismatch {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Operator `operation` wanted `expected` but received `found`
    pub fn operand(operation: &'static str, expected: &'static str, found: &'static str) -> Self {
        UnitError::InvalidOperandType { operation, expected, found }
    }

    /// Machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            UnitError::DimensionMismatch { .. } => codes::DIMENSION_MISMATCH,
            UnitError::InvalidOperandType { .. } => codes::INVALID_OPERAND,
            UnitError::MalformedUnitDefinition { .. } => codes::MALFORMED_UNIT,
            UnitError::UnknownUnit(_) => codes::UNKNOWN_UNIT,
            UnitError::DuplicateUnit(_) => codes::DUPLICATE_UNIT,
            UnitError::InvalidFactor(_) => codes::INVALID_FACTOR,
            UnitError::EmptyUnit(_) => codes::EMPTY_UNIT,
            UnitError::InvalidExponent(_) => codes::INVALID_EXPONENT,
        }
    }
}
