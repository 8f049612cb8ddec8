//! Error types for solver construction and caller misuse
//!
//! Search failure is not an error: an unsatisfiable configuration ends in
//! `Resolution::Contradiction`. Everything here indicates malformed input.

use std::fmt;

/// Main error type for all solver operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    /// Pattern model is malformed
    ///
    /// Occurs when:
    /// - Frequencies are negative, non-finite, or sum to zero
    /// - A propagator row has the wrong number of labels
    /// - A propagator entry refers to a pattern that does not exist
    InvalidModel {
        /// Description of what's wrong with the model
        reason: String,
    },

    /// Solver option or constraint parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Cell index exceeds the topology
    CellOutOfRange {
        /// The invalid cell index
        cell: usize,
        /// Number of cells in the topology
        cell_count: usize,
    },

    /// Pattern id exceeds the model
    PatternOutOfRange {
        /// The invalid pattern id
        pattern: usize,
        /// Number of patterns in the model
        pattern_count: usize,
    },

    /// Selection requested for a pattern that is no longer possible
    PatternAlreadyBanned {
        /// Cell the selection targeted
        cell: usize,
        /// Pattern that was already removed
        pattern: usize,
    },

    /// Model, constraint, or option is incompatible with the topology
    TopologyMismatch {
        /// Description of the incompatibility
        reason: String,
    },
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidModel { reason } => write!(f, "Invalid pattern model: {reason}"),
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::CellOutOfRange { cell, cell_count } => {
                write!(f, "Cell {cell} is out of bounds (cell count: {cell_count})")
            }
            Self::PatternOutOfRange {
                pattern,
                pattern_count,
            } => {
                write!(
                    f,
                    "Pattern {pattern} is out of bounds (pattern count: {pattern_count})"
                )
            }
            Self::PatternAlreadyBanned { cell, pattern } => {
                write!(f, "Pattern {pattern} is already banned at cell {cell}")
            }
            Self::TopologyMismatch { reason } => write!(f, "Topology mismatch: {reason}"),
        }
    }
}

impl std::error::Error for SolverError {}

/// Convenience type alias for solver results
pub type Result<T> = std::result::Result<T, SolverError>;

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> SolverError {
    SolverError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create an invalid model error
pub fn invalid_model(reason: &impl ToString) -> SolverError {
    SolverError::InvalidModel {
        reason: reason.to_string(),
    }
}

/// Create a topology mismatch error
pub fn topology_mismatch(reason: &impl ToString) -> SolverError {
    SolverError::TopologyMismatch {
        reason: reason.to_string(),
    }
}

/// Reject a cell index outside `0..cell_count`
///
/// # Errors
///
/// Returns `CellOutOfRange` if `cell >= cell_count`
pub const fn check_cell(cell: usize, cell_count: usize) -> Result<()> {
    if cell < cell_count {
        Ok(())
    } else {
        Err(SolverError::CellOutOfRange { cell, cell_count })
    }
}

/// Reject a pattern id outside `0..pattern_count`
///
/// # Errors
///
/// Returns `PatternOutOfRange` if `pattern >= pattern_count`
pub const fn check_pattern(pattern: usize, pattern_count: usize) -> Result<()> {
    if pattern < pattern_count {
        Ok(())
    } else {
        Err(SolverError::PatternOutOfRange {
            pattern,
            pattern_count,
        })
    }
}
