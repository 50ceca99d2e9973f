//! Error types for the simulation engines.
//!
//! Every engine validates its whole input at entry and reports the first
//! problem found as an [`InputError`] before any trace is built. Errors fall
//! into two classes: shape errors (wrong dimensions, unknown names, sanity
//! bounds) and value errors (negative counts, allocation above the declared
//! maximum).
//!
//! There is no "internal" variant: victim selection and the safety scan are
//! total over validated input.

use std::fmt;

use thiserror::Error;

/// Which input vector or matrix an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Matrix {
    /// Free instances per resource type.
    Available,
    /// Declared maximum demand per process.
    Maximum,
    /// Instances currently held per process.
    Allocation,
    /// Outstanding requests per process (matrix detection).
    Request,
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Available => "available",
            Self::Maximum => "maximum",
            Self::Allocation => "allocation",
            Self::Request => "request",
        };
        f.write_str(name)
    }
}

/// Coarse classification of an [`InputError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Dimensions, names or sizes are wrong.
    Shape,
    /// Dimensions are right but a value is out of its domain.
    Value,
}

/// Errors raised while validating engine input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// A vector does not have the expected number of entries.
    #[error("{matrix} has {actual} entries, expected {expected}")]
    VectorLength {
        /// Offending vector
        matrix: Matrix,
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// A matrix does not have one row per process.
    #[error("{matrix} has {actual} rows, expected {expected}")]
    RowCount {
        /// Offending matrix
        matrix: Matrix,
        /// Expected number of rows
        expected: usize,
        /// Actual number of rows
        actual: usize,
    },

    /// A matrix row does not have one column per resource type.
    #[error("{matrix} row {row} has {actual} columns, expected {expected}")]
    RowLength {
        /// Offending matrix
        matrix: Matrix,
        /// Row (process) index
        row: usize,
        /// Expected number of columns
        expected: usize,
        /// Actual number of columns
        actual: usize,
    },

    /// Page replacement needs at least one frame.
    #[error("frame count must be at least 1")]
    ZeroFrames,

    /// Replacement policy name is not one of FIFO, LRU, OPTIMAL.
    #[error("unknown replacement policy: {0:?}")]
    UnknownPolicy(String),

    /// An input dimension exceeds the configured sanity bound.
    #[error("{what} is {actual}, limit is {limit}")]
    TooLarge {
        /// Which dimension
        what: &'static str,
        /// Value supplied
        actual: usize,
        /// Configured bound
        limit: usize,
    },

    /// A resource count is negative.
    #[error("{matrix}[{row}][{column}] is negative ({value})")]
    NegativeValue {
        /// Offending matrix
        matrix: Matrix,
        /// Row index (0 for plain vectors)
        row: usize,
        /// Column index
        column: usize,
        /// The negative value
        value: i64,
    },

    /// A process holds more than its declared maximum (need would be
    /// negative).
    #[error(
        "process {process} holds {allocation} of resource {resource} but declares maximum {maximum}"
    )]
    AllocationExceedsMaximum {
        /// Process index
        process: usize,
        /// Resource index
        resource: usize,
        /// Allocated instances
        allocation: i64,
        /// Declared maximum
        maximum: i64,
    },

    /// Free plus held instances of one resource type exceed `i64::MAX`, so
    /// releasing every allocation into `work` could not be represented.
    #[error("total instances of resource {resource} overflow")]
    ResourceOverflow {
        /// Resource index
        resource: usize,
    },
}

impl InputError {
    /// Classify the error as a shape or value problem.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::VectorLength { .. }
            | Self::RowCount { .. }
            | Self::RowLength { .. }
            | Self::ZeroFrames
            | Self::UnknownPolicy(_)
            | Self::TooLarge { .. } => ErrorClass::Shape,
            Self::NegativeValue { .. }
            | Self::AllocationExceedsMaximum { .. }
            | Self::ResourceOverflow { .. } => ErrorClass::Value,
        }
    }
}

/// Check that a vector has exactly `expected` entries.
pub(crate) fn check_len(matrix: Matrix, values: &[i64], expected: usize) -> Result<(), InputError> {
    if values.len() != expected {
        return Err(InputError::VectorLength { matrix, expected, actual: values.len() });
    }
    Ok(())
}

/// Check that a matrix is `rows x columns`.
pub(crate) fn check_shape(
    matrix: Matrix,
    values: &[Vec<i64>],
    rows: usize,
    columns: usize,
) -> Result<(), InputError> {
    if values.len() != rows {
        return Err(InputError::RowCount { matrix, expected: rows, actual: values.len() });
    }
    for (row, entries) in values.iter().enumerate() {
        if entries.len() != columns {
            return Err(InputError::RowLength {
                matrix,
                row,
                expected: columns,
                actual: entries.len(),
            });
        }
    }
    Ok(())
}

/// Check that no entry of a matrix is negative.
pub(crate) fn check_non_negative(matrix: Matrix, values: &[Vec<i64>]) -> Result<(), InputError> {
    for (row, entries) in values.iter().enumerate() {
        check_row_non_negative(matrix, row, entries)?;
    }
    Ok(())
}

/// Check that no entry of a single row is negative.
pub(crate) fn check_row_non_negative(
    matrix: Matrix,
    row: usize,
    entries: &[i64],
) -> Result<(), InputError> {
    match entries.iter().position(|&value| value < 0) {
        Some(column) => {
            Err(InputError::NegativeValue { matrix, row, column, value: entries[column] })
        },
        None => Ok(()),
    }
}

/// Check that `available[j]` plus every `allocation[i][j]` fits in `i64`.
///
/// `work` never exceeds this total, so a scan over validated input cannot
/// overflow. Requires `allocation` to already be `rows x available.len()`.
pub(crate) fn check_totals(available: &[i64], allocation: &[Vec<i64>]) -> Result<(), InputError> {
    for (resource, &free) in available.iter().enumerate() {
        allocation
            .iter()
            .try_fold(free, |total, row| total.checked_add(row[resource]))
            .ok_or(InputError::ResourceOverflow { resource })?;
    }
    Ok(())
}
