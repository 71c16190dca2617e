use thiserror::Error;

use crate::traits::StorageKind;

pub type Result<T> = core::result::Result<T, DlaCoreError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DlaCoreError {
    #[error("Matrix must be dense to use the direct solver (found {0:?} storage). Consider converting with to_dense().")]
    NotDense(StorageKind),

    #[error("Matrix is not square ({rows}x{cols})")]
    NotSquare { rows: usize, cols: usize },

    #[error("Non-matching dimensions: {0}")]
    DimensionMismatch(String),

    #[error("Matrix is singular: row {row} has no nonzero entries")]
    SingularMatrix { row: usize },

    #[error("Refinement did not converge after {iterations} iterations (residual {residual:e})")]
    RefinementDidNotConverge { iterations: usize, residual: f64 },

    // Malformed constructor input: buffer lengths, CSR structure, ragged rows.
    #[error("Invalid matrix dimensions: {0}")]
    InvalidDimensions(String),
}
