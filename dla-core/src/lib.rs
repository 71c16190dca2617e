//! # Dense Linear Algebra Core
//!
//! Provides the matrix and vector types, storage-kind tagging and the shared
//! error type used by the direct solver.

pub mod error;
pub mod matrix;
pub mod sparse_matrix;
pub mod traits;
pub mod vector;

// Re-export public types
pub use error::{DlaCoreError, Result};
pub use matrix::DenseMatrix;
pub use sparse_matrix::{SparseMatrix, Triplete};
pub use vector::DenseVector;

pub use traits::{Matrix, Scalar, StorageKind, Vector};
