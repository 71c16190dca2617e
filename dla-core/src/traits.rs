use num_traits::{Float, NumAssign};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::matrix::DenseMatrix;

/// Element type accepted by the matrices and the solver.
/// Blanket-implemented, so `f32` and `f64` qualify.
pub trait Scalar: Float + NumAssign + Debug + Default + Send + Sync + 'static {}

impl<T> Scalar for T where
    T: Float + NumAssign + Debug + Default + Send + Sync + 'static
{
}

/// Tag describing how a matrix stores its entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageKind {
    Dense,
    Sparse,
}

/// Generic trait representing a matrix.
/// Implementations can be dense or sparse; only dense storage hands out a
/// `DenseMatrix` view.
pub trait Matrix: Debug {
    /// The underlying numeric type of the matrix elements (e.g., f32, f64).
    type Value: Scalar;

    /// Returns the dimensions of the matrix as (rows, columns).
    fn dims(&self) -> (usize, usize);

    /// Returns the storage-kind tag of this matrix.
    fn storage_kind(&self) -> StorageKind;

    /// Reads the element at `(row, col)`. Returns None if out of bounds.
    fn get(&self, row: usize, col: usize) -> Option<Self::Value>;

    /// Returns the number of rows.
    fn rows(&self) -> usize {
        self.dims().0
    }

    /// Returns the number of columns.
    fn cols(&self) -> usize {
        self.dims().1
    }

    /// Checks if the matrix is square.
    fn is_square(&self) -> bool {
        let (rows, cols) = self.dims();
        rows == cols
    }

    /// Dense view of the matrix, if it is stored densely.
    fn as_dense(&self) -> Option<&DenseMatrix<Self::Value>> {
        None
    }

    /// Mutable dense view of the matrix, if it is stored densely.
    fn as_dense_mut(&mut self) -> Option<&mut DenseMatrix<Self::Value>> {
        None
    }
}

/// Generic trait representing a vector.
pub trait Vector: Debug {
    /// The underlying numeric type of the vector elements (e.g., f32, f64).
    type Value: Scalar;

    /// Returns the number of elements in the vector.
    fn len(&self) -> usize;

    /// Checks if the vector is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
