//! Precondition checks run by every public entry point before any buffer is touched.

use dla_core::{DenseMatrix, DlaCoreError, Matrix, Result, Scalar, Vector};

use crate::lu::LuPivots;

/// Returns the dense view of `a`, or `NotDense` if it uses another storage kind.
pub fn check_dense<M: Matrix>(a: &M) -> Result<&DenseMatrix<M::Value>> {
    let kind = a.storage_kind();
    a.as_dense().ok_or(DlaCoreError::NotDense(kind))
}

/// Mutable counterpart of [`check_dense`].
pub fn check_dense_mut<M: Matrix>(a: &mut M) -> Result<&mut DenseMatrix<M::Value>> {
    let kind = a.storage_kind();
    a.as_dense_mut().ok_or(DlaCoreError::NotDense(kind))
}

pub fn check_square<M: Matrix + ?Sized>(a: &M) -> Result<()> {
    let (rows, cols) = a.dims();
    if rows != cols {
        return Err(DlaCoreError::NotSquare { rows, cols });
    }
    Ok(())
}

/// Vector length must match the matrix dimension.
pub fn check_dims<M: Matrix + ?Sized, V: Vector + ?Sized>(a: &M, v: &V) -> Result<()> {
    if a.rows() != v.len() {
        return Err(DlaCoreError::DimensionMismatch(format!(
            "Matrix rows ({}) must match vector length ({})",
            a.rows(),
            v.len()
        )));
    }
    Ok(())
}

/// Vector length must match the number of matrix columns.
pub fn check_cols<M: Matrix + ?Sized, V: Vector + ?Sized>(a: &M, v: &V) -> Result<()> {
    if a.cols() != v.len() {
        return Err(DlaCoreError::DimensionMismatch(format!(
            "Matrix columns ({}) must match vector length ({})",
            a.cols(),
            v.len()
        )));
    }
    Ok(())
}

/// Two matrices combined in one operation must agree in both dimensions.
pub fn check_same_dims<A: Matrix + ?Sized, B: Matrix + ?Sized>(a: &A, b: &B) -> Result<()> {
    if a.dims() != b.dims() {
        let (ar, ac) = a.dims();
        let (br, bc) = b.dims();
        return Err(DlaCoreError::DimensionMismatch(format!(
            "Matrix dimensions {}x{} and {}x{} do not match",
            ar, ac, br, bc
        )));
    }
    Ok(())
}

/// Pivots must come from a factorization of the same dimension as `lu`.
pub fn check_pivots<T: Scalar>(lu: &DenseMatrix<T>, pivots: &LuPivots<T>) -> Result<()> {
    let n = lu.rows();
    if pivots.len() != n {
        return Err(DlaCoreError::DimensionMismatch(format!(
            "Permutation length ({}) must match LU dimension ({})",
            pivots.len(),
            n
        )));
    }
    if let Some(&row) = pivots.permutation().iter().find(|&&row| row >= n) {
        return Err(DlaCoreError::DimensionMismatch(format!(
            "Permutation entry {} is out of range for dimension {}",
            row, n
        )));
    }
    Ok(())
}
