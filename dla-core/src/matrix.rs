use std::ops::{Index, IndexMut};

use crate::error::{DlaCoreError, Result};
use crate::traits::{Matrix, Scalar, StorageKind, Vector};
use crate::vector::DenseVector;

/// Represents a dense matrix stored in row-major order on the CPU.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DenseMatrix<T: Scalar> {
    rows: usize,
    cols: usize,
    data: Vec<T>, // Data stored row-major: data[row * cols + col]
}

impl<T: Scalar> DenseMatrix<T> {
    /// Creates a new DenseMatrix from raw data, dimensions, assuming row-major order.
    pub fn new(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(DlaCoreError::InvalidDimensions(format!(
                "Data length ({}) does not match dimensions ({}x{})",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// Creates a new DenseMatrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![T::zero(); rows * cols],
        }
    }

    /// Creates the `n x n` identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = T::one();
        }
        m
    }

    /// Creates a DenseMatrix from a slice of rows. All rows must have the same length.
    pub fn from_rows(rows: &[Vec<T>]) -> Result<Self> {
        let cols = rows.first().map_or(0, |row| row.len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (r, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(DlaCoreError::InvalidDimensions(format!(
                    "Row {} has length {}, expected {}",
                    r,
                    row.len(),
                    cols
                )));
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Reinitializes the matrix to `rows x cols` zeros, reusing the allocation.
    pub fn init(&mut self, rows: usize, cols: usize) {
        self.rows = rows;
        self.cols = cols;
        self.data.clear();
        self.data.resize(rows * cols, T::zero());
    }

    /// Returns a slice view of the underlying data vector.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Returns a mutable slice view of the underlying data vector.
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Gets the element at the specified row and column (immutable).
    /// Returns None if indices are out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.rows && col < self.cols {
            self.data.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// Gets the element at the specified row and column (mutable).
    /// Returns None if indices are out of bounds.
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        if row < self.rows && col < self.cols {
            self.data.get_mut(row * self.cols + col)
        } else {
            None
        }
    }

    /// Row `i` as a slice.
    pub fn row(&self, i: usize) -> &[T] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Swaps two full rows in place.
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let (head, tail) = self.data.split_at_mut(hi * self.cols);
        head[lo * self.cols..(lo + 1) * self.cols].swap_with_slice(&mut tail[..self.cols]);
    }

    /// Dot product of row `i` with `x`. `x` must have `cols` entries.
    pub fn mult_row(&self, x: &[T], i: usize) -> T {
        self.row(i)
            .iter()
            .zip(x)
            .fold(T::zero(), |acc, (&a, &b)| acc + a * b)
    }

    /// Matrix-vector product `self * x`.
    pub fn mul_vec(&self, x: &DenseVector<T>) -> Result<DenseVector<T>> {
        if x.len() != self.cols {
            return Err(DlaCoreError::DimensionMismatch(format!(
                "Matrix columns ({}) must match vector length ({})",
                self.cols,
                x.len()
            )));
        }
        Ok(DenseVector::from_vec(
            (0..self.rows)
                .map(|i| self.mult_row(x.as_slice(), i))
                .collect(),
        ))
    }

    /// Matrix-matrix product `self * other`.
    pub fn mul_mat(&self, other: &DenseMatrix<T>) -> Result<DenseMatrix<T>> {
        if self.cols != other.rows {
            return Err(DlaCoreError::DimensionMismatch(format!(
                "Cannot multiply {}x{} by {}x{}",
                self.rows, self.cols, other.rows, other.cols
            )));
        }
        let mut out = DenseMatrix::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a_ik = self[(i, k)];
                if a_ik == T::zero() {
                    continue;
                }
                for j in 0..other.cols {
                    out.data[i * other.cols + j] += a_ik * other[(k, j)];
                }
            }
        }
        Ok(out)
    }

    /// Maximum absolute row sum.
    pub fn norm_inf(&self) -> T {
        (0..self.rows)
            .map(|i| self.row(i).iter().fold(T::zero(), |acc, v| acc + v.abs()))
            .fold(T::zero(), T::max)
    }
}

impl<T: Scalar> Index<(usize, usize)> for DenseMatrix<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(
            row < self.rows && col < self.cols,
            "index ({}, {}) out of bounds for {}x{} matrix",
            row,
            col,
            self.rows,
            self.cols
        );
        &self.data[row * self.cols + col]
    }
}

impl<T: Scalar> IndexMut<(usize, usize)> for DenseMatrix<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        assert!(
            row < self.rows && col < self.cols,
            "index ({}, {}) out of bounds for {}x{} matrix",
            row,
            col,
            self.rows,
            self.cols
        );
        &mut self.data[row * self.cols + col]
    }
}

// Implement the generic Matrix trait
impl<T: Scalar> Matrix for DenseMatrix<T> {
    type Value = T;

    fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    fn storage_kind(&self) -> StorageKind {
        StorageKind::Dense
    }

    fn get(&self, row: usize, col: usize) -> Option<T> {
        DenseMatrix::get(self, row, col).copied()
    }

    fn as_dense(&self) -> Option<&DenseMatrix<T>> {
        Some(self)
    }

    fn as_dense_mut(&mut self) -> Option<&mut DenseMatrix<T>> {
        Some(self)
    }
}
