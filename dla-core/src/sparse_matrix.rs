use crate::error::{DlaCoreError, Result};
use crate::matrix::DenseMatrix;
use crate::traits::{Matrix, Scalar, StorageKind};

/// Represents a sparse matrix in Compressed Sparse Row (CSR) format on the CPU.
///
/// The direct solver only works on dense storage; convert with [`SparseMatrix::to_dense`]
/// before solving.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix<T: Scalar> {
    /// Number of rows.
    rows: usize,
    /// Number of columns.
    cols: usize,
    /// Vector containing the non-zero values of the matrix.
    pub(crate) values: Vec<T>,
    /// Vector containing the column indices corresponding to the values.
    pub(crate) col_indices: Vec<usize>,
    /// Vector containing the pointers to the start of each row in `values` and `col_indices`.
    /// The length of this vector is `rows + 1`. `row_ptr[i]` gives the index in `values`
    /// where row `i` starts, and `row_ptr[rows]` gives the total number of non-zero elements (nnz).
    pub(crate) row_ptr: Vec<usize>,
}

impl<T: Scalar> SparseMatrix<T> {
    /// Creates a new empty SparseMatrix with given dimensions.
    pub fn new(rows: usize, cols: usize) -> Self {
        SparseMatrix {
            rows,
            cols,
            values: Vec::new(),
            col_indices: Vec::new(),
            row_ptr: vec![0; rows + 1],
        }
    }

    pub fn from_triplets(rows: usize, cols: usize, triplets: Vec<Triplete<T>>) -> Result<Self> {
        // Sort the triplets by row and then by column
        let mut coords = triplets;
        coords.sort_unstable_by_key(|t| (t.row, t.col));

        // Count non-zeros per row
        let mut row_ptr = vec![0usize; rows + 1];
        for t in &coords {
            if t.row >= rows {
                return Err(DlaCoreError::InvalidDimensions(
                    "Row index out of bounds".to_string(),
                ));
            }
            if t.col >= cols {
                return Err(DlaCoreError::InvalidDimensions(
                    "Column index out of bounds".to_string(),
                ));
            }
            row_ptr[t.row + 1] += 1;
        }
        // Convert counts to cumulative row pointers
        for i in 1..=rows {
            row_ptr[i] += row_ptr[i - 1];
        }

        let values = coords.iter().map(|t| t.value).collect();
        let col_indices = coords.iter().map(|t| t.col).collect();

        Ok(SparseMatrix {
            rows,
            cols,
            values,
            col_indices,
            row_ptr,
        })
    }

    /// Creates a SparseMatrix from CSR components.
    /// Performs basic validation.
    pub fn from_csr(
        rows: usize,
        cols: usize,
        values: Vec<T>,
        col_indices: Vec<usize>,
        row_ptr: Vec<usize>,
    ) -> Result<Self> {
        if row_ptr.len() != rows + 1 {
            return Err(DlaCoreError::InvalidDimensions(
                "row_ptr length must be rows + 1".to_string(),
            ));
        }
        if values.len() != col_indices.len() {
            return Err(DlaCoreError::InvalidDimensions(
                "values and col_indices must have the same length".to_string(),
            ));
        }
        if row_ptr.last() != Some(&values.len()) {
            return Err(DlaCoreError::InvalidDimensions(
                "Last element of row_ptr must equal the number of non-zero values".to_string(),
            ));
        }
        if row_ptr.windows(2).any(|w| w[0] > w[1]) {
            return Err(DlaCoreError::InvalidDimensions(
                "row_ptr must be non-decreasing".to_string(),
            ));
        }
        if col_indices.iter().any(|&c| c >= cols) {
            return Err(DlaCoreError::InvalidDimensions(
                "Column index out of bounds".to_string(),
            ));
        }

        Ok(SparseMatrix {
            rows,
            cols,
            values,
            col_indices,
            row_ptr,
        })
    }

    /// Returns the number of non-zero elements.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Returns a slice containing the non-zero values.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Returns a slice containing the column indices.
    pub fn col_indices(&self) -> &[usize] {
        &self.col_indices
    }

    /// Returns a slice containing the row pointers.
    pub fn row_ptr(&self) -> &[usize] {
        &self.row_ptr
    }

    /// Expands the matrix into dense storage. Duplicate entries are summed.
    pub fn to_dense(&self) -> DenseMatrix<T> {
        let mut dense = DenseMatrix::zeros(self.rows, self.cols);
        for row in 0..self.rows {
            for idx in self.row_ptr[row]..self.row_ptr[row + 1] {
                dense[(row, self.col_indices[idx])] += self.values[idx];
            }
        }
        dense
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triplete<T> {
    row: usize,
    col: usize,
    value: T,
}

impl<T: Copy> Triplete<T> {
    pub fn new(row: usize, col: usize, value: T) -> Self {
        Triplete { row, col, value }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn value(&self) -> T {
        self.value
    }
}

impl<T: Scalar> Matrix for SparseMatrix<T> {
    type Value = T;

    fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    fn storage_kind(&self) -> StorageKind {
        StorageKind::Sparse
    }

    /// Gets the value at a specific row and column.
    /// Entries not stored are reported as zero; out-of-bounds indices give None.
    fn get(&self, row: usize, col: usize) -> Option<T> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        let row_start = self.row_ptr[row];
        let row_end = self.row_ptr[row + 1];
        let value = (row_start..row_end)
            .filter(|&i| self.col_indices[i] == col)
            .fold(T::zero(), |acc, i| acc + self.values[i]);
        Some(value)
    }
}
