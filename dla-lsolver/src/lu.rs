//! LU factorization with scaled partial pivoting (Crout variant).
//!
//! The factorized buffer holds `L` strictly below the diagonal (unit diagonal
//! implied) and `U` on and above it, for a row permutation of the input.

use dla_core::{DenseMatrix, DenseVector, DlaCoreError, Matrix, Result, Scalar};
use log::{debug, trace, warn};

use crate::{inverse, substitution, validate};

/// Replacement for an exactly zero pivot.
///
/// Keeps substitution well-defined for a singular or near-singular matrix; the
/// resulting solution is badly conditioned rather than rejected.
pub const PIVOT_FLOOR: f64 = 1e-20;

/// Row interchanges recorded while factorizing.
///
/// Only meaningful together with the buffer it was produced from; mutating that
/// buffer afterwards invalidates it.
#[derive(Debug, Clone, PartialEq)]
pub struct LuPivots<T: Scalar> {
    /// `permutation[j]` is the row swapped into position `j` at elimination step `j`.
    permutation: Vec<usize>,
    /// +1 or -1: parity of the row interchanges.
    sign: T,
    swaps: usize,
}

impl<T: Scalar> LuPivots<T> {
    pub fn permutation(&self) -> &[usize] {
        &self.permutation
    }

    pub fn sign(&self) -> T {
        self.sign
    }

    /// Number of row interchanges performed.
    pub fn swaps(&self) -> usize {
        self.swaps
    }

    pub fn len(&self) -> usize {
        self.permutation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.permutation.is_empty()
    }
}

/// Replaces `a` by the LU factorization of a row permutation of itself.
///
/// Fails with `NotSquare`, or with `SingularMatrix` when some row is entirely
/// zero; both are detected before any entry of `a` is modified. A pivot that is
/// exactly zero after pivoting is replaced by [`PIVOT_FLOOR`].
pub fn factorize<T: Scalar>(a: &mut DenseMatrix<T>) -> Result<LuPivots<T>> {
    validate::check_square(&*a)?;
    let n = a.rows();

    let mut scaling = row_scaling(a)?;
    let floor: T = num_traits::cast(PIVOT_FLOOR).unwrap_or_else(T::min_positive_value);

    let mut permutation = vec![0usize; n];
    let mut sign = T::one();
    let mut swaps = 0;

    for j in 0..n {
        // Upper part of column j.
        for i in 0..j {
            let mut sum = a[(i, j)];
            for k in 0..i {
                sum -= a[(i, k)] * a[(k, j)];
            }
            a[(i, j)] = sum;
        }

        // Lower part of column j, tracking the best scaled pivot candidate.
        // Strict comparison: the first row reaching the maximum wins.
        let mut big = T::zero();
        let mut imax = j;
        for i in j..n {
            let mut sum = a[(i, j)];
            for k in 0..j {
                sum -= a[(i, k)] * a[(k, j)];
            }
            a[(i, j)] = sum;
            let candidate = scaling[i] * sum.abs();
            if candidate > big {
                big = candidate;
                imax = i;
            }
        }

        if imax != j {
            trace!("Pivot at column {}: swapping rows {} and {}", j, j, imax);
            a.swap_rows(imax, j);
            scaling.swap(imax, j);
            sign = -sign;
            swaps += 1;
        }
        permutation[j] = imax;

        if a[(j, j)] == T::zero() {
            warn!(
                "Zero pivot at column {}; substituting {:e}. The solution will be badly conditioned.",
                j, PIVOT_FLOOR
            );
            a[(j, j)] = floor;
        }

        if j + 1 != n {
            let inv_pivot = T::one() / a[(j, j)];
            for i in (j + 1)..n {
                a[(i, j)] *= inv_pivot;
            }
        }
    }

    debug!("LU factorization of {}x{} matrix done ({} row swaps)", n, n, swaps);

    Ok(LuPivots {
        permutation,
        sign,
        swaps,
    })
}

/// Per-row reciprocal of the largest absolute entry.
fn row_scaling<T: Scalar>(a: &DenseMatrix<T>) -> Result<Vec<T>> {
    (0..a.rows())
        .map(|i| {
            let big = a.row(i).iter().fold(T::zero(), |acc, v| acc.max(v.abs()));
            if big == T::zero() {
                Err(DlaCoreError::SingularMatrix { row: i })
            } else {
                Ok(T::one() / big)
            }
        })
        .collect()
}

/// An LU factorization owning its buffer.
///
/// Built either by consuming a matrix ([`LuFactors::new`]) or from a copy that
/// leaves the original untouched ([`LuFactors::from_matrix`]). The buffer cannot be
/// mutated afterwards, so the pivots always match it.
#[derive(Debug, Clone)]
pub struct LuFactors<T: Scalar> {
    lu: DenseMatrix<T>,
    pivots: LuPivots<T>,
}

impl<T: Scalar> LuFactors<T> {
    pub fn new(mut a: DenseMatrix<T>) -> Result<Self> {
        let pivots = factorize(&mut a)?;
        Ok(Self { lu: a, pivots })
    }

    pub fn from_matrix(a: &DenseMatrix<T>) -> Result<Self> {
        validate::check_square(a)?;
        Self::new(a.clone())
    }

    pub fn dim(&self) -> usize {
        self.lu.rows()
    }

    /// Combined L and U factors.
    pub fn lu(&self) -> &DenseMatrix<T> {
        &self.lu
    }

    pub fn pivots(&self) -> &LuPivots<T> {
        &self.pivots
    }

    pub fn permutation(&self) -> &[usize] {
        self.pivots.permutation()
    }

    pub fn sign(&self) -> T {
        self.pivots.sign()
    }

    /// Determinant of the factorized matrix: the sign times the product of the U diagonal.
    /// A floored pivot makes this tiny rather than zero.
    pub fn determinant(&self) -> T {
        (0..self.dim()).fold(self.sign(), |acc, i| acc * self.lu[(i, i)])
    }

    pub fn solve(&self, b: &DenseVector<T>) -> Result<DenseVector<T>> {
        substitution::solve_with_factors(&self.lu, &self.pivots, b)
    }

    /// Solves into `x`, reinitializing it to the system dimension.
    pub fn solve_into(&self, x: &mut DenseVector<T>, b: &DenseVector<T>) -> Result<()> {
        substitution::solve_into(&self.lu, &self.pivots, x, b)
    }

    pub fn inverse(&self) -> Result<DenseMatrix<T>> {
        inverse::invert_with_factors(&self.lu, &self.pivots)
    }

    pub fn into_parts(self) -> (DenseMatrix<T>, LuPivots<T>) {
        (self.lu, self.pivots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn matrix(rows: &[Vec<f64>]) -> DenseMatrix<f64> {
        DenseMatrix::from_rows(rows).unwrap()
    }

    #[test]
    fn test_factorize_reconstructs_permuted_matrix() {
        let a = matrix(&[
            vec![1.0, 2.0, 3.0],
            vec![4.0, 5.0, 6.0],
            vec![7.0, 8.0, 10.0],
        ]);
        let factors = LuFactors::from_matrix(&a).unwrap();
        let lu = factors.lu();
        let n = 3;

        // Apply the recorded interchanges to a copy of A.
        let mut pa = a.clone();
        for (j, &p) in factors.permutation().iter().enumerate() {
            pa.swap_rows(j, p);
        }

        for i in 0..n {
            for j in 0..n {
                let mut sum = 0.0;
                for k in 0..=i.min(j) {
                    let l = if k == i { 1.0 } else { lu[(i, k)] };
                    sum += l * lu[(k, j)];
                }
                assert_relative_eq!(sum, pa[(i, j)], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_factorize_swaps_and_sign() {
        let mut a = matrix(&[vec![0.0, 1.0], vec![1.0, 0.0]]);
        let pivots = factorize(&mut a).unwrap();
        assert_eq!(pivots.permutation(), &[1, 1]);
        assert_eq!(pivots.swaps(), 1);
        assert_eq!(pivots.sign(), -1.0);
        assert_eq!(a.data(), &[1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_factorize_tie_prefers_first_row() {
        let mut a = matrix(&[vec![1.0, 0.0], vec![1.0, 1.0]]);
        let pivots = factorize(&mut a).unwrap();
        assert_eq!(pivots.permutation(), &[0, 1]);
        assert_eq!(pivots.sign(), 1.0);
        assert_eq!(pivots.swaps(), 0);
    }

    #[test]
    fn test_factorize_zero_row_is_singular_and_untouched() {
        let mut a = matrix(&[vec![1.0, 2.0], vec![0.0, 0.0]]);
        let original = a.clone();
        assert_eq!(
            factorize(&mut a).unwrap_err(),
            DlaCoreError::SingularMatrix { row: 1 }
        );
        assert_eq!(a, original);
    }

    #[test]
    fn test_factorize_floors_zero_pivot() {
        let mut a = matrix(&[vec![1.0, 1.0], vec![1.0, 1.0]]);
        let pivots = factorize(&mut a).unwrap();
        assert_eq!(pivots.swaps(), 0);
        assert_eq!(a[(1, 1)], PIVOT_FLOOR);
    }

    #[test]
    fn test_factorize_rejects_non_square() {
        let mut a = DenseMatrix::<f64>::zeros(2, 3);
        assert_eq!(
            factorize(&mut a).unwrap_err(),
            DlaCoreError::NotSquare { rows: 2, cols: 3 }
        );
    }

    #[test]
    fn test_determinant() {
        let factors = LuFactors::new(matrix(&[vec![2.0, 1.0], vec![1.0, 3.0]])).unwrap();
        assert_relative_eq!(factors.determinant(), 5.0, epsilon = 1e-12);

        let factors = LuFactors::new(matrix(&[vec![0.0, 1.0], vec![1.0, 0.0]])).unwrap();
        assert_relative_eq!(factors.determinant(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_factorize_empty_matrix() {
        let factors = LuFactors::new(DenseMatrix::<f64>::zeros(0, 0)).unwrap();
        assert_eq!(factors.dim(), 0);
        assert!(factors.pivots().is_empty());
        assert_eq!(factors.determinant(), 1.0);
    }
}
