//! Forward/back substitution against a combined LU buffer.

use dla_core::{DenseMatrix, DenseVector, Matrix, Result, Scalar};
use log::debug;

use crate::lu::LuPivots;
use crate::validate;

/// Solves `A x = b` given the LU factors of `A` and their pivots.
///
/// The factors are left untouched, so the same factorization can serve any
/// number of right-hand sides.
pub fn solve_with_factors<M: Matrix>(
    lu: &M,
    pivots: &LuPivots<M::Value>,
    b: &DenseVector<M::Value>,
) -> Result<DenseVector<M::Value>> {
    let mut x = DenseVector::default();
    solve_into(lu, pivots, &mut x, b)?;
    Ok(x)
}

/// Like [`solve_with_factors`], writing into `x`, which is reinitialized to the
/// system dimension.
pub fn solve_into<M: Matrix>(
    lu: &M,
    pivots: &LuPivots<M::Value>,
    x: &mut DenseVector<M::Value>,
    b: &DenseVector<M::Value>,
) -> Result<()> {
    let lu = validate::check_dense(lu)?;
    validate::check_square(lu)?;
    validate::check_dims(lu, b)?;
    validate::check_pivots(lu, pivots)?;

    let n = lu.rows();
    debug!("Substitution solve for {} unknowns", n);
    x.init(n);
    x.as_mut_slice().copy_from_slice(b.as_slice());
    substitute(lu, pivots.permutation(), x.as_mut_slice());
    Ok(())
}

/// In-place substitution: `x` enters as the right-hand side and leaves as the solution.
/// Inputs are assumed validated.
pub(crate) fn substitute<T: Scalar>(lu: &DenseMatrix<T>, permutation: &[usize], x: &mut [T]) {
    let n = x.len();

    // Forward phase. Unscrambles the permutation as it goes and skips the
    // leading run of zeros in the permuted right-hand side.
    let mut first_nonzero: Option<usize> = None;
    for i in 0..n {
        let ip = permutation[i];
        let mut sum = x[ip];
        x[ip] = x[i];
        match first_nonzero {
            Some(start) => {
                let row = lu.row(i);
                for j in start..i {
                    sum -= row[j] * x[j];
                }
            }
            None if sum != T::zero() => first_nonzero = Some(i),
            None => {}
        }
        x[i] = sum;
    }

    // Backward phase.
    for i in (0..n).rev() {
        let row = lu.row(i);
        let mut sum = x[i];
        for j in (i + 1)..n {
            sum -= row[j] * x[j];
        }
        x[i] = sum / row[i];
    }
}
