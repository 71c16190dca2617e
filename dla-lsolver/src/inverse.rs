use dla_core::{DenseMatrix, Matrix, Result, Scalar};
use log::debug;

use crate::lu::LuPivots;
use crate::substitution::substitute;
use crate::validate;

/// Computes the inverse from an LU factorization, one substitution per column
/// of the identity.
pub fn invert_with_factors<M: Matrix>(
    lu: &M,
    pivots: &LuPivots<M::Value>,
) -> Result<DenseMatrix<M::Value>> {
    let mut ainv = DenseMatrix::default();
    inverse_into(lu, pivots, &mut ainv)?;
    Ok(ainv)
}

/// Like [`invert_with_factors`], writing into `ainv`, which is reinitialized to `n x n`.
pub fn inverse_into<M: Matrix>(
    lu: &M,
    pivots: &LuPivots<M::Value>,
    ainv: &mut DenseMatrix<M::Value>,
) -> Result<()> {
    let lu = validate::check_dense(lu)?;
    validate::check_square(lu)?;
    validate::check_pivots(lu, pivots)?;

    debug!("Inverting {}x{} matrix from LU factors", lu.rows(), lu.cols());
    fill_inverse(lu, pivots.permutation(), ainv);
    Ok(())
}

fn fill_inverse<T: Scalar>(lu: &DenseMatrix<T>, permutation: &[usize], ainv: &mut DenseMatrix<T>) {
    let n = lu.rows();
    ainv.init(n, n);

    let mut column = vec![T::zero(); n];
    for j in 0..n {
        column.fill(T::zero());
        column[j] = T::one();
        substitute(lu, permutation, &mut column);
        for (i, &v) in column.iter().enumerate() {
            ainv[(i, j)] = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lu::LuFactors;
    use approx::assert_relative_eq;

    #[test]
    fn test_inverse_of_diagonal_is_exact() {
        let mut a = DenseMatrix::<f64>::identity(3);
        for i in 0..3 {
            a[(i, i)] = 2.0;
        }
        let ainv = LuFactors::new(a).unwrap().inverse().unwrap();
        let expected = DenseMatrix::from_rows(&[
            vec![0.5, 0.0, 0.0],
            vec![0.0, 0.5, 0.0],
            vec![0.0, 0.0, 0.5],
        ])
        .unwrap();
        assert_eq!(ainv, expected);
    }

    #[test]
    fn test_inverse_times_matrix_is_identity() {
        let a = DenseMatrix::from_rows(&[
            vec![0.0, 2.0, 1.0],
            vec![1.0, 1.0, 0.0],
            vec![3.0, 0.0, 1.0],
        ])
        .unwrap();
        let ainv = LuFactors::from_matrix(&a).unwrap().inverse().unwrap();
        let product = a.mul_mat(&ainv).unwrap();
        let identity = DenseMatrix::<f64>::identity(3);
        for (p, e) in product.data().iter().zip(identity.data()) {
            assert_relative_eq!(*p, *e, epsilon = 1e-13);
        }
    }

    #[test]
    fn test_inverse_into_reshapes_output() {
        let factors = LuFactors::new(DenseMatrix::<f64>::identity(2)).unwrap();
        let mut ainv = DenseMatrix::zeros(4, 1);
        inverse_into(factors.lu(), factors.pivots(), &mut ainv).unwrap();
        assert_eq!(ainv, DenseMatrix::identity(2));
    }
}
