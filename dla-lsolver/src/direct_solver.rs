use dla_core::{DenseMatrix, DenseVector, Matrix, Result};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::lu::{self, LuFactors, LuPivots};
use crate::refine::{self, RefinementConfig, RefinementInfo};
use crate::{inverse, substitution, validate};

/// Direct solver for dense linear systems.
///
/// `solve`, `invert` and `factorize` overwrite the caller's matrix with its LU
/// factors. `hp_solve` works on a private copy and leaves the matrix intact.
/// Every entry point validates its arguments before touching any buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectSolver {
    #[serde(default)]
    pub refinement: RefinementConfig,
}

impl DirectSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(refinement: RefinementConfig) -> Self {
        Self { refinement }
    }

    /// Solves `A x = b`, leaving the LU factors of `A` in `a`.
    pub fn solve<M: Matrix>(
        &self,
        a: &mut M,
        x: &mut DenseVector<M::Value>,
        b: &DenseVector<M::Value>,
    ) -> Result<()> {
        let a = validate::check_dense_mut(a)?;
        validate::check_square(&*a)?;
        validate::check_dims(&*a, b)?;

        let pivots = lu::factorize(a)?;
        substitution::solve_into(&*a, &pivots, x, b)
    }

    /// Solves `A x = b` to high precision: LU on a copy of `A`, then refinement
    /// against the untouched original.
    pub fn hp_solve<M: Matrix>(
        &self,
        a: &M,
        x: &mut DenseVector<M::Value>,
        b: &DenseVector<M::Value>,
    ) -> Result<RefinementInfo> {
        let a = validate::check_dense(a)?;
        validate::check_square(a)?;
        validate::check_dims(a, b)?;

        let factors = LuFactors::from_matrix(a)?;
        factors.solve_into(x, b)?;
        debug!("LU solution computed; starting refinement");
        refine::refine(a, factors.lu(), factors.pivots(), b, x, &self.refinement)
    }

    /// Computes the inverse of `A` into `ainv`, leaving the LU factors of `A` in `a`.
    pub fn invert<M: Matrix>(&self, a: &mut M, ainv: &mut DenseMatrix<M::Value>) -> Result<()> {
        let a = validate::check_dense_mut(a)?;
        validate::check_square(&*a)?;

        let pivots = lu::factorize(a)?;
        inverse::inverse_into(&*a, &pivots, ainv)
    }

    /// Factorizes `A` in place. The returned pivots stay valid until `a` is modified.
    pub fn factorize<M: Matrix>(&self, a: &mut M) -> Result<LuPivots<M::Value>> {
        let a = validate::check_dense_mut(a)?;
        lu::factorize(a)
    }

    /// Solves against factors produced by [`DirectSolver::factorize`].
    pub fn solve_with_factors<M: Matrix>(
        &self,
        lu: &M,
        pivots: &LuPivots<M::Value>,
        b: &DenseVector<M::Value>,
    ) -> Result<DenseVector<M::Value>> {
        substitution::solve_with_factors(lu, pivots, b)
    }

    /// Inverse from factors produced by [`DirectSolver::factorize`].
    pub fn invert_with_factors<M: Matrix>(
        &self,
        lu: &M,
        pivots: &LuPivots<M::Value>,
    ) -> Result<DenseMatrix<M::Value>> {
        inverse::invert_with_factors(lu, pivots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use dla_core::{DlaCoreError, SparseMatrix, StorageKind, Vector};

    #[test]
    fn test_solve_overwrites_matrix_with_factors() {
        let mut a = DenseMatrix::from_rows(&[vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        let mut x = DenseVector::default();
        DirectSolver::new()
            .solve(&mut a, &mut x, &DenseVector::from_vec(vec![1.0, 2.0]))
            .unwrap();
        assert_relative_eq!(x[0], 2.0, epsilon = 1e-15);
        assert_relative_eq!(x[1], 1.0, epsilon = 1e-15);
        assert_eq!(a.data(), &[1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_hp_solve_leaves_matrix_intact() {
        let a = DenseMatrix::from_rows(&[vec![2.0, 1.0], vec![1.0, 3.0]]).unwrap();
        let original = a.clone();
        let mut x = DenseVector::default();
        let info = DirectSolver::new()
            .hp_solve(&a, &mut x, &DenseVector::from_vec(vec![3.0, 5.0]))
            .unwrap();
        assert!(info.residual < 1e-14);
        assert_relative_eq!(x[0], 0.8, epsilon = 1e-14);
        assert_relative_eq!(x[1], 1.4, epsilon = 1e-14);
        assert_eq!(a, original);
    }

    #[test]
    fn test_hp_solve_stops_on_non_finite_residual() {
        // Rank-deficient: the floored pivot blows the LU solution up and the
        // first sweep overflows.
        let a = DenseMatrix::from_rows(&[vec![1.0, 1.0], vec![1.0, 1.0]]).unwrap();
        let mut x = DenseVector::default();
        let err = DirectSolver::new()
            .hp_solve(&a, &mut x, &DenseVector::from_vec(vec![1.0, 2.0]))
            .unwrap_err();
        match err {
            DlaCoreError::RefinementDidNotConverge {
                iterations,
                residual,
            } => {
                assert_eq!(iterations, 1);
                assert!(!residual.is_finite());
            }
            other => panic!("Expected RefinementDidNotConverge, got {other:?}"),
        }
        assert_eq!(x.len(), 2);
    }

    #[test]
    fn test_factorize_then_reuse() {
        let mut a = DenseMatrix::from_rows(&[vec![3.0, 2.0], vec![1.0, 2.0]]).unwrap();
        let solver = DirectSolver::new();
        let pivots = solver.factorize(&mut a).unwrap();

        let x = solver
            .solve_with_factors(&a, &pivots, &DenseVector::from_vec(vec![5.0, 3.0]))
            .unwrap();
        assert_relative_eq!(x[0], 1.0, epsilon = 1e-14);
        assert_relative_eq!(x[1], 1.0, epsilon = 1e-14);

        let ainv = solver.invert_with_factors(&a, &pivots).unwrap();
        assert_relative_eq!(ainv[(0, 0)], 0.5, epsilon = 1e-14);
        assert_relative_eq!(ainv[(0, 1)], -0.5, epsilon = 1e-14);
        assert_relative_eq!(ainv[(1, 0)], -0.25, epsilon = 1e-14);
        assert_relative_eq!(ainv[(1, 1)], 0.75, epsilon = 1e-14);
    }

    #[test]
    fn test_validation_precedes_mutation() {
        let solver = DirectSolver::new();
        let mut a = DenseMatrix::from_rows(&[vec![2.0, 1.0], vec![1.0, 3.0]]).unwrap();
        let original = a.clone();
        let mut x = DenseVector::from_vec(vec![7.0]);
        let err = solver
            .solve(&mut a, &mut x, &DenseVector::new(3))
            .unwrap_err();
        assert!(matches!(err, DlaCoreError::DimensionMismatch(_)));
        assert_eq!(a, original);
        assert_eq!(x.as_slice(), &[7.0]);
    }

    #[test]
    fn test_sparse_matrix_rejected_everywhere() {
        let solver = DirectSolver::new();
        let mut sparse = SparseMatrix::<f64>::new(2, 2);
        let b = DenseVector::new(2);
        let mut x = DenseVector::default();
        let expected = DlaCoreError::NotDense(StorageKind::Sparse);

        assert_eq!(solver.solve(&mut sparse, &mut x, &b).unwrap_err(), expected);
        assert_eq!(solver.hp_solve(&sparse, &mut x, &b).unwrap_err(), expected);
        assert_eq!(solver.factorize(&mut sparse).unwrap_err(), expected);
        assert_eq!(
            solver.invert(&mut sparse, &mut DenseMatrix::default()).unwrap_err(),
            expected
        );
    }

    #[test]
    fn test_config_from_json() {
        let solver: DirectSolver =
            serde_json::from_str(r#"{"refinement": {"tolerance": 1e-10, "max_iterations": 20}}"#)
                .unwrap();
        assert_eq!(
            solver,
            DirectSolver::with_config(RefinementConfig::with_params(1e-10, 20))
        );
        let solver: DirectSolver = serde_json::from_str("{}").unwrap();
        assert_eq!(solver, DirectSolver::new());
    }
}
