//! High-precision refinement of an LU solution.
//!
//! The inverse (applied through the LU factors) preconditions the system:
//! `B = A⁻¹·A ≈ I` and `c = A⁻¹·b`, and Gauss-Seidel sweeps on `B x = c`
//! start from the LU solution. Convergence is judged on the root-mean-square
//! residual of the original system `A x = b`.

use dla_core::{DenseMatrix, DenseVector, DlaCoreError, Matrix, Result, Scalar};
use log::{debug, info, trace, warn};
use serde::{Deserialize, Serialize};

use crate::lu::LuPivots;
use crate::substitution::substitute;
use crate::validate;

/// Stopping rule for refinement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefinementConfig {
    /// Refinement stops once the RMS residual drops strictly below this value.
    /// The bound is absolute: for systems with large entries it has to grow with
    /// `‖A‖·‖x‖`, or refinement runs out of sweeps without improving anything.
    pub tolerance: f64,
    /// Maximum number of Gauss-Seidel sweeps.
    pub max_iterations: usize,
}

impl Default for RefinementConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-14,
            max_iterations: 100,
        }
    }
}

impl RefinementConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }
}

/// Outcome of a successful refinement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefinementInfo {
    /// Gauss-Seidel sweeps performed (0 if the starting point already met the tolerance).
    pub iterations: usize,
    /// RMS residual of the starting point.
    pub initial_residual: f64,
    /// RMS residual of the returned solution.
    pub residual: f64,
}

/// Root-mean-square residual `sqrt(Σ (A x - b)_i² / n)`. Zero for an empty system.
///
/// `a` must be dense, `b` must have one entry per row and `x` one per column.
pub fn rms_residual<M: Matrix>(
    a: &M,
    x: &DenseVector<M::Value>,
    b: &DenseVector<M::Value>,
) -> Result<M::Value> {
    let a = validate::check_dense(a)?;
    validate::check_dims(a, b)?;
    validate::check_cols(a, x)?;
    Ok(rms(a, x.as_slice(), b.as_slice()))
}

fn rms<T: Scalar>(a: &DenseMatrix<T>, x: &[T], b: &[T]) -> T {
    let n = b.len();
    if n == 0 {
        return T::zero();
    }
    let sum = (0..n).fold(T::zero(), |acc, i| {
        let r = a.mult_row(x, i) - b[i];
        acc + r * r
    });
    let n: T = num_traits::cast(n).unwrap_or_else(T::one);
    (sum / n).sqrt()
}

/// Refines `x` in place. On entry `x` holds the starting solution (normally the
/// LU solution of `a x = b`); on success it holds a solution whose RMS residual is
/// below `config.tolerance`.
///
/// Fails with `RefinementDidNotConverge` after `config.max_iterations` sweeps, or
/// as soon as the residual stops being finite. `x` then holds the last iterate.
pub fn refine<A, L>(
    a: &A,
    lu: &L,
    pivots: &LuPivots<A::Value>,
    b: &DenseVector<A::Value>,
    x: &mut DenseVector<A::Value>,
    config: &RefinementConfig,
) -> Result<RefinementInfo>
where
    A: Matrix,
    L: Matrix<Value = A::Value>,
{
    let a = validate::check_dense(a)?;
    let lu = validate::check_dense(lu)?;
    validate::check_square(lu)?;
    validate::check_square(a)?;
    validate::check_dims(lu, b)?;
    validate::check_dims(a, &*x)?;
    validate::check_same_dims(lu, a)?;
    validate::check_pivots(lu, pivots)?;

    refine_dense(
        a,
        lu,
        pivots.permutation(),
        b.as_slice(),
        x.as_mut_slice(),
        config,
    )
}

fn refine_dense<T: Scalar>(
    a: &DenseMatrix<T>,
    lu: &DenseMatrix<T>,
    permutation: &[usize],
    b: &[T],
    x: &mut [T],
    config: &RefinementConfig,
) -> Result<RefinementInfo> {
    let n = b.len();
    let tolerance = config.tolerance;

    let initial_residual = to_f64(rms(a, x, b));
    debug!(
        "Refining {}-unknown solution: initial residual {:e}, tolerance {:e}",
        n, initial_residual, tolerance
    );
    if initial_residual < tolerance {
        info!("LU solution already within tolerance; no refinement needed.");
        return Ok(RefinementInfo {
            iterations: 0,
            initial_residual,
            residual: initial_residual,
        });
    }

    let (preconditioned, c) = precondition(a, lu, permutation, b);

    let mut residual = initial_residual;
    for iteration in 1..=config.max_iterations {
        gauss_seidel_sweep(&preconditioned, &c, x);
        residual = to_f64(rms(a, x, b));
        trace!("Refinement sweep {}: residual = {:e}", iteration, residual);

        if !residual.is_finite() {
            warn!("Refinement diverged at sweep {} (residual {})", iteration, residual);
            return Err(DlaCoreError::RefinementDidNotConverge {
                iterations: iteration,
                residual,
            });
        }
        if residual < tolerance {
            info!(
                "Refinement converged in {} sweeps (residual {:e} -> {:e})",
                iteration, initial_residual, residual
            );
            return Ok(RefinementInfo {
                iterations: iteration,
                initial_residual,
                residual,
            });
        }
    }

    warn!(
        "Refinement reached maximum iterations ({}) without converging (residual {:e})",
        config.max_iterations, residual
    );
    Err(DlaCoreError::RefinementDidNotConverge {
        iterations: config.max_iterations,
        residual,
    })
}

/// Builds `B = A⁻¹·A` column by column and `c = A⁻¹·b`, both through the LU factors.
fn precondition<T: Scalar>(
    a: &DenseMatrix<T>,
    lu: &DenseMatrix<T>,
    permutation: &[usize],
    b: &[T],
) -> (DenseMatrix<T>, Vec<T>) {
    let n = b.len();
    let mut preconditioned = DenseMatrix::zeros(n, n);
    let mut column = vec![T::zero(); n];
    for j in 0..n {
        for (i, v) in column.iter_mut().enumerate() {
            *v = a[(i, j)];
        }
        substitute(lu, permutation, &mut column);
        for (i, &v) in column.iter().enumerate() {
            preconditioned[(i, j)] = v;
        }
    }

    let mut c = b.to_vec();
    substitute(lu, permutation, &mut c);
    (preconditioned, c)
}

/// One sequential sweep: each update uses the values already refreshed in this sweep.
fn gauss_seidel_sweep<T: Scalar>(b: &DenseMatrix<T>, c: &[T], x: &mut [T]) {
    for i in 0..x.len() {
        let row = b.row(i);
        let mut sum = c[i];
        for (j, (&b_ij, &x_j)) in row.iter().zip(x.iter()).enumerate() {
            if j != i {
                sum -= b_ij * x_j;
            }
        }
        x[i] = sum / row[i];
    }
}

fn to_f64<T: Scalar>(value: T) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lu::LuFactors;
    use approx::assert_relative_eq;

    fn system() -> (DenseMatrix<f64>, DenseVector<f64>) {
        let a = DenseMatrix::from_rows(&[
            vec![4.0, -1.0, 0.0],
            vec![-1.0, 4.0, -1.0],
            vec![0.0, -1.0, 4.0],
        ])
        .unwrap();
        (a, DenseVector::from_vec(vec![1.0, 2.0, 3.0]))
    }

    #[test]
    fn test_rms_residual() {
        let a = DenseMatrix::<f64>::identity(2);
        let x = DenseVector::from_vec(vec![1.0, 1.0]);
        let r = rms_residual(&a, &x, &DenseVector::from_vec(vec![4.0, -3.0])).unwrap();
        // residuals -3 and 4: sqrt((9 + 16) / 2)
        assert_relative_eq!(r, (12.5_f64).sqrt(), epsilon = 1e-15);

        let empty = DenseMatrix::<f64>::zeros(0, 0);
        let r = rms_residual(&empty, &DenseVector::new(0), &DenseVector::new(0)).unwrap();
        assert_eq!(r, 0.0);
    }

    #[test]
    fn test_rms_residual_rejects_mismatched_lengths() {
        let a = DenseMatrix::<f64>::identity(2);
        let ones = |n| DenseVector::from_vec(vec![1.0; n]);

        let err = rms_residual(&a, &ones(2), &ones(3)).unwrap_err();
        assert!(matches!(err, DlaCoreError::DimensionMismatch(_)));

        let a = DenseMatrix::from_rows(&[vec![1.0, 1.0], vec![1.0, 1.0]]).unwrap();
        let err = rms_residual(&a, &ones(1), &ones(2)).unwrap_err();
        assert!(matches!(err, DlaCoreError::DimensionMismatch(_)));
    }

    #[test]
    fn test_rms_residual_rejects_sparse() {
        let sparse = dla_core::SparseMatrix::<f64>::new(2, 2);
        let v = DenseVector::new(2);
        assert_eq!(
            rms_residual(&sparse, &v, &v).unwrap_err(),
            DlaCoreError::NotDense(dla_core::StorageKind::Sparse)
        );
    }

    #[test]
    fn test_refine_recovers_from_perturbed_start() {
        let (a, b) = system();
        let factors = LuFactors::from_matrix(&a).unwrap();
        let exact = factors.solve(&b).unwrap();

        let mut x = DenseVector::from_vec(exact.iter().map(|v| v + 1e-3).collect());
        let config = RefinementConfig::with_params(1e-12, 50);
        let info = refine(&a, factors.lu(), factors.pivots(), &b, &mut x, &config).unwrap();

        assert!(info.iterations >= 1);
        assert!(info.iterations <= 50);
        assert!(info.residual < 1e-12);
        assert!(info.initial_residual > info.residual);
        for i in 0..3 {
            assert_relative_eq!(x[i], exact[i], epsilon = 1e-10);
        }
    }

    #[test]
    fn test_refine_skips_sweeps_when_already_converged() {
        let a = DenseMatrix::<f64>::identity(2);
        let b = DenseVector::from_vec(vec![1.0, 2.0]);
        let factors = LuFactors::from_matrix(&a).unwrap();
        let mut x = b.clone();
        let info = refine(
            &a,
            factors.lu(),
            factors.pivots(),
            &b,
            &mut x,
            &RefinementConfig::default(),
        )
        .unwrap();
        assert_eq!(info.iterations, 0);
        assert_eq!(info.residual, 0.0);
    }

    #[test]
    fn test_refine_reports_non_convergence() {
        let (a, b) = system();
        let factors = LuFactors::from_matrix(&a).unwrap();
        let mut x = DenseVector::new(3);
        // A residual can never be strictly below zero.
        let config = RefinementConfig::with_params(0.0, 3);
        let err = refine(&a, factors.lu(), factors.pivots(), &b, &mut x, &config).unwrap_err();
        match err {
            DlaCoreError::RefinementDidNotConverge { iterations, .. } => assert_eq!(iterations, 3),
            other => panic!("Expected RefinementDidNotConverge, got {other:?}"),
        }
    }

    #[test]
    fn test_refine_rejects_mismatched_matrices() {
        let (a, b) = system();
        let other = LuFactors::new(DenseMatrix::<f64>::identity(2)).unwrap();
        let mut x = DenseVector::new(3);
        let err = refine(
            &a,
            other.lu(),
            other.pivots(),
            &b,
            &mut x,
            &RefinementConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, DlaCoreError::DimensionMismatch(_)));
    }

    #[test]
    fn test_config_defaults_and_deserialize() {
        let config = RefinementConfig::new();
        assert_eq!(config.tolerance, 1e-14);
        assert_eq!(config.max_iterations, 100);

        let parsed: RefinementConfig = serde_json::from_str(r#"{"max_iterations": 7}"#).unwrap();
        assert_eq!(parsed, RefinementConfig::with_params(1e-14, 7));
    }
}
