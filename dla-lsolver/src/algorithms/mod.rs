use dla_core::{DlaCoreError, Matrix, Result, Scalar};
use serde::{Deserialize, Serialize};

use crate::refine::RefinementConfig;
use crate::validate;

#[derive(Debug, Clone)]
pub struct SolveResult<V: Scalar, M> {
    pub x: Vec<V>,   // Solution vector
    pub metadata: M, // Metadata about the solve process
}

// --- Algorithm Trait Definition ---
/// Trait representing a specific linear system solving algorithm.
/// Generic over the Matrix type it accepts; implementations never mutate the input.
pub trait SolveAlgorithm<M: Matrix> {
    type Metadata: std::fmt::Debug;

    /// Solves the linear system Ax = b for x.
    ///
    /// # Arguments
    ///
    /// * `a` - The coefficient matrix A.
    /// * `b` - The right-hand side vector b.
    ///
    /// # Returns
    ///
    /// A `Result` containing the solution vector x with algorithm metadata, or a `DlaCoreError`.
    fn solve(&self, a: &M, b: &[M::Value]) -> Result<SolveResult<M::Value, Self::Metadata>>;

    // Helper for input validation, can be called by implementations.
    fn validate_inputs(&self, a: &M, b: &[M::Value]) -> Result<()> {
        validate::check_dense(a)?;
        validate::check_square(a)?;
        if a.rows() != b.len() {
            return Err(DlaCoreError::DimensionMismatch(format!(
                "Matrix A rows ({}) must match RHS vector b length ({})",
                a.rows(),
                b.len()
            )));
        }
        Ok(())
    }
}

// --- Algorithm Implementations ---

pub mod dense_lu; // Plain LU with partial pivoting
pub mod dense_lu_refined; // LU followed by Gauss-Seidel refinement

// --- Algorithm Struct Definitions ---

/// LU factorization with scaled partial pivoting and substitution.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenseLu;

impl DenseLu {
    pub fn new() -> Self {
        Self
    }
}

/// LU solve refined by inverse-preconditioned Gauss-Seidel iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefinedDenseLu {
    /// Absolute bound on the RMS residual; see [`RefinementConfig::tolerance`].
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for RefinedDenseLu {
    fn default() -> Self {
        let config = RefinementConfig::default();
        Self {
            tolerance: config.tolerance,
            max_iterations: config.max_iterations,
        }
    }
}

impl RefinedDenseLu {
    /// Creates a new instance with default parameters.
    pub fn new() -> Self {
        Self::default()
    }
    /// Creates a new instance with specified parameters.
    pub fn with_params(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    pub fn config(&self) -> RefinementConfig {
        RefinementConfig::with_params(self.tolerance, self.max_iterations)
    }
}
