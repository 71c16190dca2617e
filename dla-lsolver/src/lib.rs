//! `dla-lsolver`: A direct solver for dense linear systems.
//!
//! LU factorization with scaled partial pivoting, forward/back substitution,
//! inversion through repeated substitution, and a high-precision mode that
//! refines the LU solution with inverse-preconditioned Gauss-Seidel iteration.

pub mod algorithms;
pub mod direct_solver;
pub mod inverse;
pub mod lu;
pub mod refine;
pub mod substitution;
pub mod validate;

pub use direct_solver::DirectSolver;
pub use inverse::invert_with_factors;
pub use lu::{factorize, LuFactors, LuPivots, PIVOT_FLOOR};
pub use refine::{refine, rms_residual, RefinementConfig, RefinementInfo};
pub use substitution::solve_with_factors;

// Re-export from dla_core
pub use dla_core::{
    DenseMatrix, DenseVector, DlaCoreError, Matrix, Result, Scalar, SparseMatrix, StorageKind,
    Triplete, Vector,
};
