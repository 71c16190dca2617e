use dla_lsolver::{
    algorithms::{DenseLu, RefinedDenseLu, SolveAlgorithm},
    DirectSolver, SparseMatrix, Triplete,
};
use std::time::Instant;

/// Creates a pentadiagonal sparse matrix A of size n x n.
/// Diagonals:
/// - Main: 4.0
/// - Adjacent (+1, -1): -1.0
/// - Outer (+2, -2): -0.5
fn create_pentadiagonal_matrix(n: usize) -> SparseMatrix<f64> {
    let mut triplets = Vec::new();

    for i in 0..n {
        // Diagonal -2
        if i >= 2 {
            triplets.push(Triplete::new(i, i - 2, -0.5));
        }
        // Diagonal -1
        if i >= 1 {
            triplets.push(Triplete::new(i, i - 1, -1.0));
        }
        // Main Diagonal
        triplets.push(Triplete::new(i, i, 4.0));
        // Diagonal +1
        if i + 1 < n {
            triplets.push(Triplete::new(i, i + 1, -1.0));
        }
        // Diagonal +2
        if i + 2 < n {
            triplets.push(Triplete::new(i, i + 2, -0.5));
        }
    }

    SparseMatrix::from_triplets(n, n, triplets).expect("Failed to create sparse matrix from COO")
}

/// Creates a vector b of size n with b[i] = sin(i / n).
fn create_sin_vector(n: usize) -> Vec<f64> {
    (0..n).map(|i| (i as f64 / n as f64).sin()).collect()
}

fn main() {
    // Initialize logging based on RUST_LOG environment variable
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let n = 300;
    log::info!(
        "Setting up {}x{} pentadiagonal matrix A and sin vector b...",
        n,
        n
    );

    let sparse = create_pentadiagonal_matrix(n);
    let b = create_sin_vector(n);

    // The direct solver refuses sparse storage.
    if let Err(e) = DenseLu::new().solve(&sparse, &b) {
        log::info!("Sparse input rejected as expected: {}", e);
    }
    let a = sparse.to_dense();

    let start_time = Instant::now();
    match DenseLu::new().solve(&a, &b) {
        Ok(result) => {
            log::info!("Plain LU finished in {:?}", start_time.elapsed());
            log::info!("  Row swaps: {}", result.metadata.swaps);
            log::info!("  log10|det(A)|: {:.3}", result.metadata.determinant.abs().log10());
        }
        Err(e) => log::error!("Plain LU failed: {:?}", e),
    }

    let algorithm = RefinedDenseLu::with_params(1e-13, 50);
    log::info!("Running refined LU solver...");
    log::info!("  Tolerance: {}", algorithm.tolerance);
    log::info!("  Max Iterations: {}", algorithm.max_iterations);

    let start_time = Instant::now();
    match algorithm.solve(&a, &b) {
        Ok(result) => {
            log::info!("Refined solver finished successfully!");
            log::info!("  Sweeps: {}", result.metadata.iterations);
            log::info!(
                "  Residual: {:.6e} -> {:.6e}",
                result.metadata.initial_residual,
                result.metadata.residual
            );
            log::info!("  Time elapsed: {:?}", start_time.elapsed());
            log::debug!("Solution vector x (first 10 elements): {:?}", &result.x[..10.min(n)]);
        }
        Err(e) => log::error!("Refined solver failed: {:?}", e),
    }

    // Inverse through the facade; the matrix is overwritten with its factors.
    let mut factors = a.clone();
    let mut inverse = dla_lsolver::DenseMatrix::default();
    match DirectSolver::new().invert(&mut factors, &mut inverse) {
        Ok(()) => {
            let identity_error = a
                .mul_mat(&inverse)
                .map(|p| {
                    p.data()
                        .iter()
                        .enumerate()
                        .map(|(k, v)| if k / n == k % n { (v - 1.0).abs() } else { v.abs() })
                        .fold(0.0, f64::max)
                })
                .unwrap_or(f64::NAN);
            log::info!("max |A * inv(A) - I| = {:.3e}", identity_error);
        }
        Err(e) => log::error!("Inversion failed: {:?}", e),
    }
}
