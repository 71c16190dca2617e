use dla_core::{DenseVector, Matrix, Result, Scalar};
use log::debug;

use super::{DenseLu, SolveAlgorithm, SolveResult};
use crate::lu::LuFactors;
use crate::validate;

#[derive(Debug, Clone, Copy)]
pub struct LuMetadata<T: Scalar> {
    /// +1 or -1 depending on the parity of row interchanges.
    pub sign: T,
    pub swaps: usize,
    pub determinant: T,
}

impl<M: Matrix> SolveAlgorithm<M> for DenseLu {
    type Metadata = LuMetadata<M::Value>;

    fn solve(&self, a: &M, b: &[M::Value]) -> Result<SolveResult<M::Value, Self::Metadata>> {
        <Self as SolveAlgorithm<M>>::validate_inputs(self, a, b)?;
        let dense = validate::check_dense(a)?;

        let factors = LuFactors::from_matrix(dense)?;
        let x = factors.solve(&DenseVector::from_vec(b.to_vec()))?;
        debug!("Dense LU solve finished ({} row swaps)", factors.pivots().swaps());

        Ok(SolveResult {
            x: x.into_vec(),
            metadata: LuMetadata {
                sign: factors.sign(),
                swaps: factors.pivots().swaps(),
                determinant: factors.determinant(),
            },
        })
    }
}
