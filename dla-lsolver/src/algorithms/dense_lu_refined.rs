use dla_core::{DenseVector, Matrix, Result};
use log::info;

use super::{RefinedDenseLu, SolveAlgorithm, SolveResult};
use crate::lu::LuFactors;
use crate::refine::{self, RefinementInfo};
use crate::validate;

impl<M: Matrix> SolveAlgorithm<M> for RefinedDenseLu {
    type Metadata = RefinementInfo;

    fn solve(&self, a: &M, b: &[M::Value]) -> Result<SolveResult<M::Value, Self::Metadata>> {
        <Self as SolveAlgorithm<M>>::validate_inputs(self, a, b)?;
        let dense = validate::check_dense(a)?;
        let b = DenseVector::from_vec(b.to_vec());

        let factors = LuFactors::from_matrix(dense)?;
        let mut x = factors.solve(&b)?;
        let info = refine::refine(
            dense,
            factors.lu(),
            factors.pivots(),
            &b,
            &mut x,
            &self.config(),
        )?;
        info!(
            "Refined LU solve: {} sweeps, residual {:e}",
            info.iterations, info.residual
        );

        Ok(SolveResult {
            x: x.into_vec(),
            metadata: info,
        })
    }
}
