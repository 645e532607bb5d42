use crate::{boolmatrix::BoolMatrix, packed_row::PackedRow};
use log::trace;
use rayon::prelude::*;

/// Row-parallel versions of the matrix product
///
/// Output row `i` depends only on row `i` of the left operand and on all of the right operand,
/// so disjoint chunks of output rows are computed on separate threads with no synchronization.
pub trait ParallelMatrixOps {
    fn par_mul(&self, rhs: &Self) -> Self;
    fn par_mul_assign(&mut self, rhs: &Self);
}

impl<R: PackedRow, const N: usize> ParallelMatrixOps for BoolMatrix<R, N> {
    fn par_mul(&self, rhs: &Self) -> Self {
        let chunk_size = usize::max(1, N / rayon::current_num_threads());
        trace!("par_mul: {} rows in chunks of {}", N, chunk_size);

        let mut rows = [R::ZERO; N];
        rows.par_chunks_mut(chunk_size)
            .zip(self.as_rows().par_chunks(chunk_size))
            .for_each(|(target_chunk, source_chunk)| {
                for (acc, &row) in target_chunk.iter_mut().zip(source_chunk) {
                    *acc = rhs.row_product(row);
                }
            });

        BoolMatrix::from_array_unchecked(rows)
    }

    #[inline]
    fn par_mul_assign(&mut self, rhs: &Self) {
        *self = self.par_mul(rhs);
    }
}
