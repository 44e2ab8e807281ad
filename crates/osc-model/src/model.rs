//! OscillatorModel trait for pluggable batched dynamics.

use osc_core::BatchState;
use rayon::prelude::*;

/// Vector field of a batch of N oscillators with D coordinates each.
///
/// Implementations own their parameters and must be pure:
/// - the output depends only on `t` and `state`
/// - no caching between calls (stages are evaluated at interior times)
/// - calls may happen in any order within a step
pub trait OscillatorModel: Sync {
    /// Coordinates per oscillator (D).
    fn dim(&self) -> usize;

    /// Oscillators in the batch (N).
    fn batch_len(&self) -> usize;

    /// Write `d state / dt` at time `t` into `out`.
    ///
    /// `state` and `out` both have shape `(batch_len(), dim())`. Every
    /// element of `out` is overwritten.
    fn derivative(&self, t: f64, state: &BatchState, out: &mut BatchState);
}

/// Models whose derivative is defined one oscillator at a time.
///
/// `row_derivative` sees the full batch so documented coupling terms can read
/// neighbouring rows, but it writes only the row of oscillator `index`.
pub trait RowModel: Sync {
    fn row_derivative(&self, t: f64, index: usize, state: &BatchState, out: &mut [f64]);
}

/// Fill `out` by evaluating every row, serially or on the rayon pool.
///
/// Rows are independent writes, so both paths give bit-identical output.
pub fn evaluate_rows<M: RowModel + ?Sized>(
    model: &M,
    t: f64,
    state: &BatchState,
    out: &mut BatchState,
    parallel: bool,
) {
    debug_assert!(state.same_shape(out));
    let dim = state.dim();
    if parallel {
        out.as_mut_slice()
            .par_chunks_mut(dim)
            .enumerate()
            .for_each(|(i, row)| model.row_derivative(t, i, state, row));
    } else {
        for (i, row) in out.rows_mut().enumerate() {
            model.row_derivative(t, i, state, row);
        }
    }
}
