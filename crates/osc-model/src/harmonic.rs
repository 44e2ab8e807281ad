//! Linear harmonic oscillator batch.

use osc_core::BatchState;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::model::{OscillatorModel, RowModel, evaluate_rows};
use crate::params::ParameterSet;

/// Undamped oscillator `x'' + omega² x = 0`, state row `[x, v]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HarmonicOscillator {
    /// Natural frequency (rad per unit time)
    pub omega: f64,
}

impl HarmonicOscillator {
    pub fn new(omega: f64) -> Self {
        Self { omega }
    }

    /// Closed-form `[x(t), v(t)]` from `[x0, v0]` at t = 0.
    pub fn exact(&self, t: f64, x0: f64, v0: f64) -> [f64; 2] {
        let w = self.omega;
        let (s, c) = (w * t).sin_cos();
        [x0 * c + v0 / w * s, -x0 * w * s + v0 * c]
    }
}

/// Batch of uncoupled harmonic oscillators.
#[derive(Debug, Clone)]
pub struct HarmonicModel {
    params: ParameterSet<HarmonicOscillator>,
}

impl HarmonicModel {
    pub fn new(params: ParameterSet<HarmonicOscillator>) -> ModelResult<Self> {
        for (index, osc) in params.iter().enumerate() {
            if !osc.omega.is_finite() {
                return Err(ModelError::NonFinite {
                    what: "omega",
                    index,
                });
            }
            if osc.omega <= 0.0 {
                return Err(ModelError::InvalidArg {
                    what: "omega must be positive",
                });
            }
        }
        Ok(Self { params })
    }

    pub fn params(&self) -> &ParameterSet<HarmonicOscillator> {
        &self.params
    }
}

impl RowModel for HarmonicModel {
    fn row_derivative(&self, _t: f64, index: usize, state: &BatchState, out: &mut [f64]) {
        let w = self.params.as_slice()[index].omega;
        let y = state.row(index);
        out[0] = y[1];
        out[1] = -w * w * y[0];
    }
}

impl OscillatorModel for HarmonicModel {
    fn dim(&self) -> usize {
        2
    }

    fn batch_len(&self) -> usize {
        self.params.len()
    }

    fn derivative(&self, t: f64, state: &BatchState, out: &mut BatchState) {
        evaluate_rows(self, t, state, out, false);
    }
}
