//! Single-step Runge-Kutta kernels over a batch state.
//!
//! Both steppers own their stage buffers so a run allocates once up front.
//! Every stage derivative is checked for NaN/Inf before it is used; a
//! failure reports the time at which the offending stage was evaluated.

use osc_core::{BatchState, CoreResult};
use osc_model::OscillatorModel;

use crate::error::{SimError, SimResult};
use crate::tableau::{A, B4, B5, C, STAGES};

fn check_finite(k: &BatchState, t: f64) -> SimResult<()> {
    match k.first_non_finite() {
        Some((oscillator, component)) => Err(SimError::NumericalDivergence {
            t,
            oscillator,
            component,
        }),
        None => Ok(()),
    }
}

/// Embedded Runge–Kutta–Fehlberg 4(5) stepper.
#[derive(Clone, Debug)]
pub struct Rk45 {
    k: Vec<BatchState>,
    stage: BatchState,
    y4: BatchState,
    y5: BatchState,
    stage_evals: usize,
}

impl Rk45 {
    /// Workspace for a batch of shape `(len, dim)`.
    pub fn new(len: usize, dim: usize) -> CoreResult<Self> {
        let zero = BatchState::zeros(len, dim)?;
        Ok(Self {
            k: vec![zero.clone(); STAGES],
            stage: zero.clone(),
            y4: zero.clone(),
            y5: zero,
            stage_evals: 0,
        })
    }

    /// Try a step of size `h` from `(t, y)`.
    ///
    /// Returns the local error estimate `max |y5 - y4|` over all N×D
    /// components. The candidate solutions stay in the stepper until the
    /// next attempt; `y` is never modified.
    pub fn attempt<M: OscillatorModel + ?Sized>(
        &mut self,
        model: &M,
        t: f64,
        y: &BatchState,
        h: f64,
    ) -> SimResult<f64> {
        let ys = y.as_slice();

        for i in 0..STAGES {
            let stage = self.stage.as_mut_slice();
            for (n, s) in stage.iter_mut().enumerate() {
                let mut sum = 0.0;
                for j in 0..i {
                    sum += A[i][j] * self.k[j].as_slice()[n];
                }
                *s = ys[n] + h * sum;
            }

            let t_stage = t + C[i] * h;
            model.derivative(t_stage, &self.stage, &mut self.k[i]);
            self.stage_evals += 1;
            check_finite(&self.k[i], t_stage)?;
        }

        let y4 = self.y4.as_mut_slice();
        let y5 = self.y5.as_mut_slice();
        for n in 0..ys.len() {
            let (mut s4, mut s5) = (0.0, 0.0);
            for i in 0..STAGES {
                let k = self.k[i].as_slice()[n];
                s4 += B4[i] * k;
                s5 += B5[i] * k;
            }
            y4[n] = ys[n] + h * s4;
            y5[n] = ys[n] + h * s5;
        }
        check_finite(&self.y5, t + h)?;

        Ok(self.y5.max_abs_diff(&self.y4))
    }

    /// 5th-order candidate from the last attempt.
    pub fn high_order(&self) -> &BatchState {
        &self.y5
    }

    /// 4th-order candidate from the last attempt.
    pub fn low_order(&self) -> &BatchState {
        &self.y4
    }

    /// Model evaluations performed so far.
    pub fn stage_evals(&self) -> usize {
        self.stage_evals
    }
}

/// Classical RK4 (Runge-Kutta 4th order) fixed-step stepper.
#[derive(Clone, Debug)]
pub struct Rk4 {
    k: [BatchState; 4],
    stage: BatchState,
    stage_evals: usize,
}

impl Rk4 {
    pub fn new(len: usize, dim: usize) -> CoreResult<Self> {
        let zero = BatchState::zeros(len, dim)?;
        Ok(Self {
            k: [zero.clone(), zero.clone(), zero.clone(), zero.clone()],
            stage: zero,
            stage_evals: 0,
        })
    }

    /// Advance `y` in place by one step of size `dt` from time `t`.
    ///
    /// On divergence `y` is left untouched.
    pub fn step<M: OscillatorModel + ?Sized>(
        &mut self,
        model: &M,
        t: f64,
        y: &mut BatchState,
        dt: f64,
    ) -> SimResult<()> {
        const NODES: [f64; 4] = [0.0, 0.5, 0.5, 1.0];

        for i in 0..4 {
            if i == 0 {
                self.stage.copy_from(y);
            } else {
                let kp = self.k[i - 1].as_slice();
                let stage = self.stage.as_mut_slice();
                for ((s, y0), k) in stage.iter_mut().zip(y.as_slice()).zip(kp) {
                    *s = y0 + NODES[i] * dt * k;
                }
            }
            let t_stage = t + NODES[i] * dt;
            model.derivative(t_stage, &self.stage, &mut self.k[i]);
            self.stage_evals += 1;
            check_finite(&self.k[i], t_stage)?;
        }

        // x_new = x + (dt/6) * (k1 + 2*k2 + 2*k3 + k4)
        let [k1, k2, k3, k4] = &self.k;
        for (n, v) in y.as_mut_slice().iter_mut().enumerate() {
            let sum = k1.as_slice()[n]
                + 2.0 * k2.as_slice()[n]
                + 2.0 * k3.as_slice()[n]
                + k4.as_slice()[n];
            *v += dt / 6.0 * sum;
        }
        Ok(())
    }

    pub fn stage_evals(&self) -> usize {
        self.stage_evals
    }
}
