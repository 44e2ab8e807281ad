//! Run options for adaptive and fixed-step integration.

use osc_core::{ensure_finite, ensure_in_half_open, ensure_positive};
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Options for an adaptive RKF45 run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrateOptions {
    /// Initial simulation time
    pub t0: f64,
    /// Final simulation time
    pub t_end: f64,
    /// First step size to attempt (clamped to [h_min, h_max])
    pub h_initial: f64,
    /// Bound on the local error estimate max |y5 - y4|
    pub tolerance: f64,
    /// Smallest step size; a step at h_min is accepted even above tolerance
    pub h_min: f64,
    /// Largest step size
    pub h_max: f64,
    /// Maximum number of step attempts, accepted plus rejected
    pub max_steps: usize,
    /// Safety factor of the step-size controller, in (0, 1]
    pub safety: f64,
    /// Record every N-th accepted step (the final step is always recorded)
    pub record_every: usize,
}

impl Default for IntegrateOptions {
    fn default() -> Self {
        Self {
            t0: 0.0,
            t_end: 1.0,
            h_initial: 1e-2,
            tolerance: 1e-6,
            h_min: 1e-10,
            h_max: 0.1,
            max_steps: 100_000,
            safety: 0.9,
            record_every: 1,
        }
    }
}

impl IntegrateOptions {
    pub fn validate(&self) -> SimResult<()> {
        ensure_finite(self.t0, "t0")?;
        ensure_finite(self.t_end, "t_end")?;
        if self.t_end < self.t0 {
            return Err(SimError::config(format!(
                "t_end ({}) must not precede t0 ({})",
                self.t_end, self.t0
            )));
        }
        ensure_positive(self.tolerance, "tolerance")?;
        ensure_positive(self.h_min, "h_min")?;
        ensure_positive(self.h_max, "h_max")?;
        ensure_positive(self.h_initial, "h_initial")?;
        if self.h_min > self.h_max {
            return Err(SimError::config(format!(
                "h_min ({}) must not exceed h_max ({})",
                self.h_min, self.h_max
            )));
        }
        if self.max_steps == 0 {
            return Err(SimError::config("max_steps must be positive"));
        }
        ensure_in_half_open(self.safety, 0.0, 1.0, "safety")?;
        if self.record_every == 0 {
            return Err(SimError::config("record_every must be positive"));
        }
        Ok(())
    }
}

/// Options for a fixed-step RK4 run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedStepOptions {
    pub t0: f64,
    /// Fixed time step
    pub dt: f64,
    /// Number of steps to take
    pub steps: usize,
}

impl Default for FixedStepOptions {
    fn default() -> Self {
        Self {
            t0: 0.0,
            dt: 1.0 / 128.0,
            steps: 2000,
        }
    }
}

impl FixedStepOptions {
    pub fn validate(&self) -> SimResult<()> {
        ensure_finite(self.t0, "t0")?;
        ensure_positive(self.dt, "dt")?;
        let t_end = ensure_finite(self.t0 + self.steps as f64 * self.dt, "final time")?;
        // Every step must move t by at least two ulps of the largest time.
        let scale = self.t0.abs().max(t_end.abs());
        if self.dt <= 2.0 * f64::EPSILON * scale {
            return Err(SimError::config(format!(
                "dt ({}) is too small to advance time near t = {scale}",
                self.dt
            )));
        }
        Ok(())
    }
}
