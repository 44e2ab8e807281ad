//! Step-size controller.

use crate::tableau::LOW_ORDER;

/// Elementary (I) controller for the RKF45 pair.
///
/// ```text
/// h_next = h * safety * (tolerance / error)^(1/5)
/// ```
///
/// clamped to `[h_min, h_max]`. The same formula shrinks a rejected step and
/// grows an accepted one.
#[derive(Clone, Copy, Debug)]
pub struct StepController {
    /// Safety factor (0.8-0.9 typical)
    pub safety: f64,
    exponent: f64,
}

impl Default for StepController {
    fn default() -> Self {
        Self::new(0.9)
    }
}

impl StepController {
    pub fn new(safety: f64) -> Self {
        Self {
            safety,
            exponent: 1.0 / (LOW_ORDER as f64 + 1.0),
        }
    }

    /// Step size to try next after a step of size `h` produced `error`.
    pub fn next_step(&self, h: f64, error: f64, tolerance: f64, h_min: f64, h_max: f64) -> f64 {
        // Zero error would give an infinite ratio.
        if error == 0.0 {
            return h_max;
        }
        let factor = self.safety * (tolerance / error).powf(self.exponent);
        (h * factor).clamp(h_min, h_max)
    }
}
