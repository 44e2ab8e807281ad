//! Progress events emitted after accepted steps.

/// Snapshot of an adaptive run, sent after every accepted step.
#[derive(Debug, Clone, Default)]
pub struct SimProgress {
    pub t: f64,
    pub t_end: f64,
    pub fraction_complete: f64,
    pub accepted: usize,
    pub rejected: usize,
    /// Size of the step just accepted
    pub h: f64,
}

impl SimProgress {
    pub(crate) fn new(t0: f64, t: f64, t_end: f64) -> Self {
        let span = t_end - t0;
        let fraction_complete = if span > 0.0 {
            ((t - t0) / span).clamp(0.0, 1.0)
        } else {
            1.0
        };
        Self {
            t,
            t_end,
            fraction_complete,
            ..Default::default()
        }
    }
}
