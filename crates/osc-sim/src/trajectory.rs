//! Time series of accepted batch states.

use osc_core::BatchState;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Ordered `(time, state)` samples of one run.
///
/// Holds the initial condition followed by the recorded accepted steps.
/// Times strictly increase; samples are only ever appended by the
/// integration loop and are read-only for callers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTrajectory")]
pub struct Trajectory {
    times: Vec<f64>,
    states: Vec<BatchState>,
}

/// Unchecked wire form of a loaded trajectory.
#[derive(Deserialize)]
struct RawTrajectory {
    times: Vec<f64>,
    states: Vec<BatchState>,
}

impl TryFrom<RawTrajectory> for Trajectory {
    type Error = SimError;

    fn try_from(raw: RawTrajectory) -> SimResult<Self> {
        if raw.times.len() != raw.states.len() {
            return Err(SimError::config(format!(
                "trajectory has {} times but {} states",
                raw.times.len(),
                raw.states.len()
            )));
        }
        let Some(first) = raw.states.first() else {
            return Err(SimError::config("trajectory must hold at least one sample"));
        };
        if let Some(i) = raw.states.iter().position(|s| !s.same_shape(first)) {
            return Err(SimError::config(format!(
                "sample {i} has shape {:?}, expected {:?}",
                raw.states[i].shape(),
                first.shape()
            )));
        }
        if let Some(t) = raw.times.iter().find(|t| !t.is_finite()) {
            return Err(SimError::config(format!("sample time {t} is not finite")));
        }
        if let Some(i) = raw.times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(SimError::config(format!(
                "sample times must strictly increase (index {})",
                i + 1
            )));
        }
        Ok(Self {
            times: raw.times,
            states: raw.states,
        })
    }
}

impl Trajectory {
    pub(crate) fn new(t0: f64, initial: BatchState) -> Self {
        Self {
            times: vec![t0],
            states: vec![initial],
        }
    }

    pub(crate) fn push(&mut self, t: f64, state: BatchState) {
        debug_assert!(self.times.last().is_none_or(|&last| t > last));
        self.times.push(t);
        self.states.push(state);
    }

    /// Number of samples, including the initial condition.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn states(&self) -> &[BatchState] {
        &self.states
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (f64, &BatchState)> {
        self.times.iter().copied().zip(self.states.iter())
    }

    pub fn first(&self) -> Option<(f64, &BatchState)> {
        self.iter().next()
    }

    pub fn last(&self) -> Option<(f64, &BatchState)> {
        self.times.last().copied().zip(self.states.last())
    }

    pub fn final_time(&self) -> f64 {
        self.times.last().copied().unwrap_or(f64::NAN)
    }

    pub fn final_state(&self) -> Option<&BatchState> {
        self.states.last()
    }

    /// Samples of oscillator `k` as `(time, row)` pairs.
    ///
    /// Returns `None` if `k` is outside the batch.
    pub fn oscillator(&self, k: usize) -> Option<Vec<(f64, Vec<f64>)>> {
        if self.states.first().is_none_or(|s| k >= s.len()) {
            return None;
        }
        Some(self.iter().map(|(t, s)| (t, s.row(k).to_vec())).collect())
    }

    /// Series of coordinate `j` of oscillator `k`.
    pub fn component(&self, k: usize, j: usize) -> Option<Vec<(f64, f64)>> {
        let first = self.states.first()?;
        if k >= first.len() || j >= first.dim() {
            return None;
        }
        Some(self.iter().map(|(t, s)| (t, s.row(k)[j])).collect())
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = (f64, &'a BatchState);
    type IntoIter = std::iter::Zip<
        std::iter::Copied<std::slice::Iter<'a, f64>>,
        std::slice::Iter<'a, BatchState>,
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.times.iter().copied().zip(self.states.iter())
    }
}
