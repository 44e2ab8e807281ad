//! Time-varying control input for oscillator equations.

use serde::{Deserialize, Serialize};

/// Number of control channels on a CRVDO oscillator (one per state coordinate).
pub const CONTROL_CHANNELS: usize = 4;

/// Scalar control signal as a pure function of simulation time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlSignal {
    /// u(t) = 0
    #[default]
    Zero,
    /// u(t) = value
    Constant { value: f64 },
    /// u(t) = offset + amplitude * sin(omega * t + phase)
    Sinusoid {
        amplitude: f64,
        omega: f64,
        #[serde(default)]
        phase: f64,
        #[serde(default)]
        offset: f64,
    },
    /// u(t) = before for t < at, after otherwise
    Step { before: f64, after: f64, at: f64 },
}

impl ControlSignal {
    pub fn constant(value: f64) -> Self {
        Self::Constant { value }
    }

    /// Evaluate at time `t`.
    pub fn value(&self, t: f64) -> f64 {
        match *self {
            Self::Zero => 0.0,
            Self::Constant { value } => value,
            Self::Sinusoid {
                amplitude,
                omega,
                phase,
                offset,
            } => offset + amplitude * (omega * t + phase).sin(),
            Self::Step { before, after, at } => {
                if t < at {
                    before
                } else {
                    after
                }
            }
        }
    }

    /// True when every parameter of the signal is finite.
    pub fn is_finite(&self) -> bool {
        match *self {
            Self::Zero => true,
            Self::Constant { value } => value.is_finite(),
            Self::Sinusoid {
                amplitude,
                omega,
                phase,
                offset,
            } => amplitude.is_finite() && omega.is_finite() && phase.is_finite() && offset.is_finite(),
            Self::Step { before, after, at } => {
                before.is_finite() && after.is_finite() && at.is_finite()
            }
        }
    }
}

/// Control vector `[u1, u2, u3, u4]` applied to one oscillator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ControlInput {
    pub channels: [ControlSignal; CONTROL_CHANNELS],
}

impl ControlInput {
    pub fn new(channels: [ControlSignal; CONTROL_CHANNELS]) -> Self {
        Self { channels }
    }

    /// Time-invariant control vector.
    pub fn constant(values: [f64; CONTROL_CHANNELS]) -> Self {
        Self {
            channels: values.map(ControlSignal::constant),
        }
    }

    /// Evaluate all channels at time `t`.
    pub fn evaluate(&self, t: f64) -> [f64; CONTROL_CHANNELS] {
        self.channels.map(|c| c.value(t))
    }

    pub fn is_finite(&self) -> bool {
        self.channels.iter().all(ControlSignal::is_finite)
    }
}
