//! Error types for integration runs.

use thiserror::Error;

/// Errors encountered during an integration run.
///
/// `Configuration` is raised before the first stage evaluation. The other
/// variants end a run that already started; they are reported alongside the
/// trajectory accepted so far.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Configuration error: {what}")]
    Configuration { what: String },

    #[error("Numerical divergence at t = {t}: oscillator {oscillator}, component {component} is not finite")]
    NumericalDivergence {
        /// Time of the stage evaluation that produced the NaN/Inf
        t: f64,
        oscillator: usize,
        component: usize,
    },

    /// `max_steps` attempts ran out, or an accepted step was too small to
    /// move `t` at its floating-point resolution.
    #[error("Step limit exceeded: {attempts} attempts without reaching t_end (stopped at t = {t})")]
    StepLimitExceeded { attempts: usize, t: f64 },
}

impl SimError {
    pub(crate) fn config(what: impl Into<String>) -> Self {
        SimError::Configuration { what: what.into() }
    }
}

pub type SimResult<T> = Result<T, SimError>;

impl From<osc_core::CoreError> for SimError {
    fn from(e: osc_core::CoreError) -> Self {
        SimError::Configuration {
            what: e.to_string(),
        }
    }
}

impl From<osc_model::ModelError> for SimError {
    fn from(e: osc_model::ModelError) -> Self {
        SimError::Configuration {
            what: e.to_string(),
        }
    }
}
