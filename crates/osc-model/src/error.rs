//! Error types for model construction.

use thiserror::Error;

/// Errors raised while building a model from its parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Parameter set must contain at least one oscillator")]
    EmptyBatch,

    #[error("Non-finite parameter {what} for oscillator {index}")]
    NonFinite { what: &'static str, index: usize },

    #[error(transparent)]
    Core(#[from] osc_core::CoreError),
}

pub type ModelResult<T> = Result<T, ModelError>;
