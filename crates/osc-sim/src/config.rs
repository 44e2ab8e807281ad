//! Serializable description of a CRVDO batch run.
//!
//! Reading the description from disk is left to the caller; any serde format
//! works. `build` turns it into a validated model, initial state and options.

use osc_core::BatchState;
use osc_model::{
    CRVDO_DIM, ControlInput, Coupling, CrvdoCoefficients, CrvdoModel, CrvdoOscillator, ParameterSet,
};
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::options::IntegrateOptions;

/// One oscillator row: parameters plus initial state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OscillatorConfig {
    pub coefficients: CrvdoCoefficients,
    #[serde(default)]
    pub control: Option<ControlInput>,
    /// `[z1, z2, z3, z4]` at t0; defaults to rest at the origin
    #[serde(default)]
    pub initial: [f64; CRVDO_DIM],
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    pub oscillators: Vec<OscillatorConfig>,
    #[serde(default)]
    pub coupling: Coupling,
    #[serde(default)]
    pub parallel: bool,
    #[serde(default)]
    pub options: IntegrateOptions,
}

impl SimConfig {
    /// Validate and assemble the run inputs.
    pub fn build(&self) -> SimResult<(CrvdoModel, BatchState, IntegrateOptions)> {
        if self.oscillators.is_empty() {
            return Err(SimError::config("at least one oscillator is required"));
        }
        self.options.validate()?;

        let params = ParameterSet::new(
            self.oscillators
                .iter()
                .map(|o| CrvdoOscillator {
                    coefficients: o.coefficients,
                    control: o.control,
                })
                .collect(),
        )?;
        let model = CrvdoModel::new(params, self.coupling)?.with_parallel(self.parallel);

        let rows: Vec<[f64; CRVDO_DIM]> = self.oscillators.iter().map(|o| o.initial).collect();
        let initial = BatchState::from_rows(&rows)?;
        if let Some((oscillator, component)) = initial.first_non_finite() {
            return Err(SimError::config(format!(
                "initial state of oscillator {oscillator}, component {component} is not finite"
            )));
        }

        Ok((model, initial, self.options.clone()))
    }
}
