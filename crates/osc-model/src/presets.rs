//! Reference CRVDO batch.
//!
//! Oscillator `i` of `n` starts at rest at the origin with coefficients
//! `a = 1.25, b = 2, c = 1/(16 + i), d = 1, e = 0.25` and constant control
//! `[1/(2 + i), 0, 1/(2 + i), 0]`. The imaginary coordinates stay at zero for
//! the whole run because nothing drives them.

use osc_core::BatchState;

use crate::control::ControlInput;
use crate::crvdo::{CRVDO_DIM, Coupling, CrvdoCoefficients, CrvdoModel, CrvdoOscillator};
use crate::error::ModelResult;
use crate::params::ParameterSet;

#[derive(Debug, Clone)]
pub struct ReferenceBatch {
    pub model: CrvdoModel,
    pub initial: BatchState,
}

pub fn reference_batch(n: usize) -> ModelResult<ReferenceBatch> {
    let oscillators = (0..n)
        .map(|i| {
            let i = i as f64;
            let drive = 1.0 / (2.0 + i);
            CrvdoOscillator::new(CrvdoCoefficients::new(1.25, 2.0, 1.0 / (16.0 + i), 1.0, 0.25))
                .with_control(ControlInput::constant([drive, 0.0, drive, 0.0]))
        })
        .collect();
    let params = ParameterSet::new(oscillators)?;
    let model = CrvdoModel::new(params, Coupling::None)?;
    let initial = BatchState::zeros(n, CRVDO_DIM)?;
    Ok(ReferenceBatch { model, initial })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use crate::model::OscillatorModel;

    #[test]
    fn reference_batch_has_aligned_rows() {
        let batch = reference_batch(10).unwrap();
        assert_eq!(batch.model.batch_len(), 10);
        assert_eq!(batch.initial.shape(), (10, CRVDO_DIM));
        let last = batch.model.params().get(9).unwrap();
        assert_eq!(last.coefficients.c, 1.0 / 25.0);
        assert_eq!(last.control.unwrap().evaluate(0.0), [1.0 / 11.0, 0.0, 1.0 / 11.0, 0.0]);
    }

    #[test]
    fn empty_reference_batch_is_rejected() {
        assert_eq!(reference_batch(0).err(), Some(ModelError::EmptyBatch));
    }
}
