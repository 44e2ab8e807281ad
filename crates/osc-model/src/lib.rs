//! Oscillator models for batched simulation.
//!
//! Provides:
//! - `OscillatorModel` trait: pure derivative of an N×D batch state
//! - `RowModel` helper for row-wise models, with optional rayon row parallelism
//! - `ParameterSet` aligned with state rows
//! - Time-varying control signals
//! - Complex Rayleigh–van der Pol–Duffing (CRVDO) model with optional ring coupling
//! - Linear harmonic batch model with closed-form solution
//! - Reference CRVDO batch preset

pub mod control;
pub mod crvdo;
pub mod error;
pub mod harmonic;
pub mod model;
pub mod params;
pub mod presets;

pub use control::{ControlInput, ControlSignal};
pub use crvdo::{CRVDO_DIM, Coupling, CrvdoCoefficients, CrvdoModel, CrvdoOscillator};
pub use error::{ModelError, ModelResult};
pub use harmonic::{HarmonicModel, HarmonicOscillator};
pub use model::{OscillatorModel, RowModel, evaluate_rows};
pub use params::ParameterSet;
pub use presets::{ReferenceBatch, reference_batch};
