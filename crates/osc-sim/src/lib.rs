//! Adaptive time integration for batches of oscillators.
//!
//! Provides:
//! - Embedded Runge–Kutta–Fehlberg 4(5) stepper with a shared step size
//!   across the whole batch
//! - Adaptive run loop with step clipping at t_end, h_min acceptance and a
//!   step-attempt limit
//! - Fixed-step RK4 runner
//! - Trajectory recording, run statistics and progress events
//! - Serializable run configuration for CRVDO batches

pub mod config;
pub mod controller;
pub mod error;
pub mod integrator;
pub mod options;
pub mod progress;
pub mod sim;
pub mod tableau;
pub mod trajectory;

// Re-exports for public API
pub use config::{OscillatorConfig, SimConfig};
pub use controller::StepController;
pub use error::{SimError, SimResult};
pub use integrator::{Rk4, Rk45};
pub use options::{FixedStepOptions, IntegrateOptions};
pub use progress::SimProgress;
pub use sim::{RunOutcome, RunStats, RunStatus, integrate, integrate_with_progress, run_fixed};
pub use trajectory::Trajectory;
