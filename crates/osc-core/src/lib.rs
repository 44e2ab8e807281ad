//! osc-core: shared foundation for the oscillator batch simulator.
//!
//! Contains:
//! - numeric (Real + finiteness and range checks)
//! - state (dense N×D batch state buffer)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod state;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use state::BatchState;
