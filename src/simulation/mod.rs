//! Simulation execution.
//!
//! Ties the field set, kernel list and particle set into a complete
//! time-stepping run with output callbacks.

mod runner;
#[cfg(feature = "netcdf")]
mod setup;

pub use runner::{ExecutionConfig, Simulation, SimulationResult};
#[cfg(feature = "netcdf")]
pub use setup::{SetupError, build_fieldset, build_simulation};

use thiserror::Error;

use crate::kernel::KernelError;

/// Error type for a simulation run.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// A kernel failed in a way that is not a per-particle condition
    #[error(transparent)]
    Kernel(#[from] KernelError),

    /// The output callback failed (e.g. a trajectory write)
    #[error("output error: {0}")]
    Output(String),
}
