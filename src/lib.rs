//! # lpt-rs
//!
//! A Lagrangian particle-tracking library for gridded ocean velocity
//! fields.
//!
//! This crate provides the building blocks for tracer simulations:
//! - Velocity field sets on regular lon/lat/time grids (NetCDF or arrays)
//! - Synthetic coastal boundary currents derived from the land mask
//! - Per-particle update kernels (RK4/Euler advection, out-of-bounds
//!   removal, cumulative path length) with declared auxiliary state
//! - A configuration-driven execution loop with trajectory output

pub mod boundary;
pub mod config;
pub mod field;
pub mod io;
pub mod kernel;
pub mod particle;
pub mod simulation;
pub mod types;

// Re-export main types for convenience
pub use boundary::{CoastalBoundaryConfig, synthesize_coastal_boundary};
pub use config::{ConfigError, RunConfig};
pub use field::{Field, FieldError, FieldSet, RegularGrid};
pub use kernel::{
    AdvectionEE, AdvectionRK4, BoundaryCheck, Kernel, KernelError, KernelRequirements,
    PathLength, attach_constants, collect_requirements, resolve_kernels,
};
pub use particle::{Particle, ParticleSet, ParticleStatus};
pub use simulation::{ExecutionConfig, Simulation, SimulationError, SimulationResult};

#[cfg(feature = "netcdf")]
pub use io::{TrajectoryWriter, VelocityReader};
#[cfg(feature = "netcdf")]
pub use simulation::{SetupError, build_fieldset, build_simulation};

pub use io::{NetCDFError, TrajectoryWriterConfig};
pub use types::{GeoBounds, KM_PER_DEGREE, M_PER_DEGREE};
