//! Assembly of the field set, kernels and particle set from a run
//! configuration.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::boundary::synthesize_coastal_boundary;
use crate::config::RunConfig;
use crate::field::{Field, FieldError, FieldSet};
use crate::io::{NetCDFError, VelocityReader};
use crate::kernel::{KernelError, resolve_kernels};
use crate::particle::ParticleSet;

use super::Simulation;

/// Coordinate tolerance when matching a loaded boundary to the main grid.
const COORD_TOL: f64 = 1e-9;

/// Error type for simulation assembly.
#[derive(Debug, Error)]
pub enum SetupError {
    /// Reading a velocity file failed
    #[error(transparent)]
    NetCDF(#[from] NetCDFError),

    /// Field construction or merging failed
    #[error(transparent)]
    Field(#[from] FieldError),

    /// Kernel resolution failed
    #[error(transparent)]
    Kernel(#[from] KernelError),
}

/// Assemble the field set described by the configuration: the main
/// velocity data, optionally merged with a coastal boundary current
/// (loaded from a file, or synthesized from the land mask).
pub fn build_fieldset(config: &RunConfig) -> Result<FieldSet, SetupError> {
    let main = VelocityReader::from_file(&config.pathname, config)?.into_fieldset()?;
    info!(
        path = %config.pathname.display(),
        n_lon = main.grid().n_lon(),
        n_lat = main.grid().n_lat(),
        n_time = main.grid().n_time(),
        "field set created"
    );

    if !config.coastal_boundary.include {
        return Ok(main);
    }

    let boundary = match &config.coastal_boundary.path {
        Some(path) => {
            info!(path = %path.display(), "loading coastal boundary currents");
            let loaded = VelocityReader::from_file(path, config)?.into_fieldset()?;
            align_to(loaded, &main)?
        }
        None => {
            info!("synthesizing coastal boundary currents from the land mask");
            synthesize_coastal_boundary(&main, &config.coastal_boundary.synthesis_config())?
        }
    };

    Ok(main.add(&boundary)?)
}

/// Put a loaded boundary field set on the main grid's time axis.
///
/// A single-level boundary is replicated across every time level; a
/// boundary with the same number of levels keeps its samples and takes
/// the main time coordinates. Spatial coordinates must match.
fn align_to(boundary: FieldSet, main: &FieldSet) -> Result<FieldSet, FieldError> {
    if !boundary.grid().same_spatial_coords(main.grid(), COORD_TOL) {
        return Err(FieldError::GridMismatch(
            "boundary and main datasets have different lon/lat coordinates",
        ));
    }

    let grid = Arc::new(main.grid().clone());
    let (u, v) = if boundary.grid().n_time() == 1 {
        (
            Field::from_level("U", grid.clone(), boundary.u.level(0))?,
            Field::from_level("V", grid, boundary.v.level(0))?,
        )
    } else if boundary.grid().n_time() == main.grid().n_time() {
        (
            Field::new("U", grid.clone(), boundary.u.data().to_vec())?,
            Field::new("V", grid, boundary.v.data().to_vec())?,
        )
    } else {
        return Err(FieldError::GridMismatch(
            "boundary and main datasets have different time levels",
        ));
    };

    FieldSet::from_fields(u, v)
}

/// Build the simulation and particle set described by the configuration.
///
/// Resolves the kernel list, assembles the field set, attaches the
/// kernels' fieldset constants and seeds the particles at the field
/// set's first time level.
pub fn build_simulation(config: &RunConfig) -> Result<(Simulation, ParticleSet), SetupError> {
    let kernels = resolve_kernels(&config.kernels)?;
    info!(kernels = ?config.kernels, "kernels resolved");

    let fieldset = build_fieldset(config)?;

    let t0 = fieldset.grid().time[0];
    let pset = ParticleSet::from_seeds(&config.particles.lon, &config.particles.lat, t0);
    info!(particles = pset.len(), t0, "particle set created");

    let simulation = Simulation::new(fieldset, kernels, config.execution_config())?;
    Ok((simulation, pset))
}
