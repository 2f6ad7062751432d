//! The particle container and per-step kernel sweep.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::warn;

use crate::field::{FieldError, FieldSet};
use crate::kernel::{Kernel, KernelError};

use super::Particle;

/// Collection of tracer particles advanced through a field set.
///
/// # Example
///
/// ```
/// use lpt_rs::particle::ParticleSet;
///
/// let pset = ParticleSet::from_seeds(&[4.5, 4.6], &[60.1, 60.2], 0.0);
/// assert_eq!(pset.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ParticleSet {
    particles: Vec<Particle>,
    released: usize,
}

impl ParticleSet {
    /// Seed one particle per configured position, released at `t0`.
    ///
    /// # Panics
    ///
    /// Panics if the seed arrays have different lengths; the
    /// configuration loader rejects such input before it reaches here.
    pub fn from_seeds(lon: &[f64], lat: &[f64], t0: f64) -> Self {
        assert_eq!(
            lon.len(),
            lat.len(),
            "seed lon ({}) and lat ({}) arrays must have equal length",
            lon.len(),
            lat.len()
        );

        let particles = lon
            .iter()
            .zip(lat)
            .enumerate()
            .map(|(id, (&lon, &lat))| Particle::new(id as u64, lon, lat, t0))
            .collect::<Vec<_>>();
        let released = particles.len();

        Self { particles, released }
    }

    /// Number of active particles.
    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// True if no active particles remain.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Number of particles originally released.
    #[inline]
    pub fn released(&self) -> usize {
        self.released
    }

    /// The active particles.
    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Iterate over the active particles.
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    /// Apply the kernel list, in order, to every active particle for one
    /// step from `time` to `time + dt`.
    ///
    /// A particle whose kernel chain fails with an out-of-bounds field
    /// sample is deleted with a warning; any other kernel error aborts
    /// the sweep. Deleted particles stay in the container until
    /// [`ParticleSet::compact`] runs at the end of the step.
    pub fn execute_kernels(
        &mut self,
        kernels: &[Box<dyn Kernel>],
        fieldset: &FieldSet,
        time: f64,
        dt: f64,
    ) -> Result<(), KernelError> {
        let step = |p: &mut Particle| -> Result<(), KernelError> {
            for kernel in kernels {
                if p.is_deleted() {
                    break;
                }
                match kernel.execute(p, fieldset, time, dt) {
                    Ok(()) => {}
                    Err(KernelError::Field(
                        FieldError::OutOfBounds { .. } | FieldError::TimeOutOfBounds { .. },
                    )) => {
                        warn!(
                            particle = p.id,
                            lon = p.lon,
                            lat = p.lat,
                            kernel = kernel.name(),
                            "particle left the field extent, deleting"
                        );
                        p.out_of_bounds = true;
                        p.delete();
                    }
                    Err(e) => return Err(e),
                }
            }
            if !p.is_deleted() {
                p.time = time + dt;
            }
            Ok(())
        };

        #[cfg(feature = "parallel")]
        {
            self.particles.par_iter_mut().try_for_each(step)
        }
        #[cfg(not(feature = "parallel"))]
        {
            self.particles.iter_mut().try_for_each(step)
        }
    }

    /// Drop particles flagged for removal; returns how many were dropped.
    pub fn compact(&mut self) -> usize {
        let before = self.particles.len();
        self.particles.retain(|p| !p.is_deleted());
        before - self.particles.len()
    }
}
