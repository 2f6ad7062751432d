//! Simulation runner implementation.
//!
//! Provides a high-level interface for running a particle-tracking
//! simulation to termination.

use tracing::{debug, info};

use crate::field::FieldSet;
use crate::kernel::{Kernel, KernelError, KernelRequirements, attach_constants, collect_requirements};
use crate::particle::ParticleSet;

use super::SimulationError;

// =============================================================================
// Execution Configuration
// =============================================================================

/// Configuration for a simulation run.
#[derive(Clone, Debug)]
pub struct ExecutionConfig {
    /// Total runtime in seconds from the field set's first time level.
    pub runtime: f64,
    /// Fixed time step in seconds.
    pub dt: f64,
    /// Interval for invoking the output callback (in seconds).
    pub output_interval: Option<f64>,
    /// Maximum number of time steps.
    pub max_steps: Option<usize>,
}

impl ExecutionConfig {
    /// Create a configuration with the given runtime and step, both in
    /// seconds.
    ///
    /// # Panics
    ///
    /// Panics if `runtime` or `dt` is not positive; the configuration
    /// loader rejects such input before it reaches here.
    pub fn new(runtime: f64, dt: f64) -> Self {
        assert!(runtime > 0.0, "runtime ({}) must be positive", runtime);
        assert!(dt > 0.0, "dt ({}) must be positive", dt);
        Self {
            runtime,
            dt,
            output_interval: None,
            max_steps: None,
        }
    }

    /// Set the output callback interval.
    pub fn with_output_interval(mut self, interval: f64) -> Self {
        self.output_interval = Some(interval);
        self
    }

    /// Set the maximum number of steps.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }
}

// =============================================================================
// Simulation Result
// =============================================================================

/// Result of a simulation run.
#[derive(Clone, Debug)]
pub struct SimulationResult {
    /// Final simulation time reached (seconds on the field time axis).
    pub final_time: f64,
    /// Total number of time steps taken.
    pub n_steps: usize,
    /// Number of particles originally released.
    pub particles_released: usize,
    /// Number of particles still active at the end.
    pub particles_remaining: usize,
    /// Total wall-clock time in seconds.
    pub wall_time: f64,
    /// Whether the simulation completed successfully.
    pub success: bool,
    /// Error message if the simulation failed.
    pub error: Option<String>,
}

impl SimulationResult {
    /// Create a successful result.
    pub fn success(
        final_time: f64,
        n_steps: usize,
        particles_released: usize,
        particles_remaining: usize,
        wall_time: f64,
    ) -> Self {
        Self {
            final_time,
            n_steps,
            particles_released,
            particles_remaining,
            wall_time,
            success: true,
            error: None,
        }
    }

    /// Create a failed result.
    pub fn failure(final_time: f64, n_steps: usize, error: String) -> Self {
        Self {
            final_time,
            n_steps,
            particles_released: 0,
            particles_remaining: 0,
            wall_time: 0.0,
            success: false,
            error: Some(error),
        }
    }
}

// =============================================================================
// Simulation Runner
// =============================================================================

/// High-level simulation runner.
///
/// Owns the assembled field set and the resolved kernel list, and
/// advances a [`ParticleSet`] from the field set's first time level for
/// the configured runtime, invoking an output callback at the
/// configured cadence.
pub struct Simulation {
    fieldset: FieldSet,
    kernels: Vec<Box<dyn Kernel>>,
    requirements: KernelRequirements,
    config: ExecutionConfig,
}

impl Simulation {
    /// Create a simulation from an assembled field set and kernel list.
    ///
    /// Collects the kernels' auxiliary requirements and attaches every
    /// required fieldset constant, evaluated against `fieldset`.
    pub fn new(
        mut fieldset: FieldSet,
        kernels: Vec<Box<dyn Kernel>>,
        config: ExecutionConfig,
    ) -> Result<Self, KernelError> {
        let requirements = collect_requirements(&kernels)?;
        attach_constants(&mut fieldset, &requirements);

        Ok(Self {
            fieldset,
            kernels,
            requirements,
            config,
        })
    }

    /// The assembled field set (with kernel constants attached).
    pub fn fieldset(&self) -> &FieldSet {
        &self.fieldset
    }

    /// Names of the particle variables the kernels flag for output.
    pub fn output_variables(&self) -> Vec<&'static str> {
        self.requirements.output_variables()
    }

    /// Run the simulation without output.
    pub fn run(&self, pset: &mut ParticleSet) -> SimulationResult {
        self.run_with_callback(pset, |_, _| Ok(()))
    }

    /// Run the simulation with an output callback.
    ///
    /// The callback is invoked with the particle set and the current
    /// time: once before the first step, at every configured output
    /// interval (every step if none is set), and after the final step.
    pub fn run_with_callback<F>(&self, pset: &mut ParticleSet, mut callback: F) -> SimulationResult
    where
        F: FnMut(&ParticleSet, f64) -> Result<(), SimulationError>,
    {
        let start_wall = std::time::Instant::now();

        let t_start = self.fieldset.grid().time[0];
        let t_end = t_start + self.config.runtime;
        let mut t = t_start;
        let mut n_steps = 0usize;
        let mut last_callback_time = t_start;

        info!(
            t_start,
            t_end,
            dt = self.config.dt,
            particles = pset.len(),
            kernels = self.kernels.len(),
            "starting simulation"
        );

        if let Err(e) = callback(pset, t) {
            return SimulationResult::failure(t, n_steps, e.to_string());
        }

        while t < t_end {
            if let Some(max_steps) = self.config.max_steps {
                if n_steps >= max_steps {
                    return SimulationResult::failure(
                        t,
                        n_steps,
                        format!("maximum step limit ({}) reached", max_steps),
                    );
                }
            }

            if pset.is_empty() {
                info!(t, n_steps, "all particles removed, stopping early");
                break;
            }

            // Don't overshoot the end time
            let dt = self.config.dt.min(t_end - t);

            if let Err(e) = pset.execute_kernels(&self.kernels, &self.fieldset, t, dt) {
                return SimulationResult::failure(t, n_steps, e.to_string());
            }

            t += dt;
            n_steps += 1;

            let removed = pset.compact();
            if removed > 0 {
                debug!(t, removed, remaining = pset.len(), "removed deleted particles");
            }

            let should_callback = match self.config.output_interval {
                Some(interval) => t - last_callback_time >= interval || t >= t_end,
                None => true,
            };

            if should_callback {
                if let Err(e) = callback(pset, t) {
                    return SimulationResult::failure(t, n_steps, e.to_string());
                }
                last_callback_time = t;
            }

            if n_steps % 100 == 0 {
                debug!(t, n_steps, particles = pset.len(), "progress");
            }
        }

        let wall_time = start_wall.elapsed().as_secs_f64();
        info!(
            n_steps,
            wall_time,
            remaining = pset.len(),
            released = pset.released(),
            "simulation complete"
        );

        SimulationResult::success(t, n_steps, pset.released(), pset.len(), wall_time)
    }
}
