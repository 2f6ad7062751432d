//! Per-particle update kernels.
//!
//! A kernel is a per-step update rule applied to each particle: motion
//! (RK4 or explicit-Euler advection), removal (out-of-bounds check) or
//! bookkeeping (cumulative path length). Kernels are resolved by name
//! from the run configuration and applied in configuration order.
//!
//! Each kernel declares the auxiliary state it needs through
//! [`KernelRequirements`]: fieldset constants evaluated lazily against
//! the assembled field set (e.g. the grid's edge coordinates) and
//! per-particle variables with their initializers and an output flag.

mod advection;
mod boundary_check;
mod pathlength;

pub use advection::{AdvectionEE, AdvectionRK4};
pub use boundary_check::BoundaryCheck;
pub use pathlength::PathLength;

use thiserror::Error;

use crate::field::{FieldError, FieldSet};
use crate::particle::Particle;

/// Error type for kernel resolution and execution.
#[derive(Debug, Error)]
pub enum KernelError {
    /// Kernel name not present in the registry
    #[error("kernel '{0}' not found in the kernel registry")]
    UnknownKernel(String),

    /// A required fieldset constant was never attached
    #[error("kernel '{kernel}' requires fieldset constant '{name}', which is not attached")]
    MissingConstant {
        /// Kernel that needs the constant
        kernel: &'static str,
        /// Constant name
        name: &'static str,
    },

    /// A declared particle variable is not carried by the particle type
    #[error("kernel '{kernel}' declares unknown particle variable '{name}'")]
    UnknownVariable {
        /// Kernel that declared the variable
        kernel: &'static str,
        /// Variable name
        name: &'static str,
    },

    /// Field sampling failed during kernel execution
    #[error(transparent)]
    Field(#[from] FieldError),
}

/// Initial value for a declared particle variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VarInit {
    /// Zero (numeric) or false (boolean)
    Zero,
    /// Copied from the seed longitude
    SeedLon,
    /// Copied from the seed latitude
    SeedLat,
}

/// A per-particle variable a kernel needs.
#[derive(Clone, Copy, Debug)]
pub struct ParticleVariable {
    /// Variable name, matching [`Particle::var`]
    pub name: &'static str,
    /// Initial value at release
    pub init: VarInit,
    /// Whether the variable appears in trajectory output
    pub to_write: bool,
}

/// A named scalar a kernel needs on the field set, evaluated against
/// the assembled field set at setup time.
#[derive(Clone, Copy)]
pub struct FieldsetConstant {
    /// Constant name, looked up through [`FieldSet::constant`]
    pub name: &'static str,
    /// Evaluation function run once at assembly
    pub eval: fn(&FieldSet) -> f64,
}

impl std::fmt::Debug for FieldsetConstant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<FieldsetConstant {}>", self.name)
    }
}

/// Auxiliary state declared by a kernel.
#[derive(Debug, Default)]
pub struct KernelRequirements {
    /// Fieldset constants to attach before execution
    pub constants: Vec<FieldsetConstant>,
    /// Particle variables the kernel reads or writes
    pub particle_vars: Vec<ParticleVariable>,
}

impl KernelRequirements {
    /// Merge another set of requirements, dropping duplicates by name.
    pub fn merge(&mut self, other: KernelRequirements) {
        for c in other.constants {
            if !self.constants.iter().any(|e| e.name == c.name) {
                self.constants.push(c);
            }
        }
        for v in other.particle_vars {
            if !self.particle_vars.iter().any(|e| e.name == v.name) {
                self.particle_vars.push(v);
            }
        }
    }

    /// Names of the particle variables flagged for trajectory output.
    pub fn output_variables(&self) -> Vec<&'static str> {
        self.particle_vars
            .iter()
            .filter(|v| v.to_write)
            .map(|v| v.name)
            .collect()
    }
}

/// A per-step update rule applied to each particle.
pub trait Kernel: Send + Sync {
    /// Registry name, as written in the run configuration.
    fn name(&self) -> &'static str;

    /// Auxiliary field/particle state this kernel requires.
    fn requirements(&self) -> KernelRequirements {
        KernelRequirements::default()
    }

    /// Apply one step of this rule to `particle`.
    fn execute(
        &self,
        particle: &mut Particle,
        fieldset: &FieldSet,
        time: f64,
        dt: f64,
    ) -> Result<(), KernelError>;
}

/// Resolve configured kernel names against the registry.
///
/// Order is preserved; unknown names are an error.
pub fn resolve_kernels(names: &[String]) -> Result<Vec<Box<dyn Kernel>>, KernelError> {
    names
        .iter()
        .map(|name| -> Result<Box<dyn Kernel>, KernelError> {
            match name.as_str() {
                "AdvectionRK4" => Ok(Box::new(AdvectionRK4)),
                "AdvectionEE" => Ok(Box::new(AdvectionEE)),
                "boundary_check" => Ok(Box::new(BoundaryCheck)),
                "pathlength" => Ok(Box::new(PathLength)),
                other => Err(KernelError::UnknownKernel(other.to_string())),
            }
        })
        .collect()
}

/// Collect the merged requirements of a kernel list, validating that
/// every declared particle variable is one the particle type carries.
pub fn collect_requirements(
    kernels: &[Box<dyn Kernel>],
) -> Result<KernelRequirements, KernelError> {
    let mut merged = KernelRequirements::default();
    for kernel in kernels {
        let reqs = kernel.requirements();
        for v in &reqs.particle_vars {
            if !Particle::has_var(v.name) {
                return Err(KernelError::UnknownVariable {
                    kernel: kernel.name(),
                    name: v.name,
                });
            }
        }
        merged.merge(reqs);
    }
    Ok(merged)
}

/// Evaluate and attach every required fieldset constant.
pub fn attach_constants(fieldset: &mut FieldSet, requirements: &KernelRequirements) {
    let values: Vec<(&'static str, f64)> = requirements
        .constants
        .iter()
        .map(|c| (c.name, (c.eval)(fieldset)))
        .collect();
    for (name, value) in values {
        tracing::debug!(constant = name, value, "attaching fieldset constant");
        fieldset.add_constant(name, value);
    }
}
