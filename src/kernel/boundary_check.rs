//! Out-of-bounds particle removal.

use crate::field::FieldSet;
use crate::particle::Particle;

use super::{
    FieldsetConstant, Kernel, KernelError, KernelRequirements, ParticleVariable, VarInit,
};

/// Margin in degrees applied to the domain edge coordinates.
const BOUNDARY_MARGIN: f64 = 0.03;

fn lat_min(fs: &FieldSet) -> f64 {
    fs.grid().lat[0]
}
fn lat_max(fs: &FieldSet) -> f64 {
    fs.grid().lat[fs.grid().n_lat() - 1]
}
fn lon_min(fs: &FieldSet) -> f64 {
    fs.grid().lon[0]
}
fn lon_max(fs: &FieldSet) -> f64 {
    fs.grid().lon[fs.grid().n_lon() - 1]
}

/// Removal kernel: delete particles that leave the field extent.
///
/// Requires the grid edge coordinates as fieldset constants. The margin
/// is subtracted on every side, so removal triggers slightly outside
/// the western/southern edges and slightly inside the eastern/northern
/// edges, keeping particles clear of the last grid cell before
/// interpolation can fail there.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoundaryCheck;

impl Kernel for BoundaryCheck {
    fn name(&self) -> &'static str {
        "boundary_check"
    }

    fn requirements(&self) -> KernelRequirements {
        KernelRequirements {
            constants: vec![
                FieldsetConstant { name: "lat_min", eval: lat_min },
                FieldsetConstant { name: "lat_max", eval: lat_max },
                FieldsetConstant { name: "lon_min", eval: lon_min },
                FieldsetConstant { name: "lon_max", eval: lon_max },
            ],
            particle_vars: vec![ParticleVariable {
                name: "out_of_bounds",
                init: VarInit::Zero,
                to_write: true,
            }],
        }
    }

    fn execute(
        &self,
        p: &mut Particle,
        fieldset: &FieldSet,
        _time: f64,
        _dt: f64,
    ) -> Result<(), KernelError> {
        let constant = |name: &'static str| {
            fieldset.constant(name).ok_or(KernelError::MissingConstant {
                kernel: "boundary_check",
                name,
            })
        };
        let lat_min = constant("lat_min")?;
        let lat_max = constant("lat_max")?;
        let lon_min = constant("lon_min")?;
        let lon_max = constant("lon_max")?;

        if p.lon < lon_min - BOUNDARY_MARGIN
            || p.lon > lon_max - BOUNDARY_MARGIN
            || p.lat < lat_min - BOUNDARY_MARGIN
            || p.lat > lat_max - BOUNDARY_MARGIN
        {
            p.out_of_bounds = true;
            p.delete();
        }

        Ok(())
    }
}
