//! Cumulative path length.

use crate::field::FieldSet;
use crate::particle::Particle;
use crate::types::KM_PER_DEGREE;

use super::{Kernel, KernelError, KernelRequirements, ParticleVariable, VarInit};

/// Bookkeeping kernel: accumulate the distance traveled by a particle.
///
/// The step distance is the flat-Earth approximation of the great
/// circle: degree offsets scaled by [`KM_PER_DEGREE`], with the
/// longitude leg additionally scaled by `cos(lat)`. Requires the
/// previous position and the running total as particle variables; only
/// `distance` (km) is written to output.
#[derive(Clone, Copy, Debug, Default)]
pub struct PathLength;

impl Kernel for PathLength {
    fn name(&self) -> &'static str {
        "pathlength"
    }

    fn requirements(&self) -> KernelRequirements {
        KernelRequirements {
            constants: Vec::new(),
            particle_vars: vec![
                ParticleVariable {
                    name: "distance",
                    init: VarInit::Zero,
                    to_write: true,
                },
                ParticleVariable {
                    name: "prev_lon",
                    init: VarInit::SeedLon,
                    to_write: false,
                },
                ParticleVariable {
                    name: "prev_lat",
                    init: VarInit::SeedLat,
                    to_write: false,
                },
                ParticleVariable {
                    name: "out_of_bounds",
                    init: VarInit::Zero,
                    to_write: true,
                },
            ],
        }
    }

    fn execute(
        &self,
        p: &mut Particle,
        _fieldset: &FieldSet,
        _time: f64,
        _dt: f64,
    ) -> Result<(), KernelError> {
        let lat_dist = (p.lat - p.prev_lat) * KM_PER_DEGREE;
        let lon_dist = (p.lon - p.prev_lon) * KM_PER_DEGREE * p.lat.to_radians().cos();

        p.distance += (lon_dist * lon_dist + lat_dist * lat_dist).sqrt();
        p.prev_lon = p.lon;
        p.prev_lat = p.lat;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::RegularGrid;

    fn dummy_fieldset() -> FieldSet {
        let grid = RegularGrid::new(vec![0.0, 10.0], vec![-1.0, 80.0], vec![0.0]).unwrap();
        let n = grid.len();
        FieldSet::from_components(grid, vec![0.0; n], vec![0.0; n]).unwrap()
    }

    #[test]
    fn test_meridional_leg() {
        let fs = dummy_fieldset();
        let mut p = Particle::new(0, 5.0, 0.0, 0.0);
        p.lat = 1.0; // moved one degree north since release

        PathLength.execute(&mut p, &fs, 0.0, 60.0).unwrap();
        assert!(
            (p.distance - KM_PER_DEGREE).abs() < 1e-9,
            "distance = {}",
            p.distance
        );
        assert_eq!(p.prev_lat, 1.0);
    }

    #[test]
    fn test_zonal_leg_scales_with_cos_lat() {
        let fs = dummy_fieldset();
        let mut p = Particle::new(0, 5.0, 60.0, 0.0);
        p.lon = 6.0;

        PathLength.execute(&mut p, &fs, 0.0, 60.0).unwrap();
        let expected = KM_PER_DEGREE * 60.0f64.to_radians().cos();
        assert!(
            (p.distance - expected).abs() < 1e-9,
            "distance = {}, expected {}",
            p.distance,
            expected
        );
    }

    #[test]
    fn test_accumulates_over_steps() {
        let fs = dummy_fieldset();
        let mut p = Particle::new(0, 5.0, 0.0, 0.0);

        p.lat = 1.0;
        PathLength.execute(&mut p, &fs, 0.0, 60.0).unwrap();
        p.lat = 2.0;
        PathLength.execute(&mut p, &fs, 60.0, 60.0).unwrap();

        assert!(
            (p.distance - 2.0 * KM_PER_DEGREE).abs() < 1e-9,
            "distance = {}",
            p.distance
        );
    }

    #[test]
    fn test_stationary_particle() {
        let fs = dummy_fieldset();
        let mut p = Particle::new(0, 5.0, 30.0, 0.0);
        PathLength.execute(&mut p, &fs, 0.0, 60.0).unwrap();
        assert_eq!(p.distance, 0.0);
    }
}
