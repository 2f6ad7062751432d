//! Built-in advection kernels.
//!
//! Velocities are sampled in m/s and converted to degrees per second
//! with the spherical-Earth factor [`M_PER_DEGREE`], with the longitude
//! rate additionally scaled by `1 / cos(lat)` at the sample latitude.

use crate::field::FieldSet;
use crate::particle::Particle;
use crate::types::M_PER_DEGREE;

use super::{Kernel, KernelError};

/// Velocity in degrees per second at a given latitude.
#[inline]
fn deg_per_s(u: f64, v: f64, lat: f64) -> (f64, f64) {
    let dlon = u / (M_PER_DEGREE * lat.to_radians().cos());
    let dlat = v / M_PER_DEGREE;
    (dlon, dlat)
}

/// 4th-order Runge-Kutta advection.
///
/// The standard workhorse scheme: four velocity samples per step, with
/// intermediate positions evaluated at half and full step offsets.
#[derive(Clone, Copy, Debug, Default)]
pub struct AdvectionRK4;

impl Kernel for AdvectionRK4 {
    fn name(&self) -> &'static str {
        "AdvectionRK4"
    }

    fn execute(
        &self,
        p: &mut Particle,
        fieldset: &FieldSet,
        time: f64,
        dt: f64,
    ) -> Result<(), KernelError> {
        let (u1, v1) = fieldset.velocity(time, p.lon, p.lat)?;
        let (k1_lon, k1_lat) = deg_per_s(u1, v1, p.lat);

        let (lon1, lat1) = (p.lon + 0.5 * dt * k1_lon, p.lat + 0.5 * dt * k1_lat);
        let (u2, v2) = fieldset.velocity(time + 0.5 * dt, lon1, lat1)?;
        let (k2_lon, k2_lat) = deg_per_s(u2, v2, lat1);

        let (lon2, lat2) = (p.lon + 0.5 * dt * k2_lon, p.lat + 0.5 * dt * k2_lat);
        let (u3, v3) = fieldset.velocity(time + 0.5 * dt, lon2, lat2)?;
        let (k3_lon, k3_lat) = deg_per_s(u3, v3, lat2);

        let (lon3, lat3) = (p.lon + dt * k3_lon, p.lat + dt * k3_lat);
        let (u4, v4) = fieldset.velocity(time + dt, lon3, lat3)?;
        let (k4_lon, k4_lat) = deg_per_s(u4, v4, lat3);

        p.lon += dt / 6.0 * (k1_lon + 2.0 * k2_lon + 2.0 * k3_lon + k4_lon);
        p.lat += dt / 6.0 * (k1_lat + 2.0 * k2_lat + 2.0 * k3_lat + k4_lat);

        Ok(())
    }
}

/// Explicit-Euler advection (1st order).
///
/// One velocity sample per step. Useful for testing and for very short
/// steps; RK4 should be preferred otherwise.
#[derive(Clone, Copy, Debug, Default)]
pub struct AdvectionEE;

impl Kernel for AdvectionEE {
    fn name(&self) -> &'static str {
        "AdvectionEE"
    }

    fn execute(
        &self,
        p: &mut Particle,
        fieldset: &FieldSet,
        time: f64,
        dt: f64,
    ) -> Result<(), KernelError> {
        let (u, v) = fieldset.velocity(time, p.lon, p.lat)?;
        let (k_lon, k_lat) = deg_per_s(u, v, p.lat);

        p.lon += dt * k_lon;
        p.lat += dt * k_lat;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldError, FieldSet, RegularGrid};
    use crate::types::M_PER_DEGREE;

    /// Uniform eastward flow of `u` m/s on a grid straddling the equator.
    fn uniform_flow(u: f64) -> FieldSet {
        let lon: Vec<f64> = (0..11).map(|i| i as f64).collect();
        let lat: Vec<f64> = (0..5).map(|j| -2.0 + j as f64).collect();
        let grid = RegularGrid::new(lon, lat, vec![0.0, 1e6]).unwrap();
        let n = grid.len();
        FieldSet::from_components(grid, vec![u; n], vec![0.0; n]).unwrap()
    }

    #[test]
    fn test_euler_uniform_flow() {
        let fs = uniform_flow(1.0);
        let mut p = Particle::new(0, 1.0, 0.0, 0.0);

        // 1 m/s eastward at the equator: one degree takes M_PER_DEGREE seconds
        let dt = M_PER_DEGREE;
        AdvectionEE.execute(&mut p, &fs, 0.0, dt).unwrap();
        assert!((p.lon - 2.0).abs() < 1e-10, "lon = {}", p.lon);
        assert!(p.lat.abs() < 1e-12);
    }

    #[test]
    fn test_rk4_matches_euler_in_uniform_flow() {
        // In a uniform field all four RK4 stages sample the same velocity
        // apart from the cos(lat) metric, so RK4 and Euler agree closely.
        let fs = uniform_flow(0.5);
        let mut pe = Particle::new(0, 1.0, 0.0, 0.0);
        let mut pr = Particle::new(1, 1.0, 0.0, 0.0);

        let dt = 3600.0;
        AdvectionEE.execute(&mut pe, &fs, 0.0, dt).unwrap();
        AdvectionRK4.execute(&mut pr, &fs, 0.0, dt).unwrap();

        assert!((pe.lon - pr.lon).abs() < 1e-8);
        assert!((pe.lat - pr.lat).abs() < 1e-12);
    }

    #[test]
    fn test_cos_lat_scaling() {
        // The same eastward speed covers more degrees at high latitude.
        let lon: Vec<f64> = (0..11).map(|i| i as f64).collect();
        let lat: Vec<f64> = vec![0.0, 30.0, 60.0, 61.0];
        let grid = RegularGrid::new(lon, lat, vec![0.0]).unwrap();
        let n = grid.len();
        let fs = FieldSet::from_components(grid, vec![1.0; n], vec![0.0; n]).unwrap();

        let dt = 3600.0;
        let mut p_eq = Particle::new(0, 5.0, 0.0, 0.0);
        let mut p_60 = Particle::new(1, 5.0, 60.0, 0.0);
        AdvectionEE.execute(&mut p_eq, &fs, 0.0, dt).unwrap();
        AdvectionEE.execute(&mut p_60, &fs, 0.0, dt).unwrap();

        let d_eq = p_eq.lon - 5.0;
        let d_60 = p_60.lon - 5.0;
        assert!(
            (d_60 / d_eq - 2.0).abs() < 1e-9,
            "expected 1/cos(60°) = 2, got {}",
            d_60 / d_eq
        );
    }

    #[test]
    fn test_advection_out_of_bounds() {
        let fs = uniform_flow(1.0);
        let mut p = Particle::new(0, 20.0, 0.0, 0.0);
        let err = AdvectionEE.execute(&mut p, &fs, 0.0, 60.0).unwrap_err();
        assert!(matches!(err, KernelError::Field(FieldError::OutOfBounds { .. })));
    }
}
