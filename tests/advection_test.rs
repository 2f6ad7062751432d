//! Accuracy tests for the advection kernels.
//!
//! Verifies particle trajectories against analytic solutions: uniform
//! flow (exact displacement) and solid-body rotation (closed circular
//! orbits, where RK4 must hold the orbit radius far better than Euler).

use lpt_rs::kernel::{AdvectionEE, AdvectionRK4, Kernel};
use lpt_rs::particle::Particle;
use lpt_rs::types::M_PER_DEGREE;
use lpt_rs::{FieldSet, RegularGrid};

/// Uniform eastward flow of `u` m/s on an equatorial grid.
fn uniform_fieldset(u: f64) -> FieldSet {
    let lon: Vec<f64> = (0..41).map(|i| -2.0 + i as f64 * 0.1).collect();
    let lat: Vec<f64> = (0..41).map(|j| -2.0 + j as f64 * 0.1).collect();
    let grid = RegularGrid::new(lon, lat, vec![0.0]).unwrap();
    let n = grid.len();
    FieldSet::from_components(grid, vec![u; n], vec![0.0; n]).unwrap()
}

/// Solid-body rotation about (0°, 0°) with angular rate `omega` rad/s,
/// expressed in m/s so the kernels' unit conversion is exercised.
fn rotating_fieldset(omega: f64) -> FieldSet {
    let lon: Vec<f64> = (0..41).map(|i| -2.0 + i as f64 * 0.1).collect();
    let lat: Vec<f64> = (0..41).map(|j| -2.0 + j as f64 * 0.1).collect();
    let grid = RegularGrid::new(lon.clone(), lat.clone(), vec![0.0]).unwrap();

    let mut u = Vec::with_capacity(grid.len());
    let mut v = Vec::with_capacity(grid.len());
    for &la in &lat {
        for &lo in &lon {
            // dlon/dt = -omega * lat, dlat/dt = omega * lon (deg/s)
            u.push(-omega * la * M_PER_DEGREE * la.to_radians().cos());
            v.push(omega * lo * M_PER_DEGREE);
        }
    }
    FieldSet::from_components(grid, u, v).unwrap()
}

fn advect(kernel: &dyn Kernel, fieldset: &FieldSet, p: &mut Particle, dt: f64, n_steps: usize) {
    for step in 0..n_steps {
        let t = step as f64 * dt;
        kernel
            .execute(p, fieldset, t, dt)
            .unwrap_or_else(|e| panic!("kernel failed at step {}: {}", step, e));
    }
}

#[test]
fn test_uniform_flow_displacement() {
    // 0.5 m/s eastward at the equator for one day.
    let fieldset = uniform_fieldset(0.5);
    let dt = 300.0;
    let n_steps = 288; // 24 h

    let mut p = Particle::new(0, -1.5, 0.0, 0.0);
    advect(&AdvectionRK4, &fieldset, &mut p, dt, n_steps);

    let expected = -1.5 + 0.5 * 86_400.0 / M_PER_DEGREE;
    assert!(
        (p.lon - expected).abs() < 1e-6,
        "lon = {}, expected {}",
        p.lon,
        expected
    );
    assert!(p.lat.abs() < 1e-10, "lat drifted to {}", p.lat);
}

#[test]
fn test_rk4_closes_circular_orbit() {
    // One revolution per day; quarter revolution should carry the
    // particle from (1, 0) to (0, 1).
    let omega = 2.0 * std::f64::consts::PI / 86_400.0;
    let fieldset = rotating_fieldset(omega);
    let dt = 300.0;
    let n_steps = 72; // 6 h = quarter period

    let mut p = Particle::new(0, 1.0, 0.0, 0.0);
    advect(&AdvectionRK4, &fieldset, &mut p, dt, n_steps);

    println!("quarter orbit: ({:.5}, {:.5})", p.lon, p.lat);
    assert!((p.lon - 0.0).abs() < 0.02, "lon = {}", p.lon);
    assert!((p.lat - 1.0).abs() < 0.02, "lat = {}", p.lat);

    let radius = (p.lon * p.lon + p.lat * p.lat).sqrt();
    assert!((radius - 1.0).abs() < 0.02, "radius = {}", radius);
}

#[test]
fn test_rk4_beats_euler_on_rotation() {
    let omega = 2.0 * std::f64::consts::PI / 86_400.0;
    let fieldset = rotating_fieldset(omega);
    let dt = 1800.0; // coarse step to expose the order difference
    let n_steps = 48; // one full revolution

    let mut p_rk4 = Particle::new(0, 1.0, 0.0, 0.0);
    let mut p_ee = Particle::new(1, 1.0, 0.0, 0.0);
    advect(&AdvectionRK4, &fieldset, &mut p_rk4, dt, n_steps);
    advect(&AdvectionEE, &fieldset, &mut p_ee, dt, n_steps);

    let radius_err = |p: &Particle| ((p.lon * p.lon + p.lat * p.lat).sqrt() - 1.0).abs();
    println!(
        "radius error after one revolution: RK4 = {:.2e}, Euler = {:.2e}",
        radius_err(&p_rk4),
        radius_err(&p_ee)
    );

    // Explicit Euler spirals outward; RK4 must do at least an order of
    // magnitude better at this step size.
    assert!(radius_err(&p_rk4) < 0.1 * radius_err(&p_ee));
    assert!(radius_err(&p_rk4) < 0.05);
}
