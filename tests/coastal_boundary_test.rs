//! Integration tests for coastal boundary synthesis.
//!
//! Builds a velocity field with an island of NaN (land) samples and
//! checks that the synthesized boundary current points seaward on every
//! side of the island, and that it actually keeps an advected particle
//! off the coast.

use lpt_rs::boundary::{CoastalBoundaryConfig, synthesize_coastal_boundary};
use lpt_rs::kernel::resolve_kernels;
use lpt_rs::particle::ParticleSet;
use lpt_rs::simulation::{ExecutionConfig, Simulation};
use lpt_rs::{FieldSet, RegularGrid};

const N: usize = 21;

/// 21x21 grid at 0.1° spacing with a 5x5 island of land in the middle
/// and a uniform background flow of (`u0`, `v0`) m/s elsewhere.
fn island_fieldset(u0: f64, v0: f64) -> FieldSet {
    let lon: Vec<f64> = (0..N).map(|i| i as f64 * 0.1).collect();
    let lat: Vec<f64> = (0..N).map(|j| 60.0 + j as f64 * 0.1).collect();
    let grid = RegularGrid::new(lon, lat, vec![0.0, 86_400.0]).unwrap();

    let island = |i: usize, j: usize| (8..=12).contains(&i) && (8..=12).contains(&j);

    let mut u = Vec::with_capacity(grid.len());
    let mut v = Vec::with_capacity(grid.len());
    for _t in 0..2 {
        for j in 0..N {
            for i in 0..N {
                if island(i, j) {
                    u.push(f64::NAN);
                    v.push(f64::NAN);
                } else {
                    u.push(u0);
                    v.push(v0);
                }
            }
        }
    }
    FieldSet::from_components(grid, u, v).unwrap()
}

#[test]
fn test_boundary_points_seaward_around_island() {
    let fieldset = island_fieldset(0.0, 0.0);
    let boundary =
        synthesize_coastal_boundary(&fieldset, &CoastalBoundaryConfig::default()).unwrap();

    // Mid-latitude row, water cells flanking the island: west side gets
    // a westward current, east side an eastward one.
    let j = 10;
    let west = boundary.u.value_at(0, j, 7);
    let east = boundary.u.value_at(0, j, 13);
    println!("west = {:.3}, east = {:.3}", west, east);
    assert!(west < 0.0, "west flank should push west, got {}", west);
    assert!(east > 0.0, "east flank should push east, got {}", east);

    // Mid-longitude column: south flank pushes south, north flank north.
    let i = 10;
    let south = boundary.v.value_at(0, 7, i);
    let north = boundary.v.value_at(0, 13, i);
    assert!(south < 0.0, "south flank should push south, got {}", south);
    assert!(north > 0.0, "north flank should push north, got {}", north);

    // No spurious currents in the far field.
    assert_eq!(boundary.u.value_at(0, 1, 1), 0.0);
    assert_eq!(boundary.v.value_at(0, 1, 1), 0.0);
}

#[test]
fn test_smoothing_window_spreads_the_current() {
    let fieldset = island_fieldset(0.0, 0.0);

    let narrow = synthesize_coastal_boundary(
        &fieldset,
        &CoastalBoundaryConfig {
            rolling_window: 1,
            threshold: 2000.0,
        },
    )
    .unwrap();
    let wide = synthesize_coastal_boundary(
        &fieldset,
        &CoastalBoundaryConfig {
            rolling_window: 5,
            threshold: 2000.0,
        },
    )
    .unwrap();

    // Two cells off the west flank: only the wider window reaches it.
    let j = 10;
    assert_eq!(narrow.u.value_at(0, j, 5), 0.0);
    assert!(wide.u.value_at(0, j, 5) < 0.0);
}

#[test]
fn test_boundary_keeps_particle_off_the_coast() {
    // Background flow carries the particle straight at the island's
    // west flank.
    let fieldset = island_fieldset(0.3, 0.0);
    let boundary =
        synthesize_coastal_boundary(&fieldset, &CoastalBoundaryConfig::default()).unwrap();
    let combined = fieldset.add(&boundary).unwrap();

    let kernels = resolve_kernels(&["AdvectionRK4".to_string()]).unwrap();
    let sim = Simulation::new(
        combined,
        kernels,
        ExecutionConfig::new(86_400.0, 300.0),
    )
    .unwrap();

    // Seeded due west of the island, on its centerline.
    let mut pset = ParticleSet::from_seeds(&[0.3], &[61.0], 0.0);
    let result = sim.run(&mut pset);
    assert!(result.success, "error: {:?}", result.error);
    assert_eq!(result.particles_remaining, 1, "particle was lost");

    // The island interior spans [0.8°, 1.2°] in both axes; the boundary
    // current must have deflected the particle around (or held it off)
    // the land cells.
    let p = &pset.particles()[0];
    println!("final position: ({:.3}, {:.3})", p.lon, p.lat);
    let inside_island =
        p.lon > 0.8 && p.lon < 1.2 && p.lat > 60.8 && p.lat < 61.2;
    assert!(!inside_island, "particle beached at ({}, {})", p.lon, p.lat);
}
