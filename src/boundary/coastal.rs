//! Synthetic no-slip coastal boundary current.
//!
//! Derives an artificial velocity field that pushes particles away from
//! land, from nothing but the land/ocean mask implied by a velocity
//! field's non-finite samples. The result is added to the main field set
//! so tracers feel a coastal current where the ocean model resolves none.
//!
//! The construction: differentiate the land mask to get vectors pointing
//! down the land gradient (i.e. seaward), discard weak gradients below a
//! magnitude threshold, normalize to unit vectors, and smooth with a
//! centered rolling mean.

use tracing::debug;

use crate::field::{Field, FieldError, FieldSet, GridAxis};

/// Parameters for coastal boundary synthesis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoastalBoundaryConfig {
    /// Centered window size for the smoothing rolling mean.
    pub rolling_window: usize,
    /// Minimum raw gradient magnitude kept as boundary signal.
    pub threshold: f64,
}

impl Default for CoastalBoundaryConfig {
    fn default() -> Self {
        Self {
            rolling_window: 3,
            threshold: 2000.0,
        }
    }
}

/// Scale applied to the mask gradient before thresholding.
const GRADIENT_SCALE: f64 = 1e3;

/// Land/ocean mask for one time level of a field: 1.0 over land
/// (non-finite samples), 0.0 over water.
pub fn land_mask(field: &Field, t: usize) -> Vec<f64> {
    field
        .level(t)
        .iter()
        .map(|v| if v.is_finite() { 0.0 } else { 1.0 })
        .collect()
}

/// Synthesize an artificial coastal boundary field set from the land
/// mask of `fieldset`'s U component.
///
/// The mask is taken from a single time level (index 1, clamped to the
/// last available level) and the finished boundary is replicated across
/// every time level of the grid, so the result can be added directly to
/// `fieldset` with [`FieldSet::add`].
pub fn synthesize_coastal_boundary(
    fieldset: &FieldSet,
    config: &CoastalBoundaryConfig,
) -> Result<FieldSet, FieldError> {
    let grid = fieldset.grid();
    let (n_lat, n_lon) = (grid.n_lat(), grid.n_lon());

    // Land state is taken from a single level; index 1 skips a possibly
    // degenerate initial record.
    let t = 1usize.min(grid.n_time() - 1);
    let mask = land_mask(&fieldset.u, t);
    let n_land = mask.iter().filter(|&&m| m > 0.0).count();
    debug!(
        level = t,
        land_cells = n_land,
        total_cells = mask.len(),
        "extracted land mask for coastal boundary"
    );

    // Down-gradient vectors point from land into open water.
    let mut u_b: Vec<f64> = grid
        .differentiate(&mask, GridAxis::Lon)
        .iter()
        .map(|d| -(GRADIENT_SCALE * d))
        .collect();
    let mut v_b: Vec<f64> = grid
        .differentiate(&mask, GridAxis::Lat)
        .iter()
        .map(|d| -(GRADIENT_SCALE * d))
        .collect();

    // Threshold on magnitude, then normalize survivors to unit vectors.
    for (u, v) in u_b.iter_mut().zip(v_b.iter_mut()) {
        let norm = (*u * *u + *v * *v).sqrt();
        if norm > config.threshold {
            *u /= norm;
            *v /= norm;
        } else {
            *u = 0.0;
            *v = 0.0;
        }
    }

    let u_s = rolling_mean_2d(&u_b, n_lat, n_lon, config.rolling_window);
    let v_s = rolling_mean_2d(&v_b, n_lat, n_lon, config.rolling_window);

    let grid = std::sync::Arc::new(grid.clone());
    let u = Field::from_level("U", grid.clone(), &u_s)?;
    let v = Field::from_level("V", grid, &v_s)?;

    FieldSet::from_fields(u, v)
}

/// Centered 2D rolling mean over a `[lat][lon]` level.
///
/// The mean is taken over the samples actually inside the grid, so edge
/// cells average a truncated window instead of going undefined.
fn rolling_mean_2d(level: &[f64], n_lat: usize, n_lon: usize, window: usize) -> Vec<f64> {
    debug_assert!(window >= 1);
    let half = window / 2;
    let mut out = vec![0.0; level.len()];

    for j in 0..n_lat {
        let j0 = j.saturating_sub(half);
        let j1 = (j + half).min(n_lat - 1);
        for i in 0..n_lon {
            let i0 = i.saturating_sub(half);
            let i1 = (i + half).min(n_lon - 1);

            let mut sum = 0.0;
            let mut count = 0usize;
            for jj in j0..=j1 {
                for ii in i0..=i1 {
                    sum += level[jj * n_lon + ii];
                    count += 1;
                }
            }
            out[j * n_lon + i] = sum / count as f64;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::RegularGrid;

    /// 8x8 grid at 0.1° spacing, land occupying the two easternmost
    /// columns of the U field.
    fn coastal_fieldset() -> FieldSet {
        let lon: Vec<f64> = (0..8).map(|i| i as f64 * 0.1).collect();
        let lat: Vec<f64> = (0..8).map(|j| 60.0 + j as f64 * 0.1).collect();
        let grid = RegularGrid::new(lon, lat, vec![0.0, 3600.0]).unwrap();

        let mut u = Vec::with_capacity(grid.len());
        for _t in 0..2 {
            for _j in 0..8 {
                for i in 0..8 {
                    u.push(if i >= 6 { f64::NAN } else { 0.2 });
                }
            }
        }
        let v = vec![0.0; u.len()];
        FieldSet::from_components(grid, u, v).unwrap()
    }

    #[test]
    fn test_land_mask() {
        let fs = coastal_fieldset();
        let mask = land_mask(&fs.u, 1);
        assert_eq!(mask.len(), 64);
        assert_eq!(mask[0], 0.0);
        assert_eq!(mask[7], 1.0);
        assert_eq!(mask.iter().sum::<f64>(), 16.0);
    }

    #[test]
    fn test_boundary_points_away_from_land() {
        let fs = coastal_fieldset();
        let boundary = synthesize_coastal_boundary(&fs, &CoastalBoundaryConfig::default()).unwrap();

        // Land is to the east; the coastal current must have a westward
        // (negative U) component in the nearshore water cells.
        let row = 4;
        let near_coast = boundary.u.value_at(0, row, 5);
        assert!(
            near_coast < 0.0,
            "expected westward boundary current, got {}",
            near_coast
        );

        // Far from the coast the boundary vanishes.
        let offshore = boundary.u.value_at(0, row, 1);
        assert_eq!(offshore, 0.0);
    }

    #[test]
    fn test_threshold_filters_weak_gradients() {
        let fs = coastal_fieldset();
        // At 0.1° spacing the raw gradient magnitude is a few thousand;
        // an absurd threshold should suppress the entire boundary.
        let config = CoastalBoundaryConfig {
            rolling_window: 3,
            threshold: 1e9,
        };
        let boundary = synthesize_coastal_boundary(&fs, &config).unwrap();
        assert!(boundary.u.data().iter().all(|&v| v == 0.0));
        assert!(boundary.v.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_boundary_is_broadcast_over_time() {
        let fs = coastal_fieldset();
        let boundary = synthesize_coastal_boundary(&fs, &CoastalBoundaryConfig::default()).unwrap();

        assert_eq!(boundary.grid().n_time(), fs.grid().n_time());
        assert_eq!(boundary.u.level(0), boundary.u.level(1));
    }

    #[test]
    fn test_combined_with_main_fieldset() {
        let fs = coastal_fieldset();
        let boundary = synthesize_coastal_boundary(&fs, &CoastalBoundaryConfig::default()).unwrap();
        let combined = fs.add(&boundary).unwrap();

        // Land stays land after the merge.
        assert!(combined.u.value_at(0, 4, 7).is_nan());
        // Open water keeps the background flow where the boundary is zero.
        assert!((combined.u.value_at(0, 4, 1) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_rolling_mean_uniform_field() {
        let level = vec![2.0; 25];
        let out = rolling_mean_2d(&level, 5, 5, 3);
        assert!(out.iter().all(|&v| (v - 2.0).abs() < 1e-12));
    }

    #[test]
    fn test_rolling_mean_smooths_spike() {
        let mut level = vec![0.0; 25];
        level[12] = 9.0; // center of a 5x5 grid
        let out = rolling_mean_2d(&level, 5, 5, 3);
        assert!((out[12] - 1.0).abs() < 1e-12);
        assert!((out[6] - 1.0).abs() < 1e-12);
        assert_eq!(out[0], 0.0);
    }
}
