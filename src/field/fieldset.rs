//! Velocity field set: U and V components plus named constants.

use std::collections::HashMap;
use std::sync::Arc;

use super::{Field, FieldError, RegularGrid};

/// Coordinate tolerance when checking that two field sets share a grid.
const COORD_TOL: f64 = 1e-9;

/// Gridded velocity data over space and time used to advect particles.
///
/// Bundles the eastward (`u`) and northward (`v`) components on a shared
/// [`RegularGrid`], plus named scalar constants that kernels attach at
/// assembly time (grid bounds, thresholds).
///
/// # Example
///
/// ```
/// use lpt_rs::field::{FieldSet, RegularGrid};
///
/// let grid = RegularGrid::new(
///     vec![0.0, 1.0],
///     vec![0.0, 1.0],
///     vec![0.0],
/// ).unwrap();
/// let n = grid.len();
/// let mut fs = FieldSet::from_components(grid, vec![0.1; n], vec![0.0; n]).unwrap();
/// fs.add_constant("lat_min", 0.0);
///
/// let (u, v) = fs.velocity(0.0, 0.5, 0.5).unwrap();
/// assert!((u - 0.1).abs() < 1e-12);
/// assert_eq!(v, 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct FieldSet {
    grid: Arc<RegularGrid>,
    /// Eastward velocity component (m/s)
    pub u: Field,
    /// Northward velocity component (m/s)
    pub v: Field,
    constants: HashMap<String, f64>,
}

impl FieldSet {
    /// Build a field set from flat `[time][lat][lon]` component arrays.
    pub fn from_components(
        grid: RegularGrid,
        u: Vec<f64>,
        v: Vec<f64>,
    ) -> Result<Self, FieldError> {
        let grid = Arc::new(grid);
        let u = Field::new("U", grid.clone(), u)?;
        let v = Field::new("V", grid.clone(), v)?;
        Ok(Self {
            grid,
            u,
            v,
            constants: HashMap::new(),
        })
    }

    /// Build a field set from already-constructed component fields.
    ///
    /// Both fields must be defined on the same grid.
    pub fn from_fields(u: Field, v: Field) -> Result<Self, FieldError> {
        if !u.grid().same_coords(v.grid().as_ref(), COORD_TOL) {
            return Err(FieldError::GridMismatch("U and V on different grids"));
        }
        let grid = u.grid().clone();
        Ok(Self {
            grid,
            u,
            v,
            constants: HashMap::new(),
        })
    }

    /// The shared grid.
    #[inline]
    pub fn grid(&self) -> &RegularGrid {
        &self.grid
    }

    /// Interpolated (u, v) velocity at (`time`, `lon`, `lat`) in m/s.
    pub fn velocity(&self, time: f64, lon: f64, lat: f64) -> Result<(f64, f64), FieldError> {
        let u = self.u.sample(time, lon, lat)?;
        let v = self.v.sample(time, lon, lat)?;
        Ok((u, v))
    }

    /// Attach a named scalar constant.
    ///
    /// Replaces any existing constant with the same name.
    pub fn add_constant(&mut self, name: impl Into<String>, value: f64) {
        self.constants.insert(name.into(), value);
    }

    /// Look up a named constant.
    pub fn constant(&self, name: &str) -> Option<f64> {
        self.constants.get(name).copied()
    }

    /// Names of all attached constants.
    pub fn constant_names(&self) -> impl Iterator<Item = &str> {
        self.constants.keys().map(String::as_str)
    }

    /// Add another field set sample-wise, producing a combined set.
    ///
    /// Both sets must share grid shape and coordinates. NaN (land)
    /// samples propagate, so land in either input stays land in the
    /// result. Constants from `self` are carried over.
    pub fn add(&self, other: &FieldSet) -> Result<FieldSet, FieldError> {
        if self.grid.lon.len() != other.grid.lon.len()
            || self.grid.lat.len() != other.grid.lat.len()
            || self.grid.time.len() != other.grid.time.len()
        {
            return Err(FieldError::GridMismatch("different shapes"));
        }
        if !self.grid.same_coords(&other.grid, COORD_TOL) {
            return Err(FieldError::GridMismatch("different coordinates"));
        }

        let sum = |a: &Field, b: &Field| -> Vec<f64> {
            a.data().iter().zip(b.data()).map(|(x, y)| x + y).collect()
        };

        let u = Field::new("U", self.grid.clone(), sum(&self.u, &other.u))?;
        let v = Field::new("V", self.grid.clone(), sum(&self.v, &other.v))?;

        Ok(FieldSet {
            grid: self.grid.clone(),
            u,
            v,
            constants: self.constants.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_grid() -> RegularGrid {
        RegularGrid::new(vec![0.0, 1.0], vec![0.0, 1.0], vec![0.0]).unwrap()
    }

    #[test]
    fn test_constants() {
        let g = small_grid();
        let n = g.len();
        let mut fs = FieldSet::from_components(g, vec![0.0; n], vec![0.0; n]).unwrap();

        assert_eq!(fs.constant("lat_min"), None);
        fs.add_constant("lat_min", -5.0);
        assert_eq!(fs.constant("lat_min"), Some(-5.0));
        fs.add_constant("lat_min", -6.0);
        assert_eq!(fs.constant("lat_min"), Some(-6.0));
    }

    #[test]
    fn test_add_combines_samples() {
        let g = small_grid();
        let n = g.len();
        let a = FieldSet::from_components(g.clone(), vec![1.0; n], vec![2.0; n]).unwrap();
        let b = FieldSet::from_components(g, vec![0.5; n], vec![-2.0; n]).unwrap();

        let c = a.add(&b).unwrap();
        assert!((c.u.data()[0] - 1.5).abs() < 1e-12);
        assert_eq!(c.v.data()[0], 0.0);
    }

    #[test]
    fn test_add_propagates_land() {
        let g = small_grid();
        let n = g.len();
        let mut u = vec![1.0; n];
        u[0] = f64::NAN;
        let a = FieldSet::from_components(g.clone(), u, vec![0.0; n]).unwrap();
        let b = FieldSet::from_components(g, vec![1.0; n], vec![0.0; n]).unwrap();

        let c = a.add(&b).unwrap();
        assert!(c.u.data()[0].is_nan());
        assert!((c.u.data()[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_add_rejects_different_grids() {
        let a_grid = small_grid();
        let b_grid = RegularGrid::new(vec![0.0, 2.0], vec![0.0, 1.0], vec![0.0]).unwrap();
        let n = a_grid.len();
        let a = FieldSet::from_components(a_grid, vec![0.0; n], vec![0.0; n]).unwrap();
        let b = FieldSet::from_components(b_grid, vec![0.0; n], vec![0.0; n]).unwrap();

        assert!(matches!(a.add(&b), Err(FieldError::GridMismatch(_))));
    }
}
