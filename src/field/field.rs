//! A single gridded scalar field with space/time interpolation.

use std::sync::Arc;

use super::{FieldError, RegularGrid};

/// One velocity component (or any scalar) on a [`RegularGrid`].
///
/// Samples are stored flat in `[time][lat][lon]` order. Non-finite
/// samples mark land; they contribute zero to interpolated values, so
/// velocities taper to rest toward the coast.
#[derive(Debug, Clone)]
pub struct Field {
    /// Field name (as configured, e.g. "U")
    pub name: String,
    grid: Arc<RegularGrid>,
    data: Vec<f64>,
}

impl Field {
    /// Create a field from flat `[time][lat][lon]` samples.
    pub fn new(
        name: impl Into<String>,
        grid: Arc<RegularGrid>,
        data: Vec<f64>,
    ) -> Result<Self, FieldError> {
        let name = name.into();
        if data.len() != grid.len() {
            return Err(FieldError::ShapeMismatch {
                name,
                len: data.len(),
                expected: grid.len(),
            });
        }
        Ok(Self { name, grid, data })
    }

    /// Create a field by replicating a single `[lat][lon]` level across
    /// every time level of the grid.
    pub fn from_level(
        name: impl Into<String>,
        grid: Arc<RegularGrid>,
        level: &[f64],
    ) -> Result<Self, FieldError> {
        let name = name.into();
        if level.len() != grid.level_len() {
            return Err(FieldError::ShapeMismatch {
                name,
                len: level.len(),
                expected: grid.level_len(),
            });
        }
        let mut data = Vec::with_capacity(grid.len());
        for _ in 0..grid.n_time() {
            data.extend_from_slice(level);
        }
        Ok(Self { name, grid, data })
    }

    /// The grid this field is defined on.
    #[inline]
    pub fn grid(&self) -> &Arc<RegularGrid> {
        &self.grid
    }

    /// Raw samples in `[time][lat][lon]` order.
    #[inline]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// One `[lat][lon]` time level as a slice.
    pub fn level(&self, t: usize) -> &[f64] {
        let n = self.grid.level_len();
        &self.data[t * n..(t + 1) * n]
    }

    /// Sample at grid indices (no interpolation).
    #[inline]
    pub fn value_at(&self, t: usize, j: usize, i: usize) -> f64 {
        self.data[(t * self.grid.n_lat() + j) * self.grid.n_lon() + i]
    }

    /// Interpolate the field at (`time`, `lon`, `lat`).
    ///
    /// Bilinear in space, linear in time. A field with a single time
    /// level is treated as constant in time. Non-finite (land) samples
    /// contribute zero.
    pub fn sample(&self, time: f64, lon: f64, lat: f64) -> Result<f64, FieldError> {
        let (i, fx) = RegularGrid::locate(&self.grid.lon, lon)
            .ok_or(FieldError::OutOfBounds { lon, lat })?;
        let (j, fy) = RegularGrid::locate(&self.grid.lat, lat)
            .ok_or(FieldError::OutOfBounds { lon, lat })?;

        if self.grid.n_time() == 1 {
            return Ok(self.bilinear(0, i, j, fx, fy));
        }

        let (t, ft) = RegularGrid::locate(&self.grid.time, time)
            .ok_or(FieldError::TimeOutOfBounds { time })?;

        let v0 = self.bilinear(t, i, j, fx, fy);
        let v1 = self.bilinear(t + 1, i, j, fx, fy);
        Ok(v0 * (1.0 - ft) + v1 * ft)
    }

    /// Bilinear interpolation within cell (i, j) of time level `t`.
    fn bilinear(&self, t: usize, i: usize, j: usize, fx: f64, fy: f64) -> f64 {
        let wet = |v: f64| if v.is_finite() { v } else { 0.0 };

        let v00 = wet(self.value_at(t, j, i));
        let v01 = wet(self.value_at(t, j, i + 1));
        let v10 = wet(self.value_at(t, j + 1, i));
        let v11 = wet(self.value_at(t, j + 1, i + 1));

        v00 * (1.0 - fx) * (1.0 - fy)
            + v01 * fx * (1.0 - fy)
            + v10 * (1.0 - fx) * fy
            + v11 * fx * fy
    }
}
