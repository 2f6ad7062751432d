//! Gridded velocity fields.
//!
//! A [`FieldSet`] bundles eastward (U) and northward (V) velocity
//! components sampled on a regular lon/lat/time grid, plus named scalar
//! constants attached at assembly time. Particles query the field set
//! through bilinear-in-space, linear-in-time interpolation.

mod field;
mod grid;
mod fieldset;

pub use field::Field;
pub use fieldset::FieldSet;
pub use grid::{GridAxis, RegularGrid};

use thiserror::Error;

/// Error type for field construction and sampling.
#[derive(Debug, Error)]
pub enum FieldError {
    /// Position outside the spatial extent of the grid
    #[error("position ({lon:.4}°E, {lat:.4}°N) is outside the field extent")]
    OutOfBounds {
        /// Longitude of the offending sample
        lon: f64,
        /// Latitude of the offending sample
        lat: f64,
    },

    /// Time outside the temporal extent of the grid
    #[error("time {time:.1} s is outside the field's time range")]
    TimeOutOfBounds {
        /// Time of the offending sample
        time: f64,
    },

    /// Coordinate axis is empty or too short
    #[error("axis '{0}' must have at least {1} points")]
    AxisTooShort(&'static str, usize),

    /// Coordinate axis is not strictly increasing
    #[error("axis '{0}' is not strictly increasing")]
    NonMonotonicAxis(&'static str),

    /// Data length does not match the grid shape
    #[error("field '{name}' has {len} samples but the grid holds {expected}")]
    ShapeMismatch {
        /// Field name
        name: String,
        /// Actual sample count
        len: usize,
        /// Expected sample count (n_time * n_lat * n_lon)
        expected: usize,
    },

    /// Two field sets do not share grid shape or coordinates
    #[error("field sets have different grids and cannot be combined: {0}")]
    GridMismatch(&'static str),
}
