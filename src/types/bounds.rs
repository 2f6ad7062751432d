//! Geographic domain bounds.

use std::fmt;

/// Rectangular geographic bounds in degrees.
///
/// Stores the lon/lat extent of a gridded domain with clear semantics
/// for each boundary.
///
/// # Example
///
/// ```
/// use lpt_rs::types::GeoBounds;
///
/// // Norwegian coastal domain (approximate)
/// let bounds = GeoBounds::new(
///     4.0,    // lon_min (west)
///     12.0,   // lon_max (east)
///     58.0,   // lat_min (south)
///     65.0,   // lat_max (north)
/// );
///
/// assert_eq!(bounds.lon_span(), 8.0);
/// assert_eq!(bounds.lat_span(), 7.0);
/// assert!(bounds.contains(8.5, 63.4));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoBounds {
    /// Minimum longitude (western boundary), degrees east
    pub lon_min: f64,
    /// Maximum longitude (eastern boundary), degrees east
    pub lon_max: f64,
    /// Minimum latitude (southern boundary), degrees north
    pub lat_min: f64,
    /// Maximum latitude (northern boundary), degrees north
    pub lat_max: f64,
}

impl GeoBounds {
    /// Create new geographic bounds.
    ///
    /// # Panics
    ///
    /// Panics if `lon_max <= lon_min` or `lat_max <= lat_min`.
    pub fn new(lon_min: f64, lon_max: f64, lat_min: f64, lat_max: f64) -> Self {
        assert!(
            lon_max > lon_min,
            "lon_max ({}) must be greater than lon_min ({})",
            lon_max,
            lon_min
        );
        assert!(
            lat_max > lat_min,
            "lat_max ({}) must be greater than lat_min ({})",
            lat_max,
            lat_min
        );

        Self {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
        }
    }

    /// Longitudinal span in degrees (lon_max - lon_min).
    #[inline]
    pub fn lon_span(&self) -> f64 {
        self.lon_max - self.lon_min
    }

    /// Latitudinal span in degrees (lat_max - lat_min).
    #[inline]
    pub fn lat_span(&self) -> f64 {
        self.lat_max - self.lat_min
    }

    /// Center point as (lon, lat).
    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (
            (self.lon_min + self.lon_max) / 2.0,
            (self.lat_min + self.lat_max) / 2.0,
        )
    }

    /// Check if a point is inside the bounds (inclusive).
    #[inline]
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.lon_min && lon <= self.lon_max && lat >= self.lat_min && lat <= self.lat_max
    }
}

impl fmt::Display for GeoBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.3}°E, {:.3}°E] × [{:.3}°N, {:.3}°N]",
            self.lon_min, self.lon_max, self.lat_min, self.lat_max
        )
    }
}
