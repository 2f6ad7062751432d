//! Strongly-typed domain types for safer APIs.
//!
//! Newtypes and structured types keep geographic parameters from being
//! mixed up (a longitude is not a latitude, degrees are not kilometers).

mod bounds;

pub use bounds::GeoBounds;

/// Kilometers per degree of latitude (and of longitude at the equator).
///
/// Conventional spherical-Earth factor for degree/distance conversion;
/// longitude distances are additionally scaled by `cos(lat)`.
pub const KM_PER_DEGREE: f64 = 1.11e2;

/// Meters per degree of latitude.
pub const M_PER_DEGREE: f64 = KM_PER_DEGREE * 1e3;
