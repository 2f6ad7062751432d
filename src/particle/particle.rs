//! A single tracer particle.

/// Lifecycle state of a particle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ParticleStatus {
    /// Advected and written to output
    #[default]
    Active,
    /// Flagged for removal at the end of the current step
    Deleted,
}

/// A tracer point advanced through the field set by per-step kernels.
///
/// Beyond position and time, a particle carries the auxiliary state the
/// built-in kernels declare: the previous position and accumulated path
/// length for the path-length kernel, and the out-of-bounds flag set by
/// the removal kernel.
#[derive(Clone, Copy, Debug)]
pub struct Particle {
    /// Stable identifier, also the trajectory row in output files
    pub id: u64,
    /// Longitude, degrees east
    pub lon: f64,
    /// Latitude, degrees north
    pub lat: f64,
    /// Particle clock, seconds on the field set's time axis
    pub time: f64,
    /// Longitude at the previous path-length update
    pub prev_lon: f64,
    /// Latitude at the previous path-length update
    pub prev_lat: f64,
    /// Accumulated path length, km
    pub distance: f64,
    /// Set when the removal kernel deleted this particle
    pub out_of_bounds: bool,
    status: ParticleStatus,
}

impl Particle {
    /// Create a particle at a seed position.
    ///
    /// Auxiliary variables take their declared initial values: zero
    /// distance, previous position copied from the seed, in bounds.
    pub fn new(id: u64, lon: f64, lat: f64, time: f64) -> Self {
        Self {
            id,
            lon,
            lat,
            time,
            prev_lon: lon,
            prev_lat: lat,
            distance: 0.0,
            out_of_bounds: false,
            status: ParticleStatus::Active,
        }
    }

    /// Flag this particle for removal at the end of the step.
    pub fn delete(&mut self) {
        self.status = ParticleStatus::Deleted;
    }

    /// Whether the particle has been flagged for removal.
    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.status == ParticleStatus::Deleted
    }

    /// Whether `name` is a particle variable this type carries.
    pub fn has_var(name: &str) -> bool {
        matches!(
            name,
            "lon" | "lat" | "time" | "prev_lon" | "prev_lat" | "distance" | "out_of_bounds"
        )
    }

    /// Numeric value of a particle variable by name.
    ///
    /// Booleans are reported as 0.0/1.0. Returns `None` for unknown
    /// names.
    pub fn var(&self, name: &str) -> Option<f64> {
        match name {
            "lon" => Some(self.lon),
            "lat" => Some(self.lat),
            "time" => Some(self.time),
            "prev_lon" => Some(self.prev_lon),
            "prev_lat" => Some(self.prev_lat),
            "distance" => Some(self.distance),
            "out_of_bounds" => Some(if self.out_of_bounds { 1.0 } else { 0.0 }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_applies_initializers() {
        let p = Particle::new(3, 5.0, 60.0, 0.0);
        assert_eq!(p.id, 3);
        assert_eq!(p.prev_lon, 5.0);
        assert_eq!(p.prev_lat, 60.0);
        assert_eq!(p.distance, 0.0);
        assert!(!p.out_of_bounds);
        assert!(!p.is_deleted());
    }

    #[test]
    fn test_delete() {
        let mut p = Particle::new(0, 0.0, 0.0, 0.0);
        p.delete();
        assert!(p.is_deleted());
    }

    #[test]
    fn test_var_lookup() {
        let mut p = Particle::new(0, 1.0, 2.0, 0.0);
        p.distance = 12.5;
        p.out_of_bounds = true;
        assert_eq!(p.var("distance"), Some(12.5));
        assert_eq!(p.var("out_of_bounds"), Some(1.0));
        assert_eq!(p.var("salinity"), None);
        assert!(Particle::has_var("prev_lon"));
        assert!(!Particle::has_var("salinity"));
    }
}
