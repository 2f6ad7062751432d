//! NetCDF I/O for particle-tracking simulations.
//!
//! - **Reader**: load gridded U/V velocity data (CMEMS, HYCOM or
//!   similar sources) honoring the configured variable/dimension names
//! - **Writer**: export particle trajectories as CF-style
//!   `trajectory` × `obs` NetCDF
//!
//! Output files follow CF-1.8 conventions: a `trajectory` dimension with
//! one row per released particle, an unlimited `obs` dimension with one
//! column per output step, and standard names for coordinates.

#[cfg(feature = "netcdf")]
use std::path::Path;

#[cfg(feature = "netcdf")]
use chrono::Utc;
use thiserror::Error;

#[cfg(feature = "netcdf")]
use crate::config::RunConfig;
#[cfg(feature = "netcdf")]
use crate::field::{FieldError, FieldSet, RegularGrid};
#[cfg(feature = "netcdf")]
use crate::particle::ParticleSet;

/// Error type for NetCDF operations.
#[derive(Debug, Error)]
pub enum NetCDFError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// NetCDF library error
    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    NetCDF(#[from] netcdf::Error),

    /// Invalid data
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Missing variable
    #[error("Missing variable: {0}")]
    MissingVariable(String),
}

/// Fill value for missing data (CF-conventions standard).
pub const FILL_VALUE_F64: f64 = 9.96920996838687e+36;
pub const FILL_VALUE_F32: f32 = 9.96921e+36;

/// Check if a value is valid (not a fill value).
#[inline]
pub fn is_valid_f32(v: f32) -> bool {
    v.is_finite() && v.abs() < 1.0e+30
}

/// Check if a value is valid (not a fill value).
#[inline]
pub fn is_valid_f64(v: f64) -> bool {
    v.is_finite() && v.abs() < 1.0e+30
}

// ============================================================================
// Velocity Reader
// ============================================================================

/// Reader for gridded velocity data.
///
/// Expects U and V variables laid out `(time, lat, lon)` on 1D
/// coordinate axes, under the names given by the run configuration's
/// variable/dimension maps. `scale_factor`/`add_offset` packing is
/// applied and fill values become NaN (the land convention the rest of
/// the crate relies on).
#[cfg(feature = "netcdf")]
pub struct VelocityReader {
    /// Coordinate axes (time converted to seconds)
    pub grid: RegularGrid,
    /// Eastward velocity, flat `[time][lat][lon]`
    pub u: Vec<f64>,
    /// Northward velocity, flat `[time][lat][lon]`
    pub v: Vec<f64>,
}

#[cfg(feature = "netcdf")]
impl VelocityReader {
    /// Load velocity data from a NetCDF file.
    pub fn from_file(path: impl AsRef<Path>, config: &RunConfig) -> Result<Self, NetCDFError> {
        let file = netcdf::open(path)?;

        let lon = Self::read_coord(&file, config.dimension("lon"))?;
        let lat = Self::read_coord(&file, config.dimension("lat"))?;
        let time = Self::read_time(&file, config.dimension("time"))?;

        let expected = time.len() * lat.len() * lon.len();
        let u = Self::read_var(&file, config.variable("U"), expected)?;
        let v = Self::read_var(&file, config.variable("V"), expected)?;

        let grid = RegularGrid::new(lon, lat, time)
            .map_err(|e| NetCDFError::InvalidData(e.to_string()))?;

        Ok(Self { grid, u, v })
    }

    /// Convert into a [`FieldSet`].
    pub fn into_fieldset(self) -> Result<FieldSet, FieldError> {
        FieldSet::from_components(self.grid, self.u, self.v)
    }

    /// Read a 1D coordinate variable.
    fn read_coord(file: &netcdf::File, name: &str) -> Result<Vec<f64>, NetCDFError> {
        let var = file
            .variable(name)
            .ok_or_else(|| NetCDFError::MissingVariable(name.to_string()))?;
        Ok(var.get_values(..)?)
    }

    /// Read the time coordinate, converting to seconds from the units
    /// attribute ("hours since ...", "days since ...", seconds
    /// otherwise).
    fn read_time(file: &netcdf::File, name: &str) -> Result<Vec<f64>, NetCDFError> {
        let var = file
            .variable(name)
            .ok_or_else(|| NetCDFError::MissingVariable(name.to_string()))?;

        let scale = match Self::string_attribute(&var, "units") {
            Some(units) if units.starts_with("days") => 86_400.0,
            Some(units) if units.starts_with("hours") => 3_600.0,
            Some(units) if units.starts_with("minutes") => 60.0,
            _ => 1.0,
        };

        let raw: Vec<f64> = var.get_values(..)?;
        Ok(raw.iter().map(|t| t * scale).collect())
    }

    /// Read a packed 3D variable `(time, lat, lon)` as flat f64 with
    /// fill values replaced by NaN.
    fn read_var(
        file: &netcdf::File,
        name: &str,
        expected: usize,
    ) -> Result<Vec<f64>, NetCDFError> {
        let var = file
            .variable(name)
            .ok_or_else(|| NetCDFError::MissingVariable(name.to_string()))?;

        let scale = Self::numeric_attribute(&var, "scale_factor").unwrap_or(1.0);
        let offset = Self::numeric_attribute(&var, "add_offset").unwrap_or(0.0);
        let fill = Self::numeric_attribute(&var, "_FillValue");

        let raw: Vec<f64> = var.get_values(..)?;
        if raw.len() != expected {
            return Err(NetCDFError::InvalidData(format!(
                "variable '{}' has {} samples, expected {} (time, lat, lon)",
                name,
                raw.len(),
                expected
            )));
        }

        Ok(raw
            .iter()
            .map(|&r| {
                let is_fill = fill.map(|f| r == f).unwrap_or(false);
                if is_fill || !is_valid_f64(r) {
                    f64::NAN
                } else {
                    r * scale + offset
                }
            })
            .collect())
    }

    fn numeric_attribute(var: &netcdf::Variable, name: &str) -> Option<f64> {
        var.attribute_value(name)
            .and_then(|r| r.ok())
            .and_then(|v| match v {
                netcdf::AttributeValue::Double(d) => Some(d),
                netcdf::AttributeValue::Float(f) => Some(f as f64),
                netcdf::AttributeValue::Int(i) => Some(i as f64),
                netcdf::AttributeValue::Short(s) => Some(s as f64),
                _ => None,
            })
    }

    fn string_attribute(var: &netcdf::Variable, name: &str) -> Option<String> {
        var.attribute_value(name)
            .and_then(|r| r.ok())
            .and_then(|v| match v {
                netcdf::AttributeValue::Str(s) => Some(s),
                _ => None,
            })
    }
}

// ============================================================================
// Trajectory Writer
// ============================================================================

/// Configuration for trajectory output.
#[derive(Debug, Clone)]
pub struct TrajectoryWriterConfig {
    /// Output file path
    pub path: String,
    /// Title attribute (CF-conventions)
    pub title: Option<String>,
    /// Institution attribute
    pub institution: Option<String>,
    /// Source attribute (model name/version)
    pub source: Option<String>,
}

impl TrajectoryWriterConfig {
    /// Create a new configuration with the given output path.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: None,
            institution: None,
            source: Some(concat!("lpt-rs ", env!("CARGO_PKG_VERSION")).to_string()),
        }
    }

    /// Set the title attribute.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the institution attribute.
    pub fn with_institution(mut self, institution: impl Into<String>) -> Self {
        self.institution = Some(institution.into());
        self
    }

    /// Set the source attribute.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// NetCDF writer for particle trajectories.
///
/// One row per released particle (indexed by particle id), one column
/// per output step. Particles removed mid-run keep their earlier
/// observations; later columns hold fill values.
#[cfg(feature = "netcdf")]
pub struct TrajectoryWriter {
    file: netcdf::FileMut,
    n_trajectories: usize,
    extra_vars: Vec<String>,
    obs_index: usize,
}

#[cfg(feature = "netcdf")]
impl TrajectoryWriter {
    /// Create a new trajectory file.
    ///
    /// `extra_vars` are the kernel-declared particle variables flagged
    /// for output (see `Simulation::output_variables`).
    pub fn create(
        config: TrajectoryWriterConfig,
        n_trajectories: usize,
        extra_vars: &[&str],
    ) -> Result<Self, NetCDFError> {
        let mut file = netcdf::create(&config.path)?;

        file.add_dimension("trajectory", n_trajectories)?;
        file.add_unlimited_dimension("obs")?;

        {
            let mut traj_var = file.add_variable::<i64>("trajectory", &["trajectory"])?;
            traj_var.put_attribute("long_name", "particle identifier")?;
            traj_var.put_attribute("cf_role", "trajectory_id")?;
            let ids: Vec<i64> = (0..n_trajectories as i64).collect();
            traj_var.put_values(&ids, ..)?;
        }

        {
            let mut time_var = file.add_variable::<f64>("time", &["trajectory", "obs"])?;
            time_var.put_attribute("standard_name", "time")?;
            time_var.put_attribute("long_name", "particle time")?;
            time_var.put_attribute("units", "seconds since 1970-01-01 00:00:00")?;
            time_var.put_attribute("_FillValue", FILL_VALUE_F64)?;
        }

        {
            let mut lon_var = file.add_variable::<f32>("lon", &["trajectory", "obs"])?;
            lon_var.put_attribute("standard_name", "longitude")?;
            lon_var.put_attribute("long_name", "particle longitude")?;
            lon_var.put_attribute("units", "degrees_east")?;
            lon_var.put_attribute("_FillValue", FILL_VALUE_F32)?;
        }

        {
            let mut lat_var = file.add_variable::<f32>("lat", &["trajectory", "obs"])?;
            lat_var.put_attribute("standard_name", "latitude")?;
            lat_var.put_attribute("long_name", "particle latitude")?;
            lat_var.put_attribute("units", "degrees_north")?;
            lat_var.put_attribute("_FillValue", FILL_VALUE_F32)?;
        }

        for &name in extra_vars {
            let mut var = file.add_variable::<f32>(name, &["trajectory", "obs"])?;
            var.put_attribute("_FillValue", FILL_VALUE_F32)?;
            match name {
                "distance" => {
                    var.put_attribute("long_name", "accumulated path length")?;
                    var.put_attribute("units", "km")?;
                }
                "out_of_bounds" => {
                    var.put_attribute("long_name", "particle left the field extent")?;
                    var.put_attribute("units", "1")?;
                }
                _ => {}
            }
        }

        file.add_attribute("Conventions", "CF-1.8")?;
        file.add_attribute("featureType", "trajectory")?;

        if let Some(ref title) = config.title {
            file.add_attribute("title", title.as_str())?;
        }
        if let Some(ref institution) = config.institution {
            file.add_attribute("institution", institution.as_str())?;
        }
        if let Some(ref source) = config.source {
            file.add_attribute("source", source.as_str())?;
        }

        let now = Utc::now();
        file.add_attribute(
            "history",
            format!("{}: Created by lpt-rs", now.format("%Y-%m-%d %H:%M:%S UTC")).as_str(),
        )?;

        Ok(Self {
            file,
            n_trajectories,
            extra_vars: extra_vars.iter().map(|s| s.to_string()).collect(),
            obs_index: 0,
        })
    }

    /// Write one observation column for every trajectory.
    ///
    /// Rows without a matching active particle (already removed) are
    /// filled.
    pub fn write_obs(&mut self, pset: &ParticleSet) -> Result<(), NetCDFError> {
        let obs = self.obs_index;

        let mut time = vec![FILL_VALUE_F64; self.n_trajectories];
        let mut lon = vec![FILL_VALUE_F32; self.n_trajectories];
        let mut lat = vec![FILL_VALUE_F32; self.n_trajectories];

        for p in pset.iter() {
            let row = p.id as usize;
            if row >= self.n_trajectories {
                return Err(NetCDFError::InvalidData(format!(
                    "particle id {} exceeds trajectory dimension {}",
                    p.id, self.n_trajectories
                )));
            }
            time[row] = p.time;
            lon[row] = p.lon as f32;
            lat[row] = p.lat as f32;
        }

        {
            let mut time_var = self
                .file
                .variable_mut("time")
                .ok_or_else(|| NetCDFError::MissingVariable("time".to_string()))?;
            time_var.put_values(&time, (.., obs))?;
        }
        {
            let mut lon_var = self
                .file
                .variable_mut("lon")
                .ok_or_else(|| NetCDFError::MissingVariable("lon".to_string()))?;
            lon_var.put_values(&lon, (.., obs))?;
        }
        {
            let mut lat_var = self
                .file
                .variable_mut("lat")
                .ok_or_else(|| NetCDFError::MissingVariable("lat".to_string()))?;
            lat_var.put_values(&lat, (.., obs))?;
        }

        for name in &self.extra_vars {
            let mut values = vec![FILL_VALUE_F32; self.n_trajectories];
            for p in pset.iter() {
                if let Some(v) = p.var(name) {
                    values[p.id as usize] = v as f32;
                }
            }
            let mut var = self
                .file
                .variable_mut(name)
                .ok_or_else(|| NetCDFError::MissingVariable(name.clone()))?;
            var.put_values(&values, (.., obs))?;
        }

        self.obs_index += 1;
        Ok(())
    }

    /// Number of observation columns written.
    pub fn n_obs(&self) -> usize {
        self.obs_index
    }
}
