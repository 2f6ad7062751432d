//! Run configuration.
//!
//! A simulation is described by a JSON file naming the velocity data,
//! the variable/dimension name maps, the kernel list, the particle
//! seeds and the output settings. Unset fields take the documented
//! defaults.
//!
//! ```json
//! {
//!     "pathname": "data/currents.nc",
//!     "variables": { "U": "uo", "V": "vo" },
//!     "dimensions": { "lon": "longitude", "lat": "latitude", "time": "time" },
//!     "coastal_boundary": { "include": true, "threshold": 2000.0 },
//!     "kernels": ["AdvectionRK4", "boundary_check", "pathlength"],
//!     "particles": { "lon": [4.5, 4.6], "lat": [60.1, 60.2] },
//!     "runtime": { "days": 10, "dt_minutes": 5 },
//!     "output": { "directory": "out", "file_name": "trajectories.nc" }
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::boundary::CoastalBoundaryConfig;
use crate::simulation::ExecutionConfig;

/// Error type for configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Particle seed arrays differ in length
    #[error("particle seed arrays differ in length: {lon} lon vs {lat} lat")]
    SeedMismatch {
        /// Number of longitude seeds
        lon: usize,
        /// Number of latitude seeds
        lat: usize,
    },

    /// A duration or interval is not positive
    #[error("'{field}' must be positive, got {value}")]
    NonPositive {
        /// Config field name
        field: &'static str,
        /// Offending value
        value: f64,
    },

    /// The smoothing window is zero
    #[error("coastal_boundary.rolling_window must be at least 1")]
    ZeroWindow,
}

/// Full run description, deserialized from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Path to the main velocity NetCDF file.
    pub pathname: PathBuf,

    /// Logical-to-dataset variable name map (keys "U", "V").
    #[serde(default = "default_variables")]
    pub variables: HashMap<String, String>,

    /// Logical-to-dataset dimension name map (keys "lon", "lat", "time").
    #[serde(default = "default_dimensions")]
    pub dimensions: HashMap<String, String>,

    /// Coastal boundary settings.
    #[serde(default)]
    pub coastal_boundary: CoastalBoundarySection,

    /// Kernel names applied to each particle every step, in order.
    #[serde(default)]
    pub kernels: Vec<String>,

    /// Particle seed positions.
    pub particles: ParticleSeeds,

    /// Runtime duration and step size.
    #[serde(default)]
    pub runtime: RuntimeSection,

    /// Trajectory output settings.
    pub output: OutputSection,
}

/// Coastal boundary settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoastalBoundarySection {
    /// Whether to add an artificial coastal boundary current.
    #[serde(default)]
    pub include: bool,

    /// Path to a precomputed boundary dataset. When unset and `include`
    /// is true, the boundary is synthesized from the main dataset.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Smoothing window for the synthesized boundary.
    #[serde(default = "default_rolling_window")]
    pub rolling_window: usize,

    /// Gradient magnitude threshold for the synthesized boundary.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl Default for CoastalBoundarySection {
    fn default() -> Self {
        Self {
            include: false,
            path: None,
            rolling_window: default_rolling_window(),
            threshold: default_threshold(),
        }
    }
}

impl CoastalBoundarySection {
    /// Synthesis parameters for [`crate::boundary::synthesize_coastal_boundary`].
    pub fn synthesis_config(&self) -> CoastalBoundaryConfig {
        CoastalBoundaryConfig {
            rolling_window: self.rolling_window,
            threshold: self.threshold,
        }
    }
}

/// Particle seed positions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleSeeds {
    /// Seed longitudes, degrees east
    pub lon: Vec<f64>,
    /// Seed latitudes, degrees north
    pub lat: Vec<f64>,
}

/// Runtime duration and step size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeSection {
    /// Total runtime in days.
    #[serde(default = "default_days")]
    pub days: f64,

    /// Time step in minutes.
    #[serde(default = "default_dt_minutes")]
    pub dt_minutes: f64,
}

impl Default for RuntimeSection {
    fn default() -> Self {
        Self {
            days: default_days(),
            dt_minutes: default_dt_minutes(),
        }
    }
}

/// Trajectory output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    /// Output directory.
    pub directory: PathBuf,

    /// Output file name within the directory.
    pub file_name: String,

    /// Output cadence in hours.
    #[serde(default = "default_output_interval_hours")]
    pub output_interval_hours: f64,
}

impl OutputSection {
    /// Full path of the trajectory file.
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }
}

fn default_variables() -> HashMap<String, String> {
    [("U", "U"), ("V", "V")]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn default_dimensions() -> HashMap<String, String> {
    [("lon", "lon"), ("lat", "lat"), ("time", "time")]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn default_rolling_window() -> usize {
    3
}
fn default_threshold() -> f64 {
    2000.0
}
fn default_days() -> f64 {
    10.0
}
fn default_dt_minutes() -> f64 {
    5.0
}
fn default_output_interval_hours() -> f64 {
    6.0
}

impl RunConfig {
    /// Load and validate a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading configuration");
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse and validate a configuration from a JSON string.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants the type system cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.particles.lon.len() != self.particles.lat.len() {
            return Err(ConfigError::SeedMismatch {
                lon: self.particles.lon.len(),
                lat: self.particles.lat.len(),
            });
        }
        for (field, value) in [
            ("runtime.days", self.runtime.days),
            ("runtime.dt_minutes", self.runtime.dt_minutes),
            (
                "output.output_interval_hours",
                self.output.output_interval_hours,
            ),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if self.coastal_boundary.rolling_window == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        Ok(())
    }

    /// Dataset variable name for a logical key ("U", "V"); unmapped keys
    /// fall back to the key itself.
    pub fn variable<'a>(&'a self, key: &'a str) -> &'a str {
        self.variables.get(key).map(String::as_str).unwrap_or(key)
    }

    /// Dataset dimension name for a logical key ("lon", "lat", "time");
    /// unmapped keys fall back to the key itself.
    pub fn dimension<'a>(&'a self, key: &'a str) -> &'a str {
        self.dimensions.get(key).map(String::as_str).unwrap_or(key)
    }

    /// Total runtime in seconds.
    pub fn runtime_seconds(&self) -> f64 {
        self.runtime.days * 86_400.0
    }

    /// Time step in seconds.
    pub fn dt_seconds(&self) -> f64 {
        self.runtime.dt_minutes * 60.0
    }

    /// Output cadence in seconds.
    pub fn output_interval_seconds(&self) -> f64 {
        self.output.output_interval_hours * 3_600.0
    }

    /// Execution parameters for the simulation runner.
    pub fn execution_config(&self) -> ExecutionConfig {
        ExecutionConfig::new(self.runtime_seconds(), self.dt_seconds())
            .with_output_interval(self.output_interval_seconds())
    }
}
