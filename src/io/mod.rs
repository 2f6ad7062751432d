//! File I/O: velocity field input and trajectory output.

mod netcdf_io;

pub use netcdf_io::{
    FILL_VALUE_F32, FILL_VALUE_F64, NetCDFError, TrajectoryWriterConfig, is_valid_f32,
    is_valid_f64,
};
#[cfg(feature = "netcdf")]
pub use netcdf_io::{TrajectoryWriter, VelocityReader};
