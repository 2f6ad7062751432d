//! Artificial coastal boundary currents.

mod coastal;

pub use coastal::{CoastalBoundaryConfig, land_mask, synthesize_coastal_boundary};
