#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the projection module.
pub mod error;

/// orthographic projection of a point cloud onto a raster.
pub mod ortho;

/// multi-view orientation grids.
pub mod views;

pub use crate::error::ProjectionError;
