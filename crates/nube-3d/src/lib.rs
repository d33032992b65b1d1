#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// I/O utilities for reading 3D data.
pub mod io;

/// Operations on point clouds.
pub mod ops;

/// Point cloud types.
pub mod pointcloud;

/// 3D transforms algorithms.
pub mod transforms;
