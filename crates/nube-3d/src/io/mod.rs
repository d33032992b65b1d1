/// PLY point cloud reader.
pub mod ply;
