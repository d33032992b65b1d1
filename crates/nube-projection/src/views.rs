use nube_3d::pointcloud::PointCloud;
use nube_3d::transforms::{euler_xyz_to_rotation_matrix, rotate_points};
use nube_image::Image;

use crate::error::ProjectionError;
use crate::ortho::project_cloud;

/// A camera orientation, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewAngles {
    /// Rotation about the X axis.
    pub pitch: f64,
    /// Rotation about the Y axis.
    pub yaw: f64,
    /// Rotation about the Z axis.
    pub roll: f64,
}

/// A grid of view orientations covering a full yaw turn and bounded
/// pitch/roll sweeps.
#[derive(Debug, Clone, Copy)]
pub struct ViewGrid {
    /// Number of yaw samples over [0, 360) degrees.
    pub num_yaw: usize,
    /// Number of pitch samples over the pitch range.
    pub num_pitch: usize,
    /// Number of roll samples over the roll range.
    pub num_roll: usize,
    /// Half-width of the pitch sweep, in degrees.
    pub pitch_range_deg: f64,
    /// Half-width of the roll sweep, in degrees.
    pub roll_range_deg: f64,
}

impl Default for ViewGrid {
    fn default() -> Self {
        Self {
            num_yaw: 10,
            num_pitch: 5,
            num_roll: 5,
            pitch_range_deg: 30.0,
            roll_range_deg: 30.0,
        }
    }
}

impl ViewGrid {
    /// Total number of orientations in the grid.
    pub fn len(&self) -> usize {
        self.num_pitch * self.num_yaw * self.num_roll
    }

    /// Check if the grid is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate the grid orientations, pitch-major, then yaw, then roll.
    ///
    /// Yaw samples span [0, 2pi) excluding the endpoint; pitch and roll
    /// samples span their ranges inclusively.
    pub fn orientations(&self) -> impl Iterator<Item = ViewAngles> + '_ {
        let pitch_range = self.pitch_range_deg.to_radians();
        let roll_range = self.roll_range_deg.to_radians();
        let num_yaw = self.num_yaw;
        let num_roll = self.num_roll;

        (0..self.num_pitch).flat_map(move |pitch_idx| {
            let pitch = linspace_value(-pitch_range, pitch_range, self.num_pitch, pitch_idx);
            (0..num_yaw).flat_map(move |yaw_idx| {
                let yaw = 2.0 * std::f64::consts::PI * yaw_idx as f64 / num_yaw as f64;
                (0..num_roll).map(move |roll_idx| ViewAngles {
                    pitch,
                    yaw,
                    roll: linspace_value(-roll_range, roll_range, num_roll, roll_idx),
                })
            })
        })
    }
}

/// The i-th of `num` evenly spaced values over [start, stop], inclusive.
fn linspace_value(start: f64, stop: f64, num: usize, index: usize) -> f64 {
    if num <= 1 {
        return start;
    }
    start + (stop - start) * index as f64 / (num - 1) as f64
}

/// Render one view of a point cloud: rotate it about its centroid by the
/// orientation's XYZ Euler angles, then project orthographically.
///
/// # Arguments
///
/// * `pointcloud` - The input point cloud, with or without colors.
/// * `angles` - The view orientation.
/// * `scale_factor` - World-to-pixel scale passed to the projector.
///
/// # Errors
///
/// Returns [`ProjectionError::EmptyPointCloud`] when the cloud has no points.
pub fn render_view(
    pointcloud: &PointCloud,
    angles: ViewAngles,
    scale_factor: f64,
) -> Result<Image<u8, 3>, ProjectionError> {
    let rotation = euler_xyz_to_rotation_matrix(angles.pitch, angles.yaw, angles.roll);
    let center = pointcloud.centroid();
    let rotated_points = rotate_points(pointcloud.points(), &rotation, &center);

    let rotated = PointCloud::new(rotated_points, pointcloud.colors().cloned(), None);

    project_cloud(&rotated, scale_factor)
}
