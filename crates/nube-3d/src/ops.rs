use crate::pointcloud::PointCloud;

/// Compute the p-th percentile of a set of values with linear interpolation
/// between order statistics.
///
/// # Arguments
///
/// * `values` - The input values.
/// * `p` - The percentile in [0, 100].
///
/// # Returns
///
/// The interpolated percentile value, or `None` when `values` is empty.
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let p = p.clamp(0.0, 100.0);
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;

    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Filter a point cloud by a percentile threshold on the Z axis.
///
/// The threshold is the `|percentage|`-th percentile of the Z coordinates.
/// Points with Z greater than or equal to the threshold are kept when
/// `percentage` is non-negative, points with Z less than or equal to the
/// threshold when it is negative. Colors and normals are carried through the
/// same mask.
///
/// # Arguments
///
/// * `pointcloud` - The input point cloud.
/// * `percentage` - The percentile threshold, sign selects the kept side.
///
/// # Returns
///
/// The filtered point cloud. An empty cloud is returned unchanged.
pub fn filter_by_depth_percentile(pointcloud: &PointCloud, percentage: f64) -> PointCloud {
    let z_vals = pointcloud
        .points()
        .iter()
        .map(|p| p[2])
        .collect::<Vec<f64>>();

    let Some(z_threshold) = percentile(&z_vals, percentage.abs()) else {
        return pointcloud.clone();
    };

    let mask = if percentage >= 0.0 {
        z_vals.iter().map(|&z| z >= z_threshold).collect::<Vec<_>>()
    } else {
        z_vals.iter().map(|&z| z <= z_threshold).collect::<Vec<_>>()
    };

    apply_mask(pointcloud, &mask)
}

/// Filter a point cloud keeping the points with Z less than or equal to a
/// depth value, carrying colors and normals through the same mask.
///
/// # Arguments
///
/// * `pointcloud` - The input point cloud.
/// * `z_value` - The maximum depth to keep.
pub fn filter_by_depth(pointcloud: &PointCloud, z_value: f64) -> PointCloud {
    let mask = pointcloud
        .points()
        .iter()
        .map(|p| p[2] <= z_value)
        .collect::<Vec<_>>();

    apply_mask(pointcloud, &mask)
}

fn select<T: Copy>(values: &[T], mask: &[bool]) -> Vec<T> {
    values
        .iter()
        .zip(mask.iter())
        .filter_map(|(v, &keep)| keep.then_some(*v))
        .collect()
}

fn apply_mask(pointcloud: &PointCloud, mask: &[bool]) -> PointCloud {
    let points = select(pointcloud.points(), mask);
    let colors = pointcloud.colors().map(|colors| select(colors, mask));
    let normals = pointcloud.normals().map(|normals| select(normals, mask));

    PointCloud::new(points, colors, normals)
}
