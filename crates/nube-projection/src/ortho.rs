use nube_3d::pointcloud::PointCloud;
use nube_image::{Image, ImageSize};

use crate::error::ProjectionError;

/// Padding in world units added on each side of the XY bounding box.
pub const BOUNDS_PADDING: f64 = 5.0;

/// Minimum size in pixels of the larger raster dimension for tiny clouds.
pub const MIN_DIMENSION: f64 = 200.0;

/// Project a point cloud orthographically onto the XY plane.
///
/// The raster is sized to fit the padded XY bounding box of the cloud at the
/// resolved scale. When the padded extent is degenerate (below one world
/// unit), the scale is chosen so the larger dimension covers at least
/// [`MIN_DIMENSION`] pixels; otherwise `scale_factor` is used verbatim.
///
/// Pixel coordinates are obtained by translating by the minimum bound,
/// scaling, and truncating; the Y axis is flipped so the raster origin sits at
/// the top-left corner. Points that fall outside the raster are silently
/// dropped, and points landing on the same pixel resolve last-write-wins in
/// point order. Points without colors render white.
///
/// # Arguments
///
/// * `pointcloud` - The input point cloud, with or without colors.
/// * `scale_factor` - World-to-pixel scale used for non-degenerate clouds.
///
/// # Returns
///
/// The projected RGB raster; unassigned pixels stay (0, 0, 0).
///
/// # Errors
///
/// Returns [`ProjectionError::EmptyPointCloud`] when the cloud has no points.
pub fn project_cloud(
    pointcloud: &PointCloud,
    scale_factor: f64,
) -> Result<Image<u8, 3>, ProjectionError> {
    if pointcloud.is_empty() {
        return Err(ProjectionError::EmptyPointCloud);
    }

    let points = pointcloud.points();

    let (x_min, x_max, y_min, y_max) = points.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
        |(x_min, x_max, y_min, y_max), p| {
            (
                x_min.min(p[0]),
                x_max.max(p[0]),
                y_min.min(p[1]),
                y_max.max(p[1]),
            )
        },
    );

    let x_min = x_min - BOUNDS_PADDING;
    let x_max = x_max + BOUNDS_PADDING;
    let y_min = y_min - BOUNDS_PADDING;
    let y_max = y_max + BOUNDS_PADDING;

    let x_range = (x_max - x_min).max(1e-6);
    let y_range = (y_max - y_min).max(1e-6);

    // degenerate clouds map their larger extent to a minimum pixel size,
    // everything else respects the caller's scale
    let larger_range = x_range.max(y_range);
    let scale = if larger_range < 1.0 {
        MIN_DIMENSION / larger_range
    } else {
        scale_factor
    };

    let width = ((x_range * scale).ceil() as usize).max(1);
    let height = ((y_range * scale).ceil() as usize).max(1);

    let mut img = Image::from_size_val(
        ImageSize { width, height },
        0u8,
    )?;

    const WHITE: [f64; 3] = [1.0, 1.0, 1.0];
    for (i, point) in points.iter().enumerate() {
        let color = match pointcloud.colors() {
            Some(colors) => colors[i],
            None => WHITE,
        };
        let pixel = [
            (color[0] * 255.0) as u8,
            (color[1] * 255.0) as u8,
            (color[2] * 255.0) as u8,
        ];

        let xp = ((point[0] - x_min) * scale) as i64;
        let yp = ((point[1] - y_min) * scale) as i64;
        // flip Y so the origin lands at the top-left corner
        let yp = height as i64 - 1 - yp;

        if xp >= 0 && (xp as usize) < width && yp >= 0 && (yp as usize) < height {
            img.set_pixel(xp as usize, yp as usize, &pixel)?;
        }
    }

    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cloud_is_an_error() {
        let cloud = PointCloud::new(vec![], None, None);
        let result = project_cloud(&cloud, 1.0);
        assert!(matches!(result, Err(ProjectionError::EmptyPointCloud)));
    }

    #[test]
    fn single_point_renders_white() -> Result<(), ProjectionError> {
        let cloud = PointCloud::new(vec![[0.0, 0.0, 0.0]], None, None);
        let img = project_cloud(&cloud, 1.0)?;

        // padded bounding box of a single point spans 10 world units
        assert_eq!(img.size().width, 10);
        assert_eq!(img.size().height, 10);

        assert_eq!(img.pixel(5, 4).unwrap(), [255, 255, 255]);
        let non_empty = img
            .as_slice()
            .chunks_exact(3)
            .filter(|p| p.iter().any(|&v| v != 0))
            .count();
        assert_eq!(non_empty, 1);
        Ok(())
    }

    #[test]
    fn two_points_project_in_bounds() -> Result<(), ProjectionError> {
        let cloud = PointCloud::new(vec![[0.0, 0.0, 0.0], [1.0, 1.0, 0.0]], None, None);
        let img = project_cloud(&cloud, 1.0)?;

        assert_eq!(img.size().width, 11);
        assert_eq!(img.size().height, 11);
        assert_eq!(img.pixel(5, 5).unwrap(), [255, 255, 255]);
        assert_eq!(img.pixel(6, 4).unwrap(), [255, 255, 255]);
        Ok(())
    }

    #[test]
    fn colors_scale_to_u8() -> Result<(), ProjectionError> {
        let cloud = PointCloud::new(
            vec![[0.0, 0.0, 0.0]],
            Some(vec![[1.0, 0.2, 0.0]]),
            None,
        );
        let img = project_cloud(&cloud, 1.0)?;
        assert_eq!(img.pixel(5, 4).unwrap(), [255, 51, 0]);
        Ok(())
    }

    #[test]
    fn same_pixel_last_write_wins() -> Result<(), ProjectionError> {
        let cloud = PointCloud::new(
            vec![[0.0, 0.0, 0.0], [0.1, 0.1, 0.0]],
            Some(vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
            None,
        );
        let img = project_cloud(&cloud, 1.0)?;
        // both points truncate to the same pixel; the later point wins
        assert_eq!(img.pixel(5, 4).unwrap(), [0, 255, 0]);
        Ok(())
    }

    #[test]
    fn larger_scale_spreads_points() -> Result<(), ProjectionError> {
        let cloud = PointCloud::new(vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]], None, None);
        let img = project_cloud(&cloud, 10.0)?;

        assert_eq!(img.size().width, 110);
        assert_eq!(img.size().height, 100);
        assert_eq!(img.pixel(50, 49).unwrap(), [255, 255, 255]);
        assert_eq!(img.pixel(60, 49).unwrap(), [255, 255, 255]);
        Ok(())
    }
}
