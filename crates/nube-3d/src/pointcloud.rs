use glam::Vec3;

/// A point cloud with points, colors, and normals.
///
/// Colors are RGB triplets in the unit range [0, 1].
#[derive(Debug, Clone)]
pub struct PointCloud {
    // The points in the point cloud.
    points: Vec<[f64; 3]>,
    // The colors of the points, in [0, 1].
    colors: Option<Vec<[f64; 3]>>,
    // The normals of the points.
    normals: Option<Vec<[f64; 3]>>,
}

impl PointCloud {
    /// Create a new point cloud from points, colors (optional), and normals (optional).
    pub fn new(
        points: Vec<[f64; 3]>,
        colors: Option<Vec<[f64; 3]>>,
        normals: Option<Vec<[f64; 3]>>,
    ) -> Self {
        Self {
            points,
            colors,
            normals,
        }
    }

    /// Get the number of points in the point cloud.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the point cloud is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Get as reference the points in the point cloud.
    pub fn points(&self) -> &Vec<[f64; 3]> {
        &self.points
    }

    /// Get as reference the colors of the points in the point cloud.
    pub fn colors(&self) -> Option<&Vec<[f64; 3]>> {
        self.colors.as_ref()
    }

    /// Get as reference the normals of the points in the point cloud.
    pub fn normals(&self) -> Option<&Vec<[f64; 3]>> {
        self.normals.as_ref()
    }

    /// Convert a point from [f64; 3] to Vec3.
    fn point_to_vec3(point: &[f64; 3]) -> Vec3 {
        Vec3::new(point[0] as f32, point[1] as f32, point[2] as f32)
    }

    /// Get the minimum bound of the point cloud.
    pub fn get_min_bound(&self) -> Vec3 {
        if self.points.is_empty() {
            return Vec3::ZERO;
        }
        self.points()
            .iter()
            .map(|point| Self::point_to_vec3(point))
            .fold(Self::point_to_vec3(&self.points[0]), |a, b| a.min(b))
    }

    /// Get the maximum bound of the point cloud.
    pub fn get_max_bound(&self) -> Vec3 {
        if self.points.is_empty() {
            return Vec3::ZERO;
        }
        self.points()
            .iter()
            .map(|point| Self::point_to_vec3(point))
            .fold(Self::point_to_vec3(&self.points[0]), |a, b| a.max(b))
    }

    /// Get the centroid of the point cloud, or the origin when empty.
    pub fn centroid(&self) -> [f64; 3] {
        if self.points.is_empty() {
            return [0.0, 0.0, 0.0];
        }
        let n = self.points.len() as f64;
        let sum = self.points.iter().fold([0.0f64; 3], |acc, p| {
            [acc[0] + p[0], acc[1] + p[1], acc[2] + p[2]]
        });
        [sum[0] / n, sum[1] / n, sum[2] / n]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointcloud() {
        let pointcloud = PointCloud::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
            Some(vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
            Some(vec![[0.0, 1.0, 0.0], [1.0, 0.0, 0.0]]),
        );

        assert_eq!(pointcloud.len(), 2);
        assert!(!pointcloud.is_empty());

        if let Some(colors) = pointcloud.colors() {
            assert_eq!(colors.len(), 2);
        }
        if let Some(normals) = pointcloud.normals() {
            assert_eq!(normals.len(), 2);
        }
    }

    #[test]
    fn test_bounds_and_centroid() {
        let pointcloud = PointCloud::new(
            vec![[0.0, -1.0, 2.0], [4.0, 3.0, -2.0], [2.0, 1.0, 0.0]],
            None,
            None,
        );

        let min_bound = pointcloud.get_min_bound();
        let max_bound = pointcloud.get_max_bound();
        assert_eq!(min_bound.to_array(), [0.0, -1.0, -2.0]);
        assert_eq!(max_bound.to_array(), [4.0, 3.0, 2.0]);
        assert_eq!(pointcloud.centroid(), [2.0, 1.0, 0.0]);
    }

    #[test]
    fn test_empty_pointcloud() {
        let pointcloud = PointCloud::new(vec![], None, None);
        assert!(pointcloud.is_empty());
        assert_eq!(pointcloud.get_min_bound(), Vec3::ZERO);
        assert_eq!(pointcloud.centroid(), [0.0, 0.0, 0.0]);
    }
}
