/// Compute the rotation matrix from XYZ Euler angles.
///
/// The result is `R = Rx(pitch) * Ry(yaw) * Rz(roll)`, applied to column
/// vectors, which matches the usual convention for orienting a cloud by
/// rotating first about its Z axis, then Y, then X.
///
/// # Arguments
///
/// * `pitch` - The rotation about the X axis, in radians.
/// * `yaw` - The rotation about the Y axis, in radians.
/// * `roll` - The rotation about the Z axis, in radians.
///
/// # Returns
///
/// The rotation matrix.
///
/// Example:
///
/// ```
/// use nube_3d::transforms::euler_xyz_to_rotation_matrix;
///
/// let rotation = euler_xyz_to_rotation_matrix(0.0, 0.0, 0.0);
/// assert_eq!(rotation, [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
/// ```
pub fn euler_xyz_to_rotation_matrix(pitch: f64, yaw: f64, roll: f64) -> [[f64; 3]; 3] {
    let (sx, cx) = pitch.sin_cos();
    let (sy, cy) = yaw.sin_cos();
    let (sz, cz) = roll.sin_cos();

    let rx = [[1.0, 0.0, 0.0], [0.0, cx, -sx], [0.0, sx, cx]];
    let ry = [[cy, 0.0, sy], [0.0, 1.0, 0.0], [-sy, 0.0, cy]];
    let rz = [[cz, -sz, 0.0], [sz, cz, 0.0], [0.0, 0.0, 1.0]];

    mat3_mul(&rx, &mat3_mul(&ry, &rz))
}

/// Rotate a set of points about a center with the given rotation matrix.
///
/// Each point transforms as `p' = R * (p - center) + center`.
///
/// # Arguments
///
/// * `points` - The points to rotate.
/// * `rotation` - The rotation matrix.
/// * `center` - The center of rotation.
///
/// # Returns
///
/// The rotated points.
pub fn rotate_points(
    points: &[[f64; 3]],
    rotation: &[[f64; 3]; 3],
    center: &[f64; 3],
) -> Vec<[f64; 3]> {
    points
        .iter()
        .map(|point| {
            let centered = [
                point[0] - center[0],
                point[1] - center[1],
                point[2] - center[2],
            ];
            let mut rotated = [0.0f64; 3];
            for (i, row) in rotation.iter().enumerate() {
                rotated[i] = row[0] * centered[0] + row[1] * centered[1] + row[2] * centered[2]
                    + center[i];
            }
            rotated
        })
        .collect()
}

fn mat3_mul(a: &[[f64; 3]; 3], b: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    let mut out = [[0.0f64; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            for (k, b_row) in b.iter().enumerate() {
                out[i][j] += a[i][k] * b_row[j];
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_rotation() {
        let rotation = euler_xyz_to_rotation_matrix(0.0, 0.0, 0.0);
        let expected = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(rotation[i][j], expected[i][j]);
            }
        }
    }

    #[test]
    fn test_quarter_turn_about_x() {
        let rotation = euler_xyz_to_rotation_matrix(std::f64::consts::FRAC_PI_2, 0.0, 0.0);
        let expected = [[1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]];
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(rotation[i][j], expected[i][j], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_rotate_points_about_center() {
        // quarter turn about the Z axis through (1, 0, 0)
        let rotation = euler_xyz_to_rotation_matrix(0.0, 0.0, std::f64::consts::FRAC_PI_2);
        let rotated = rotate_points(&[[2.0, 0.0, 0.0]], &rotation, &[1.0, 0.0, 0.0]);

        assert_relative_eq!(rotated[0][0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(rotated[0][1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(rotated[0][2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_preserves_norm() {
        let rotation = euler_xyz_to_rotation_matrix(0.3, -1.2, 2.1);
        let rotated = rotate_points(&[[1.0, 2.0, 3.0]], &rotation, &[0.0, 0.0, 0.0]);

        let norm = (rotated[0][0].powi(2) + rotated[0][1].powi(2) + rotated[0][2].powi(2)).sqrt();
        assert_relative_eq!(norm, 14.0f64.sqrt(), epsilon = 1e-12);
    }
}
