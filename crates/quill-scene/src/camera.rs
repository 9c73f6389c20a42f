//! 3D camera with orbit controls

use quill_core::{mat4_inverse, mat4_mul, Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// A look-at camera supporting perspective and orthographic projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    /// Camera position
    pub position: Vec3,
    /// Target point the camera looks at
    pub target: Vec3,
    /// Up vector hint
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov: f64,
    /// Near clipping plane
    pub near: f64,
    /// Far clipping plane
    pub far: f64,
    /// Aspect ratio (width / height)
    pub aspect: f64,
    /// Use orthographic projection (true) or perspective (false)
    pub orthographic: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(10.0, 10.0, 10.0),
            target: Vec3::ZERO,
            up: Vec3::UP,
            fov: 45.0,
            near: 0.1,
            far: 1000.0,
            aspect: 16.0 / 9.0,
            orthographic: false,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn look_at(position: Vec3, target: Vec3, up: Vec3) -> Self {
        Self {
            position,
            target,
            up,
            ..Default::default()
        }
    }

    /// Distance from the camera to its target
    pub fn distance(&self) -> f64 {
        self.position.distance_to(&self.target)
    }

    /// Rotate the camera around its target about the world up axis
    pub fn orbit_horizontal(&mut self, angle: f64) {
        let offset = self.position - self.target;
        let (sin, cos) = angle.sin_cos();
        let rotated = Vec3::new(
            offset.x * cos + offset.z * sin,
            offset.y,
            -offset.x * sin + offset.z * cos,
        );
        self.position = self.target + rotated;
    }

    /// Camera basis: (right, up, forward), all unit length
    fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let f = (self.target - self.position).normalized();
        let s = f.cross(&self.up).normalized();
        let u = s.cross(&f);
        (s, u, f)
    }

    /// Camera-to-world transform. The camera looks down its local -Z axis.
    pub fn world_matrix(&self) -> Mat4 {
        let (s, u, f) = self.basis();
        let p = self.position;
        [
            [s.x, s.y, s.z, 0.0],
            [u.x, u.y, u.z, 0.0],
            [-f.x, -f.y, -f.z, 0.0],
            [p.x, p.y, p.z, 1.0],
        ]
    }

    /// Get the view matrix (world-to-camera)
    pub fn view_matrix(&self) -> Mat4 {
        let (s, u, f) = self.basis();
        [
            [s.x, u.x, -f.x, 0.0],
            [s.y, u.y, -f.y, 0.0],
            [s.z, u.z, -f.z, 0.0],
            [
                -s.dot(&self.position),
                -u.dot(&self.position),
                f.dot(&self.position),
                1.0,
            ],
        ]
    }

    /// Get the projection matrix. Both projections map depth to [-1, 1].
    pub fn projection_matrix(&self) -> Mat4 {
        if self.orthographic {
            self.orthographic_matrix()
        } else {
            self.perspective_matrix()
        }
    }

    fn perspective_matrix(&self) -> Mat4 {
        let f = 1.0 / (self.fov.to_radians() / 2.0).tan();
        let depth = self.far - self.near;

        [
            [f / self.aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, -(self.far + self.near) / depth, -1.0],
            [0.0, 0.0, -(2.0 * self.far * self.near) / depth, 0.0],
        ]
    }

    fn orthographic_matrix(&self) -> Mat4 {
        // Size the volume so objects at the target distance keep their perspective size
        let half_h = self.distance() * (self.fov.to_radians() / 2.0).tan();
        let half_w = half_h * self.aspect;
        let depth = self.far - self.near;

        [
            [1.0 / half_w, 0.0, 0.0, 0.0],
            [0.0, 1.0 / half_h, 0.0, 0.0],
            [0.0, 0.0, -2.0 / depth, 0.0],
            [0.0, 0.0, -(self.far + self.near) / depth, 1.0],
        ]
    }

    /// Get combined view-projection matrix
    pub fn view_projection_matrix(&self) -> Mat4 {
        mat4_mul(&self.projection_matrix(), &self.view_matrix())
    }

    /// Inverse view-projection matrix for unprojecting, None if degenerate
    pub fn inverse_view_projection_matrix(&self) -> Option<Mat4> {
        mat4_inverse(&self.view_projection_matrix())
    }

    /// Get camera forward direction (world space)
    pub fn forward_vector(&self) -> Vec3 {
        self.basis().2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::{transform_point, transform_vector};

    #[test]
    fn test_world_matrix_is_inverse_view() {
        let cam = Camera::look_at(Vec3::new(3.0, 4.0, 5.0), Vec3::ZERO, Vec3::UP);
        let id = mat4_mul(&cam.world_matrix(), &cam.view_matrix());
        for col in 0..4 {
            for row in 0..4 {
                let expected = if col == row { 1.0 } else { 0.0 };
                assert!((id[col][row] - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_local_z_points_back_at_viewer() {
        let cam = Camera::look_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::UP);
        let back = transform_vector(&cam.world_matrix(), Vec3::Z);
        assert!(back.abs_diff_eq(&Vec3::Z, 1e-12));
        assert!(cam.forward_vector().abs_diff_eq(&Vec3::new(0.0, 0.0, -1.0), 1e-12));
    }

    #[test]
    fn test_target_projects_to_center() {
        for orthographic in [false, true] {
            let mut cam = Camera::look_at(
                Vec3::new(2.0, 7.0, -3.0),
                Vec3::new(1.0, 0.0, 1.0),
                Vec3::UP,
            );
            cam.orthographic = orthographic;
            let ndc = transform_point(&cam.view_projection_matrix(), cam.target);
            assert!(ndc.x.abs() < 1e-9 && ndc.y.abs() < 1e-9);
            assert!(ndc.z > -1.0 && ndc.z < 1.0);
        }
    }

    #[test]
    fn test_orbit_keeps_distance() {
        let mut cam = Camera::look_at(Vec3::new(0.0, 5.0, 10.0), Vec3::ZERO, Vec3::UP);
        let before = cam.distance();
        cam.orbit_horizontal(std::f64::consts::FRAC_PI_2);
        assert!((cam.distance() - before).abs() < 1e-12);
        assert!(cam.position.abs_diff_eq(&Vec3::new(10.0, 5.0, 0.0), 1e-12));
    }
}
