//! Plane projection for strokes that leave the picked surface

use quill_core::{transform_vector, Mat4, Vec3};

/// Below this (relative to the line length) the line counts as parallel to the plane
pub const PARALLEL_EPSILON: f64 = 1e-6;

/// Infinite plane through `point` with unit `normal`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionPlane {
    pub point: Vec3,
    pub normal: Vec3,
}

impl ProjectionPlane {
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self {
            point,
            normal: normal.normalized(),
        }
    }

    /// Signed distance of `p` from the plane
    pub fn signed_distance(&self, p: Vec3) -> f64 {
        self.normal.dot(&(p - self.point))
    }
}

/// Intersect the infinite line through `a` and `b` with `plane`.
///
/// Returns None when the line is (nearly) parallel to the plane, `a` and `b`
/// coincide, or the result is not finite.
pub fn plane_line_intersection(a: Vec3, b: Vec3, plane: &ProjectionPlane) -> Option<Vec3> {
    let dir = b - a;
    let len = dir.length();
    if len <= 0.0 || !len.is_finite() {
        return None;
    }
    let denom = plane.normal.dot(&dir);
    if denom.abs() < PARALLEL_EPSILON * len {
        return None;
    }
    let t = plane.normal.dot(&(plane.point - a)) / denom;
    let hit = a + dir * t;
    hit.is_finite().then_some(hit)
}

/// Unit direction from the scene towards the viewer: camera-local +Z in world space
pub fn camera_facing_normal(camera_world: &Mat4) -> Vec3 {
    transform_vector(camera_world, Vec3::Z).normalized()
}
