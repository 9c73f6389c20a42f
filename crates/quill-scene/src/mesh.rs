//! Triangle meshes and ray intersection
//!
//! Meshes are stored in world space. A ray is first tested against the mesh
//! bounding box (slab method), then against every triangle (Möller–Trumbore,
//! two-sided), keeping the nearest hit.

use quill_core::{transform_point, Mat4, QuillError, Ray, Result, Vec3};
use serde::{Deserialize, Serialize};

/// Axis used to orient flat primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    #[default]
    Y,
    Z,
}

/// Axis-Aligned Bounding Box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Smallest box containing all `points`, or None for an empty slice
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points
            .iter()
            .fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Some(Self { min, max })
    }

    /// Grow the box by `margin` on every side
    pub fn inflated(&self, margin: f64) -> Self {
        let m = Vec3::new(margin, margin, margin);
        Self {
            min: self.min - m,
            max: self.max + m,
        }
    }

    /// Ray-AABB intersection using the slab method (Kay/Kajiya).
    /// Returns the entry distance along the ray, or None if the ray misses.
    pub fn ray_entry(&self, ray: &Ray) -> Option<f64> {
        let origin = ray.origin.to_array();
        let dir = ray.direction.to_array();
        let min = self.min.to_array();
        let max = self.max.to_array();

        let mut tmin = f64::NEG_INFINITY;
        let mut tmax = f64::INFINITY;

        for i in 0..3 {
            if dir[i].abs() < 1e-12 {
                // Parallel to this slab
                if origin[i] < min[i] || origin[i] > max[i] {
                    return None;
                }
            } else {
                let inv_d = 1.0 / dir[i];
                let mut t1 = (min[i] - origin[i]) * inv_d;
                let mut t2 = (max[i] - origin[i]) * inv_d;
                if t1 > t2 {
                    std::mem::swap(&mut t1, &mut t2);
                }
                tmin = tmin.max(t1);
                tmax = tmax.min(t2);
                if tmin > tmax {
                    return None;
                }
            }
        }

        if tmax < 0.0 {
            None
        } else {
            Some(tmin.max(0.0))
        }
    }
}

/// Nearest intersection of a ray with one surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    pub point: Vec3,
    /// Distance from the ray origin
    pub distance: f64,
    /// Index of the triangle that was hit
    pub face: usize,
}

/// An indexed triangle mesh
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    triangles: Vec<[usize; 3]>,
    bounds: Aabb,
}

impl Mesh {
    pub fn new(vertices: Vec<Vec3>, triangles: Vec<[usize; 3]>) -> Result<Self> {
        if triangles.is_empty() {
            return Err(QuillError::ParseError("mesh has no triangles".into()));
        }
        if let Some(tri) = triangles.iter().find(|t| t.iter().any(|&i| i >= vertices.len())) {
            return Err(QuillError::ParseError(format!(
                "triangle {tri:?} references a vertex out of range (mesh has {})",
                vertices.len()
            )));
        }
        if vertices.iter().any(|v| !v.is_finite()) {
            return Err(QuillError::ParseError("mesh has non-finite vertices".into()));
        }
        let bounds = Aabb::from_points(&vertices)
            .ok_or_else(|| QuillError::ParseError("mesh has no vertices".into()))?;
        Ok(Self {
            vertices,
            triangles,
            bounds,
        })
    }

    /// Two-triangle rectangle centered at `center`, perpendicular to `axis`.
    /// `half_size` spans the two remaining axes in x, y, z order.
    pub fn quad(center: Vec3, half_size: [f64; 2], axis: Axis) -> Self {
        let (u, v) = match axis {
            Axis::X => (Vec3::Y, Vec3::Z),
            Axis::Y => (Vec3::X, Vec3::Z),
            Axis::Z => (Vec3::X, Vec3::Y),
        };
        let du = u * half_size[0];
        let dv = v * half_size[1];
        let vertices = vec![
            center - du - dv,
            center + du - dv,
            center + du + dv,
            center - du + dv,
        ];
        let bounds = Aabb::from_points(&vertices).unwrap_or(Aabb {
            min: center,
            max: center,
        });
        Self {
            vertices,
            triangles: vec![[0, 1, 2], [0, 2, 3]],
            bounds,
        }
    }

    /// Axis-aligned box with 12 triangles
    pub fn cuboid(center: Vec3, half_extents: Vec3) -> Self {
        let h = half_extents;
        let corner = |sx: f64, sy: f64, sz: f64| center + Vec3::new(sx * h.x, sy * h.y, sz * h.z);
        let vertices = vec![
            corner(-1.0, -1.0, -1.0),
            corner(1.0, -1.0, -1.0),
            corner(1.0, 1.0, -1.0),
            corner(-1.0, 1.0, -1.0),
            corner(-1.0, -1.0, 1.0),
            corner(1.0, -1.0, 1.0),
            corner(1.0, 1.0, 1.0),
            corner(-1.0, 1.0, 1.0),
        ];
        let triangles = vec![
            // -z
            [0, 2, 1],
            [0, 3, 2],
            // +z
            [4, 5, 6],
            [4, 6, 7],
            // -y
            [0, 1, 5],
            [0, 5, 4],
            // +y
            [3, 7, 6],
            [3, 6, 2],
            // -x
            [0, 4, 7],
            [0, 7, 3],
            // +x
            [1, 2, 6],
            [1, 6, 5],
        ];
        let bounds = Aabb {
            min: center - h,
            max: center + h,
        };
        Self {
            vertices,
            triangles,
            bounds,
        }
    }

    /// Copy of the mesh with every vertex transformed by `matrix`
    pub fn transformed(&self, matrix: &Mat4) -> Result<Self> {
        let vertices = self
            .vertices
            .iter()
            .map(|v| transform_point(matrix, *v))
            .collect();
        Self::new(vertices, self.triangles.clone())
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Nearest hit along `ray` no further than `max_distance`.
    ///
    /// `tolerance` widens the barycentric acceptance range so a ray through a
    /// shared edge is not lost between two triangles.
    pub fn closest_intersection(
        &self,
        ray: &Ray,
        max_distance: f64,
        tolerance: f64,
    ) -> Option<SurfaceHit> {
        let entry = self.bounds.inflated(tolerance).ray_entry(ray)?;
        if entry > max_distance {
            return None;
        }

        let mut best: Option<SurfaceHit> = None;
        for (face, tri) in self.triangles.iter().enumerate() {
            let [a, b, c] = tri.map(|i| self.vertices[i]);
            let Some(t) = ray_triangle(ray, a, b, c, tolerance) else {
                continue;
            };
            if t > max_distance {
                continue;
            }
            if best.map_or(true, |hit| t < hit.distance) {
                best = Some(SurfaceHit {
                    point: ray.point_at(t),
                    distance: t,
                    face,
                });
            }
        }
        best
    }
}

/// Möller–Trumbore ray/triangle test. Returns the distance along the ray.
fn ray_triangle(ray: &Ray, a: Vec3, b: Vec3, c: Vec3, tolerance: f64) -> Option<f64> {
    let e1 = b - a;
    let e2 = c - a;
    let pvec = ray.direction.cross(&e2);
    let det = e1.dot(&pvec);
    if det.abs() < 1e-12 {
        // Ray lies in the triangle's plane, or the triangle is degenerate
        return None;
    }
    let inv_det = 1.0 / det;

    let tvec = ray.origin - a;
    let u = tvec.dot(&pvec) * inv_det;
    if u < -tolerance || u > 1.0 + tolerance {
        return None;
    }

    let qvec = tvec.cross(&e1);
    let v = ray.direction.dot(&qvec) * inv_det;
    if v < -tolerance || u + v > 1.0 + tolerance {
        return None;
    }

    let t = e2.dot(&qvec) * inv_det;
    if t < 0.0 {
        None
    } else {
        Some(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down_ray(x: f64, z: f64) -> Ray {
        Ray {
            origin: Vec3::new(x, 10.0, z),
            direction: Vec3::new(0.0, -1.0, 0.0),
        }
    }

    #[test]
    fn test_aabb_slab() {
        let aabb = Aabb {
            min: Vec3::new(-1.0, -1.0, -1.0),
            max: Vec3::new(1.0, 1.0, 1.0),
        };
        assert_eq!(aabb.ray_entry(&down_ray(0.0, 0.0)), Some(9.0));
        assert_eq!(aabb.ray_entry(&down_ray(2.0, 0.0)), None);

        // Box behind the ray
        let away = Ray {
            origin: Vec3::new(0.0, 10.0, 0.0),
            direction: Vec3::Y,
        };
        assert_eq!(aabb.ray_entry(&away), None);
    }

    #[test]
    fn test_quad_hit() {
        let quad = Mesh::quad(Vec3::ZERO, [5.0, 5.0], Axis::Y);
        let hit = quad.closest_intersection(&down_ray(1.0, 2.0), 1000.0, 1e-5).unwrap();
        assert!(hit.point.abs_diff_eq(&Vec3::new(1.0, 0.0, 2.0), 1e-12));
        assert!((hit.distance - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_quad_miss_outside() {
        let quad = Mesh::quad(Vec3::ZERO, [5.0, 5.0], Axis::Y);
        assert!(quad.closest_intersection(&down_ray(6.0, 0.0), 1000.0, 1e-5).is_none());
    }

    #[test]
    fn test_max_distance_limits_hits() {
        let quad = Mesh::quad(Vec3::ZERO, [5.0, 5.0], Axis::Y);
        assert!(quad.closest_intersection(&down_ray(0.0, 0.0), 9.5, 1e-5).is_none());
    }

    #[test]
    fn test_diagonal_edge_is_hit() {
        // Both triangles of the quad share the (-,-)..(+,+) diagonal
        let quad = Mesh::quad(Vec3::ZERO, [1.0, 1.0], Axis::Y);
        let hit = quad.closest_intersection(&down_ray(0.25, 0.25), 1000.0, 1e-5);
        assert!(hit.is_some());
    }

    #[test]
    fn test_cuboid_nearest_face() {
        let cube = Mesh::cuboid(Vec3::ZERO, Vec3::ONE);
        let hit = cube.closest_intersection(&down_ray(0.2, -0.3), 1000.0, 1e-5).unwrap();
        // Top face at y = 1, not the bottom one
        assert!((hit.point.y - 1.0).abs() < 1e-12);
        assert!((hit.distance - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_transformed_mesh() {
        let quad = Mesh::quad(Vec3::ZERO, [1.0, 1.0], Axis::Y);
        let mut m = quill_core::MAT4_IDENTITY;
        m[3] = [0.0, 2.0, 0.0, 1.0];
        let moved = quad.transformed(&m).unwrap();
        let hit = moved.closest_intersection(&down_ray(0.0, 0.0), 1000.0, 1e-5).unwrap();
        assert!((hit.point.y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_mesh() {
        assert!(Mesh::new(vec![Vec3::ZERO], vec![[0, 1, 2]]).is_err());
        assert!(Mesh::new(vec![Vec3::ZERO], vec![]).is_err());
    }
}
