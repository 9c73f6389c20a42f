//! Pointer picking against the candidate surfaces

use quill_core::{EntityId, QuillError, Ray, Result, Vec3};
use quill_scene::{SurfaceQuery, ViewProvider};

/// Closest surface hit under the pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceIntersection {
    pub point: Vec3,
    /// Distance from the near end of the pointer ray
    pub distance: f64,
    pub surface: EntityId,
}

/// Unproject the pixel `(x, y)` into a world ray and return the closest hit
/// over `candidates`. Surfaces further than `max_ray_length` are ignored.
pub fn intersect(
    view: &dyn ViewProvider,
    x: f64,
    y: f64,
    candidates: &[EntityId],
    surfaces: &dyn SurfaceQuery,
    max_ray_length: f64,
    tolerance: f64,
) -> Result<Option<SurfaceIntersection>> {
    let (near, far) = view.view_to_world(x, y)?;
    let ray = Ray::through(near, far).ok_or_else(|| {
        QuillError::ViewError(format!("pointer ray at ({x}, {y}) has no direction"))
    })?;

    let mut closest: Option<SurfaceIntersection> = None;
    for &surface in candidates {
        let hit = surfaces.closest_intersection(surface, &ray, max_ray_length, tolerance)?;
        let Some(hit) = hit else {
            continue;
        };
        // First surface wins ties
        if closest.map_or(true, |c| hit.distance < c.distance) {
            closest = Some(SurfaceIntersection {
                point: hit.point,
                distance: hit.distance,
                surface,
            });
        }
    }
    Ok(closest)
}
