//! Shared fixtures for the tool tests

use quill_core::Vec3;
use quill_scene::mesh::Axis;
use quill_scene::{Camera, Mesh, Viewport};

/// Orthographic camera looking straight down at the origin from y = 10.
///
/// 200x200 pixels cover x and z in [-10, 10]: pixel `(px, py)` sees world
/// `(px / 10 - 10, _, py / 10 - 10)`.
pub fn top_down_view() -> Viewport {
    let mut cam = Camera::look_at(
        Vec3::new(0.0, 10.0, 0.0),
        Vec3::ZERO,
        Vec3::new(0.0, 0.0, -1.0),
    );
    cam.orthographic = true;
    cam.fov = 90.0;
    Viewport::new(cam, 200.0, 200.0)
}

/// 20x20 ground quad at y = 0
pub fn ground() -> Mesh {
    Mesh::quad(Vec3::ZERO, [10.0, 10.0], Axis::Y)
}
