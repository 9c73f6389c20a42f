//! Views: turning pointer positions into world-space lines
//!
//! Screen coordinates are in pixels with the origin at the top-left corner.

use crate::camera::Camera;
use quill_core::{transform_point, Mat4, QuillError, Result, Vec3};

/// What a tool needs from the view it is drawing in
pub trait ViewProvider {
    /// Near and far world-space points under the pixel `(x, y)`
    fn view_to_world(&self, x: f64, y: f64) -> Result<(Vec3, Vec3)>;

    /// Camera-to-world transform of the view's camera
    fn camera_world_matrix(&self) -> Mat4;
}

/// A camera rendered into a pixel rectangle
#[derive(Debug, Clone)]
pub struct Viewport {
    pub camera: Camera,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Create a viewport and match the camera aspect ratio to it
    pub fn new(mut camera: Camera, width: f64, height: f64) -> Self {
        if width > 0.0 && height > 0.0 {
            camera.aspect = width / height;
        }
        Self {
            camera,
            width,
            height,
        }
    }

    /// Project a world-space point to pixel coordinates.
    /// Returns None if the point is behind the camera.
    pub fn world_to_view(&self, pos: Vec3) -> Option<(f64, f64)> {
        let vp = self.camera.view_projection_matrix();
        let clip_w = vp[0][3] * pos.x + vp[1][3] * pos.y + vp[2][3] * pos.z + vp[3][3];
        if clip_w <= 1e-9 {
            return None;
        }
        let ndc = transform_point(&vp, pos);
        Some((
            (ndc.x + 1.0) * 0.5 * self.width,
            (1.0 - ndc.y) * 0.5 * self.height,
        ))
    }
}

impl ViewProvider for Viewport {
    fn view_to_world(&self, x: f64, y: f64) -> Result<(Vec3, Vec3)> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(QuillError::ViewError(format!(
                "viewport has no area ({}x{})",
                self.width, self.height
            )));
        }
        let inv_vp = self.camera.inverse_view_projection_matrix().ok_or_else(|| {
            QuillError::ViewError("camera view-projection matrix is singular".into())
        })?;

        // Y flipped: pixel rows grow downwards, NDC grows upwards
        let ndc_x = 2.0 * x / self.width - 1.0;
        let ndc_y = 1.0 - 2.0 * y / self.height;

        let near = transform_point(&inv_vp, Vec3::new(ndc_x, ndc_y, -1.0));
        let far = transform_point(&inv_vp, Vec3::new(ndc_x, ndc_y, 1.0));
        Ok((near, far))
    }

    fn camera_world_matrix(&self) -> Mat4 {
        self.camera.world_matrix()
    }
}
