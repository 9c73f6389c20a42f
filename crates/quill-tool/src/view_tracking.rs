//! Keeps the camera-facing normal current while the tool is active

use crate::projection::camera_facing_normal;
use quill_core::{Result, Vec3};
use quill_scene::{CallbackId, RenderNotifier, ViewProvider};
use std::cell::Cell;
use std::rc::Rc;

/// Camera-facing normal shared with a post-render subscription
#[derive(Debug)]
pub struct ViewTracker {
    normal: Rc<Cell<Vec3>>,
    callback: Option<CallbackId>,
}

impl Default for ViewTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewTracker {
    pub fn new() -> Self {
        Self {
            normal: Rc::new(Cell::new(Vec3::Z)),
            callback: None,
        }
    }

    /// Read the normal from `view` and refresh it after every render.
    /// Attaching twice keeps the first subscription.
    pub fn attach(
        &mut self,
        view: &dyn ViewProvider,
        notifier: &mut dyn RenderNotifier,
    ) -> Result<()> {
        self.normal.set(camera_facing_normal(&view.camera_world_matrix()));
        if self.callback.is_some() {
            return Ok(());
        }

        let normal = Rc::clone(&self.normal);
        let id = notifier.add_post_render_callback(Box::new(move |view: &dyn ViewProvider| {
            normal.set(camera_facing_normal(&view.camera_world_matrix()));
        }))?;
        log::debug!("view tracking attached ({id})");
        self.callback = Some(id);
        Ok(())
    }

    pub fn detach(&mut self, notifier: &mut dyn RenderNotifier) -> Result<()> {
        if let Some(id) = self.callback.take() {
            notifier.remove_callback(id)?;
            log::debug!("view tracking detached ({id})");
        }
        Ok(())
    }

    pub fn is_attached(&self) -> bool {
        self.callback.is_some()
    }

    /// Most recent camera-facing normal
    pub fn normal(&self) -> Vec3 {
        self.normal.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::top_down_view;
    use quill_scene::PostRenderHub;

    #[test]
    fn test_attach_reads_current_camera() {
        let view = top_down_view();
        let mut hub = PostRenderHub::new();
        let mut tracker = ViewTracker::new();
        tracker.attach(&view, &mut hub).unwrap();
        assert!(tracker.normal().abs_diff_eq(&Vec3::Y, 1e-12));
        assert!(tracker.is_attached());
    }

    #[test]
    fn test_render_refreshes_normal() {
        let mut view = top_down_view();
        let mut hub = PostRenderHub::new();
        let mut tracker = ViewTracker::new();
        tracker.attach(&view, &mut hub).unwrap();

        view.camera.position = Vec3::new(0.0, 0.0, 10.0);
        view.camera.up = Vec3::UP;
        // No render yet
        assert!(tracker.normal().abs_diff_eq(&Vec3::Y, 1e-12));
        hub.notify(&view);
        assert!(tracker.normal().abs_diff_eq(&Vec3::Z, 1e-12));
    }

    #[test]
    fn test_single_subscription() {
        let view = top_down_view();
        let mut hub = PostRenderHub::new();
        let mut tracker = ViewTracker::new();
        tracker.attach(&view, &mut hub).unwrap();
        tracker.attach(&view, &mut hub).unwrap();
        assert_eq!(hub.len(), 1);

        tracker.detach(&mut hub).unwrap();
        assert!(hub.is_empty());
        assert!(!tracker.is_attached());
        // Detaching again is a no-op
        tracker.detach(&mut hub).unwrap();
    }

    #[test]
    fn test_detached_tracker_ignores_renders() {
        let mut view = top_down_view();
        let mut hub = PostRenderHub::new();
        let mut tracker = ViewTracker::new();
        tracker.attach(&view, &mut hub).unwrap();
        tracker.detach(&mut hub).unwrap();

        view.camera.position = Vec3::new(10.0, 0.0, 0.0);
        view.camera.up = Vec3::UP;
        hub.notify(&view);
        assert!(tracker.normal().abs_diff_eq(&Vec3::Y, 1e-12));
    }
}
