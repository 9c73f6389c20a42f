//! Draw curve context: the press / drag / release state machine
//!
//! Press picks the closest candidate surface under the pointer and anchors a
//! camera-facing plane at the hit. Drag projects the pointer onto that plane,
//! so strokes can leave the surface, and rebuilds the live curve whenever the
//! sampler emits a point. Release appends the final point, discards the live
//! curve and commits the stroke as a [`DrawCurveCommand`].

use crate::builder::CurveBuilder;
use crate::command::DrawCurveCommand;
use crate::config::ToolConfig;
use crate::projection::{plane_line_intersection, ProjectionPlane};
use crate::query::{intersect, SurfaceIntersection};
use crate::sampler::Sampler;
use crate::view_tracking::ViewTracker;
use crate::CONTEXT_CLASS;
use quill_core::{EntityId, Result, Vec3};
use quill_scene::{
    CurveEditor, History, RenderNotifier, SelectionSource, SurfaceQuery, ViewProvider,
};

/// Where the context is within a stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    /// Press hit a surface, no drag yet
    Armed,
    Dragging,
}

/// Pointer input in view pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Press { x: f64, y: f64 },
    Drag { x: f64, y: f64 },
    Release { x: f64, y: f64 },
}

/// Interactive tool that draws one curve per stroke onto the selected surfaces
pub struct DrawCurveContext {
    config: ToolConfig,
    sampler: Sampler,
    builder: CurveBuilder,
    tracker: ViewTracker,
    candidates: Vec<EntityId>,
    edit_points: Vec<Vec3>,
    plane: Option<ProjectionPlane>,
    hit: Option<SurfaceIntersection>,
    state: GestureState,
}

impl DrawCurveContext {
    pub fn new(config: ToolConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            sampler: Sampler::new(config.length)?,
            builder: CurveBuilder::new(config.degree, config.uniform_param),
            tracker: ViewTracker::new(),
            candidates: Vec::new(),
            edit_points: Vec::new(),
            plane: None,
            hit: None,
            state: GestureState::Idle,
            config,
        })
    }

    pub fn class_name(&self) -> &'static str {
        CONTEXT_CLASS
    }

    // --- Lifecycle ---

    /// Capture the candidate surfaces and start tracking the view's camera
    pub fn on_activate(
        &mut self,
        view: &dyn ViewProvider,
        selection: &dyn SelectionSource,
        notifier: &mut dyn RenderNotifier,
    ) -> Result<()> {
        self.candidates = selection.selected_surfaces();
        self.reset_gesture();
        self.tracker.attach(view, notifier)?;
        log::debug!(
            "{CONTEXT_CLASS} activated with {} candidate surfaces",
            self.candidates.len()
        );
        Ok(())
    }

    /// Stop tracking the view and drop any stroke in progress.
    ///
    /// An uncommitted live curve is deleted unless `discard_on_deactivate` is off.
    pub fn on_deactivate(
        &mut self,
        notifier: &mut dyn RenderNotifier,
        editor: &mut dyn CurveEditor,
    ) -> Result<()> {
        let detached = self.tracker.detach(notifier);
        let discarded = if self.config.discard_on_deactivate {
            self.builder.discard(editor)
        } else {
            if let Some(id) = self.builder.forget() {
                log::warn!("leaving uncommitted curve {id} in the scene");
            }
            Ok(())
        };
        self.reset_gesture();
        self.candidates.clear();
        log::debug!("{CONTEXT_CLASS} deactivated");
        detached.and(discarded)
    }

    // --- Gesture ---

    /// Start a stroke. Returns the surface hit, or None if the press missed
    /// every candidate, in which case drag and release do nothing.
    ///
    /// A live curve left by a stroke that was never released is deleted first.
    pub fn press<S>(
        &mut self,
        x: f64,
        y: f64,
        view: &dyn ViewProvider,
        scene: &mut S,
    ) -> Result<Option<SurfaceIntersection>>
    where
        S: SurfaceQuery + CurveEditor,
    {
        self.discard_stale_curve(scene);
        self.reset_gesture();

        let hit = intersect(
            view,
            x,
            y,
            &self.candidates,
            &*scene,
            self.config.max_ray_length,
            self.config.hit_tolerance,
        )?;
        let Some(hit) = hit else {
            log::debug!("press at ({x}, {y}) hit no surface");
            return Ok(None);
        };

        self.edit_points.push(hit.point);
        self.sampler.reset(hit.point);
        self.plane = Some(ProjectionPlane::new(hit.point, self.tracker.normal()));
        self.hit = Some(hit);
        self.state = GestureState::Armed;
        log::debug!("press hit surface {} at {:?}", hit.surface, hit.point);
        Ok(Some(hit))
    }

    /// Continue a stroke. Returns the edit point emitted by this move, if any.
    ///
    /// A pointer line parallel to the plane is skipped. A failed rebuild
    /// aborts the stroke.
    pub fn drag(
        &mut self,
        x: f64,
        y: f64,
        view: &dyn ViewProvider,
        editor: &mut dyn CurveEditor,
    ) -> Result<Option<Vec3>> {
        let Some(plane) = self.active_plane() else {
            return Ok(None);
        };
        let (near, far) = view.view_to_world(x, y)?;
        let Some(projected) = plane_line_intersection(near, far, &plane) else {
            log::warn!("drag at ({x}, {y}) is parallel to the drawing plane, skipped");
            return Ok(None);
        };
        self.state = GestureState::Dragging;

        let Some(point) = self.sampler.on_drag_point(projected) else {
            return Ok(None);
        };
        self.edit_points.push(point);
        log::trace!("edit point {} at {:?}", self.edit_points.len(), point);

        if let Err(err) = self.builder.rebuild(editor, &self.edit_points) {
            self.abort(editor);
            return Err(err);
        }
        Ok(Some(point))
    }

    /// Finish a stroke and commit it to `history`. Returns the committed curve.
    ///
    /// If the final pointer position cannot be projected, the last projected
    /// position is used instead.
    pub fn release(
        &mut self,
        x: f64,
        y: f64,
        view: &dyn ViewProvider,
        editor: &mut dyn CurveEditor,
        history: &mut History<DrawCurveCommand>,
    ) -> Result<Option<EntityId>> {
        let Some(plane) = self.active_plane() else {
            return Ok(None);
        };
        let projected = match view.view_to_world(x, y) {
            Ok((near, far)) => plane_line_intersection(near, far, &plane),
            Err(err) => {
                log::warn!("release at ({x}, {y}) could not be unprojected: {err}");
                None
            }
        };
        let last = projected.unwrap_or_else(|| {
            log::warn!("release at ({x}, {y}) reuses the last projected point");
            self.sampler.last_point()
        });
        self.edit_points.push(last);

        if let Err(err) = self.builder.discard(editor) {
            self.abort(editor);
            return Err(err);
        }

        let edit_points = std::mem::take(&mut self.edit_points);
        let mut command =
            DrawCurveCommand::new(edit_points, self.config.degree, self.config.uniform_param);
        let id = match command.execute(editor) {
            Ok(id) => id,
            Err(err) => {
                self.abort(editor);
                return Err(err);
            }
        };
        history.push(command);
        self.reset_gesture();
        log::debug!("release committed curve {id}");
        Ok(Some(id))
    }

    /// Route a pointer event to press, drag or release
    pub fn handle_event<S>(
        &mut self,
        event: PointerEvent,
        view: &dyn ViewProvider,
        scene: &mut S,
        history: &mut History<DrawCurveCommand>,
    ) -> Result<()>
    where
        S: SurfaceQuery + CurveEditor,
    {
        match event {
            PointerEvent::Press { x, y } => self.press(x, y, view, scene).map(|_| ()),
            PointerEvent::Drag { x, y } => self.drag(x, y, view, scene).map(|_| ()),
            PointerEvent::Release { x, y } => {
                self.release(x, y, view, scene, history).map(|_| ())
            }
        }
    }

    // --- Settings ---

    /// Minimum spacing between edit points
    pub fn length(&self) -> f64 {
        self.sampler.threshold()
    }

    /// Change the spacing; applies immediately, including to a stroke in progress
    pub fn set_length(&mut self, length: f64) -> Result<()> {
        self.sampler.set_threshold(length)?;
        self.config.length = length;
        Ok(())
    }

    // --- Inspection ---

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn edit_points(&self) -> &[Vec3] {
        &self.edit_points
    }

    pub fn candidates(&self) -> &[EntityId] {
        &self.candidates
    }

    /// Surface hit of the current stroke
    pub fn hit(&self) -> Option<SurfaceIntersection> {
        self.hit
    }

    pub fn plane(&self) -> Option<ProjectionPlane> {
        self.plane
    }

    /// In-progress curve of the current stroke
    pub fn live_curve(&self) -> Option<EntityId> {
        self.builder.live()
    }

    pub fn camera_normal(&self) -> Vec3 {
        self.tracker.normal()
    }

    pub fn is_tracking_view(&self) -> bool {
        self.tracker.is_attached()
    }

    fn active_plane(&self) -> Option<ProjectionPlane> {
        match self.state {
            GestureState::Idle => None,
            GestureState::Armed | GestureState::Dragging => self.plane,
        }
    }

    fn reset_gesture(&mut self) {
        self.edit_points.clear();
        self.plane = None;
        self.hit = None;
        self.state = GestureState::Idle;
    }

    /// Best-effort cleanup after a failed scene mutation. A curve the scene
    /// refuses to delete stays owned by the builder until a later cleanup succeeds.
    fn abort(&mut self, editor: &mut dyn CurveEditor) {
        if let Err(err) = self.builder.discard(editor) {
            log::warn!("could not discard live curve after failed stroke: {err}");
        }
        self.reset_gesture();
    }

    fn discard_stale_curve(&mut self, editor: &mut dyn CurveEditor) {
        let Some(id) = self.builder.live() else {
            return;
        };
        match self.builder.discard(editor) {
            Ok(()) => log::debug!("discarded unreleased curve {id}"),
            Err(err) => log::warn!("could not discard unreleased curve {id}: {err}"),
        }
    }
}
