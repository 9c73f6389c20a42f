//! Live curve rebuilt from the edit points captured so far

use quill_core::nurbs::MIN_EDIT_POINTS;
use quill_core::{CurveForm, EntityId, Result, Vec3};
use quill_scene::{CurveEditor, CurveRequest};

/// Request for an open curve through `edit_points`
pub(crate) fn open_curve_request(
    edit_points: &[Vec3],
    degree: usize,
    uniform_param: bool,
) -> CurveRequest<'_> {
    CurveRequest {
        edit_points,
        degree,
        form: CurveForm::Open,
        uniform_param,
    }
}

/// Owns the in-progress curve of a stroke.
///
/// The curve is never edited in place: every rebuild deletes the previous
/// entity and creates a new one from the full point list.
#[derive(Debug, Clone)]
pub struct CurveBuilder {
    live: Option<EntityId>,
    degree: usize,
    uniform_param: bool,
}

impl CurveBuilder {
    pub fn new(degree: usize, uniform_param: bool) -> Self {
        Self {
            live: None,
            degree,
            uniform_param,
        }
    }

    /// Handle of the in-progress curve, if any
    pub fn live(&self) -> Option<EntityId> {
        self.live
    }

    /// Replace the live curve with one through `edit_points`.
    ///
    /// With fewer than two points nothing happens and `Ok(None)` is returned.
    /// If creation fails after the old curve was deleted, no curve is left live.
    pub fn rebuild(
        &mut self,
        editor: &mut dyn CurveEditor,
        edit_points: &[Vec3],
    ) -> Result<Option<EntityId>> {
        if edit_points.len() < MIN_EDIT_POINTS {
            return Ok(None);
        }
        self.discard(editor)?;

        let request = open_curve_request(edit_points, self.degree, self.uniform_param);
        let id = editor.create_curve(&request)?;
        log::trace!("rebuilt live curve {id} from {} edit points", edit_points.len());
        self.live = Some(id);
        Ok(Some(id))
    }

    /// Delete the live curve. A handle the host already removed is just forgotten.
    pub fn discard(&mut self, editor: &mut dyn CurveEditor) -> Result<()> {
        let Some(id) = self.live else {
            return Ok(());
        };
        if editor.is_live(id) {
            editor.delete_curve(id)?;
        }
        self.live = None;
        Ok(())
    }

    /// Drop the handle without touching the scene
    pub fn forget(&mut self) -> Option<EntityId> {
        self.live.take()
    }
}
