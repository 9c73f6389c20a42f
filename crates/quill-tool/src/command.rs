//! The undoable unit recorded for every finished stroke

use crate::builder::open_curve_request;
use crate::TOOL_COMMAND;
use quill_core::{EntityId, Result, Vec3};
use quill_scene::{CurveEditor, HistoryCommand};
use std::fmt::Write;

/// Whether the command's curve currently exists in the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandState {
    /// Not executed yet, or undone
    Pending,
    Committed(EntityId),
}

/// Creates one curve from a fixed list of edit points.
///
/// Redo rebuilds the curve from the stored points alone, so the entity id
/// after a redo differs from the one before the undo.
#[derive(Debug, Clone)]
pub struct DrawCurveCommand {
    edit_points: Vec<Vec3>,
    degree: usize,
    uniform_param: bool,
    state: CommandState,
}

impl DrawCurveCommand {
    pub fn new(edit_points: Vec<Vec3>, degree: usize, uniform_param: bool) -> Self {
        Self {
            edit_points,
            degree,
            uniform_param,
            state: CommandState::Pending,
        }
    }

    pub fn edit_points(&self) -> &[Vec3] {
        &self.edit_points
    }

    pub fn state(&self) -> CommandState {
        self.state
    }

    /// Handle of the committed curve
    pub fn curve(&self) -> Option<EntityId> {
        match self.state {
            CommandState::Committed(id) => Some(id),
            CommandState::Pending => None,
        }
    }

    /// Build the curve. Running it while the curve is still live returns the existing handle.
    pub fn execute(&mut self, editor: &mut dyn CurveEditor) -> Result<EntityId> {
        if let CommandState::Committed(id) = self.state {
            if editor.is_live(id) {
                return Ok(id);
            }
        }
        let request = open_curve_request(&self.edit_points, self.degree, self.uniform_param);
        let id = editor.create_curve(&request)?;
        self.state = CommandState::Committed(id);
        log::debug!("{TOOL_COMMAND}: committed curve {id}");
        Ok(id)
    }

    /// Name the host records the command under
    pub fn command_string(&self) -> &'static str {
        TOOL_COMMAND
    }

    /// Replayable one-line form of the command
    pub fn journal(&self) -> String {
        let mut line = format!("{} -degree {}", TOOL_COMMAND, self.degree);
        if !self.uniform_param {
            line.push_str(" -chordLength");
        }
        for p in &self.edit_points {
            let _ = write!(line, " -ep {} {} {}", p.x, p.y, p.z);
        }
        line.push(';');
        line
    }
}

impl HistoryCommand for DrawCurveCommand {
    /// Delete the curve. Undoing a command whose curve is already gone does nothing.
    fn undo(&mut self, editor: &mut dyn CurveEditor) -> Result<()> {
        if let CommandState::Committed(id) = self.state {
            if editor.is_live(id) {
                editor.delete_curve(id)?;
            }
            self.state = CommandState::Pending;
        }
        Ok(())
    }

    fn redo(&mut self, editor: &mut dyn CurveEditor) -> Result<()> {
        self.execute(editor).map(|_| ())
    }

    fn description(&self) -> String {
        format!("Draw curve ({} edit points)", self.edit_points.len())
    }
}
