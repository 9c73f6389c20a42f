//! Linear undo/redo history for tool commands

use crate::scene::CurveEditor;
use quill_core::Result;

/// A completed, already-executed operation the history can revert and replay
pub trait HistoryCommand {
    fn undo(&mut self, editor: &mut dyn CurveEditor) -> Result<()>;

    fn redo(&mut self, editor: &mut dyn CurveEditor) -> Result<()>;

    fn description(&self) -> String;
}

/// Undo/redo stack with bounded depth
pub struct History<C> {
    undo: Vec<C>,
    redo: Vec<C>,
    max_depth: usize,
}

impl<C: HistoryCommand> Default for History<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: HistoryCommand> History<C> {
    pub fn new() -> Self {
        Self::with_max_depth(100)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Record an executed command (clears redo). The oldest entry is evicted
    /// once the history is full.
    pub fn push(&mut self, command: C) {
        log::debug!("history: recorded '{}'", command.description());
        self.undo.push(command);
        self.redo.clear();
        if self.undo.len() > self.max_depth {
            self.undo.remove(0);
        }
    }

    /// Undo the most recent command. Returns false when there is nothing to undo.
    /// A command whose undo fails stays on the undo stack.
    pub fn undo(&mut self, editor: &mut dyn CurveEditor) -> Result<bool> {
        let Some(mut cmd) = self.undo.pop() else {
            return Ok(false);
        };
        if let Err(err) = cmd.undo(editor) {
            self.undo.push(cmd);
            return Err(err);
        }
        log::debug!("history: undid '{}'", cmd.description());
        self.redo.push(cmd);
        Ok(true)
    }

    /// Redo the most recently undone command. Returns false when there is nothing to redo.
    pub fn redo(&mut self, editor: &mut dyn CurveEditor) -> Result<bool> {
        let Some(mut cmd) = self.redo.pop() else {
            return Ok(false);
        };
        if let Err(err) = cmd.redo(editor) {
            self.redo.push(cmd);
            return Err(err);
        }
        log::debug!("history: redid '{}'", cmd.description());
        self.undo.push(cmd);
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_description(&self) -> Option<String> {
        self.undo.last().map(|c| c.description())
    }

    pub fn redo_description(&self) -> Option<String> {
        self.redo.last().map(|c| c.description())
    }

    /// Most recent executed command
    pub fn last(&self) -> Option<&C> {
        self.undo.last()
    }

    /// Executed commands, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &C> {
        self.undo.iter()
    }

    pub fn len(&self) -> usize {
        self.undo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
