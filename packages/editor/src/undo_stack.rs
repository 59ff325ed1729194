//! # Undo/Redo Stack
//!
//! Snapshot history of the element tree.
//!
//! - Every recorded edit pushes the tree as it was before the edit
//! - Undo restores the latest snapshot and keeps the current tree for redo
//! - A new edit clears the redo stack
//! - History is bounded; the oldest snapshot is dropped first
//!
//! Snapshots are whole trees. Templates are small enough that copying one
//! per edit is cheaper than maintaining inverse operations.

use labelforge_model::Element;

/// Default number of undo levels
pub const DEFAULT_UNDO_DEPTH: usize = 100;

#[derive(Debug, Clone)]
pub struct UndoStack {
    /// Trees before each recorded edit (most recent last)
    undo_stack: Vec<Vec<Element>>,

    /// Trees replaced by undo (most recent last)
    redo_stack: Vec<Vec<Element>>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::with_max_levels(DEFAULT_UNDO_DEPTH)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
        }
    }

    /// Record the tree as it was before an edit
    pub fn record(&mut self, before: Vec<Element>) {
        self.undo_stack.push(before);

        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        self.redo_stack.clear();
    }

    /// Step back: returns the tree to restore, given the current one
    pub fn undo(&mut self, current: Vec<Element>) -> Option<Vec<Element>> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Step forward again after an undo
    pub fn redo(&mut self, current: Vec<Element>) -> Option<Vec<Element>> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
