//! # Editor
//!
//! Owns an [`EditorState`] and funnels every change through [`Editor::dispatch`].
//! Tree edits are recorded in an [`UndoStack`] so they can be undone.

use crate::errors::EditorResult;
use crate::state::{reduce_tracked, Command, EditorState, TreeChange};
use crate::undo_stack::{UndoStack, DEFAULT_UNDO_DEPTH};
use labelforge_model::{serialize, Element};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorOptions {
    /// Maximum undo levels (0 = unlimited)
    pub undo_depth: usize,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            undo_depth: DEFAULT_UNDO_DEPTH,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Editor {
    state: EditorState,
    history: UndoStack,
}

impl Editor {
    pub fn new(options: EditorOptions) -> Self {
        Self {
            state: EditorState::default(),
            history: UndoStack::with_max_levels(options.undo_depth),
        }
    }

    /// Editor over an already loaded tree
    pub fn with_elements(elements: Vec<Element>, options: EditorOptions) -> Self {
        Self {
            state: EditorState::with_elements(elements),
            history: UndoStack::with_max_levels(options.undo_depth),
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn elements(&self) -> &[Element] {
        &self.state.elements
    }

    pub fn selected_element(&self) -> Option<&Element> {
        self.state.selected_element()
    }

    /// Apply one command. Returns whether the tree changed.
    pub fn dispatch(&mut self, command: Command) -> bool {
        let (next, change) = reduce_tracked(&self.state, command);
        let previous = std::mem::replace(&mut self.state, next);

        match change {
            TreeChange::Unchanged => false,
            TreeChange::Edited => {
                self.history.record(previous.elements);
                true
            }
            TreeChange::Replaced => {
                self.history.clear();
                true
            }
        }
    }

    /// Apply a command in its JSON wire form
    pub fn dispatch_json(&mut self, raw: &str) -> EditorResult<bool> {
        let command: Command = serde_json::from_str(raw)?;
        Ok(self.dispatch(command))
    }

    pub fn undo(&mut self) -> bool {
        let current = self.state.elements.clone();
        match self.history.undo(current) {
            Some(previous) => {
                self.restore(previous);
                debug!(remaining = self.history.undo_levels(), "Undo");
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        let current = self.state.elements.clone();
        match self.history.redo(current) {
            Some(next) => {
                self.restore(next);
                debug!(remaining = self.history.redo_levels(), "Redo");
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Serialize the current tree for persistence
    pub fn to_json(&self) -> EditorResult<String> {
        Ok(serialize(&self.state.elements)?)
    }

    fn restore(&mut self, elements: Vec<Element>) {
        self.state.elements = elements;
        if self.state.selected_element().is_none() {
            self.state.selected_element_id = None;
        }
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorOptions::default())
    }
}
