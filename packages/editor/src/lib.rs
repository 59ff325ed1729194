//! # Labelforge Editor
//!
//! State engine of the template builder.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: Element tree, JSON (de)serialization │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor                                      │
//! │  - tree: pure add/update/delete             │
//! │  - state: Command + reduce                  │
//! │  - Editor: dispatch + undo/redo             │
//! │  - EditSession: load/save, uploads, AI      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ render: EditorState → VNode                 │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use labelforge_editor::{Command, Editor};
//! use labelforge_model::{Element, ElementType, IdGenerator};
//!
//! let mut ids = IdGenerator::new("template-1");
//! let mut editor = Editor::default();
//!
//! editor.dispatch(Command::add("__body", Element::new(ids.new_id(), ElementType::Text)));
//! editor.dispatch(Command::TogglePreviewMode);
//! editor.undo();
//!
//! let json = editor.to_json()?;
//! ```

mod editor;
mod errors;
mod session;
mod state;
mod submission;
pub mod tree;
mod undo_stack;

pub use editor::{Editor, EditorOptions};
pub use errors::{EditorError, EditorResult};
pub use session::{EditSession, RequestKind, RequestTicket, SessionOptions, UNTITLED};
pub use state::{normalize_root, reduce, Command, EditorState, ElementRef, ElementUpdate};
pub use submission::{collect_responses, Response, ResponseValue};
pub use undo_stack::{UndoStack, DEFAULT_UNDO_DEPTH};
