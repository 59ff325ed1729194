//! # Labelforge Render
//!
//! Presents an [`EditorState`](labelforge_editor::EditorState) as a tree of
//! [`VNode`]s and turns user gestures back into editor commands.
//!
//! ```rust,ignore
//! let ctx = RenderContext::new(editor.state());
//! let nodes = render_tree(&ctx);
//! let html: String = nodes.iter().map(VNode::to_html).collect();
//! ```

pub mod handlers;
mod renderer;
mod vnode;

pub use handlers::{on_delete, on_drop, on_edit, on_rename, on_select, DropError};
pub use renderer::{render, render_tree, RenderContext, RenderMode};
pub use vnode::VNode;
