pub mod apply;
pub mod check;
pub mod init;
pub mod render;
pub mod responses;

pub use apply::{apply, ApplyArgs};
pub use check::{check, CheckArgs};
pub use init::{init, InitArgs};
pub use render::{render, RenderArgs};
pub use responses::{responses, ResponsesArgs};

use anyhow::{Context, Result};
use labelforge_model::{deserialize, Element};
use std::path::Path;

/// Read and parse a template document from disk
pub(crate) fn read_template(path: &Path) -> Result<Vec<Element>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    deserialize(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}
