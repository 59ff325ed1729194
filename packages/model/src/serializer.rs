//! # Serialization Boundary
//!
//! Converts a template tree to and from the JSON string stored in the
//! persistence layer.
//!
//! Storage round trips occasionally leave raw ASCII control characters
//! (U+0000 to U+001F) in the document, which makes it invalid JSON. They are
//! stripped before parsing. JSON strings always escape that range, so
//! stripping only ever removes whitespace between tokens from a valid
//! document. DEL and the C1 range are legal unescaped and are kept.

use crate::content::decode_children;
use crate::element::Element;
use crate::error::{ModelError, ModelResult};
use serde_json::Value;
use std::borrow::Cow;
use tracing::{debug, warn};

fn is_c0_control(c: &char) -> bool {
    *c < '\u{20}'
}

/// Remove ASCII C0 control characters
pub fn strip_control_characters(raw: &str) -> Cow<'_, str> {
    if raw.chars().any(|c| is_c0_control(&c)) {
        Cow::Owned(raw.chars().filter(|c| !is_c0_control(c)).collect())
    } else {
        Cow::Borrowed(raw)
    }
}

/// Parse a persisted template document.
///
/// Blank input is an empty template. Non-object entries in the list are
/// skipped; element content of the wrong shape is replaced by defaults.
pub fn deserialize(raw: &str) -> ModelResult<Vec<Element>> {
    let cleaned = strip_control_characters(raw);
    if cleaned.len() != raw.len() {
        warn!(
            removed_bytes = raw.len() - cleaned.len(),
            "Stripped control characters from template document"
        );
    }

    if cleaned.trim().is_empty() {
        return Ok(Vec::new());
    }

    match serde_json::from_str::<Value>(&cleaned)? {
        Value::Array(items) => {
            let elements = decode_children(items);
            debug!(elements = elements.len(), "Deserialized template document");
            Ok(elements)
        }
        other => Err(ModelError::not_a_list(&other)),
    }
}

/// Result of a lenient load: the elements to edit, and why loading fell back
/// to an empty tree if it did.
#[derive(Debug)]
pub struct Loaded {
    pub elements: Vec<Element>,
    pub error: Option<ModelError>,
}

/// Like [`deserialize`], but a broken document yields an empty tree plus the
/// error instead of failing, so an editor can still open.
pub fn deserialize_lenient(raw: &str) -> Loaded {
    match deserialize(raw) {
        Ok(elements) => Loaded {
            elements,
            error: None,
        },
        Err(error) => {
            warn!(error = %error, "Template document is unreadable, starting from an empty tree");
            Loaded {
                elements: Vec::new(),
                error: Some(error),
            }
        }
    }
}

/// Encode a template tree for persistence
pub fn serialize(tree: &[Element]) -> ModelResult<String> {
    Ok(serde_json::to_string(tree)?)
}
