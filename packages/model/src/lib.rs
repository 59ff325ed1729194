//! # Labelforge Model
//!
//! Data model for annotation task templates.
//!
//! A template is a tree of [`Element`]s persisted as a JSON array. Exactly one
//! root element (`type: "__body"`) sits at the top level; container-like
//! elements hold an ordered list of children, every other element holds a
//! payload whose shape depends on its type.
//!
//! ```text
//! persisted JSON ──deserialize──▶ Vec<Element> ──serialize──▶ persisted JSON
//! ```

pub mod content;
pub mod element;
pub mod error;
pub mod id_generator;
pub mod query;
pub mod serializer;

pub use content::{
    CarouselContent, CarouselSlide, CheckboxContent, DynamicTextContent, ElementContent,
    InputTextContent, LinkContent, MediaContent, RecordingContent, TextContent,
};
pub use element::{Element, ElementId, ElementType, Styles};
pub use error::{ModelError, ModelResult};
pub use id_generator::{get_template_seed, IdGenerator};
pub use query::{contains_element, depth_first, find_element};
pub use serializer::{deserialize, deserialize_lenient, serialize, strip_control_characters, Loaded};
