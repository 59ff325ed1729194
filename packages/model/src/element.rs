//! # Template Elements
//!
//! An [`Element`] is one node of a template tree. Its [`ElementType`] decides
//! whether the content is a child list (container, two-column, root) or a
//! type-specific payload (see [`crate::content`]).
//!
//! ## Wire format
//!
//! ```json
//! {
//!   "id": "3f2a9c1e-4",
//!   "type": "text",
//!   "name": "Question",
//!   "styles": { "color": "#333" },
//!   "content": { "innerText": "Describe the image" }
//! }
//! ```
//!
//! Decoding never fails on a well-formed JSON object: missing fields take
//! defaults and content of the wrong shape is replaced by the type's default
//! payload. Unrecognized type tags are preserved as [`ElementType::Unknown`].

use crate::content::ElementContent;
use crate::error::ModelError;
use serde::de::Deserializer;
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Open bag of presentation properties. Opaque to the tree logic.
pub type Styles = Map<String, Value>;

/// Stable identifier of an element within a template
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Id of the root element in newly created templates
    pub const ROOT: &'static str = "__body";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn root() -> Self {
        Self(Self::ROOT.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this id addresses "the root" regardless of the root's actual id
    pub fn is_root_sentinel(&self) -> bool {
        matches!(self.0.as_str(), "__body" | "root")
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for ElementId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ElementId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Closed set of element variants, plus a catch-all for tags written by
/// newer versions of the builder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementType {
    Text,
    DynamicText,
    InputText,
    Checkbox,
    DynamicCheckbox,
    Image,
    DynamicImage,
    Video,
    DynamicVideo,
    Audio,
    DynamicAudio,
    RecordAudio,
    RecordVideo,
    InputRecordAudio,
    InputRecordVideo,
    Link,
    Container,
    TwoColumn,
    Carousel,
    Root,
    Unknown(String),
}

/// Canonical tags of every known element type
pub const KNOWN_TAGS: &[&str] = &[
    "text",
    "dynamic-text",
    "input-text",
    "checkbox",
    "dynamic-checkbox",
    "image",
    "dynamic-image",
    "video",
    "dynamic-video",
    "audio",
    "dynamic-audio",
    "record-audio",
    "record-video",
    "input-record-audio",
    "input-record-video",
    "link",
    "container",
    "2Col",
    "carousel",
    "__body",
];

impl ElementType {
    /// Resolve a persisted tag. Never fails: unrecognized tags become `Unknown`.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "text" => Self::Text,
            "dynamic-text" => Self::DynamicText,
            "input-text" => Self::InputText,
            "checkbox" => Self::Checkbox,
            "dynamic-checkbox" => Self::DynamicCheckbox,
            "image" => Self::Image,
            "dynamic-image" => Self::DynamicImage,
            "video" => Self::Video,
            "dynamic-video" => Self::DynamicVideo,
            "audio" => Self::Audio,
            "dynamic-audio" => Self::DynamicAudio,
            "record-audio" => Self::RecordAudio,
            "record-video" => Self::RecordVideo,
            "input-record-audio" => Self::InputRecordAudio,
            "input-record-video" => Self::InputRecordVideo,
            "link" => Self::Link,
            "container" => Self::Container,
            "2Col" | "two-column" => Self::TwoColumn,
            "carousel" => Self::Carousel,
            "__body" | "root" | "body" => Self::Root,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Resolve the type tag carried by a drag-and-drop payload.
    ///
    /// Only known, insertable types are accepted; the root can never be
    /// dropped into a template.
    pub fn from_drop_tag(tag: &str) -> Result<Self, ModelError> {
        match Self::from_tag(tag.trim()) {
            Self::Unknown(tag) => Err(ModelError::UnknownElementType(tag)),
            Self::Root => Err(ModelError::NotDroppable(tag.to_string())),
            element_type => Ok(element_type),
        }
    }

    /// All known element types, in palette order
    pub fn known() -> impl Iterator<Item = ElementType> {
        KNOWN_TAGS.iter().map(|tag| Self::from_tag(tag))
    }

    /// Canonical persisted tag
    pub fn tag(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::DynamicText => "dynamic-text",
            Self::InputText => "input-text",
            Self::Checkbox => "checkbox",
            Self::DynamicCheckbox => "dynamic-checkbox",
            Self::Image => "image",
            Self::DynamicImage => "dynamic-image",
            Self::Video => "video",
            Self::DynamicVideo => "dynamic-video",
            Self::Audio => "audio",
            Self::DynamicAudio => "dynamic-audio",
            Self::RecordAudio => "record-audio",
            Self::RecordVideo => "record-video",
            Self::InputRecordAudio => "input-record-audio",
            Self::InputRecordVideo => "input-record-video",
            Self::Link => "link",
            Self::Container => "container",
            Self::TwoColumn => "2Col",
            Self::Carousel => "carousel",
            Self::Root => "__body",
            Self::Unknown(tag) => tag,
        }
    }

    /// Label shown in the builder for freshly dropped elements
    pub fn display_name(&self) -> &str {
        match self {
            Self::Text => "Text",
            Self::DynamicText => "Dynamic Text",
            Self::InputText => "Text Input",
            Self::Checkbox => "Checkbox",
            Self::DynamicCheckbox => "Dynamic Checkbox",
            Self::Image => "Image",
            Self::DynamicImage => "Dynamic Image",
            Self::Video => "Video",
            Self::DynamicVideo => "Dynamic Video",
            Self::Audio => "Audio",
            Self::DynamicAudio => "Dynamic Audio",
            Self::RecordAudio => "Record Audio",
            Self::RecordVideo => "Record Video",
            Self::InputRecordAudio => "Audio Answer",
            Self::InputRecordVideo => "Video Answer",
            Self::Link => "Link",
            Self::Container => "Container",
            Self::TwoColumn => "Two Columns",
            Self::Carousel => "Carousel",
            Self::Root => "Body",
            Self::Unknown(tag) => tag,
        }
    }

    /// Whether elements of this type hold a list of children
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Container | Self::TwoColumn | Self::Root)
    }

    pub fn is_root(&self) -> bool {
        matches!(self, Self::Root)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

impl Default for ElementType {
    fn default() -> Self {
        Self::Unknown(String::new())
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl Serialize for ElementType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for ElementType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::from_tag(&tag))
    }
}

/// A node of the template tree
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: ElementId,
    pub element_type: ElementType,
    pub name: String,
    pub styles: Styles,
    pub content: ElementContent,
}

impl Element {
    /// Create an element with the type's default content and display name
    pub fn new(id: impl Into<ElementId>, element_type: ElementType) -> Self {
        Self {
            id: id.into(),
            name: element_type.display_name().to_string(),
            styles: Styles::new(),
            content: ElementContent::default_for(&element_type),
            element_type,
        }
    }

    /// An empty root element
    pub fn root() -> Self {
        Self::new(ElementId::root(), ElementType::Root)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_content(mut self, content: ElementContent) -> Self {
        self.content = content;
        self
    }

    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.styles.insert(key.into(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<Element>) -> Self {
        self.content = ElementContent::Children(children);
        self
    }

    pub fn is_container(&self) -> bool {
        self.element_type.is_container()
    }

    /// Child list, if this element's content is one
    pub fn children(&self) -> Option<&[Element]> {
        self.content.children()
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Element>> {
        self.content.children_mut()
    }

    /// Decode an element from an arbitrary JSON value
    ///
    /// Returns `None` only when the value is not an object.
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(mut object) = value else {
            return None;
        };

        let id = match object.remove("id") {
            Some(Value::String(id)) => ElementId::new(id),
            Some(Value::Number(n)) => ElementId::new(n.to_string()),
            _ => ElementId::default(),
        };
        let element_type = match object.remove("type") {
            Some(Value::String(tag)) => ElementType::from_tag(&tag),
            _ => ElementType::default(),
        };
        let name = match object.remove("name") {
            Some(Value::String(name)) => name,
            _ => element_type.display_name().to_string(),
        };
        let styles = match object.remove("styles") {
            Some(Value::Object(styles)) => styles,
            _ => Styles::new(),
        };
        let content = ElementContent::decode(
            &element_type,
            object.remove("content").unwrap_or(Value::Null),
        );

        Some(Self {
            id,
            element_type,
            name,
            styles,
            content,
        })
    }
}

impl Serialize for Element {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Element", 5)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("type", &self.element_type)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("styles", &self.styles)?;
        state.serialize_field("content", &self.content)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for Element {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Element::from_value(value)
            .ok_or_else(|| serde::de::Error::custom("element must be a JSON object"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tag_roundtrip_for_known_types() {
        for element_type in ElementType::known() {
            assert!(!element_type.is_unknown(), "{element_type} should be known");
            assert_eq!(ElementType::from_tag(element_type.tag()), element_type);
        }
    }

    #[test]
    fn test_root_aliases() {
        assert_eq!(ElementType::from_tag("root"), ElementType::Root);
        assert_eq!(ElementType::from_tag("body"), ElementType::Root);
        assert_eq!(ElementType::from_tag("two-column"), ElementType::TwoColumn);
    }

    #[test]
    fn test_drop_tag_rejects_unknown_and_root() {
        assert!(matches!(
            ElementType::from_drop_tag("spaceship"),
            Err(ModelError::UnknownElementType(_))
        ));
        assert!(matches!(
            ElementType::from_drop_tag("__body"),
            Err(ModelError::NotDroppable(_))
        ));
        assert_eq!(
            ElementType::from_drop_tag("checkbox").unwrap(),
            ElementType::Checkbox
        );
    }

    #[test]
    fn test_container_with_object_content_decodes_to_empty_children() {
        let element = Element::from_value(json!({
            "id": "c1",
            "type": "container",
            "content": { "innerText": "oops" }
        }))
        .unwrap();

        assert_eq!(element.children(), Some(&[][..]));
    }

    #[test]
    fn test_leaf_with_array_content_decodes_to_default() {
        let element = Element::from_value(json!({
            "id": "t1",
            "type": "text",
            "content": []
        }))
        .unwrap();

        assert_eq!(element.content, ElementContent::default_for(&ElementType::Text));
        assert_eq!(element.name, "Text");
    }

    #[test]
    fn test_unknown_type_keeps_raw_content() {
        let raw = json!({ "whatever": [1, 2, 3] });
        let element = Element::from_value(json!({
            "id": "u1",
            "type": "hologram",
            "name": "Future",
            "styles": {},
            "content": raw.clone()
        }))
        .unwrap();

        assert_eq!(element.element_type, ElementType::Unknown("hologram".into()));
        assert_eq!(element.content, ElementContent::Raw(raw));
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(Element::from_value(json!("text")).is_none());
    }
}
