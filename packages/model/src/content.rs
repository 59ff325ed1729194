//! # Element Content
//!
//! Content payloads per element variant. Container-like elements hold a list
//! of children; every leaf variant has its own structured payload.
//!
//! Every leaf payload keeps keys it does not recognize in `extra`, so a
//! document saved by a newer builder survives a load/save round trip.

use crate::element::{Element, ElementType};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::mem::discriminant;
use tracing::warn;

/// Default text of a freshly dropped text element
pub const DEFAULT_TEXT: &str = "Text Element";

/// Content of an element: children for containers, a payload for leaves
#[derive(Debug, Clone, PartialEq)]
pub enum ElementContent {
    Children(Vec<Element>),
    Text(TextContent),
    DynamicText(DynamicTextContent),
    InputText(InputTextContent),
    Checkbox(CheckboxContent),
    Media(MediaContent),
    Recording(RecordingContent),
    Link(LinkContent),
    Carousel(CarouselContent),
    /// Content of an element whose type this version does not know
    Raw(Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextContent {
    pub inner_text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for TextContent {
    fn default() -> Self {
        Self {
            inner_text: DEFAULT_TEXT.to_string(),
            extra: Map::new(),
        }
    }
}

/// Text filled in from another element, usually by machine translation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DynamicTextContent {
    pub inner_text: String,
    /// Id of the element whose text is translated into this one.
    /// A soft reference: it may point at an element that no longer exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation_target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputTextContent {
    pub title: String,
    pub placeholder: String,
    pub value: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckboxContent {
    pub title: String,
    pub checkboxes: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub selected_checkbox: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for CheckboxContent {
    fn default() -> Self {
        Self {
            title: "Select an option".to_string(),
            checkboxes: vec!["Option 1".to_string(), "Option 2".to_string()],
            selected_checkbox: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// Image, video, and audio payloads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaContent {
    pub src: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Recorder payloads; `src` is empty until something was recorded
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordingContent {
    pub src: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkContent {
    pub href: String,
    pub inner_text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CarouselSlide {
    pub src: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CarouselContent {
    pub slides: Vec<CarouselSlide>,
    pub current_slide_index: usize,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CarouselContent {
    /// Keep the current index inside the slide range
    pub fn clamp_index(&mut self) {
        self.current_slide_index = match self.slides.len() {
            0 => 0,
            len => self.current_slide_index.min(len - 1),
        };
    }

    pub fn current_slide(&self) -> Option<&CarouselSlide> {
        self.slides.get(self.current_slide_index)
    }
}

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if s.is_empty() => Vec::new(),
        Value::String(s) => vec![s],
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

impl ElementContent {
    /// Default content for a freshly created element of `element_type`
    pub fn default_for(element_type: &ElementType) -> Self {
        match element_type {
            ElementType::Container | ElementType::TwoColumn | ElementType::Root => {
                Self::Children(Vec::new())
            }
            ElementType::Text => Self::Text(TextContent::default()),
            ElementType::DynamicText => Self::DynamicText(DynamicTextContent::default()),
            ElementType::InputText => Self::InputText(InputTextContent::default()),
            ElementType::Checkbox | ElementType::DynamicCheckbox => {
                Self::Checkbox(CheckboxContent::default())
            }
            ElementType::Image
            | ElementType::DynamicImage
            | ElementType::Video
            | ElementType::DynamicVideo
            | ElementType::Audio
            | ElementType::DynamicAudio => Self::Media(MediaContent::default()),
            ElementType::RecordAudio
            | ElementType::RecordVideo
            | ElementType::InputRecordAudio
            | ElementType::InputRecordVideo => Self::Recording(RecordingContent::default()),
            ElementType::Link => Self::Link(LinkContent::default()),
            ElementType::Carousel => Self::Carousel(CarouselContent::default()),
            ElementType::Unknown(_) => Self::Raw(Value::Null),
        }
    }

    /// Decode persisted content for an element of `element_type`.
    ///
    /// Content of the wrong shape falls back to the type's default payload.
    pub fn decode(element_type: &ElementType, value: Value) -> Self {
        if element_type.is_unknown() {
            return Self::Raw(value);
        }

        if element_type.is_container() {
            return match value {
                Value::Array(items) => Self::Children(decode_children(items)),
                Value::Null => Self::Children(Vec::new()),
                _ => {
                    warn!(element_type = %element_type, "Container content is not a list, using an empty one");
                    Self::Children(Vec::new())
                }
            };
        }

        let fallback = Self::default_for(element_type);
        if !value.is_object() {
            if !value.is_null() {
                warn!(element_type = %element_type, "Leaf content is not an object, using defaults");
            }
            return fallback;
        }

        Self::try_decode(element_type, value).unwrap_or_else(|e| {
            warn!(element_type = %element_type, error = %e, "Malformed leaf content, using defaults");
            fallback
        })
    }

    /// Strict counterpart of [`decode`](Self::decode): content of the wrong
    /// shape is an error instead of a default payload.
    pub fn try_decode(element_type: &ElementType, value: Value) -> Result<Self, serde_json::Error> {
        if element_type.is_unknown() {
            return Ok(Self::Raw(value));
        }

        if element_type.is_container() {
            return match value {
                Value::Array(items) => Ok(Self::Children(decode_children(items))),
                _ => Err(de::Error::custom(format!(
                    "content of {element_type} must be a list"
                ))),
            };
        }

        if !value.is_object() {
            return Err(de::Error::custom(format!(
                "content of {element_type} must be an object"
            )));
        }

        match Self::default_for(element_type) {
            Self::Text(_) => serde_json::from_value(value).map(Self::Text),
            Self::DynamicText(_) => serde_json::from_value(value).map(Self::DynamicText),
            Self::InputText(_) => serde_json::from_value(value).map(Self::InputText),
            Self::Checkbox(_) => serde_json::from_value(value).map(Self::Checkbox),
            Self::Media(_) => serde_json::from_value(value).map(Self::Media),
            Self::Recording(_) => serde_json::from_value(value).map(Self::Recording),
            Self::Link(_) => serde_json::from_value(value).map(Self::Link),
            Self::Carousel(_) => serde_json::from_value(value).map(|mut carousel: CarouselContent| {
                carousel.clamp_index();
                Self::Carousel(carousel)
            }),
            other => Ok(other),
        }
    }

    /// Whether this content is a valid payload for `element_type`
    pub fn fits(&self, element_type: &ElementType) -> bool {
        discriminant(self) == discriminant(&Self::default_for(element_type))
    }

    pub fn children(&self) -> Option<&[Element]> {
        match self {
            Self::Children(children) => Some(children),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Element>> {
        match self {
            Self::Children(children) => Some(children),
            _ => None,
        }
    }

    /// Leaf payload as a JSON object (empty for containers)
    pub fn to_leaf_object(&self) -> Map<String, Value> {
        match self {
            Self::Children(_) => Map::new(),
            other => match serde_json::to_value(other) {
                Ok(Value::Object(object)) => object,
                _ => Map::new(),
            },
        }
    }
}

/// Decode a list of persisted elements, dropping entries that are not objects
pub fn decode_children(items: Vec<Value>) -> Vec<Element> {
    items
        .into_iter()
        .filter_map(|item| {
            let element = Element::from_value(item);
            if element.is_none() {
                warn!("Skipping child that is not a JSON object");
            }
            element
        })
        .collect()
}

impl Serialize for ElementContent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Children(children) => children.serialize(serializer),
            Self::Text(content) => content.serialize(serializer),
            Self::DynamicText(content) => content.serialize(serializer),
            Self::InputText(content) => content.serialize(serializer),
            Self::Checkbox(content) => content.serialize(serializer),
            Self::Media(content) => content.serialize(serializer),
            Self::Recording(content) => content.serialize(serializer),
            Self::Link(content) => content.serialize(serializer),
            Self::Carousel(content) => content.serialize(serializer),
            Self::Raw(value) => value.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_selected_checkbox_accepts_single_string() {
        let content = ElementContent::decode(
            &ElementType::Checkbox,
            json!({ "title": "Pick", "checkboxes": ["a", "b"], "selectedCheckbox": "b" }),
        );

        match content {
            ElementContent::Checkbox(checkbox) => {
                assert_eq!(checkbox.selected_checkbox, vec!["b".to_string()]);
                assert_eq!(checkbox.checkboxes.len(), 2);
            }
            other => panic!("Expected checkbox content, got {other:?}"),
        }
    }

    #[test]
    fn test_unrecognized_keys_survive_roundtrip() {
        let raw = json!({ "src": "https://cdn/x.png", "focalPoint": [0.5, 0.5] });
        let content = ElementContent::decode(&ElementType::Image, raw.clone());

        assert_eq!(serde_json::to_value(&content).unwrap(), raw);
    }

    #[test]
    fn test_carousel_index_is_clamped() {
        let content = ElementContent::decode(
            &ElementType::Carousel,
            json!({ "slides": [{ "src": "a" }, { "src": "b" }], "currentSlideIndex": 7 }),
        );

        match content {
            ElementContent::Carousel(carousel) => {
                assert_eq!(carousel.current_slide_index, 1);
                assert_eq!(carousel.current_slide().unwrap().src, "b");
            }
            other => panic!("Expected carousel content, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_field_type_falls_back_to_default() {
        let content = ElementContent::decode(&ElementType::Text, json!({ "innerText": 42 }));
        assert_eq!(content, ElementContent::Text(TextContent::default()));
    }

    #[test]
    fn test_try_decode_rejects_wrong_field_type() {
        let bad = json!({ "src": "cat.png", "alt": 7 });
        assert!(ElementContent::try_decode(&ElementType::Image, bad).is_err());
        assert!(ElementContent::try_decode(&ElementType::Container, json!({})).is_err());
        assert!(ElementContent::try_decode(&ElementType::Text, json!([])).is_err());

        let good = ElementContent::try_decode(&ElementType::Image, json!({ "src": "cat.png" }));
        assert!(matches!(good, Ok(ElementContent::Media(m)) if m.src == "cat.png"));
    }

    #[test]
    fn test_fits_matches_variant_family() {
        let media = ElementContent::default_for(&ElementType::Video);
        assert!(media.fits(&ElementType::Image));
        assert!(media.fits(&ElementType::DynamicAudio));
        assert!(!media.fits(&ElementType::Text));
        assert!(!ElementContent::Children(vec![]).fits(&ElementType::Text));
        assert!(ElementContent::Children(vec![]).fits(&ElementType::TwoColumn));
    }
}
