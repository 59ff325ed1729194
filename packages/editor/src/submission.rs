//! Answers collected from a template filled in live mode

use labelforge_model::{depth_first, Element, ElementContent, ElementId, ElementType};
use serde::{Deserialize, Serialize};

/// One answer, keyed by the element that collected it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub element_id: ElementId,
    pub element_type: ElementType,
    pub name: String,
    pub value: ResponseValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ResponseValue {
    Text {
        value: String,
    },
    Choices {
        selected: Vec<String>,
    },
    Recording {
        src: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        transcript: Option<String>,
    },
}

impl ResponseValue {
    /// Whether the annotator left this answer blank
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text { value } => value.trim().is_empty(),
            Self::Choices { selected } => selected.is_empty(),
            Self::Recording { src, .. } => src.is_empty(),
        }
    }
}

/// Extract one response per answerable element, in document order.
///
/// Text inputs, checkboxes, and answer recorders are answerable. Blank
/// answers are included so every export has the same shape.
pub fn collect_responses(tree: &[Element]) -> Vec<Response> {
    depth_first(tree)
        .filter_map(|element| {
            let value = response_value(element)?;
            Some(Response {
                element_id: element.id.clone(),
                element_type: element.element_type.clone(),
                name: element.name.clone(),
                value,
            })
        })
        .collect()
}

fn response_value(element: &Element) -> Option<ResponseValue> {
    match (&element.element_type, &element.content) {
        (ElementType::InputText, ElementContent::InputText(input)) => Some(ResponseValue::Text {
            value: input.value.clone(),
        }),
        (
            ElementType::Checkbox | ElementType::DynamicCheckbox,
            ElementContent::Checkbox(checkbox),
        ) => Some(ResponseValue::Choices {
            selected: checkbox.selected_checkbox.clone(),
        }),
        (
            ElementType::InputRecordAudio | ElementType::InputRecordVideo,
            ElementContent::Recording(recording),
        ) => Some(ResponseValue::Recording {
            src: recording.src.clone(),
            transcript: recording.transcript.clone(),
        }),
        _ => None,
    }
}
