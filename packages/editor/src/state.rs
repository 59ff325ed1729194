//! # Editor State and Commands
//!
//! [`EditorState`] is the single source of truth of an editing session: the
//! element tree, the selected element, and the two independent mode flags.
//! It changes only through [`reduce`], a pure function of the current state
//! and one [`Command`].
//!
//! Commands use the JSON shape the builder UI sends:
//!
//! ```json
//! { "type": "ADD_ELEMENT", "payload": { "containerId": "__body", "elementDetails": { ... } } }
//! ```

use crate::errors::EditorError;
use crate::tree;
use labelforge_model::{
    content::decode_children, find_element, Element, ElementContent, ElementId, ElementType,
    Styles,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorState {
    pub elements: Vec<Element>,
    pub selected_element_id: Option<ElementId>,
    pub preview_mode: bool,
    pub live_mode: bool,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            elements: vec![Element::root()],
            selected_element_id: None,
            preview_mode: false,
            live_mode: false,
        }
    }
}

impl EditorState {
    pub fn with_elements(elements: Vec<Element>) -> Self {
        Self {
            elements: normalize_root(elements),
            ..Self::default()
        }
    }

    /// The selected element, or `None` if nothing is selected or the
    /// selected id no longer exists in the tree
    pub fn selected_element(&self) -> Option<&Element> {
        self.selected_element_id
            .as_ref()
            .and_then(|id| find_element(&self.elements, id))
    }

    pub fn is_selected(&self, id: &ElementId) -> bool {
        self.selected_element_id.as_ref() == Some(id)
    }

    pub fn root(&self) -> Option<&Element> {
        self.elements.iter().find(|e| e.element_type.is_root())
    }
}

/// Reference to an element by id; extra fields in the payload are ignored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRef {
    pub id: ElementId,
}

impl From<&Element> for ElementRef {
    fn from(element: &Element) -> Self {
        Self {
            id: element.id.clone(),
        }
    }
}

/// New field values for an existing element.
///
/// Absent fields keep their current value. `content` is raw JSON and is
/// decoded against the type of the element being updated, so a payload does
/// not need to repeat the element's type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementUpdate {
    pub id: ElementId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<Styles>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
}

impl ElementUpdate {
    /// Build `target` with this update applied, or `None` if the content
    /// has the wrong shape for the target's type.
    pub fn apply_to(&self, target: &Element) -> Option<Element> {
        let content = match &self.content {
            None => target.content.clone(),
            Some(value) => decode_for(&target.element_type, value.clone())?,
        };

        Some(Element {
            id: target.id.clone(),
            element_type: target.element_type.clone(),
            name: self.name.clone().unwrap_or_else(|| target.name.clone()),
            styles: self.styles.clone().unwrap_or_else(|| target.styles.clone()),
            content,
        })
    }
}

fn decode_for(element_type: &ElementType, value: Value) -> Option<ElementContent> {
    match ElementContent::try_decode(element_type, value) {
        Ok(content) => Some(content),
        Err(error) => {
            debug!(element_type = %element_type, error = %error, "Update content has the wrong shape");
            None
        }
    }
}

impl From<Element> for ElementUpdate {
    fn from(element: Element) -> Self {
        Self {
            content: serde_json::to_value(&element.content).ok(),
            id: element.id,
            name: Some(element.name),
            styles: Some(element.styles),
        }
    }
}

/// A state transition request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "SCREAMING_SNAKE_CASE",
    try_from = "RawCommand"
)]
pub enum Command {
    /// Replace the tree wholesale, optionally switching live mode on
    LoadData {
        elements: Vec<Element>,
        #[serde(rename = "withLive", skip_serializing_if = "Option::is_none")]
        with_live: Option<bool>,
    },
    AddElement {
        #[serde(rename = "containerId")]
        container_id: ElementId,
        #[serde(rename = "elementDetails")]
        element_details: Element,
    },
    UpdateElement(ElementUpdate),
    DeleteElement(ElementRef),
    ChangeClickedElement(Option<ElementRef>),
    TogglePreviewMode,
    ToggleLiveMode {
        value: Option<bool>,
    },
}

impl Command {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LoadData { .. } => "LOAD_DATA",
            Self::AddElement { .. } => "ADD_ELEMENT",
            Self::UpdateElement(_) => "UPDATE_ELEMENT",
            Self::DeleteElement(_) => "DELETE_ELEMENT",
            Self::ChangeClickedElement(_) => "CHANGE_CLICKED_ELEMENT",
            Self::TogglePreviewMode => "TOGGLE_PREVIEW_MODE",
            Self::ToggleLiveMode { .. } => "TOGGLE_LIVE_MODE",
        }
    }

    pub fn load(elements: Vec<Element>) -> Self {
        Self::LoadData {
            elements,
            with_live: None,
        }
    }

    pub fn add(container_id: impl Into<ElementId>, element: Element) -> Self {
        Self::AddElement {
            container_id: container_id.into(),
            element_details: element,
        }
    }

    pub fn update(element: Element) -> Self {
        Self::UpdateElement(element.into())
    }

    pub fn delete(id: impl Into<ElementId>) -> Self {
        Self::DeleteElement(ElementRef { id: id.into() })
    }

    pub fn select(id: Option<ElementId>) -> Self {
        Self::ChangeClickedElement(id.map(|id| ElementRef { id }))
    }
}

/// Wire form of a command before its payload is interpreted
#[derive(Deserialize)]
struct RawCommand {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Value,
}

fn payload_field<T: serde::de::DeserializeOwned>(
    command: &'static str,
    payload: Value,
) -> Result<T, EditorError> {
    serde_json::from_value(payload).map_err(|e| EditorError::InvalidPayload {
        command,
        reason: e.to_string(),
    })
}

impl TryFrom<RawCommand> for Command {
    type Error = EditorError;

    fn try_from(raw: RawCommand) -> Result<Self, Self::Error> {
        let mut payload = raw.payload;
        Ok(match raw.kind.as_str() {
            "LOAD_DATA" => {
                // Persisted data may be corrupt; anything but a list loads as empty.
                let elements = match payload.get_mut("elements").map(Value::take) {
                    Some(Value::Array(items)) => decode_children(items),
                    Some(other) => {
                        warn!(found = %other, "LOAD_DATA elements is not a list, loading an empty tree");
                        Vec::new()
                    }
                    None => Vec::new(),
                };
                Self::LoadData {
                    elements,
                    with_live: payload.get("withLive").and_then(Value::as_bool),
                }
            }
            "ADD_ELEMENT" => {
                let container_id = match payload.get("containerId") {
                    Some(Value::String(id)) => ElementId::new(id.as_str()),
                    Some(Value::Number(n)) => ElementId::new(n.to_string()),
                    _ => {
                        return Err(EditorError::InvalidPayload {
                            command: "ADD_ELEMENT",
                            reason: "missing containerId".into(),
                        })
                    }
                };
                let element_details = payload
                    .get_mut("elementDetails")
                    .map(Value::take)
                    .and_then(Element::from_value)
                    .ok_or_else(|| EditorError::InvalidPayload {
                        command: "ADD_ELEMENT",
                        reason: "elementDetails must be an object".into(),
                    })?;
                Self::AddElement {
                    container_id,
                    element_details,
                }
            }
            "UPDATE_ELEMENT" => Self::UpdateElement(payload_field("UPDATE_ELEMENT", payload)?),
            "DELETE_ELEMENT" => Self::DeleteElement(payload_field("DELETE_ELEMENT", payload)?),
            "CHANGE_CLICKED_ELEMENT" => {
                Self::ChangeClickedElement(payload_field("CHANGE_CLICKED_ELEMENT", payload)?)
            }
            "TOGGLE_PREVIEW_MODE" => Self::TogglePreviewMode,
            "TOGGLE_LIVE_MODE" => Self::ToggleLiveMode {
                value: payload.get("value").and_then(Value::as_bool),
            },
            other => return Err(EditorError::UnknownCommand(other.to_string())),
        })
    }
}

/// Bring a loaded element list into the single-root shape.
///
/// An empty list becomes one empty root. Otherwise the first top-level root
/// is kept and every other top-level element is appended to its children in
/// document order; extra roots, top-level or nested, are demoted to
/// containers. A list without any root is wrapped in a new one.
pub fn normalize_root(elements: Vec<Element>) -> Vec<Element> {
    let Some(root_index) = elements.iter().position(|e| e.element_type.is_root()) else {
        let mut elements = elements;
        demote_nested_roots(&mut elements);
        return vec![Element::root().with_children(elements)];
    };

    let mut elements = elements;
    let mut root = elements.remove(root_index);
    let strays: Vec<Element> = elements
        .into_iter()
        .map(|mut element| {
            if element.element_type.is_root() {
                warn!(id = %element.id, "Demoting extra root element to a container");
                element.element_type = ElementType::Container;
            }
            element
        })
        .collect();

    if !strays.is_empty() {
        debug!(count = strays.len(), "Moving top-level elements under the root");
    }
    match root.children_mut() {
        Some(children) => children.extend(strays),
        None => root.content = ElementContent::Children(strays),
    }
    if let Some(children) = root.children_mut() {
        demote_nested_roots(children);
    }
    vec![root]
}

fn demote_nested_roots(elements: &mut [Element]) {
    for element in elements {
        if element.element_type.is_root() {
            warn!(id = %element.id, "Demoting nested root element to a container");
            element.element_type = ElementType::Container;
        }
        if let Some(children) = element.children_mut() {
            demote_nested_roots(children);
        }
    }
}

/// How a command affected the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TreeChange {
    Unchanged,
    Edited,
    Replaced,
}

/// Compute the state that follows `state` after `command`.
///
/// Never fails: commands whose target is missing leave the state unchanged.
pub fn reduce(state: &EditorState, command: Command) -> EditorState {
    reduce_tracked(state, command).0
}

pub(crate) fn reduce_tracked(state: &EditorState, command: Command) -> (EditorState, TreeChange) {
    let kind = command.kind();
    let mut next = state.clone();

    let change = match command {
        Command::LoadData {
            elements,
            with_live,
        } => {
            next.elements = normalize_root(elements);
            if with_live == Some(true) {
                next.live_mode = true;
            }
            TreeChange::Replaced
        }
        Command::AddElement {
            container_id,
            element_details,
        } => edit(&mut next, tree::try_add_element(&state.elements, &container_id, element_details)),
        Command::UpdateElement(update) => {
            let updated = find_element(&state.elements, &update.id)
                .and_then(|target| update.apply_to(target))
                .and_then(|details| tree::try_update_element(&state.elements, &details));
            edit(&mut next, updated)
        }
        Command::DeleteElement(target) => {
            edit(&mut next, tree::try_delete_element(&state.elements, &target.id))
        }
        Command::ChangeClickedElement(target) => {
            next.selected_element_id = target.map(|t| t.id);
            TreeChange::Unchanged
        }
        Command::TogglePreviewMode => {
            next.preview_mode = !next.preview_mode;
            TreeChange::Unchanged
        }
        Command::ToggleLiveMode { value } => {
            next.live_mode = value.unwrap_or(!next.live_mode);
            TreeChange::Unchanged
        }
    };

    if change != TreeChange::Unchanged && next.selected_element().is_none() {
        next.selected_element_id = None;
    }

    debug!(command = kind, ?change, "Reduced editor command");
    (next, change)
}

fn edit(next: &mut EditorState, tree: Option<Vec<Element>>) -> TreeChange {
    match tree {
        Some(tree) if tree != next.elements => {
            next.elements = tree;
            TreeChange::Edited
        }
        _ => TreeChange::Unchanged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labelforge_model::depth_first;
    use serde_json::json;

    #[test]
    fn test_command_wire_format() {
        let command: Command = serde_json::from_value(json!({
            "type": "ADD_ELEMENT",
            "payload": {
                "containerId": "__body",
                "elementDetails": { "id": "A", "type": "text", "content": { "innerText": "hi" } }
            }
        }))
        .unwrap();

        match &command {
            Command::AddElement {
                container_id,
                element_details,
            } => {
                assert_eq!(container_id, &ElementId::root());
                assert_eq!(element_details.element_type, ElementType::Text);
            }
            other => panic!("Expected ADD_ELEMENT, got {other:?}"),
        }

        let encoded = serde_json::to_value(&command).unwrap();
        assert_eq!(encoded["type"], "ADD_ELEMENT");
        assert_eq!(encoded["payload"]["containerId"], "__body");
    }

    #[test]
    fn test_unit_and_optional_payloads() {
        let toggle: Command = serde_json::from_str(r#"{"type":"TOGGLE_PREVIEW_MODE"}"#).unwrap();
        assert_eq!(toggle, Command::TogglePreviewMode);

        let live: Command = serde_json::from_str(r#"{"type":"TOGGLE_LIVE_MODE"}"#).unwrap();
        assert_eq!(live, Command::ToggleLiveMode { value: None });

        let clear: Command = serde_json::from_str(r#"{"type":"CHANGE_CLICKED_ELEMENT"}"#).unwrap();
        assert_eq!(clear, Command::ChangeClickedElement(None));
    }

    #[test]
    fn test_load_data_with_non_array_degrades_to_empty() {
        let command: Command = serde_json::from_value(json!({
            "type": "LOAD_DATA",
            "payload": { "elements": "corrupt" }
        }))
        .unwrap();

        let state = reduce(&EditorState::default(), command);
        assert_eq!(state.elements, vec![Element::root()]);
    }

    #[test]
    fn test_unknown_command_is_an_error() {
        let result: Result<Command, _> = serde_json::from_str(r#"{"type":"EXPLODE"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_normalize_moves_strays_under_first_root() {
        let elements = vec![
            Element::new("before", ElementType::Text),
            Element::root(),
            Element::new("second", ElementType::Root),
        ];
        let tree = normalize_root(elements);

        assert_eq!(tree.len(), 1);
        let children = tree[0].children().unwrap();
        assert_eq!(children[0].id, "before");
        assert_eq!(children[1].id, "second");
        assert_eq!(children[1].element_type, ElementType::Container);
    }

    #[test]
    fn test_normalize_demotes_nested_roots() {
        let nested = Element::new("inner", ElementType::Root).with_children(vec![
            Element::new("deeper", ElementType::Root),
        ]);
        let tree = normalize_root(vec![Element::root().with_children(vec![
            Element::new("c", ElementType::Container).with_children(vec![nested]),
        ])]);

        let roots = depth_first(&tree).filter(|e| e.element_type.is_root()).count();
        assert_eq!(roots, 1);
        let inner = find_element(&tree, &"inner".into()).unwrap();
        assert_eq!(inner.element_type, ElementType::Container);
        let deeper = find_element(&tree, &"deeper".into()).unwrap();
        assert_eq!(deeper.element_type, ElementType::Container);
    }

    #[test]
    fn test_normalize_wraps_rootless_list() {
        let tree = normalize_root(vec![Element::new("a", ElementType::Text)]);
        assert!(tree[0].element_type.is_root());
        assert_eq!(tree[0].children().unwrap()[0].id, "a");
    }

    #[test]
    fn test_update_payload_without_type_decodes_against_target() {
        let target = Element::new("A", ElementType::Text);
        let update: ElementUpdate =
            serde_json::from_value(json!({ "id": "A", "content": { "innerText": "bye" } })).unwrap();

        let updated = update.apply_to(&target).unwrap();
        assert_eq!(updated.name, "Text");
        assert_eq!(updated.content.to_leaf_object()["innerText"], "bye");

        let misfit: ElementUpdate = serde_json::from_value(json!({ "id": "A", "content": [] })).unwrap();
        assert!(misfit.apply_to(&target).is_none());
    }

    #[test]
    fn test_toggle_live_mode_with_explicit_value() {
        let state = reduce(&EditorState::default(), Command::ToggleLiveMode { value: Some(true) });
        let state = reduce(&state, Command::ToggleLiveMode { value: Some(true) });
        assert!(state.live_mode);
        let state = reduce(&state, Command::ToggleLiveMode { value: None });
        assert!(!state.live_mode);
    }
}
