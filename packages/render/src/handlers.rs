//! Interaction handlers. Each one turns a user gesture on a rendered element
//! into the [`Command`] to dispatch; none of them touch the state directly.

use labelforge_editor::{Command, ElementUpdate};
use labelforge_model::{Element, ElementId, ElementType, IdGenerator, ModelError};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, PartialEq)]
pub enum DropError {
    #[error("Unknown element type: {0}")]
    UnknownType(String),

    #[error("Element type '{0}' cannot be dropped")]
    NotDroppable(String),

    #[error("Element {0} is not a container")]
    NotAContainer(ElementId),
}

impl From<ModelError> for DropError {
    fn from(error: ModelError) -> Self {
        match error {
            ModelError::NotDroppable(tag) => DropError::NotDroppable(tag),
            ModelError::UnknownElementType(tag) => DropError::UnknownType(tag),
            other => DropError::UnknownType(other.to_string()),
        }
    }
}

/// A palette item with type tag `tag` was dropped onto `container`.
///
/// Builds a new element with a fresh id and the type's default content. Tags
/// outside the known set are rejected rather than turned into a node.
pub fn on_drop(container: &Element, tag: &str, ids: &mut IdGenerator) -> Result<Command, DropError> {
    if !container.is_container() {
        return Err(DropError::NotAContainer(container.id.clone()));
    }
    let element_type = ElementType::from_drop_tag(tag)?;
    let element = Element::new(ids.new_id(), element_type);
    debug!(container = %container.id, id = %element.id, tag, "Dropped new element");

    Ok(Command::add(container.id.clone(), element))
}

/// New leaf fields were entered for `element`; they are merged over the
/// existing payload. `None` for containers, whose content is their children.
pub fn on_edit(element: &Element, patch: Map<String, Value>) -> Option<Command> {
    if element.is_container() {
        return None;
    }
    let mut content = element.content.to_leaf_object();
    content.extend(patch);

    Some(Command::UpdateElement(ElementUpdate {
        id: element.id.clone(),
        name: None,
        styles: None,
        content: Some(Value::Object(content)),
    }))
}

pub fn on_rename(element: &Element, name: impl Into<String>) -> Command {
    Command::UpdateElement(ElementUpdate {
        id: element.id.clone(),
        name: Some(name.into()),
        styles: None,
        content: None,
    })
}

/// Trash icon clicked. The root has no trash icon.
pub fn on_delete(element: &Element) -> Option<Command> {
    if element.element_type.is_root() {
        None
    } else {
        Some(Command::delete(element.id.clone()))
    }
}

pub fn on_select(element: &Element) -> Command {
    Command::select(Some(element.id.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use labelforge_editor::{reduce, EditorState};
    use labelforge_model::{find_element, ElementContent};
    use serde_json::json;

    #[test]
    fn test_drop_creates_default_element() {
        let mut ids = IdGenerator::from_seed("s".into());
        let command = on_drop(&Element::root(), "text", &mut ids).unwrap();

        let state = reduce(&EditorState::default(), command);
        let added = &state.elements[0].children().unwrap()[0];
        assert_eq!(added.id, "s-1");
        assert_eq!(added.content.to_leaf_object()["innerText"], "Text Element");
    }

    #[test]
    fn test_drop_rejects_bad_tags_and_leaf_targets() {
        let mut ids = IdGenerator::from_seed("s".into());
        assert_eq!(
            on_drop(&Element::root(), "blink", &mut ids),
            Err(DropError::UnknownType("blink".into()))
        );
        assert!(matches!(
            on_drop(&Element::root(), "__body", &mut ids),
            Err(DropError::NotDroppable(_))
        ));
        assert_eq!(
            on_drop(&Element::new("t", ElementType::Text), "text", &mut ids),
            Err(DropError::NotAContainer("t".into()))
        );
    }

    #[test]
    fn test_edit_merges_into_existing_payload() {
        let image = Element::new("img", ElementType::Image);
        let state = EditorState::with_elements(vec![Element::root().with_children(vec![image.clone()])]);

        let mut patch = Map::new();
        patch.insert("alt".into(), json!("A cat"));
        let state = reduce(&state, on_edit(&image, patch).unwrap());

        let patch: Map<String, Value> = json!({ "src": "cat.png" }).as_object().unwrap().clone();
        let edited = find_element(&state.elements, &"img".into()).unwrap().clone();
        let state = reduce(&state, on_edit(&edited, patch).unwrap());

        match &find_element(&state.elements, &"img".into()).unwrap().content {
            ElementContent::Media(media) => {
                assert_eq!(media.src, "cat.png");
                assert_eq!(media.alt.as_deref(), Some("A cat"));
            }
            other => panic!("Expected media, got {other:?}"),
        }
    }

    #[test]
    fn test_rename_keeps_content() {
        let text = Element::new("t", ElementType::Text);
        let state = EditorState::with_elements(vec![Element::root().with_children(vec![text.clone()])]);
        let state = reduce(&state, on_rename(&text, "Prompt"));

        let renamed = find_element(&state.elements, &"t".into()).unwrap();
        assert_eq!(renamed.name, "Prompt");
        assert_eq!(renamed.content, text.content);
    }

    #[test]
    fn test_root_cannot_be_deleted_or_edited() {
        assert!(on_delete(&Element::root()).is_none());
        assert!(on_edit(&Element::root(), Map::new()).is_none());
        assert_eq!(on_select(&Element::root()), Command::select(Some(ElementId::root())));
    }
}
