use labelforge_editor::{collect_responses, Editor, EditorOptions};
use labelforge_linter::{lint_template, LintOptions};
use labelforge_model::{deserialize_lenient, find_element, get_template_seed, ElementId, IdGenerator};
use labelforge_render::{on_drop, render_tree, RenderContext, VNode};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

/// A template editor living on the JS side
#[wasm_bindgen]
pub struct EditorHandle {
    editor: Editor,
    ids: IdGenerator,
    load_error: Option<String>,
}

#[wasm_bindgen]
impl EditorHandle {
    /// Open `document` (the persisted JSON of template `template_id`). An
    /// unreadable document opens as an empty template; see `loadError`.
    #[wasm_bindgen(constructor)]
    pub fn new(template_id: &str, document: &str) -> EditorHandle {
        let loaded = deserialize_lenient(document);
        let editor = Editor::with_elements(loaded.elements, EditorOptions::default());
        let ids = IdGenerator::resume(get_template_seed(template_id), editor.elements());

        EditorHandle {
            editor,
            ids,
            load_error: loaded.error.map(|e| e.to_string()),
        }
    }

    #[wasm_bindgen(getter, js_name = loadError)]
    pub fn load_error(&self) -> Option<String> {
        self.load_error.clone()
    }

    /// Dispatch a JSON command. Returns whether the tree changed.
    pub fn dispatch(&mut self, command: &str) -> Result<bool, JsValue> {
        self.dispatch_inner(command).map_err(|e| JsValue::from_str(&e))
    }

    /// Create an element of type `tag` inside `container_id`. Returns the new id.
    #[wasm_bindgen(js_name = dropElement)]
    pub fn drop_element(&mut self, container_id: &str, tag: &str) -> Result<String, JsValue> {
        self.drop_inner(container_id, tag)
            .map_err(|e| JsValue::from_str(&e))
    }

    pub fn undo(&mut self) -> bool {
        self.editor.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.editor.redo()
    }

    /// Current editor state as JSON
    pub fn state(&self) -> Result<String, JsValue> {
        to_json(self.editor.state()).map_err(|e| JsValue::from_str(&e))
    }

    /// The tree in its persisted form
    pub fn serialize(&self) -> Result<String, JsValue> {
        self.editor.to_json().map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = renderHtml)]
    pub fn render_html(&self) -> String {
        self.render_nodes().iter().map(VNode::to_html).collect()
    }

    #[wasm_bindgen(js_name = renderJson)]
    pub fn render_json(&self) -> Result<String, JsValue> {
        to_json(&self.render_nodes()).map_err(|e| JsValue::from_str(&e))
    }

    pub fn lint(&self) -> Result<String, JsValue> {
        to_json(&lint_template(self.editor.elements(), LintOptions::default()))
            .map_err(|e| JsValue::from_str(&e))
    }

    pub fn responses(&self) -> Result<String, JsValue> {
        to_json(&collect_responses(self.editor.elements())).map_err(|e| JsValue::from_str(&e))
    }
}

impl EditorHandle {
    fn dispatch_inner(&mut self, command: &str) -> Result<bool, String> {
        self.editor
            .dispatch_json(command)
            .map_err(|e| format!("Command error: {}", e))
    }

    fn drop_inner(&mut self, container_id: &str, tag: &str) -> Result<String, String> {
        let container = find_element(self.editor.elements(), &ElementId::from(container_id))
            .ok_or_else(|| format!("Element not found: {}", container_id))?;
        let command = on_drop(container, tag, &mut self.ids).map_err(|e| e.to_string())?;

        let new_id = match &command {
            labelforge_editor::Command::AddElement {
                element_details, ..
            } => element_details.id.to_string(),
            _ => String::new(),
        };
        self.editor.dispatch(command);
        Ok(new_id)
    }

    fn render_nodes(&self) -> Vec<VNode> {
        render_tree(&RenderContext::new(self.editor.state()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"[{"id":"__body","type":"__body","name":"Body","styles":{},"content":[]}]"#;

    #[test]
    fn test_drop_then_render() {
        let mut handle = EditorHandle::new("tpl", DOCUMENT);
        assert!(handle.load_error().is_none());

        let id = handle.drop_inner("__body", "text").unwrap();
        assert!(id.starts_with(&get_template_seed("tpl")));

        let html = handle.render_html();
        assert!(html.contains("Text Element"));
        assert!(html.contains("data-action=\"delete\""));
    }

    #[test]
    fn test_dispatch_json_commands() {
        let mut handle = EditorHandle::new("tpl", DOCUMENT);
        let changed = handle
            .dispatch_inner(r#"{"type":"ADD_ELEMENT","payload":{"containerId":"__body","elementDetails":{"id":"a","type":"image"}}}"#)
            .unwrap();
        assert!(changed);
        assert!(handle.dispatch_inner(r#"{"type":"TOGGLE_PREVIEW_MODE"}"#).is_ok());
        assert!(handle.dispatch_inner("not json").is_err());

        assert!(!handle.render_html().contains("data-action"));
        assert!(handle.undo());
    }

    #[test]
    fn test_unreadable_document_opens_empty() {
        let handle = EditorHandle::new("tpl", "{broken");
        assert!(handle.load_error().is_some());
        assert_eq!(handle.editor.elements().len(), 1);
    }

    #[test]
    fn test_drop_rejects_unknown_tags() {
        let mut handle = EditorHandle::new("tpl", DOCUMENT);
        assert!(handle.drop_inner("__body", "marquee").is_err());
        assert!(handle.drop_inner("nowhere", "text").is_err());
    }
}
