//! # Variant Renderer
//!
//! Maps each element to a [`VNode`] by its type, recursing into container
//! children. Unknown types render nothing and are skipped by their parent.
//!
//! The state is passed in explicitly through [`RenderContext`]; rendering has
//! no side effects.

use crate::vnode::VNode;
use labelforge_editor::EditorState;
use labelforge_model::{
    CarouselContent, CheckboxContent, Element, ElementContent, ElementType, InputTextContent,
    MediaContent, RecordingContent, Styles,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::trace;

/// How the tree is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Builder canvas with chrome (drag handle, settings, delete)
    #[default]
    Edit,
    /// Builder widgets without chrome
    Preview,
    /// Submission widgets for annotators
    Live,
}

impl RenderMode {
    pub fn from_state(state: &EditorState) -> Self {
        if state.live_mode {
            Self::Live
        } else if state.preview_mode {
            Self::Preview
        } else {
            Self::Edit
        }
    }

    pub fn shows_chrome(self) -> bool {
        self == Self::Edit
    }

    pub fn is_live(self) -> bool {
        self == Self::Live
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Edit => "edit",
            Self::Preview => "preview",
            Self::Live => "live",
        })
    }
}

impl FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "edit" => Ok(Self::Edit),
            "preview" => Ok(Self::Preview),
            "live" => Ok(Self::Live),
            other => Err(format!("unknown render mode '{other}' (expected edit, preview, or live)")),
        }
    }
}

pub struct RenderContext<'a> {
    pub state: &'a EditorState,
    pub mode: RenderMode,
}

impl<'a> RenderContext<'a> {
    /// Context whose mode follows the state's flags
    pub fn new(state: &'a EditorState) -> Self {
        Self {
            state,
            mode: RenderMode::from_state(state),
        }
    }

    pub fn with_mode(state: &'a EditorState, mode: RenderMode) -> Self {
        Self { state, mode }
    }
}

/// Render every top-level element of the context's tree
pub fn render_tree(ctx: &RenderContext<'_>) -> Vec<VNode> {
    render_all(&ctx.state.elements, ctx)
}

fn render_all(elements: &[Element], ctx: &RenderContext<'_>) -> Vec<VNode> {
    elements.iter().filter_map(|e| render(e, ctx)).collect()
}

/// Render one element and its subtree. `None` for unknown types.
pub fn render(element: &Element, ctx: &RenderContext<'_>) -> Option<VNode> {
    let body = match (&element.element_type, &element.content) {
        (ElementType::Unknown(tag), _) => {
            trace!(id = %element.id, tag = %tag, "Skipping element of unknown type");
            return None;
        }
        (element_type, ElementContent::Children(children)) => {
            render_container(element_type, children, ctx)
        }
        (_, ElementContent::Text(text)) => VNode::element("p")
            .with_class("text")
            .with_child(VNode::text(&text.inner_text)),
        (_, ElementContent::DynamicText(text)) => {
            let node = VNode::element("p")
                .with_class("dynamic-text")
                .with_child(VNode::text(&text.inner_text));
            match &text.translation_target {
                Some(target) => node.with_attr("data-translation-target", target),
                None => node,
            }
        }
        (_, ElementContent::InputText(input)) => render_input_text(input, ctx.mode),
        (element_type, ElementContent::Checkbox(checkbox)) => {
            render_checkbox(element_type, checkbox, ctx.mode)
        }
        (element_type, ElementContent::Media(media)) => render_media(element_type, media),
        (element_type, ElementContent::Recording(recording)) => {
            render_recording(element_type, recording, ctx.mode)
        }
        (_, ElementContent::Link(link)) => {
            let label = if link.inner_text.is_empty() {
                &link.href
            } else {
                &link.inner_text
            };
            VNode::element("a")
                .with_attr("href", &link.href)
                .with_attr("target", "_blank")
                .with_child(VNode::text(label))
        }
        (_, ElementContent::Carousel(carousel)) => render_carousel(carousel),
        (element_type, ElementContent::Raw(_)) => {
            trace!(id = %element.id, element_type = %element_type, "No payload to render");
            return None;
        }
    };

    let node = apply_styles(body, &element.styles)
        .with_key(element.id.as_str())
        .with_attr("data-element-id", element.id.as_str())
        .with_attr("data-element-type", element.element_type.tag());

    Some(wrap_chrome(node, element, ctx))
}

fn render_container(
    element_type: &ElementType,
    children: &[Element],
    ctx: &RenderContext<'_>,
) -> VNode {
    let class = match element_type {
        ElementType::Root => "body",
        ElementType::TwoColumn => "two-column",
        _ => "container",
    };
    let node = VNode::element("div")
        .with_class(class)
        .with_children(render_all(children, ctx));

    if ctx.mode.shows_chrome() {
        node.with_attr("data-drop-target", "true")
    } else {
        node
    }
}

fn render_input_text(input: &InputTextContent, mode: RenderMode) -> VNode {
    let field = VNode::element("input")
        .with_attr("type", "text")
        .with_attr("placeholder", &input.placeholder)
        .with_flag("disabled", !mode.is_live());
    let field = if mode.is_live() {
        field.with_attr("value", &input.value)
    } else {
        field
    };

    VNode::element("label")
        .with_class("input-text")
        .with_child(VNode::element("span").with_child(VNode::text(&input.title)))
        .with_child(field)
}

fn render_checkbox(element_type: &ElementType, checkbox: &CheckboxContent, mode: RenderMode) -> VNode {
    let options = checkbox.checkboxes.iter().map(|option| {
        let input = VNode::element("input")
            .with_attr("type", "checkbox")
            .with_attr("value", option)
            .with_flag("checked", checkbox.selected_checkbox.contains(option))
            .with_flag("disabled", !mode.is_live());
        VNode::element("label")
            .with_child(input)
            .with_child(VNode::text(option))
    });

    VNode::element("fieldset")
        .with_class(element_type.tag())
        .with_child(VNode::element("legend").with_child(VNode::text(&checkbox.title)))
        .with_children(options.collect())
}

fn render_media(element_type: &ElementType, media: &MediaContent) -> VNode {
    let (tag, noun) = match element_type {
        ElementType::Video | ElementType::DynamicVideo => ("video", "video"),
        ElementType::Audio | ElementType::DynamicAudio => ("audio", "audio"),
        _ => ("img", "image"),
    };

    if media.src.is_empty() {
        return VNode::element("div")
            .with_class("media-placeholder")
            .with_child(VNode::text(format!("No {noun} selected")));
    }

    let node = VNode::element(tag).with_attr("src", &media.src);
    let node = match (tag, &media.alt) {
        ("img", Some(alt)) => node.with_attr("alt", alt),
        ("img", None) => node,
        _ => node.with_flag("controls", true),
    };

    match &media.transcript {
        Some(transcript) => VNode::element("figure")
            .with_class("media")
            .with_child(node)
            .with_child(
                VNode::element("figcaption")
                    .with_class("transcript")
                    .with_child(VNode::text(transcript)),
            ),
        None => node,
    }
}

fn render_recording(
    element_type: &ElementType,
    recording: &RecordingContent,
    mode: RenderMode,
) -> VNode {
    let medium = match element_type {
        ElementType::RecordVideo | ElementType::InputRecordVideo => "video",
        _ => "audio",
    };

    if !mode.is_live() {
        let label = if medium == "video" {
            "Video recorder"
        } else {
            "Audio recorder"
        };
        return VNode::element("div")
            .with_class("recorder-placeholder")
            .with_child(VNode::text(label));
    }

    let mut node = VNode::element("div").with_class("recorder").with_child(
        VNode::element("button")
            .with_attr("data-action", "record")
            .with_attr("data-medium", medium)
            .with_child(VNode::text(if recording.src.is_empty() {
                "Record"
            } else {
                "Record again"
            })),
    );
    if !recording.src.is_empty() {
        node = node.with_child(
            VNode::element(medium)
                .with_attr("src", &recording.src)
                .with_flag("controls", true),
        );
    }
    if let Some(transcript) = &recording.transcript {
        node = node.with_child(
            VNode::element("p")
                .with_class("transcript")
                .with_child(VNode::text(transcript)),
        );
    }
    node
}

fn render_carousel(carousel: &CarouselContent) -> VNode {
    let node = VNode::element("div").with_class("carousel");
    let Some(slide) = carousel.current_slide() else {
        return node.with_child(
            VNode::element("div")
                .with_class("media-placeholder")
                .with_child(VNode::text("No slides")),
        );
    };

    let mut frame = VNode::element("figure")
        .with_child(VNode::element("img").with_attr("src", &slide.src));
    if let Some(caption) = &slide.caption {
        frame = frame.with_child(VNode::element("figcaption").with_child(VNode::text(caption)));
    }

    let position = format!(
        "{} / {}",
        carousel.current_slide_index + 1,
        carousel.slides.len()
    );
    node.with_child(frame).with_child(
        VNode::element("nav")
            .with_child(VNode::element("button").with_attr("data-action", "previous-slide"))
            .with_child(VNode::element("span").with_child(VNode::text(position)))
            .with_child(VNode::element("button").with_attr("data-action", "next-slide")),
    )
}

fn apply_styles(node: VNode, styles: &Styles) -> VNode {
    styles.iter().fold(node, |node, (key, value)| match value {
        Value::String(s) => node.with_style(key, s),
        Value::Number(n) => node.with_style(key, n.to_string()),
        _ => node,
    })
}

/// Wrap an element's node in builder chrome when the mode asks for it
fn wrap_chrome(node: VNode, element: &Element, ctx: &RenderContext<'_>) -> VNode {
    let selected = ctx.state.is_selected(&element.id);
    if !ctx.mode.shows_chrome() {
        return node;
    }
    if element.element_type.is_root() {
        return node.with_attr_if(selected, "data-selected", "true");
    }

    let handle = VNode::element("span")
        .with_attr("data-action", "drag")
        .with_attr("draggable", "true");
    let toolbar = VNode::element("div")
        .with_class("element-toolbar")
        .with_child(VNode::element("button").with_attr("data-action", "settings"))
        .with_child(VNode::element("button").with_attr("data-action", "delete"));

    VNode::element("div")
        .with_class("element-frame")
        .with_key(element.id.as_str())
        .with_attr("data-frame-for", element.id.as_str())
        .with_attr_if(selected, "data-selected", "true")
        .with_child(handle)
        .with_child(node)
        .with_child(toolbar)
}
