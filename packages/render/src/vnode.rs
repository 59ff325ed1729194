use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Virtual DOM node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VNode {
    /// HTML element
    Element {
        tag: String,
        attributes: BTreeMap<String, String>,
        styles: BTreeMap<String, String>,
        children: Vec<VNode>,
        /// Render-list key, the id of the template element this node presents
        #[serde(skip_serializing_if = "Option::is_none")]
        key: Option<String>,
    },

    /// Text node
    Text { content: String },
}

const VOID_TAGS: &[&str] = &["img", "input", "br", "hr", "source"];

impl VNode {
    pub fn element(tag: impl Into<String>) -> Self {
        VNode::Element {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            styles: BTreeMap::new(),
            children: Vec::new(),
            key: None,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        VNode::Text {
            content: content.into(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let VNode::Element {
            ref mut attributes, ..
        } = self
        {
            attributes.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_attr_if(self, condition: bool, key: impl Into<String>, value: impl Into<String>) -> Self {
        if condition {
            self.with_attr(key, value)
        } else {
            self
        }
    }

    /// Set a boolean attribute (present when `on`)
    pub fn with_flag(self, key: impl Into<String>, on: bool) -> Self {
        let key = key.into();
        self.with_attr_if(on, key.clone(), key)
    }

    pub fn with_class(self, class: impl Into<String>) -> Self {
        self.with_attr("class", class)
    }

    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let VNode::Element { ref mut styles, .. } = self {
            styles.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_child(mut self, child: VNode) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.push(child);
        }
        self
    }

    pub fn with_children(mut self, new_children: Vec<VNode>) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.extend(new_children);
        }
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        if let VNode::Element {
            key: ref mut node_key,
            ..
        } = self
        {
            *node_key = Some(key.into());
        }
        self
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            VNode::Element { tag, .. } => Some(tag),
            VNode::Text { .. } => None,
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        match self {
            VNode::Element { attributes, .. } => attributes.get(key).map(String::as_str),
            VNode::Text { .. } => None,
        }
    }

    pub fn children(&self) -> &[VNode] {
        match self {
            VNode::Element { children, .. } => children,
            VNode::Text { .. } => &[],
        }
    }

    pub fn key(&self) -> Option<&str> {
        match self {
            VNode::Element { key, .. } => key.as_deref(),
            VNode::Text { .. } => None,
        }
    }

    /// This node and all its descendants, depth-first
    pub fn descendants(&self) -> Vec<&VNode> {
        let mut found = vec![self];
        for child in self.children() {
            found.extend(child.descendants());
        }
        found
    }

    /// First node (depth-first) whose `attr` equals `value`
    pub fn find_by_attr(&self, attr: &str, value: &str) -> Option<&VNode> {
        self.descendants()
            .into_iter()
            .find(|node| node.attr(attr) == Some(value))
    }

    /// Concatenated text of every text node below this one
    pub fn text_content(&self) -> String {
        match self {
            VNode::Text { content } => content.clone(),
            VNode::Element { children, .. } => children.iter().map(VNode::text_content).collect(),
        }
    }

    /// Serialize to an HTML fragment
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            VNode::Text { content } => out.push_str(&escape(content)),
            VNode::Element {
                tag,
                attributes,
                styles,
                children,
                key,
            } => {
                out.push('<');
                out.push_str(tag);
                if let Some(key) = key {
                    let _ = write!(out, " data-key=\"{}\"", escape(key));
                }
                for (name, value) in attributes {
                    let _ = write!(out, " {}=\"{}\"", name, escape(value));
                }
                if !styles.is_empty() {
                    let style: Vec<String> =
                        styles.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                    let _ = write!(out, " style=\"{}\"", escape(&style.join("; ")));
                }
                out.push('>');

                if VOID_TAGS.contains(&tag.as_str()) {
                    return;
                }
                for child in children {
                    child.write_html(out);
                }
                let _ = write!(out, "</{tag}>");
            }
        }
    }
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_output() {
        let node = VNode::element("p")
            .with_key("t1")
            .with_class("text")
            .with_style("color", "red")
            .with_child(VNode::text("a < b"));

        assert_eq!(
            node.to_html(),
            "<p data-key=\"t1\" class=\"text\" style=\"color: red\">a &lt; b</p>"
        );
    }

    #[test]
    fn test_void_tags_have_no_closing_tag() {
        let node = VNode::element("img").with_attr("src", "x.png");
        assert_eq!(node.to_html(), "<img src=\"x.png\">");
    }

    #[test]
    fn test_find_by_attr_searches_descendants() {
        let node = VNode::element("div").with_child(
            VNode::element("span").with_child(VNode::element("button").with_attr("data-action", "delete")),
        );
        assert_eq!(node.find_by_attr("data-action", "delete").unwrap().tag(), Some("button"));
        assert!(node.find_by_attr("data-action", "drag").is_none());
    }
}
