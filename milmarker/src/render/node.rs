//! Detached render trees.
//!
//! A [`RenderNode`] is a small element tree that hosts can attach directly
//! instead of parsing serialized markup. Serializing a node with
//! [`RenderNode::to_markup`] yields the same SVG text a glyph returns from
//! `to_markup`.

use serde::Serialize;

/// An element or text node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderNode {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
        children: Vec<RenderNode>,
    },
    Text(String),
}

impl RenderNode {
    /// Create an empty element.
    pub fn element(tag: impl Into<String>) -> Self {
        RenderNode::Element {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create a text node.
    pub fn text(text: impl Into<String>) -> Self {
        RenderNode::Text(text.into())
    }

    /// Builder-style attribute. Ignored on text nodes.
    pub fn attr(mut self, name: impl Into<String>, value: impl std::fmt::Display) -> Self {
        if let RenderNode::Element { attributes, .. } = &mut self {
            attributes.push((name.into(), value.to_string()));
        }
        self
    }

    /// Builder-style child. Ignored on text nodes.
    pub fn child(mut self, child: RenderNode) -> Self {
        self.push(child);
        self
    }

    /// Append a child in place. Ignored on text nodes.
    pub fn push(&mut self, child: RenderNode) {
        if let RenderNode::Element { children, .. } = self {
            children.push(child);
        }
    }

    /// Element tag, or `None` for text.
    pub fn tag(&self) -> Option<&str> {
        match self {
            RenderNode::Element { tag, .. } => Some(tag),
            RenderNode::Text(_) => None,
        }
    }

    /// Attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match self {
            RenderNode::Element { attributes, .. } => attributes
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str()),
            RenderNode::Text(_) => None,
        }
    }

    /// Child nodes; empty for text.
    pub fn children(&self) -> &[RenderNode] {
        match self {
            RenderNode::Element { children, .. } => children,
            RenderNode::Text(_) => &[],
        }
    }

    /// First element with the given tag, depth first, including `self`.
    pub fn find(&self, tag: &str) -> Option<&RenderNode> {
        if self.tag() == Some(tag) {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(tag))
    }

    /// Serialize the tree as markup.
    pub fn to_markup(&self) -> String {
        let mut out = String::with_capacity(1024);
        self.write_markup(&mut out);
        out
    }

    fn write_markup(&self, out: &mut String) {
        match self {
            RenderNode::Text(text) => out.push_str(&escape(text)),
            RenderNode::Element {
                tag,
                attributes,
                children,
            } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attributes {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape(value));
                    out.push('"');
                }
                if children.is_empty() {
                    out.push_str("/>");
                    return;
                }
                out.push('>');
                for child in children {
                    child.write_markup(out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
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
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_element_self_closes() {
        let node = RenderNode::element("rect").attr("width", 10);
        assert_eq!(node.to_markup(), r#"<rect width="10"/>"#);
    }

    #[test]
    fn test_nested_markup() {
        let node = RenderNode::element("svg")
            .attr("xmlns", "http://www.w3.org/2000/svg")
            .child(RenderNode::element("text").child(RenderNode::text("A&B")));
        assert_eq!(
            node.to_markup(),
            r#"<svg xmlns="http://www.w3.org/2000/svg"><text>A&amp;B</text></svg>"#
        );
    }

    #[test]
    fn test_attribute_values_escaped() {
        let node = RenderNode::element("g").attr("data-label", "\"<x>\"");
        assert_eq!(node.to_markup(), r#"<g data-label="&quot;&lt;x&gt;&quot;"/>"#);
    }

    #[test]
    fn test_find_and_attribute() {
        let node = RenderNode::element("svg").child(
            RenderNode::element("g").child(RenderNode::element("path").attr("d", "M0 0")),
        );
        let path = node.find("path").unwrap();
        assert_eq!(path.attribute("d"), Some("M0 0"));
        assert!(node.find("circle").is_none());
    }

    #[test]
    fn test_text_ignores_builders() {
        let node = RenderNode::text("x").attr("a", 1).child(RenderNode::text("y"));
        assert_eq!(node, RenderNode::text("x"));
        assert!(node.children().is_empty());
    }
}
