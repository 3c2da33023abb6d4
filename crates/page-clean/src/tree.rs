//! Typed document tree shared by every cleaning stage.
//!
//! The parser builds this tree once per invocation; the stages mutate it in
//! place (or rebuild child vectors where nodes are dropped or unwrapped) and
//! the serializer renders it back to a string. Every node is owned exclusively
//! by its parent, so there is no aliasing to invalidate while pruning.

use crate::text;

/// A single node in the parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// An element with a tag name, attributes and children.
    Element(Element),
    /// A text payload, already entity-decoded.
    Text(String),
    /// A comment payload, without the `<!--`/`-->` markers.
    Comment(String),
}

impl Node {
    /// The node as an element, if it is one.
    #[must_use]
    pub fn element(&self) -> Option<&Element> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }

    /// The node as a mutable element, if it is one.
    pub fn element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }
}

/// An element node: lowercased tag name, ordered attributes, ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Lowercased tag name.
    pub name: String,
    /// Attributes in document order; names lowercased, values entity-decoded.
    pub attrs: Vec<(String, String)>,
    /// Child nodes in document order.
    pub children: Vec<Node>,
}

impl Element {
    /// A new childless element with the given tag name.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// The value of the first attribute named `name`, if present.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set (or append) the attribute `name` to `value`.
    pub fn set_attr(&mut self, name: &str, value: String) {
        if let Some(entry) = self.attrs.iter_mut().find(|(key, _)| key == name) {
            entry.1 = value;
        } else {
            self.attrs.push((name.to_string(), value));
        }
    }

    /// Subtree text in document order, text nodes joined by single spaces.
    ///
    /// The separator keeps text from adjacent elements apart, so `"田中"`
    /// and `"太郎"` in sibling cells never fuse into one run.
    #[must_use]
    pub fn text(&self) -> String {
        let mut parts = Vec::new();
        self.collect_text(&mut parts);
        parts.join(" ")
    }

    fn collect_text<'a>(&'a self, parts: &mut Vec<&'a str>) {
        for child in &self.children {
            match child {
                Node::Text(t) => parts.push(t.as_str()),
                Node::Element(el) => el.collect_text(parts),
                Node::Comment(_) => {}
            }
        }
    }

    /// Subtree text with whitespace collapsed and ends trimmed.
    #[must_use]
    pub fn collapsed_text(&self) -> String {
        text::compress_ws(&self.text())
    }

    /// True if this element or any descendant element satisfies `pred`.
    pub fn any_element(&self, pred: &impl Fn(&Element) -> bool) -> bool {
        if pred(self) {
            return true;
        }
        self.children
            .iter()
            .filter_map(Node::element)
            .any(|el| el.any_element(pred))
    }

    /// True if any strict descendant element satisfies `pred`.
    pub fn any_descendant(&self, pred: &impl Fn(&Element) -> bool) -> bool {
        self.children
            .iter()
            .filter_map(Node::element)
            .any(|el| el.any_element(pred))
    }
}

/// A parsed document: the ordered top-level nodes.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Top-level nodes in document order.
    pub children: Vec<Node>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        let mut inner = Element::new("span");
        inner.children.push(Node::Text("太郎".into()));
        let mut el = Element::new("div");
        el.attrs.push(("class".into(), "card".into()));
        el.children.push(Node::Text("山田".into()));
        el.children.push(Node::Element(inner));
        el
    }

    #[test]
    fn text_joins_nodes_with_spaces() {
        assert_eq!(sample().text(), "山田 太郎");
    }

    #[test]
    fn any_descendant_excludes_self() {
        let el = sample();
        assert!(el.any_element(&|e| e.name == "div"));
        assert!(!el.any_descendant(&|e| e.name == "div"));
        assert!(el.any_descendant(&|e| e.name == "span"));
    }

    #[test]
    fn set_attr_overwrites_existing() {
        let mut el = sample();
        el.set_attr("class", "profile".into());
        assert_eq!(el.attr("class"), Some("profile"));
        assert_eq!(el.attrs.len(), 1);
    }
}
