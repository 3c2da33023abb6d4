//! Scope selection: the subtree all cleaning operates on.

use crate::tree::{Document, Element, Node};

/// Pick the processing scope: the first `<main>` in document order, else the
/// `<body>`, else a synthesized `<main>` adopting all top-level nodes.
///
/// Always produces a scope, even for fragments and empty input.
pub(crate) fn select_scope(mut doc: Document) -> Element {
    if let Some(main) = take_first(&mut doc.children, "main") {
        return main;
    }
    if let Some(body) = take_first(&mut doc.children, "body") {
        return body;
    }
    let mut wrapper = Element::new("main");
    wrapper.children = doc.children;
    wrapper
}

/// Remove and return the first element named `tag`, depth-first.
fn take_first(nodes: &mut Vec<Node>, tag: &str) -> Option<Element> {
    for i in 0..nodes.len() {
        let is_match = matches!(&nodes[i], Node::Element(el) if el.name == tag);
        if is_match {
            if let Node::Element(el) = nodes.remove(i) {
                return Some(el);
            }
            return None; // not reachable: just matched as an element
        }
        if let Node::Element(el) = &mut nodes[i] {
            if let Some(found) = take_first(&mut el.children, tag) {
                return Some(found);
            }
        }
    }
    None
}
