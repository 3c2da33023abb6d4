//! Empty structural container pruning.
//!
//! Earlier stages leave behind wrappers whose content was removed; this pass
//! deletes them bottom-up so nested empties collapse in one walk, while
//! keeping anything that still carries link or table structure.

use crate::tree::{Element, Node};

/// Containers eligible for removal when empty.
const STRUCTURAL_TAGS: &[&str] = &["div", "section", "article", "p", "span", "li"];

/// Descendants that make a container worth keeping regardless of text.
const USEFUL_TAGS: &[&str] = &[
    "a", "img", "table", "thead", "tbody", "tr", "td", "th", "dl", "dt", "dd", "ul", "ol", "h1",
    "h2", "h3", "h4", "h5", "h6",
];

/// Remove structurally empty containers under `el`, post-order.
pub(crate) fn prune_empty_blocks(el: &mut Element) {
    for child in &mut el.children {
        if let Node::Element(e) = child {
            prune_empty_blocks(e);
        }
    }
    el.children
        .retain(|node| !matches!(node, Node::Element(e) if is_empty_structural(e)));
}

fn is_empty_structural(el: &Element) -> bool {
    STRUCTURAL_TAGS.contains(&el.name.as_str())
        && !el.any_descendant(&|e: &Element| USEFUL_TAGS.contains(&e.name.as_str()))
        && el.collapsed_text().is_empty()
}
