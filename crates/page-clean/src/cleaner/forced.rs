//! Unconditional removal of executable and non-content tags.

use crate::tree::{Element, Node};

/// Tags that never carry person-identifying content and may carry payloads.
const FORCED_TAGS: &[&str] = &["script", "style", "noscript", "template", "iframe"];

/// Drop every forced tag and its subtree, no guard evaluation.
pub(crate) fn strip_forced_tags(el: &mut Element) {
    el.children
        .retain(|node| !matches!(node, Node::Element(e) if FORCED_TAGS.contains(&e.name.as_str())));
    for child in &mut el.children {
        if let Node::Element(e) = child {
            strip_forced_tags(e);
        }
    }
}
