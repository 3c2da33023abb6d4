//! Attribute sanitization: inline styles and event handlers.

use crate::tree::{Element, Node};

/// Remove the `style` attribute and every `on*` attribute from each element
/// in scope. Structure and text are untouched.
pub(crate) fn sanitize_attributes(el: &mut Element) {
    el.attrs.retain(|(name, _)| {
        let name = name.to_ascii_lowercase();
        name != "style" && !name.starts_with("on")
    });
    for child in &mut el.children {
        if let Node::Element(e) = child {
            sanitize_attributes(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaner::scope::select_scope;
    use crate::parse::parse_document;

    #[test]
    fn strips_style_and_handlers_keeps_the_rest() {
        let doc = parse_document(
            "<main><a href=\"/p\" style=\"color:red\" onclick=\"track()\" onMouseOver=\"x()\">p</a></main>",
        );
        let mut scope = select_scope(doc);
        sanitize_attributes(&mut scope);
        let a = scope.children[0].element().unwrap();
        assert_eq!(a.attrs, vec![("href".to_string(), "/p".to_string())]);
    }
}
