//! Parsing captured markup into the typed tree.
//!
//! The fast path parses with `tl` and converts its nodes directly. Inputs the
//! fast parser is known to mishandle (custom-element tag names, outright parse
//! failure) are round-tripped through `html5ever` first, whose spec-compliant
//! error recovery rebuilds a well-formed document that `tl` then accepts.

use crate::text;
use crate::tree::{Document, Element, Node};

/// Parse `html` into a [`Document`].
///
/// Never fails: parser-level recovery is delegated to the underlying parsers
/// and a document (possibly empty, for pathological input) is always produced.
pub(crate) fn parse_document(html: &str) -> Document {
    let repaired;
    let input = if has_custom_element_tags(html) {
        match reparse_with_html5ever(html) {
            Some(fixed) => {
                repaired = fixed;
                repaired.as_str()
            }
            None => html,
        }
    } else {
        html
    };

    if let Ok(dom) = tl::parse(input, tl::ParserOptions::default()) {
        return convert_dom(&dom);
    }

    // The fast parser rejected the input outright; rebuild through html5ever
    // and try once more.
    if let Some(fixed) = reparse_with_html5ever(html) {
        if let Ok(dom) = tl::parse(&fixed, tl::ParserOptions::default()) {
            return convert_dom(&dom);
        }
    }

    Document::default()
}

fn convert_dom(dom: &tl::VDom<'_>) -> Document {
    let parser = dom.parser();
    let mut children = Vec::new();
    for handle in dom.children() {
        if let Some(node) = convert_node(handle, parser) {
            children.push(node);
        }
    }
    Document { children }
}

fn convert_node(handle: &tl::NodeHandle, parser: &tl::Parser<'_>) -> Option<Node> {
    match handle.get(parser)? {
        tl::Node::Raw(raw) => {
            let payload = raw.as_utf8_str();
            Some(Node::Text(
                text::decode_html_entities(payload.as_ref()).into_owned(),
            ))
        }
        tl::Node::Comment(raw) => {
            let payload = raw.as_utf8_str();
            let body = payload
                .as_ref()
                .trim_start_matches("<!--")
                .trim_end_matches("-->");
            Some(Node::Comment(body.to_string()))
        }
        tl::Node::Tag(tag) => {
            let name = tag.name().as_utf8_str().to_ascii_lowercase();
            let mut attrs = Vec::new();
            for (attr_name, attr_value) in tag.attributes().iter() {
                let key = attr_name.as_ref().to_ascii_lowercase();
                let value = attr_value
                    .as_ref()
                    .map(|v| text::decode_html_entities(v.as_ref()).into_owned())
                    .unwrap_or_default();
                attrs.push((key, value));
            }
            let mut children = Vec::new();
            for child in tag.children().top().iter() {
                if let Some(node) = convert_node(child, parser) {
                    children.push(node);
                }
            }
            Some(Node::Element(Element {
                name,
                attrs,
                children,
            }))
        }
    }
}

/// Check whether the markup contains custom-element tag names.
///
/// Custom elements carry a hyphen in the tag name itself (not in attributes);
/// the fast parser treats them inconsistently, so their presence routes the
/// input through the html5ever round-trip.
fn has_custom_element_tags(html: &str) -> bool {
    let bytes = html.as_bytes();
    let len = bytes.len();
    let mut i = 0;

    while i < len {
        if bytes[i] != b'<' {
            i += 1;
            continue;
        }
        i += 1;
        if i >= len {
            break;
        }
        if bytes[i] == b'/' {
            i += 1;
            if i >= len {
                break;
            }
        }
        while i < len && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let tag_start = i;
        while i < len {
            let ch = bytes[i];
            if ch == b'>' || ch == b'/' || ch.is_ascii_whitespace() {
                if bytes[tag_start..i].contains(&b'-') {
                    return true;
                }
                break;
            }
            i += 1;
        }
    }

    false
}

/// Rebuild `input` through html5ever's parser and serializer.
///
/// Returns `None` if either step fails.
fn reparse_with_html5ever(input: &str) -> Option<String> {
    use html5ever::serialize::{SerializeOpts, serialize};
    use html5ever::tendril::TendrilSink;
    use markup5ever_rcdom::{RcDom, SerializableHandle};

    let dom = html5ever::parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut input.as_bytes())
        .ok()?;

    let mut buf = Vec::with_capacity(input.len());
    let handle = SerializableHandle::from(dom.document);
    serialize(&mut buf, &handle, SerializeOpts::default()).ok()?;
    String::from_utf8(buf).ok()
}
