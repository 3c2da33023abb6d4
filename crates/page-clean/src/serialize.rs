//! Rendering the typed tree back to markup.
//!
//! Text and attribute values were entity-decoded at parse time, so the
//! serializer re-escapes the minimal set required for the output to reparse
//! to the same tree.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::tree::{Element, Node};

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Serialize a single element (including its own tag) to HTML.
pub(crate) fn serialize_element(el: &Element) -> String {
    let mut out = String::new();
    write_element(el, &mut out);
    out
}

fn write_element(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.name);
    for (name, value) in &el.attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_attr_into(value, out);
        out.push('"');
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&el.name.as_str()) {
        return;
    }

    for child in &el.children {
        write_node(child, out);
    }

    out.push_str("</");
    out.push_str(&el.name);
    out.push('>');
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Element(el) => write_element(el, out),
        Node::Text(t) => escape_text_into(t, out),
        Node::Comment(body) => {
            out.push_str("<!--");
            out.push_str(body);
            out.push_str("-->");
        }
    }
}

fn escape_text_into(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr_into(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

static BLOCK_GAP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(</(?:main|div|section|article|p|ul|ol|li|table|thead|tbody|tr|dl|dt|dd|h[1-6])>)<(main|div|section|article|p|ul|ol|li|table|thead|tbody|tr|dl|dt|dd|h[1-6])([\s/>])",
    )
    .expect("block gap pattern")
});

/// Insert a newline between adjacent block-level closing/opening tag pairs.
///
/// Output readability only; the inserted newlines reparse as whitespace text
/// and do not change document structure.
pub(crate) fn insert_block_gaps(html: &str) -> String {
    BLOCK_GAP_RE.replace_all(html, "${1}\n<${2}${3}").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Element;

    #[test]
    fn serializes_void_elements_without_closing_tag() {
        let mut img = Element::new("img");
        img.set_attr("src", "https://example.com/p.jpg".into());
        assert_eq!(
            serialize_element(&img),
            "<img src=\"https://example.com/p.jpg\">"
        );
    }

    #[test]
    fn escapes_text_and_attributes() {
        let mut a = Element::new("a");
        a.set_attr("href", "/x?a=1&b=2".into());
        a.children.push(Node::Text("A & B <ok>".into()));
        assert_eq!(
            serialize_element(&a),
            "<a href=\"/x?a=1&amp;b=2\">A &amp; B &lt;ok&gt;</a>"
        );
    }

    #[test]
    fn block_gaps_between_close_open_pairs() {
        assert_eq!(
            insert_block_gaps("<ul><li>a</li><li>b</li></ul>"),
            "<ul><li>a</li>\n<li>b</li></ul>"
        );
        // already separated output is left alone
        assert_eq!(
            insert_block_gaps("<div>a</div>\n<div>b</div>"),
            "<div>a</div>\n<div>b</div>"
        );
    }
}
