//! Text normalization: whitespace canonicalization and label line-breaking.
//!
//! Field labels (氏名, 専門, "Research field", ...) get a newline inserted
//! after the label (after its colon when one follows) so label/value pairs
//! render on separate lines. The insertion is skipped when a newline already
//! follows, which keeps repeated runs stable.

use crate::text;
use crate::tree::{Element, Node};

/// Normalize every text node under `el`, remove comments, and collapse runs
/// of consecutive `<br>` elements to a single one.
pub(crate) fn normalize_text(el: &mut Element, labels: &[String]) {
    let children = std::mem::take(&mut el.children);
    let mut out = Vec::with_capacity(children.len());
    let mut last_was_br = false;

    for node in children {
        match node {
            Node::Comment(_) => {}
            Node::Element(e) if e.name == "br" => {
                if !last_was_br {
                    out.push(Node::Element(e));
                    last_was_br = true;
                }
            }
            Node::Text(t) => {
                let normalized = normalize_string(&t, labels);
                // whitespace inside a <br> run belongs to the run
                if last_was_br && normalized.trim().is_empty() {
                    continue;
                }
                if !normalized.trim().is_empty() {
                    last_was_br = false;
                }
                out.push(Node::Text(normalized));
            }
            Node::Element(mut e) => {
                normalize_text(&mut e, labels);
                out.push(Node::Element(e));
                last_was_br = false;
            }
        }
    }

    el.children = out;
}

/// Normalize a single text payload.
fn normalize_string(input: &str, labels: &[String]) -> String {
    let replaced = input.replace('\u{00A0}', " ");
    let collapsed = text::collapse_horizontal_runs(&replaced);
    let labeled = break_after_labels(&collapsed, labels);
    text::collapse_newline_runs(&labeled)
}

/// Insert a newline after each field label, colon-aware and idempotent.
fn break_after_labels(input: &str, labels: &[String]) -> String {
    let mut out = input.to_string();
    for label in labels {
        if label.is_empty() || !out.contains(label.as_str()) {
            continue;
        }
        let mut result = String::with_capacity(out.len() + 8);
        let mut rest = out.as_str();
        while let Some(pos) = rest.find(label.as_str()) {
            let end = pos + label.len();
            result.push_str(&rest[..end]);
            rest = &rest[end..];
            if let Some(c) = rest.chars().next() {
                if c == ':' || c == '：' {
                    result.push(c);
                    rest = &rest[c.len_utf8()..];
                }
            }
            if !rest.starts_with('\n') {
                result.push('\n');
            }
        }
        result.push_str(rest);
        out = result;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaner::scope::select_scope;
    use crate::options::CleanOptions;
    use crate::parse::parse_document;

    fn run(html: &str) -> Element {
        let mut scope = select_scope(parse_document(html));
        normalize_text(&mut scope, &CleanOptions::default().field_labels);
        scope
    }

    fn count_brs(el: &Element) -> usize {
        let mut n = usize::from(el.name == "br");
        for child in &el.children {
            if let Node::Element(e) = child {
                n += count_brs(e);
            }
        }
        n
    }

    #[test]
    fn breaks_after_labeled_fields() {
        let scope = run("<main><p>氏名：山田 太郎</p></main>");
        assert!(scope.text().contains("氏名：\n山田 太郎"));
    }

    #[test]
    fn label_break_is_stable_across_runs() {
        let mut scope = run("<main><p>専門: データ工学</p></main>");
        let once = scope.text();
        normalize_text(&mut scope, &CleanOptions::default().field_labels);
        assert_eq!(scope.text(), once);
    }

    #[test]
    fn collapses_br_runs_and_nbsp() {
        let scope = run("<main><p>AI\u{00A0}Research<br><br> <br>end</p></main>");
        assert_eq!(count_brs(&scope), 1);
        assert!(scope.text().contains("AI Research"));
    }

    #[test]
    fn removes_comments() {
        let scope = run("<main><p>a<!-- hidden -->b</p></main>");
        let serialized = crate::serialize::serialize_element(&scope);
        assert!(!serialized.contains("hidden"));
        assert_eq!(serialized, "<main><p>ab</p></main>");
    }
}
