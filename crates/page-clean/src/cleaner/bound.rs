//! Serialization under a size budget, and the plain-text renderer.
//!
//! When markup output exceeds the budget, trailing text-node content is
//! trimmed starting from the last text node and working backward, so leading
//! (typically more identifying) content and all tag structure survive. The
//! pass count is bounded; if the budget is still exceeded afterwards the
//! best-effort output is returned.

use crate::serialize;
use crate::tree::{Element, Node};

/// Smallest cut taken from any single text node.
const MIN_TRUNCATE_CHARS: usize = 16;

/// Upper bound on serialize-measure-truncate rounds.
const MAX_TRUNCATE_PASSES: usize = 8;

/// Tags whose close (and `<br>`) become newlines in plain-text output.
const TEXT_BLOCK_TAGS: &[&str] = &[
    "main", "div", "section", "article", "p", "ul", "ol", "li", "table", "thead", "tbody", "tr",
    "dl", "dt", "dd", "h1", "h2", "h3", "h4", "h5", "h6",
];

/// Serialize `scope` as markup, trimming text nodes until the output fits
/// `budget` bytes or the pass bound is exhausted.
pub(crate) fn bounded_markup(scope: &mut Element, budget: usize) -> String {
    let mut rendered = render(scope);
    if rendered.len() <= budget {
        return rendered;
    }
    for _ in 0..MAX_TRUNCATE_PASSES {
        let overage = rendered.len().saturating_sub(budget);
        if overage == 0 {
            break;
        }
        if !truncate_pass(scope, overage) {
            break; // nothing left to cut: soft failure, return best effort
        }
        rendered = render(scope);
    }
    rendered
}

fn render(scope: &Element) -> String {
    serialize::insert_block_gaps(&serialize::serialize_element(scope))
}

/// One backward truncation sweep. Returns false when no text was cut.
fn truncate_pass(scope: &mut Element, overage: usize) -> bool {
    let mut texts: Vec<&mut String> = Vec::new();
    collect_text_nodes(scope, &mut texts);

    let mut remaining = overage;
    let mut cut_any = false;
    for (idx, text) in texts.iter_mut().enumerate().rev() {
        if remaining == 0 {
            break;
        }
        let char_count = text.chars().count();
        if char_count == 0 {
            continue;
        }
        // proportional share of the remaining overage, never below the
        // minimum cut, never beyond the node itself
        let nodes_left = idx + 1;
        let share = remaining.div_ceil(nodes_left).max(MIN_TRUNCATE_CHARS);
        let cut = share.min(char_count);
        let keep = char_count - cut;
        let byte_idx = text
            .char_indices()
            .nth(keep)
            .map_or(text.len(), |(i, _)| i);
        let removed_bytes = text.len() - byte_idx;
        text.truncate(byte_idx);
        remaining = remaining.saturating_sub(removed_bytes);
        cut_any = true;
    }
    cut_any
}

fn collect_text_nodes<'a>(el: &'a mut Element, out: &mut Vec<&'a mut String>) {
    for child in &mut el.children {
        match child {
            Node::Text(t) => out.push(t),
            Node::Element(e) => collect_text_nodes(e, out),
            Node::Comment(_) => {}
        }
    }
}

/// Render `scope` as plain text: tags dropped, block closings and `<br>`
/// become newlines, whitespace collapsed. No structural truncation pass.
pub(crate) fn plain_text(scope: &Element) -> String {
    let mut out = String::new();
    render_text(scope, &mut out);

    let mut cleaned = String::with_capacity(out.len());
    for line in out.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !cleaned.is_empty() {
            cleaned.push('\n');
        }
        cleaned.push_str(line);
    }
    cleaned
}

fn render_text(el: &Element, out: &mut String) {
    for child in &el.children {
        match child {
            Node::Text(t) => out.push_str(t),
            Node::Element(e) => {
                if e.name == "br" {
                    out.push('\n');
                } else {
                    render_text(e, out);
                    if TEXT_BLOCK_TAGS.contains(&e.name.as_str()) {
                        out.push('\n');
                    } else {
                        out.push(' ');
                    }
                }
            }
            Node::Comment(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaner::scope::select_scope;
    use crate::parse::parse_document;

    #[test]
    fn under_budget_output_is_untouched() {
        let mut scope = select_scope(parse_document("<main><p>short</p></main>"));
        let out = bounded_markup(&mut scope, 30_000);
        assert!(out.contains("<p>short</p>"));
    }

    #[test]
    fn over_budget_output_is_trimmed_from_the_tail() {
        let body: String = (0..40)
            .map(|i| format!("<p>{}</p>", format!("para{i} ").repeat(40)))
            .collect();
        let mut scope = select_scope(parse_document(&format!("<main>{body}</main>")));
        let out = bounded_markup(&mut scope, 2_000);
        assert!(out.len() <= 2_000);
        // structure stays balanced and leading content survives
        assert_eq!(out.matches("<p>").count(), out.matches("</p>").count());
        assert!(out.contains("para0"));
    }

    #[test]
    fn markup_only_input_is_a_soft_failure() {
        let body: String = (0..200).map(|_| "<p><img src=\"/x.jpg\"></p>".to_string()).collect();
        let mut scope = select_scope(parse_document(&format!("<main>{body}</main>")));
        let out = bounded_markup(&mut scope, 500);
        // nothing to cut: output exceeds budget but is returned anyway
        assert!(out.len() > 500);
    }

    #[test]
    fn plain_text_renders_blocks_as_lines() {
        let scope = select_scope(parse_document(
            "<main><h2>教員一覧</h2><ul><li>山田 太郎</li><li>佐藤 花子</li></ul></main>",
        ));
        assert_eq!(plain_text(&scope), "教員一覧\n山田 太郎\n佐藤 花子");
    }
}
