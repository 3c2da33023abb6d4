//! Form-control simplification.
//!
//! Pickers with many options (country/department dropdowns) are option-spam
//! and go entirely; small pickers are flattened to their option text. Other
//! controls survive only when they carry visible text or a value.

use crate::text;
use crate::tree::{Element, Node};

/// Option count at which a `select`/`datalist` is treated as option-spam.
const MAX_SELECT_OPTIONS: usize = 20;

/// Concatenated option-text length at which a picker is treated as spam.
const MAX_OPTION_TEXT_LEN: usize = 200;

/// Simplify every form control under `el`.
pub(crate) fn simplify_forms(el: &mut Element) {
    let children = std::mem::take(&mut el.children);
    el.children = simplify_nodes(children);
}

fn simplify_nodes(nodes: Vec<Node>) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Element(mut e) => match e.name.as_str() {
                "select" | "datalist" => {
                    let (count, texts) = collect_options(&e);
                    let total_len: usize = texts.iter().map(|t| t.chars().count()).sum();
                    if count >= MAX_SELECT_OPTIONS || total_len > MAX_OPTION_TEXT_LEN {
                        continue; // option-spam: drop the whole control
                    }
                    if !texts.is_empty() {
                        out.push(Node::Text(texts.join(" ")));
                    }
                }
                "input" | "textarea" | "button" | "label" => {
                    let visible = text::compress_ws(&e.text());
                    let has_value = e.attr("value").is_some_and(|v| !v.trim().is_empty());
                    if !visible.is_empty() || has_value {
                        e.children = simplify_nodes(std::mem::take(&mut e.children));
                        out.push(Node::Element(e));
                    }
                }
                _ => {
                    e.children = simplify_nodes(std::mem::take(&mut e.children));
                    out.push(Node::Element(e));
                }
            },
            other => out.push(other),
        }
    }
    out
}

/// Count all `option` descendants and collect their non-empty texts.
fn collect_options(el: &Element) -> (usize, Vec<String>) {
    let mut count = 0;
    let mut texts = Vec::new();
    collect_options_into(el, &mut count, &mut texts);
    (count, texts)
}

fn collect_options_into(el: &Element, count: &mut usize, texts: &mut Vec<String>) {
    for child in &el.children {
        if let Node::Element(e) = child {
            if e.name == "option" {
                *count += 1;
                let t = text::compress_ws(&e.text());
                if !t.is_empty() {
                    texts.push(t);
                }
            }
            collect_options_into(e, count, texts);
        }
    }
}
