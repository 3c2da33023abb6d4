//! Decomposition of a capture into candidate content blocks.
//!
//! A coarser companion to the cleaning pipeline: chrome tags are dropped
//! outright (no guards), links absolutized, then every block-level element
//! with text becomes a row. Rows are grouped by a parent/tag/child-shape
//! signature so repeated listing entries (the interesting ones) group
//! together, and groups are emitted largest first under a hard row cap.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::cleaner::{links, scope};
use crate::parse;
use crate::text;
use crate::tree::{Element, Node};

/// Tags removed wholesale before blockifying.
const REMOVED_TAGS: &[&str] = &[
    "script", "style", "noscript", "svg", "canvas", "nav", "aside", "footer", "header",
];

/// Elements that qualify as blocks.
const BLOCK_TAGS: &[&str] = &["div", "section", "article", "li", "td"];

/// Ancestor segments kept in a block's CSS path.
const MAX_PATH_DEPTH: usize = 8;

/// One candidate content block.
#[derive(Debug, Clone, Serialize)]
pub struct Block {
    /// 1-based emission index.
    pub block_id: usize,
    /// Uppercased tag name.
    pub tag: String,
    /// Element depth below the scope root.
    pub depth: usize,
    /// Grouping signature (`parent|tag|child-shape`).
    pub group_id: String,
    /// `nth-of-type` CSS path, at most [`MAX_PATH_DEPTH`] segments.
    pub path: String,
    /// Whether the block contains an image.
    pub has_img: bool,
    /// Collapsed block text, length-capped.
    pub text: String,
    /// Links contained in the block.
    pub links: Vec<LinkRef>,
}

/// A link found inside a block.
#[derive(Debug, Clone, Serialize)]
pub struct LinkRef {
    /// Absolute (or original, if unresolvable) link target.
    pub href: String,
    /// Collapsed link text.
    pub text: String,
}

/// Options for [`blockify`].
#[derive(Debug, Clone)]
pub struct BlockifyOptions {
    /// Hard cap on emitted rows.
    pub max_blocks: usize,
    /// Per-block text cap, in chars.
    pub max_text_len: usize,
}

impl Default for BlockifyOptions {
    fn default() -> Self {
        Self {
            max_blocks: 300,
            max_text_len: 45_000,
        }
    }
}

struct ProtoBlock {
    tag: String,
    depth: usize,
    group_id: String,
    path: String,
    has_img: bool,
    text: String,
    links: Vec<LinkRef>,
}

/// Decompose `html` into grouped candidate blocks.
#[must_use]
pub fn blockify(html: &str, source_url: &str, options: &BlockifyOptions) -> Vec<Block> {
    let doc = parse::parse_document(html);
    let base = links::document_base(&doc, source_url);
    let mut root = scope::select_scope(doc);

    remove_unwanted(&mut root);
    links::resolve_urls(&mut root, &base);

    let mut protos = Vec::new();
    let mut path = Vec::new();
    collect_blocks(&root, 1, &mut path, options, &mut protos);

    // group by signature, then emit largest groups (longest text on ties)
    let mut groups: Vec<(String, Vec<ProtoBlock>)> = Vec::new();
    for proto in protos {
        if let Some(group) = groups.iter_mut().find(|(key, _)| *key == proto.group_id) {
            group.1.push(proto);
        } else {
            groups.push((proto.group_id.clone(), vec![proto]));
        }
    }
    groups.sort_by(|a, b| {
        b.1.len()
            .cmp(&a.1.len())
            .then_with(|| group_score(&b.1).cmp(&group_score(&a.1)))
    });

    let mut out = Vec::new();
    'emit: for (_, members) in groups {
        for proto in members {
            out.push(Block {
                block_id: out.len() + 1,
                tag: proto.tag,
                depth: proto.depth,
                group_id: proto.group_id,
                path: proto.path,
                has_img: proto.has_img,
                text: proto.text,
                links: proto.links,
            });
            if out.len() >= options.max_blocks {
                break 'emit;
            }
        }
    }
    tracing::debug!(blocks = out.len(), "blockified capture");
    out
}

fn group_score(members: &[ProtoBlock]) -> usize {
    members
        .iter()
        .map(|proto| proto.text.chars().count())
        .max()
        .unwrap_or(0)
}

fn remove_unwanted(el: &mut Element) {
    el.children
        .retain(|node| !matches!(node, Node::Element(e) if REMOVED_TAGS.contains(&e.name.as_str())));
    for child in &mut el.children {
        if let Node::Element(e) = child {
            remove_unwanted(e);
        }
    }
}

fn collect_blocks(
    el: &Element,
    depth: usize,
    path: &mut Vec<String>,
    options: &BlockifyOptions,
    out: &mut Vec<ProtoBlock>,
) {
    let mut type_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for child in &el.children {
        let Node::Element(e) = child else { continue };
        let nth = type_counts
            .entry(e.name.as_str())
            .and_modify(|n| *n += 1)
            .or_insert(1);
        path.push(format!("{}:nth-of-type({nth})", e.name));

        if BLOCK_TAGS.contains(&e.name.as_str()) {
            let collapsed = text::compress_ws(&e.text());
            if !collapsed.is_empty() {
                out.push(ProtoBlock {
                    tag: e.name.to_uppercase(),
                    depth,
                    group_id: format!("{}|{}|{}", el.name, e.name, child_signature(e)),
                    path: css_path(path),
                    has_img: e.any_element(&|d: &Element| d.name == "img"),
                    text: truncate_chars(&collapsed, options.max_text_len),
                    links: collect_links(e),
                });
            }
        }

        collect_blocks(e, depth + 1, path, options, out);
        path.pop();
    }
}

/// Sorted direct-child tag counts, e.g. `a:1;span:2`.
fn child_signature(el: &Element) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for child in &el.children {
        if let Node::Element(e) = child {
            *counts.entry(e.name.as_str()).or_insert(0) += 1;
        }
    }
    counts
        .iter()
        .map(|(tag, n)| format!("{tag}:{n}"))
        .collect::<Vec<_>>()
        .join(";")
}

fn css_path(segments: &[String]) -> String {
    let start = segments.len().saturating_sub(MAX_PATH_DEPTH);
    segments[start..].join(">")
}

fn collect_links(el: &Element) -> Vec<LinkRef> {
    let mut links = Vec::new();
    collect_links_into(el, &mut links);
    links
}

fn collect_links_into(el: &Element, out: &mut Vec<LinkRef>) {
    for child in &el.children {
        if let Node::Element(e) = child {
            if e.name == "a" {
                if let Some(href) = e.attr("href") {
                    if !href.is_empty() {
                        out.push(LinkRef {
                            href: href.to_string(),
                            text: e.collapsed_text(),
                        });
                    }
                }
            }
            collect_links_into(e, out);
        }
    }
}

fn truncate_chars(input: &str, max_chars: usize) -> String {
    match input.char_indices().nth(max_chars) {
        Some((idx, _)) => input[..idx].to_string(),
        None => input.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://example.ac.jp/faculty/";

    #[test]
    fn emits_grouped_blocks_with_absolute_links() {
        let html = "<main><nav>chrome</nav><ul>\
            <li><a href=\"/r/lab/x\">山田研究室</a></li>\
            <li><a href=\"/r/lab/y\">佐藤研究室</a></li>\
            </ul></main>";
        let blocks = blockify(html, BASE, &BlockifyOptions::default());
        assert_eq!(blocks.len(), 2);
        assert!(blocks.iter().all(|b| b.tag == "LI"));
        assert_eq!(blocks[0].block_id, 1);
        assert!(blocks[0].group_id.starts_with("ul|li|"));
        assert_eq!(blocks[0].links[0].href, "https://example.ac.jp/r/lab/x");
        assert!(!blocks.iter().any(|b| b.text.contains("chrome")));
    }

    #[test]
    fn respects_the_block_cap() {
        let items: String = (0..10).map(|i| format!("<li>item {i}</li>")).collect();
        let options = BlockifyOptions {
            max_blocks: 3,
            ..BlockifyOptions::default()
        };
        let blocks = blockify(&format!("<main><ul>{items}</ul></main>"), BASE, &options);
        assert_eq!(blocks.len(), 3);
    }

    #[test]
    fn path_reflects_position() {
        let blocks = blockify(
            "<main><ul><li>一番</li><li>二番</li></ul></main>",
            BASE,
            &BlockifyOptions::default(),
        );
        assert_eq!(blocks[1].path, "ul:nth-of-type(1)>li:nth-of-type(2)");
    }
}
