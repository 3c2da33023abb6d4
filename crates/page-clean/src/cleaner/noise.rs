//! Noise classification and pruning.
//!
//! Two passes over the scope: an exact pass (chrome tag names plus exact
//! class/id tokens) and a substring pass (class/id values containing a flagged
//! token). Every match is gated by the keep guards before anything is deleted:
//! a subtree that still contains a person-page link or plausible name/role
//! text is unwrapped instead of removed, so profile cards sitting inside
//! chrome-flavored wrappers survive.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::options::NoiseOptions;
use crate::tree::{Element, Node};

/// Two-or-more Han ideographs, whitespace, then at least one more: the shape
/// of a spaced CJK personal name.
static CJK_NAME_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{Han}々〆ヵヶ]{2,}\s+[\p{Han}々〆ヵヶ]+").expect("name pattern"));

/// A run of at least two Katakana characters.
static KATAKANA_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{Katakana}{2,}").expect("katakana pattern"));

#[derive(Clone, Copy, PartialEq, Eq)]
enum Pass {
    Exact,
    Substring,
}

/// Run both classification passes over the scope's children.
///
/// The exact pass runs first so nested matches are evaluated outer-to-inner
/// consistently; the scope root itself is never a candidate.
pub(crate) fn prune_noise(scope: &mut Element, opts: &NoiseOptions) {
    for pass in [Pass::Exact, Pass::Substring] {
        let children = std::mem::take(&mut scope.children);
        scope.children = filter_nodes(children, opts, pass);
    }
}

/// Rebuild a node list, dropping or unwrapping matched elements.
///
/// Unwrapped children are re-filtered in place, so a noise wrapper nested
/// inside another noise wrapper is still classified.
fn filter_nodes(nodes: Vec<Node>, opts: &NoiseOptions, pass: Pass) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Element(mut el) => {
                if matches_pass(&el, opts, pass) {
                    if keep_guard(&el, opts) {
                        out.extend(filter_nodes(el.children, opts, pass));
                    }
                    // no guard hit: the whole subtree goes
                } else {
                    el.children = filter_nodes(std::mem::take(&mut el.children), opts, pass);
                    out.push(Node::Element(el));
                }
            }
            other => out.push(other),
        }
    }
    out
}

fn matches_pass(el: &Element, opts: &NoiseOptions, pass: Pass) -> bool {
    match pass {
        Pass::Exact => matches_exact(el, opts),
        Pass::Substring => matches_substring(el, opts),
    }
}

fn matches_exact(el: &Element, opts: &NoiseOptions) -> bool {
    if opts.tags.iter().any(|t| t == &el.name) {
        return true;
    }
    if is_search_form(el) {
        return true;
    }
    let mut tokens = el
        .attr("class")
        .map(|c| c.split_whitespace().collect::<Vec<_>>())
        .unwrap_or_default();
    if let Some(id) = el.attr("id") {
        tokens.push(id);
    }
    tokens.iter().any(|token| {
        opts.class_selectors
            .iter()
            .any(|sel| token.eq_ignore_ascii_case(sel))
    })
}

fn matches_substring(el: &Element, opts: &NoiseOptions) -> bool {
    let mut haystack = String::new();
    if let Some(class) = el.attr("class") {
        haystack.push_str(&class.to_ascii_lowercase());
    }
    haystack.push(' ');
    if let Some(id) = el.attr("id") {
        haystack.push_str(&id.to_ascii_lowercase());
    }
    opts.substrings
        .iter()
        .any(|token| haystack.contains(token.as_str()))
}

/// Search/filter forms are chrome even without a flagged class token.
fn is_search_form(el: &Element) -> bool {
    if el.name != "form" {
        return false;
    }
    if el
        .attr("role")
        .is_some_and(|role| role.eq_ignore_ascii_case("search"))
    {
        return true;
    }
    let class = el.attr("class").unwrap_or_default().to_ascii_lowercase();
    let id = el.attr("id").unwrap_or_default().to_ascii_lowercase();
    class.contains("search") || id.contains("search")
}

/// Either guard saves the subtree from removal (demoting it to an unwrap).
fn keep_guard(el: &Element, opts: &NoiseOptions) -> bool {
    profile_link_guard(el, opts) || name_role_guard(el, opts)
}

/// Guard A: the subtree contains an anchor pointing at a person page, or one
/// labeled as a profile/homepage link.
fn profile_link_guard(el: &Element, opts: &NoiseOptions) -> bool {
    el.any_element(&|candidate: &Element| {
        if candidate.name != "a" {
            return false;
        }
        if let Some(href) = candidate.attr("href") {
            let href = href.to_ascii_lowercase();
            if opts
                .profile_path_hints
                .iter()
                .any(|hint| href.contains(hint.as_str()))
            {
                return true;
            }
        }
        let label = candidate.collapsed_text().to_lowercase();
        !label.is_empty()
            && opts
                .profile_labels
                .iter()
                .any(|known| label.contains(&known.to_lowercase()))
    })
}

/// Guard B: the subtree's text looks like a personal name (spaced Han run or
/// Katakana run) or mentions an academic role.
fn name_role_guard(el: &Element, opts: &NoiseOptions) -> bool {
    let text = el.text();
    if CJK_NAME_RUN.is_match(&text) || KATAKANA_RUN.is_match(&text) {
        return true;
    }
    let lower = text.to_lowercase();
    opts.role_keywords
        .iter()
        .any(|keyword| lower.contains(&keyword.to_lowercase()))
}
