//! URL resolution and lazy-image promotion.
//!
//! Resolution failures are absorbed: the original attribute value is kept
//! unchanged. Fragments and non-HTTP schemes are never touched.

use url::Url;

use crate::tree::{Document, Element, Node};

/// Lazy-load attributes tried, in priority order, when `src` is absent.
const LAZY_SRC_ATTRS: &[&str] = &["data-src", "data-original", "data-lazy"];

/// The effective resolution base: the first `<base href>` in the document
/// (itself resolved against the source URL), else the source URL unchanged.
pub(crate) fn document_base(doc: &Document, source_url: &str) -> String {
    fn find_base(nodes: &[Node]) -> Option<&str> {
        for node in nodes {
            if let Node::Element(el) = node {
                if el.name == "base" {
                    if let Some(href) = el.attr("href") {
                        if !href.trim().is_empty() {
                            return Some(href);
                        }
                    }
                }
                if let Some(found) = find_base(&el.children) {
                    return Some(found);
                }
            }
        }
        None
    }

    match find_base(&doc.children) {
        Some(href) => resolve(source_url, href).unwrap_or_else(|| source_url.to_string()),
        None => source_url.to_string(),
    }
}

/// Absolutize every anchor `href` and image `src` under `el`, promoting
/// lazy-load sources first.
pub(crate) fn resolve_urls(el: &mut Element, base: &str) {
    match el.name.as_str() {
        "a" => {
            if let Some(href) = el.attr("href").map(str::to_string) {
                if should_resolve(&href) {
                    if let Some(abs) = resolve(base, &href) {
                        el.set_attr("href", abs);
                    }
                }
            }
        }
        "img" => {
            promote_lazy_src(el);
            if let Some(src) = el.attr("src").map(str::to_string) {
                if !src.trim().is_empty() && should_resolve(&src) {
                    if let Some(abs) = resolve(base, &src) {
                        el.set_attr("src", abs);
                    }
                }
            }
        }
        _ => {}
    }
    for child in &mut el.children {
        if let Node::Element(e) = child {
            resolve_urls(e, base);
        }
    }
}

/// Fragments and non-HTTP schemes are left untouched.
fn should_resolve(value: &str) -> bool {
    let v = value.trim();
    if v.starts_with('#') {
        return false;
    }
    let lower = v.to_ascii_lowercase();
    !(lower.starts_with("mailto:") || lower.starts_with("tel:") || lower.starts_with("javascript:"))
}

/// Join `value` against `base`; `None` when either side does not parse.
pub(crate) fn resolve(base: &str, value: &str) -> Option<String> {
    let base = Url::parse(base).ok()?;
    base.join(value.trim()).ok().map(Url::into)
}

/// Copy the first usable lazy-load candidate into a missing/blank `src`.
fn promote_lazy_src(img: &mut Element) {
    let blank = img.attr("src").is_none_or(|src| src.trim().is_empty());
    if !blank {
        return;
    }
    for key in LAZY_SRC_ATTRS {
        if let Some(value) = img.attr(key) {
            let value = value.trim();
            if !value.is_empty() {
                let promoted = value.to_string();
                img.set_attr("src", promoted);
                return;
            }
        }
    }
    for key in ["data-srcset", "srcset"] {
        if let Some(value) = img.attr(key) {
            if let Some(first) = first_srcset_entry(value) {
                img.set_attr("src", first);
                return;
            }
        }
    }
}

/// The URL of the first entry in a `srcset`-style list, width descriptor
/// stripped.
fn first_srcset_entry(srcset: &str) -> Option<String> {
    srcset
        .split(',')
        .next()?
        .trim()
        .split_whitespace()
        .next()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaner::scope::select_scope;
    use crate::parse::parse_document;

    const BASE: &str = "https://example.com/base/dir/";

    fn run(html: &str) -> Element {
        let mut scope = select_scope(parse_document(html));
        resolve_urls(&mut scope, BASE);
        scope
    }

    fn first_attr(scope: &Element, tag: &str, attr: &'static str) -> Option<String> {
        let mut found = None;
        fn walk(el: &Element, tag: &str, attr: &str, found: &mut Option<String>) {
            if found.is_some() {
                return;
            }
            if el.name == tag {
                *found = el.attr(attr).map(str::to_string);
                return;
            }
            for child in &el.children {
                if let Node::Element(e) = child {
                    walk(e, tag, attr, found);
                }
            }
        }
        walk(scope, tag, attr, &mut found);
        found
    }

    #[test]
    fn resolves_relative_hrefs() {
        let scope = run("<main><a href=\"./person/a\">x</a></main>");
        assert_eq!(
            first_attr(&scope, "a", "href").as_deref(),
            Some("https://example.com/base/dir/person/a")
        );
    }

    #[test]
    fn resolves_parent_relative_src() {
        let scope = run("<main><img src=\"../imgs/p.jpg\"></main>");
        assert_eq!(
            first_attr(&scope, "img", "src").as_deref(),
            Some("https://example.com/base/imgs/p.jpg")
        );
    }

    #[test]
    fn leaves_fragments_and_schemes_alone() {
        let scope = run("<main><a href=\"#same-card\">x</a><a href=\"mailto:a@b\">m</a></main>");
        assert_eq!(first_attr(&scope, "a", "href").as_deref(), Some("#same-card"));
    }

    #[test]
    fn promotes_data_src_against_host_root() {
        let scope = run("<main><img data-src=\"/x.jpg\"></main>");
        assert_eq!(
            first_attr(&scope, "img", "src").as_deref(),
            Some("https://example.com/x.jpg")
        );
    }

    #[test]
    fn promotes_first_srcset_entry() {
        let scope = run("<main><img srcset=\"/a.jpg 1x, /b.jpg 2x\"></main>");
        assert_eq!(
            first_attr(&scope, "img", "src").as_deref(),
            Some("https://example.com/a.jpg")
        );
    }

    #[test]
    fn invalid_base_is_a_no_op() {
        let mut scope = select_scope(parse_document("<main><a href=\"./p\">x</a></main>"));
        resolve_urls(&mut scope, "not a url");
        assert_eq!(first_attr(&scope, "a", "href").as_deref(), Some("./p"));
    }

    #[test]
    fn base_href_rebases_resolution() {
        let doc = parse_document("<head><base href=\"/root/\"></head><body><p>x</p></body>");
        assert_eq!(document_base(&doc, BASE), "https://example.com/root/");
    }
}
