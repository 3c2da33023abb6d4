//! The cleaning pipeline: a fixed, linear composition of transformations
//! over one document.
//!
//! Both output modes share the same stages up to normalization and diverge
//! only at rendering: markup mode serializes under the size budget,
//! plain-text mode strips tags with block-to-newline conversion.

pub(crate) mod attrs;
pub(crate) mod bound;
pub(crate) mod empty;
pub(crate) mod forced;
pub(crate) mod forms;
pub(crate) mod links;
pub(crate) mod noise;
pub(crate) mod normalize;
pub(crate) mod scope;

use tracing::debug;

use crate::options::CleanOptions;
use crate::parse;
use crate::tree::Element;

/// Clean `html` and return bounded, sanitized markup.
///
/// `source_url` is the absolute URL the markup was captured from; it is used
/// only to absolutize links and images. The transformation is deterministic
/// and idempotent: cleaning the output again yields the same string.
#[must_use]
pub fn clean_html(html: &str, source_url: &str, options: &CleanOptions) -> String {
    let mut scope = clean_tree(html, source_url, options);
    let rendered = bound::bounded_markup(&mut scope, options.max_output_len);
    debug!(output_len = rendered.len(), "cleaned markup rendered");
    rendered
}

/// Clean `html` and return the plain-text rendition.
///
/// Shares every stage with [`clean_html`] except rendering: tags are
/// stripped, block closings and `<br>` become newlines, and the structural
/// truncation pass is skipped.
#[must_use]
pub fn clean_text(html: &str, source_url: &str, options: &CleanOptions) -> String {
    let scope = clean_tree(html, source_url, options);
    bound::plain_text(&scope)
}

/// Run stages 1-8 and return the transformed scope.
pub(crate) fn clean_tree(html: &str, source_url: &str, options: &CleanOptions) -> Element {
    debug!(input_len = html.len(), source_url, "cleaning capture");

    let doc = parse::parse_document(html);
    let base = links::document_base(&doc, source_url);
    let mut scope = scope::select_scope(doc);

    noise::prune_noise(&mut scope, &options.noise);
    forced::strip_forced_tags(&mut scope);
    forms::simplify_forms(&mut scope);
    links::resolve_urls(&mut scope, &base);
    attrs::sanitize_attributes(&mut scope);
    empty::prune_empty_blocks(&mut scope);
    normalize::normalize_text(&mut scope, &options.field_labels);

    scope
}
