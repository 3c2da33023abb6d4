//! Cleans raw HTML captured from heterogeneous faculty-listing pages into a
//! bounded, structurally normalized document that keeps profile-relevant
//! content (names, roles, person-page links, images) and drops navigational
//! chrome, scripts, trackers and boilerplate.
//!
//! The pipeline is a single pass over one document: scope selection, guarded
//! noise pruning, forced-tag stripping, form simplification, URL resolution,
//! attribute sanitization, empty-block pruning, text normalization, then
//! serialization under a size budget. It performs no I/O, keeps no state
//! across invocations, and is deterministic and idempotent: cleaning its own
//! output returns the same string.
//!
//! ## Quick start
//!
//! ```rust
//! use page_clean::{clean_html, CleanOptions};
//!
//! let html = r#"<main><div class="cookie"><a href="/profile/abc">Profile</a></div></main>"#;
//! let cleaned = clean_html(html, "https://example.ac.jp/faculty/", &CleanOptions::default());
//!
//! assert!(cleaned.contains("https://example.ac.jp/profile/abc"));
//! assert!(!cleaned.contains("cookie"));
//! ```
//!
//! ## Module layout
//!
//! * Top level — [`clean_html`] and [`clean_text`] are the two entry points,
//!   sharing every stage and diverging only at rendering. [`CleanOptions`]
//!   carries the heuristic word lists.
//! * [`records`] — selector-free extraction of `(name, theme, link)` rows
//!   from a cleaned listing.
//! * [`blocks`] — decomposition of a capture into grouped candidate blocks.
//! * [`names`] — CJK personal-name and research-theme normalization.
//! * [`tree`] — the typed node tree the stages operate on.

pub mod blocks;
mod cleaner;
mod error;
pub mod names;
mod options;
mod parse;
pub mod records;
mod serialize;
mod text;
pub mod tree;

pub use cleaner::{clean_html, clean_text};
pub use error::{Error, Result};
pub use options::{CleanOptions, NoiseOptions};
