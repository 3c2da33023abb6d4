//! Error types for the cleaning library.
//!
//! The cleaning pipeline itself is total: malformed markup, unresolvable URLs
//! and missing elements are absorbed, never raised. Errors only surface from
//! configuration, such as user-supplied cleanup patterns.

/// Errors returned by configurable entry points.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A caller-supplied regular expression failed to compile.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
