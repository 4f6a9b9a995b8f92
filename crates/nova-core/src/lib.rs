//! Core shared types for Nova's code generation crates.
//!
//! This crate is intentionally small: it owns the identifier and qualified name
//! primitives every other crate builds on, plus the canonical ordering used to
//! keep generated output deterministic.

mod name;
mod qualified_name;

pub use name::{is_java_identifier, is_java_keyword, Name};
pub use qualified_name::{canonical_cmp, Ancestors, PackageName, QualifiedName};

use thiserror::Error;

/// A name-level reference could not be built from the given input.
///
/// Raised at construction time only; nothing downstream of a successfully
/// built name can produce this error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidReferenceError {
    #[error("empty name")]
    EmptyName,
    #[error("`{0}` is not a valid Java identifier")]
    InvalidIdentifier(String),
    #[error("`{0}` contains an empty segment")]
    EmptySegment(String),
    #[error("`{0}` has no type segment")]
    MissingTypeSegment(String),
}
