//! Import selection and name visibility for generated Java compilation units.
//!
//! Given every type a compilation unit references, [`ImportResolver`] decides
//! which simple names can be used, which of them need an `import` line, and
//! which types must stay fully qualified. The resulting [`ImportTable`] seeds
//! a [`RenderingContext`], which nested declarations extend with their own
//! member types and type variables while rendering.
//!
//! Resolution is total: a name that cannot be shortened safely is printed
//! fully qualified instead of producing an error.

mod import_map;
mod resolver;
mod scopes;

pub use import_map::{Claim, ClaimKind, ImportConfig, ImportTable};
pub use resolver::{ImportRequest, ImportResolver};
pub use scopes::{RenderingContext, ScopeBinding, ScopeKind};
