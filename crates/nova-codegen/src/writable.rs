use std::collections::BTreeSet;
use std::fmt;

use nova_core::QualifiedName;
use nova_format::{CodeWriter, FormatConfig};
use nova_resolve::RenderingContext;

/// Something that renders itself as Java source under a naming context.
///
/// Implementors report every named type they mention through
/// [`Writable::collect_types`], which is what feeds import resolution, and
/// print each of those types through the [`RenderingContext`] they are given.
pub trait Writable {
    fn collect_types(&self, out: &mut BTreeSet<QualifiedName>);

    fn write_to(&self, ctx: &RenderingContext, out: &mut CodeWriter<'_>) -> fmt::Result;

    fn referenced_named_types(&self) -> BTreeSet<QualifiedName> {
        let mut out = BTreeSet::new();
        self.collect_types(&mut out);
        out
    }

    /// Render with the default layout into a fresh string.
    fn render_in(&self, ctx: &RenderingContext) -> String {
        let mut text = String::new();
        let mut out = CodeWriter::new(&mut text, &FormatConfig::default());
        // Writing into a `String` cannot fail.
        let _ = self.write_to(ctx, &mut out);
        text
    }
}
