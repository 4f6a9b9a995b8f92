use std::collections::BTreeSet;
use std::fmt::{self, Write as _};

use indexmap::IndexMap;
use nova_core::{Name, QualifiedName};
use nova_format::CodeWriter;
use nova_resolve::RenderingContext;

use crate::error::NameKind;
use crate::{CodeBlock, CodegenError, Writable};

/// An annotation use such as `@SuppressWarnings("unchecked")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationSpec {
    ty: QualifiedName,
    members: IndexMap<Name, Vec<CodeBlock>>,
}

impl AnnotationSpec {
    #[must_use]
    pub fn new(ty: QualifiedName) -> Self {
        Self {
            ty,
            members: IndexMap::new(),
        }
    }

    /// Append a value to member `name`. Repeated values render as an array
    /// initializer.
    pub fn add_member(&mut self, name: &str, value: CodeBlock) -> Result<&mut Self, CodegenError> {
        let name = Name::new(name)?;
        self.members.entry(name).or_default().push(value);
        Ok(self)
    }

    #[must_use]
    pub fn ty(&self) -> &QualifiedName {
        &self.ty
    }

    pub fn members(&self) -> impl Iterator<Item = (&Name, &[CodeBlock])> + '_ {
        self.members.iter().map(|(name, values)| (name, values.as_slice()))
    }

    fn write_values(
        values: &[CodeBlock],
        ctx: &RenderingContext,
        out: &mut CodeWriter<'_>,
    ) -> fmt::Result {
        if let [single] = values {
            return single.write_to(ctx, out);
        }
        out.write_char('{')?;
        for (idx, value) in values.iter().enumerate() {
            if idx > 0 {
                out.write_str(", ")?;
            }
            value.write_to(ctx, out)?;
        }
        out.write_char('}')
    }
}

impl Writable for AnnotationSpec {
    fn collect_types(&self, out: &mut BTreeSet<QualifiedName>) {
        out.insert(self.ty.clone());
        for value in self.members.values().flatten() {
            value.collect_types(out);
        }
    }

    fn write_to(&self, ctx: &RenderingContext, out: &mut CodeWriter<'_>) -> fmt::Result {
        out.write_char('@')?;
        out.write_str(&ctx.text_for(&self.ty))?;
        if self.members.is_empty() {
            return Ok(());
        }
        out.write_char('(')?;
        match self.members.first() {
            Some((name, values)) if self.members.len() == 1 && name.as_str() == "value" => {
                Self::write_values(values, ctx, out)?;
            }
            _ => {
                for (idx, (name, values)) in self.members.iter().enumerate() {
                    if idx > 0 {
                        out.write_str(", ")?;
                    }
                    write!(out, "{name} = ")?;
                    Self::write_values(values, ctx, out)?;
                }
            }
        }
        out.write_char(')')
    }
}

/// Annotations attached to one declaration; at most one per annotation type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    specs: Vec<AnnotationSpec>,
}

impl Annotations {
    pub fn add(&mut self, spec: AnnotationSpec) -> Result<(), CodegenError> {
        if self.specs.iter().any(|s| s.ty == spec.ty) {
            return Err(CodegenError::duplicate(NameKind::Annotation, &spec.ty));
        }
        self.specs.push(spec);
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnnotationSpec> + '_ {
        self.specs.iter()
    }

    pub(crate) fn collect_types(&self, out: &mut BTreeSet<QualifiedName>) {
        for spec in &self.specs {
            spec.collect_types(out);
        }
    }

    /// One annotation per line, as used before declarations.
    pub(crate) fn write_lines(&self, ctx: &RenderingContext, out: &mut CodeWriter<'_>) -> fmt::Result {
        for spec in &self.specs {
            spec.write_to(ctx, out)?;
            out.newline()?;
        }
        Ok(())
    }

    /// Space separated on the current line, as used for parameters.
    pub(crate) fn write_inline(&self, ctx: &RenderingContext, out: &mut CodeWriter<'_>) -> fmt::Result {
        for spec in &self.specs {
            spec.write_to(ctx, out)?;
            out.write_char(' ')?;
        }
        Ok(())
    }
}
