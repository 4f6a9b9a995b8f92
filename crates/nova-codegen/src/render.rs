use std::fmt::{self, Write as _};

use nova_format::CodeWriter;
use nova_resolve::{RenderingContext, ScopeKind};
use nova_types::TypeVariable;

use crate::arena::{Arena, TypeNode};
use crate::ids::TypeDeclId;
use crate::Writable;

/// Render one type declaration and everything nested in it.
///
/// The header sees the type's own type variables; the body additionally sees
/// the simple names of its direct member types.
pub(crate) fn write_type_decl(
    arena: &Arena,
    id: TypeDeclId,
    ctx: &RenderingContext,
    out: &mut CodeWriter<'_>,
) -> fmt::Result {
    let Some(node) = arena.type_node(id) else {
        return Ok(());
    };
    let decl = &node.decl;
    let header_ctx = ctx.with_type_variables(
        ScopeKind::Type,
        decl.type_params.iter().map(TypeVariable::name),
    );
    decl.write_header(&header_ctx, out)?;
    out.write_str(" {\n")?;

    let body_ctx = header_ctx.with_additional_visible_names(
        node.nested
            .values()
            .filter_map(|child| arena.type_node(*child))
            .map(|child| child.name.clone()),
    );
    out.indent();
    write_body(arena, node, &body_ctx, out)?;
    out.unindent();
    out.write_str("}\n")
}

fn write_body(
    arena: &Arena,
    node: &TypeNode,
    ctx: &RenderingContext,
    out: &mut CodeWriter<'_>,
) -> fmt::Result {
    let decl = &node.decl;
    let has_members = !node.fields.is_empty()
        || decl.static_block.is_some()
        || !node.constructors.is_empty()
        || !node.methods.is_empty()
        || !node.nested.is_empty();

    let mut first = true;
    if !decl.enum_constants.is_empty() {
        let last = decl.enum_constants.len() - 1;
        for (idx, constant) in decl.enum_constants.values().enumerate() {
            constant.write_to(ctx, out)?;
            if idx < last {
                out.write_str(",\n")?;
            }
        }
        out.write_str(if has_members { ";\n" } else { "\n" })?;
        first = false;
    }

    if !node.fields.is_empty() {
        separate(&mut first, out)?;
        for field in node.fields.values() {
            arena.fields[field.idx()].write_to(ctx, out)?;
        }
    }

    if let Some(block) = &decl.static_block {
        separate(&mut first, out)?;
        out.write_str("static {\n")?;
        out.indent();
        block.write_to(ctx, out)?;
        out.finish_line()?;
        out.unindent();
        out.write_str("}\n")?;
    }

    for ctor in &node.constructors {
        separate(&mut first, out)?;
        arena.constructors[ctor.idx()].write_constructor(decl.name(), ctx, out)?;
    }

    for method in node.methods.values() {
        separate(&mut first, out)?;
        arena.methods[method.idx()].write_method(decl.kind(), ctx, out)?;
    }

    for nested in node.nested.values() {
        separate(&mut first, out)?;
        write_type_decl(arena, *nested, ctx, out)?;
    }
    Ok(())
}

/// A blank line before every member group but the first.
fn separate(first: &mut bool, out: &mut CodeWriter<'_>) -> fmt::Result {
    if std::mem::replace(first, false) {
        Ok(())
    } else {
        out.newline()
    }
}
