//! Declaration headers and members.
//!
//! These are plain values until they are inserted into a
//! [`CompilationUnit`](crate::CompilationUnit), which then owns them and hands
//! out handles for later refinement. Every builder method validates its own
//! container eagerly, so an invalid declaration can never be rendered.

use std::collections::BTreeSet;
use std::fmt::{self, Write as _};

use indexmap::IndexMap;
use nova_core::{Name, QualifiedName};
use nova_format::CodeWriter;
use nova_resolve::RenderingContext;
use nova_types::{InvalidTypeError, TypeRef, TypeVariable};

use crate::error::NameKind;
use crate::{AnnotationSpec, Annotations, CodeBlock, CodegenError, Modifier, Modifiers, Writable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
}

impl TypeKind {
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Declared type parameters only take `extends` bounds.
fn add_type_parameter(params: &mut Vec<TypeVariable>, param: TypeVariable) -> Result<(), CodegenError> {
    if let Some(bound) = param.super_bound() {
        return Err(InvalidTypeError::InvalidBound(format!("{} super {bound}", param.name())).into());
    }
    if params.iter().any(|p| p.name() == param.name()) {
        return Err(CodegenError::duplicate(NameKind::TypeParameter, param.name()));
    }
    params.push(param);
    Ok(())
}

fn collect_type_parameters(params: &[TypeVariable], out: &mut BTreeSet<QualifiedName>) {
    for param in params {
        TypeRef::TypeVariable(param.clone()).collect_named(out);
    }
}

/// `<T extends Bound, U>`, nothing when empty.
pub(crate) fn write_type_parameters(
    params: &[TypeVariable],
    ctx: &RenderingContext,
    out: &mut CodeWriter<'_>,
) -> fmt::Result {
    if params.is_empty() {
        return Ok(());
    }
    out.write_char('<')?;
    for (idx, param) in params.iter().enumerate() {
        if idx > 0 {
            out.write_str(", ")?;
        }
        out.write_str(param.name().as_str())?;
        if let Some(bound) = param.extends_bound() {
            out.write_str(" extends ")?;
            ctx.write_type(bound, &mut *out)?;
        }
    }
    out.write_char('>')
}

/// A `/** ... */` comment, one ` * ` line per line of `doc`.
pub(crate) fn write_javadoc(
    doc: Option<&CodeBlock>,
    ctx: &RenderingContext,
    out: &mut CodeWriter<'_>,
) -> fmt::Result {
    let Some(doc) = doc.filter(|doc| !doc.is_empty()) else {
        return Ok(());
    };
    let mut text = String::new();
    doc.write_to(ctx, &mut out.detached(&mut text))?;
    out.write_str("/**\n")?;
    for line in text.trim_end_matches('\n').split('\n') {
        if line.is_empty() {
            out.write_str(" *\n")?;
        } else {
            writeln!(out, " * {line}")?;
        }
    }
    out.write_str(" */\n")
}

/// The header of a class, interface or enum declaration.
///
/// Members (fields, methods, constructors and nested types) are added through
/// the owning [`CompilationUnit`](crate::CompilationUnit).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    kind: TypeKind,
    name: Name,
    pub(crate) modifiers: Modifiers,
    pub(crate) annotations: Annotations,
    pub(crate) javadoc: Option<CodeBlock>,
    pub(crate) superclass: Option<TypeRef>,
    pub(crate) interfaces: Vec<TypeRef>,
    pub(crate) type_params: Vec<TypeVariable>,
    pub(crate) enum_constants: IndexMap<Name, EnumConstant>,
    pub(crate) static_block: Option<CodeBlock>,
}

impl TypeDecl {
    pub fn new(kind: TypeKind, name: &str) -> Result<Self, CodegenError> {
        Ok(Self {
            kind,
            name: Name::new(name)?,
            modifiers: Modifiers::new(),
            annotations: Annotations::default(),
            javadoc: None,
            superclass: None,
            interfaces: Vec::new(),
            type_params: Vec::new(),
            enum_constants: IndexMap::new(),
            static_block: None,
        })
    }

    pub fn class(name: &str) -> Result<Self, CodegenError> {
        Self::new(TypeKind::Class, name)
    }

    pub fn interface(name: &str) -> Result<Self, CodegenError> {
        Self::new(TypeKind::Interface, name)
    }

    pub fn enumeration(name: &str) -> Result<Self, CodegenError> {
        Self::new(TypeKind::Enum, name)
    }

    #[must_use]
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    #[must_use]
    pub fn name(&self) -> &Name {
        &self.name
    }

    #[must_use]
    pub fn modifiers(&self) -> &Modifiers {
        &self.modifiers
    }

    pub fn add_modifiers(
        &mut self,
        modifiers: impl IntoIterator<Item = Modifier>,
    ) -> Result<&mut Self, CodegenError> {
        self.modifiers.extend(modifiers)?;
        Ok(self)
    }

    pub fn annotate_with(&mut self, annotation: AnnotationSpec) -> Result<&mut Self, CodegenError> {
        self.annotations.add(annotation)?;
        Ok(self)
    }

    pub fn set_javadoc(&mut self, doc: CodeBlock) -> &mut Self {
        self.javadoc = Some(doc);
        self
    }

    /// Only classes have a superclass.
    pub fn set_superclass(&mut self, superclass: TypeRef) -> Result<&mut Self, CodegenError> {
        if self.kind != TypeKind::Class {
            return Err(self.unsupported("a superclass"));
        }
        self.superclass = Some(superclass);
        Ok(self)
    }

    /// An `implements` entry for classes and enums, an `extends` entry for
    /// interfaces.
    pub fn add_interface(&mut self, interface: TypeRef) -> &mut Self {
        self.interfaces.push(interface);
        self
    }

    pub fn add_type_parameter(&mut self, param: TypeVariable) -> Result<&mut Self, CodegenError> {
        if self.kind == TypeKind::Enum {
            return Err(self.unsupported("a type parameter"));
        }
        add_type_parameter(&mut self.type_params, param)?;
        Ok(self)
    }

    #[must_use]
    pub fn type_parameters(&self) -> &[TypeVariable] {
        &self.type_params
    }

    pub fn add_enum_constant(&mut self, constant: EnumConstant) -> Result<&mut Self, CodegenError> {
        if self.kind != TypeKind::Enum {
            return Err(self.unsupported("an enum constant"));
        }
        if self.enum_constants.contains_key(&constant.name) {
            return Err(CodegenError::duplicate(NameKind::EnumConstant, &constant.name));
        }
        self.enum_constants.insert(constant.name.clone(), constant);
        Ok(self)
    }

    pub fn enum_constants(&self) -> impl Iterator<Item = &EnumConstant> + '_ {
        self.enum_constants.values()
    }

    pub fn set_static_block(&mut self, block: CodeBlock) -> Result<&mut Self, CodegenError> {
        if self.kind == TypeKind::Interface {
            return Err(self.unsupported("a static initializer"));
        }
        self.static_block = Some(block);
        Ok(self)
    }

    pub(crate) fn unsupported(&self, member: &'static str) -> CodegenError {
        CodegenError::UnsupportedMember {
            owner: self.name.to_string(),
            kind: self.kind,
            member,
        }
    }

    /// Types mentioned by the header and enum constants, not by members.
    pub(crate) fn collect_types(&self, out: &mut BTreeSet<QualifiedName>) {
        self.annotations.collect_types(out);
        if let Some(doc) = &self.javadoc {
            doc.collect_types(out);
        }
        if let Some(superclass) = &self.superclass {
            superclass.collect_named(out);
        }
        for interface in &self.interfaces {
            interface.collect_named(out);
        }
        collect_type_parameters(&self.type_params, out);
        for constant in self.enum_constants.values() {
            constant.collect_types(out);
        }
        if let Some(block) = &self.static_block {
            block.collect_types(out);
        }
    }

    /// Everything up to (not including) the opening brace.
    pub(crate) fn write_header(&self, ctx: &RenderingContext, out: &mut CodeWriter<'_>) -> fmt::Result {
        write_javadoc(self.javadoc.as_ref(), ctx, out)?;
        self.annotations.write_lines(ctx, out)?;
        write!(out, "{}{} {}", self.modifiers, self.kind, self.name)?;
        write_type_parameters(&self.type_params, ctx, out)?;
        if let Some(superclass) = &self.superclass {
            out.write_str(" extends ")?;
            ctx.write_type(superclass, &mut *out)?;
        }
        if !self.interfaces.is_empty() {
            out.write_str(match self.kind {
                TypeKind::Interface => " extends ",
                TypeKind::Class | TypeKind::Enum => " implements ",
            })?;
            for (idx, interface) in self.interfaces.iter().enumerate() {
                if idx > 0 {
                    out.write_str(", ")?;
                }
                ctx.write_type(interface, &mut *out)?;
            }
        }
        Ok(())
    }
}

/// One enum constant, optionally with constructor arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumConstant {
    name: Name,
    args: Option<CodeBlock>,
    javadoc: Option<CodeBlock>,
}

impl EnumConstant {
    pub fn new(name: &str) -> Result<Self, CodegenError> {
        Ok(Self {
            name: Name::new(name)?,
            args: None,
            javadoc: None,
        })
    }

    /// `NAME(args)`; the block holds the text between the parentheses.
    #[must_use]
    pub fn with_args(mut self, args: CodeBlock) -> Self {
        self.args = Some(args);
        self
    }

    #[must_use]
    pub fn with_javadoc(mut self, doc: CodeBlock) -> Self {
        self.javadoc = Some(doc);
        self
    }

    #[must_use]
    pub fn name(&self) -> &Name {
        &self.name
    }
}

impl Writable for EnumConstant {
    fn collect_types(&self, out: &mut BTreeSet<QualifiedName>) {
        for block in self.args.iter().chain(self.javadoc.iter()) {
            block.collect_types(out);
        }
    }

    fn write_to(&self, ctx: &RenderingContext, out: &mut CodeWriter<'_>) -> fmt::Result {
        write_javadoc(self.javadoc.as_ref(), ctx, out)?;
        out.write_str(self.name.as_str())?;
        if let Some(args) = &self.args {
            out.write_char('(')?;
            args.write_to(ctx, out)?;
            out.write_char(')')?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    ty: TypeRef,
    name: Name,
    modifiers: Modifiers,
    annotations: Annotations,
    javadoc: Option<CodeBlock>,
    initializer: Option<CodeBlock>,
}

impl FieldDecl {
    pub fn new(ty: impl Into<TypeRef>, name: &str) -> Result<Self, CodegenError> {
        Ok(Self {
            ty: ty.into(),
            name: Name::new(name)?,
            modifiers: Modifiers::new(),
            annotations: Annotations::default(),
            javadoc: None,
            initializer: None,
        })
    }

    #[must_use]
    pub fn name(&self) -> &Name {
        &self.name
    }

    #[must_use]
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    #[must_use]
    pub fn modifiers(&self) -> &Modifiers {
        &self.modifiers
    }

    pub fn add_modifiers(
        &mut self,
        modifiers: impl IntoIterator<Item = Modifier>,
    ) -> Result<&mut Self, CodegenError> {
        self.modifiers.extend(modifiers)?;
        Ok(self)
    }

    pub fn annotate_with(&mut self, annotation: AnnotationSpec) -> Result<&mut Self, CodegenError> {
        self.annotations.add(annotation)?;
        Ok(self)
    }

    pub fn set_javadoc(&mut self, doc: CodeBlock) -> &mut Self {
        self.javadoc = Some(doc);
        self
    }

    pub fn set_initializer(&mut self, init: CodeBlock) -> &mut Self {
        self.initializer = Some(init);
        self
    }
}

impl Writable for FieldDecl {
    fn collect_types(&self, out: &mut BTreeSet<QualifiedName>) {
        self.ty.collect_named(out);
        self.annotations.collect_types(out);
        for block in self.javadoc.iter().chain(self.initializer.iter()) {
            block.collect_types(out);
        }
    }

    fn write_to(&self, ctx: &RenderingContext, out: &mut CodeWriter<'_>) -> fmt::Result {
        write_javadoc(self.javadoc.as_ref(), ctx, out)?;
        self.annotations.write_lines(ctx, out)?;
        write!(out, "{}", self.modifiers)?;
        ctx.write_type(&self.ty, &mut *out)?;
        write!(out, " {}", self.name)?;
        if let Some(init) = &self.initializer {
            out.write_str(" = ")?;
            init.write_to(ctx, out)?;
        }
        out.write_str(";\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDecl {
    ty: TypeRef,
    name: Name,
    modifiers: Modifiers,
    annotations: Annotations,
}

impl ParamDecl {
    pub fn new(ty: impl Into<TypeRef>, name: &str) -> Result<Self, CodegenError> {
        Ok(Self {
            ty: ty.into(),
            name: Name::new(name)?,
            modifiers: Modifiers::new(),
            annotations: Annotations::default(),
        })
    }

    #[must_use]
    pub fn name(&self) -> &Name {
        &self.name
    }

    #[must_use]
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    /// Parameters only take `final`.
    pub fn set_final(&mut self) -> &mut Self {
        // `final` alone can never conflict.
        let _ = self.modifiers.add(Modifier::Final);
        self
    }

    pub fn annotate_with(&mut self, annotation: AnnotationSpec) -> Result<&mut Self, CodegenError> {
        self.annotations.add(annotation)?;
        Ok(self)
    }

    fn write_param(&self, varargs: bool, ctx: &RenderingContext, out: &mut CodeWriter<'_>) -> fmt::Result {
        self.annotations.write_inline(ctx, out)?;
        write!(out, "{}", self.modifiers)?;
        match (&self.ty, varargs) {
            (TypeRef::Array(component), true) => {
                ctx.write_type(component, &mut *out)?;
                out.write_str("...")?;
            }
            (ty, _) => ctx.write_type(ty, &mut *out)?,
        }
        write!(out, " {}", self.name)
    }
}

impl Writable for ParamDecl {
    fn collect_types(&self, out: &mut BTreeSet<QualifiedName>) {
        self.ty.collect_named(out);
        self.annotations.collect_types(out);
    }

    fn write_to(&self, ctx: &RenderingContext, out: &mut CodeWriter<'_>) -> fmt::Result {
        self.write_param(false, ctx, out)
    }
}

/// The parts shared by methods and constructors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Signature {
    pub(crate) modifiers: Modifiers,
    pub(crate) annotations: Annotations,
    pub(crate) javadoc: Option<CodeBlock>,
    pub(crate) type_params: Vec<TypeVariable>,
    pub(crate) params: Vec<ParamDecl>,
    pub(crate) varargs: bool,
    pub(crate) throws: Vec<TypeRef>,
    pub(crate) body: Option<CodeBlock>,
}

impl Signature {
    fn add_parameter(&mut self, owner: &str, param: ParamDecl) -> Result<(), CodegenError> {
        if self.params.iter().any(|p| p.name == param.name) {
            return Err(CodegenError::duplicate(NameKind::Parameter, &param.name));
        }
        if self.varargs && !matches!(param.ty, TypeRef::Array(_)) {
            return Err(CodegenError::InvalidVarargs(owner.to_owned()));
        }
        self.params.push(param);
        Ok(())
    }

    fn set_varargs(&mut self, owner: &str, varargs: bool) -> Result<(), CodegenError> {
        if varargs && !matches!(self.params.last(), Some(p) if matches!(p.ty, TypeRef::Array(_))) {
            return Err(CodegenError::InvalidVarargs(owner.to_owned()));
        }
        self.varargs = varargs;
        Ok(())
    }

    fn collect_types(&self, out: &mut BTreeSet<QualifiedName>) {
        self.annotations.collect_types(out);
        collect_type_parameters(&self.type_params, out);
        for param in &self.params {
            param.collect_types(out);
        }
        for ty in &self.throws {
            ty.collect_named(out);
        }
        for block in self.javadoc.iter().chain(self.body.iter()) {
            block.collect_types(out);
        }
    }

    /// `(params) throws X, Y`
    pub(crate) fn write_params_and_throws(
        &self,
        ctx: &RenderingContext,
        out: &mut CodeWriter<'_>,
    ) -> fmt::Result {
        out.write_char('(')?;
        let last = self.params.len().saturating_sub(1);
        for (idx, param) in self.params.iter().enumerate() {
            if idx > 0 {
                out.write_str(", ")?;
            }
            param.write_param(self.varargs && idx == last, ctx, out)?;
        }
        out.write_char(')')?;
        for (idx, ty) in self.throws.iter().enumerate() {
            out.write_str(if idx == 0 { " throws " } else { ", " })?;
            ctx.write_type(ty, &mut *out)?;
        }
        Ok(())
    }

    /// ` {` body `}` or `;`, then a newline.
    pub(crate) fn write_body(
        &self,
        semicolon_when_absent: bool,
        ctx: &RenderingContext,
        out: &mut CodeWriter<'_>,
    ) -> fmt::Result {
        match &self.body {
            None if semicolon_when_absent => out.write_str(";\n"),
            body => {
                out.write_str(" {\n")?;
                out.indent();
                if let Some(body) = body {
                    body.write_to(ctx, out)?;
                    out.finish_line()?;
                }
                out.unindent();
                out.write_str("}\n")
            }
        }
    }
}

macro_rules! signature_builders {
    ($ty:ident) => {
        impl $ty {
            #[must_use]
            pub fn modifiers(&self) -> &Modifiers {
                &self.sig.modifiers
            }

            pub fn add_modifiers(
                &mut self,
                modifiers: impl IntoIterator<Item = Modifier>,
            ) -> Result<&mut Self, CodegenError> {
                self.sig.modifiers.extend(modifiers)?;
                Ok(self)
            }

            pub fn annotate_with(
                &mut self,
                annotation: AnnotationSpec,
            ) -> Result<&mut Self, CodegenError> {
                self.sig.annotations.add(annotation)?;
                Ok(self)
            }

            pub fn set_javadoc(&mut self, doc: CodeBlock) -> &mut Self {
                self.sig.javadoc = Some(doc);
                self
            }

            pub fn add_type_parameter(
                &mut self,
                param: TypeVariable,
            ) -> Result<&mut Self, CodegenError> {
                add_type_parameter(&mut self.sig.type_params, param)?;
                Ok(self)
            }

            #[must_use]
            pub fn type_parameters(&self) -> &[TypeVariable] {
                &self.sig.type_params
            }

            /// Fails on a repeated name, or on a non-array parameter once
            /// varargs is set.
            pub fn add_parameter(&mut self, param: ParamDecl) -> Result<&mut Self, CodegenError> {
                let owner = self.owner_name();
                self.sig.add_parameter(&owner, param)?;
                Ok(self)
            }

            #[must_use]
            pub fn parameters(&self) -> &[ParamDecl] {
                &self.sig.params
            }

            /// Requires the last parameter to be an array.
            pub fn set_varargs(&mut self, varargs: bool) -> Result<&mut Self, CodegenError> {
                let owner = self.owner_name();
                self.sig.set_varargs(&owner, varargs)?;
                Ok(self)
            }

            #[must_use]
            pub fn is_varargs(&self) -> bool {
                self.sig.varargs
            }

            pub fn add_exception(&mut self, ty: impl Into<TypeRef>) -> &mut Self {
                self.sig.throws.push(ty.into());
                self
            }

            pub fn set_body(&mut self, body: CodeBlock) -> &mut Self {
                self.sig.body = Some(body);
                self
            }

            #[must_use]
            pub fn body(&self) -> Option<&CodeBlock> {
                self.sig.body.as_ref()
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    name: Name,
    return_type: TypeRef,
    pub(crate) sig: Signature,
}

impl MethodDecl {
    /// A `void` method with no parameters and no body.
    pub fn new(name: &str) -> Result<Self, CodegenError> {
        Ok(Self {
            name: Name::new(name)?,
            return_type: TypeRef::Void,
            sig: Signature::default(),
        })
    }

    #[must_use]
    pub fn name(&self) -> &Name {
        &self.name
    }

    #[must_use]
    pub fn return_type(&self) -> &TypeRef {
        &self.return_type
    }

    pub fn set_return_type(&mut self, ty: impl Into<TypeRef>) -> &mut Self {
        self.return_type = ty.into();
        self
    }

    fn owner_name(&self) -> String {
        self.name.to_string()
    }

    pub(crate) fn collect_types(&self, out: &mut BTreeSet<QualifiedName>) {
        self.return_type.collect_named(out);
        self.sig.collect_types(out);
    }

    /// Whether a missing body renders as `;` rather than `{}`.
    pub(crate) fn is_bodyless(&self, owner: TypeKind) -> bool {
        let mods = &self.sig.modifiers;
        if mods.contains(Modifier::Abstract) || mods.contains(Modifier::Native) {
            return true;
        }
        owner == TypeKind::Interface
            && !(mods.contains(Modifier::Default)
                || mods.contains(Modifier::Static)
                || mods.contains(Modifier::Private))
    }

    pub(crate) fn write_method(
        &self,
        owner: TypeKind,
        ctx: &RenderingContext,
        out: &mut CodeWriter<'_>,
    ) -> fmt::Result {
        let ctx = ctx.with_type_variables(
            nova_resolve::ScopeKind::Method,
            self.sig.type_params.iter().map(TypeVariable::name),
        );
        write_javadoc(self.sig.javadoc.as_ref(), &ctx, out)?;
        self.sig.annotations.write_lines(&ctx, out)?;
        write!(out, "{}", self.sig.modifiers)?;
        if !self.sig.type_params.is_empty() {
            write_type_parameters(&self.sig.type_params, &ctx, out)?;
            out.write_char(' ')?;
        }
        ctx.write_type(&self.return_type, &mut *out)?;
        write!(out, " {}", self.name)?;
        self.sig.write_params_and_throws(&ctx, out)?;
        self.sig.write_body(self.is_bodyless(owner), &ctx, out)
    }
}

signature_builders!(MethodDecl);

/// A constructor. Its name is always the enclosing type's simple name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstructorDecl {
    pub(crate) sig: Signature,
}

impl ConstructorDecl {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn owner_name(&self) -> String {
        "constructor".to_owned()
    }

    pub(crate) fn collect_types(&self, out: &mut BTreeSet<QualifiedName>) {
        self.sig.collect_types(out);
    }

    pub(crate) fn write_constructor(
        &self,
        owner: &Name,
        ctx: &RenderingContext,
        out: &mut CodeWriter<'_>,
    ) -> fmt::Result {
        let ctx = ctx.with_type_variables(
            nova_resolve::ScopeKind::Method,
            self.sig.type_params.iter().map(TypeVariable::name),
        );
        write_javadoc(self.sig.javadoc.as_ref(), &ctx, out)?;
        self.sig.annotations.write_lines(&ctx, out)?;
        write!(out, "{}", self.sig.modifiers)?;
        if !self.sig.type_params.is_empty() {
            write_type_parameters(&self.sig.type_params, &ctx, out)?;
            out.write_char(' ')?;
        }
        out.write_str(owner.as_str())?;
        self.sig.write_params_and_throws(&ctx, out)?;
        self.sig.write_body(false, &ctx, out)
    }
}

signature_builders!(ConstructorDecl);
