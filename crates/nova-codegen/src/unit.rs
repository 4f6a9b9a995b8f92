use std::collections::BTreeSet;
use std::fmt::{self, Write as _};

use indexmap::IndexMap;
use nova_core::{Name, PackageName, QualifiedName};
use nova_format::{CodeWriter, FormatConfig};
use nova_resolve::{ImportConfig, ImportRequest, ImportResolver, ImportTable};

use crate::arena::{Arena, TypeNode};
use crate::error::NameKind;
use crate::ids::{ConstructorId, FieldId, MethodId, TypeDeclId};
use crate::render::write_type_decl;
use crate::{CodegenError, ConstructorDecl, FieldDecl, MethodDecl, TypeDecl, TypeKind, Writable};

/// One `.java` file: a package, explicit imports and an ordered list of
/// top-level type declarations.
///
/// The unit owns every declaration added to it. `add_*` methods validate and
/// return a handle; the `*_mut` accessors allow refining a declaration later.
/// Rendering takes `&self` and never changes the tree, so rendering the same
/// unit twice produces identical text.
#[derive(Debug, Clone)]
pub struct CompilationUnit {
    package: PackageName,
    file_comment: Option<String>,
    imports: Vec<QualifiedName>,
    top_level: IndexMap<Name, TypeDeclId>,
    arena: Arena,
}

impl CompilationUnit {
    #[must_use]
    pub fn new(package: PackageName) -> Self {
        Self {
            package,
            file_comment: None,
            imports: Vec::new(),
            top_level: IndexMap::new(),
            arena: Arena::default(),
        }
    }

    /// A unit in the dotted `package` (empty for the default package).
    pub fn in_package(package: &str) -> Result<Self, CodegenError> {
        Ok(Self::new(PackageName::from_dotted(package)?))
    }

    #[must_use]
    pub fn package(&self) -> &PackageName {
        &self.package
    }

    /// Emitted as `//` line comments above the package statement.
    pub fn set_file_comment(&mut self, comment: impl Into<String>) -> &mut Self {
        self.file_comment = Some(comment.into());
        self
    }

    /// Request an import line for `import` whether or not it is referenced.
    ///
    /// Fails if another explicit import, a top-level type of this unit, or a
    /// referenced top-level type of this unit's package already uses the same
    /// simple name.
    pub fn add_import(&mut self, import: QualifiedName) -> Result<&mut Self, CodegenError> {
        if self.imports.contains(&import) {
            return Ok(self);
        }
        let simple = import.simple_name();
        let referenced = self.referenced_named_types();
        let locals = self
            .top_level
            .values()
            .filter_map(|id| self.arena.type_node(*id))
            .map(|node| node.name.clone())
            .chain(self.same_package_references(&referenced));
        let existing = locals
            .chain(self.imports.iter().cloned())
            .find(|existing| existing.simple_name() == simple && *existing != import);
        if let Some(existing) = existing {
            return Err(CodegenError::ConflictingImport {
                import: import.to_dotted(),
                existing: existing.to_dotted(),
            });
        }
        self.imports.push(import);
        Ok(self)
    }

    #[must_use]
    pub fn explicit_imports(&self) -> &[QualifiedName] {
        &self.imports
    }

    pub fn add_type(&mut self, decl: TypeDecl) -> Result<TypeDeclId, CodegenError> {
        check_enum(&decl)?;
        self.check_references(|out| decl.collect_types(out))?;
        let simple = decl.name().clone();
        if self.top_level.contains_key(&simple) {
            return Err(CodegenError::duplicate(NameKind::Type, &simple));
        }
        let name = QualifiedName::new(self.package.clone(), Vec::new(), simple.clone());
        if let Some(import) = self
            .imports
            .iter()
            .find(|import| import.simple_name() == &simple && **import != name)
        {
            return Err(CodegenError::ConflictingImport {
                import: import.to_dotted(),
                existing: name.to_dotted(),
            });
        }

        let id = self.arena.alloc_type(decl, name, None);
        self.top_level.insert(simple, id);
        Ok(id)
    }

    /// Add a member type to `parent`. Its qualified name is derived from the
    /// parent's.
    pub fn add_nested_type(
        &mut self,
        parent: TypeDeclId,
        decl: TypeDecl,
    ) -> Result<TypeDeclId, CodegenError> {
        check_enum(&decl)?;
        self.check_references(|out| decl.collect_types(out))?;
        let simple = decl.name().clone();
        let parent_node = self.node(parent)?;
        if parent_node.nested.contains_key(&simple)
            || self
                .arena
                .enclosing_chain(parent)
                .any(|node| *node.decl.name() == simple)
        {
            return Err(CodegenError::duplicate(NameKind::Type, &simple));
        }
        let name = parent_node.name.nested(simple.clone());

        let id = self.arena.alloc_type(decl, name, Some(parent));
        self.node_mut(parent)?.nested.insert(simple, id);
        Ok(id)
    }

    pub fn add_field(&mut self, owner: TypeDeclId, field: FieldDecl) -> Result<FieldId, CodegenError> {
        let name = field.name().clone();
        if self.node(owner)?.fields.contains_key(&name) {
            return Err(CodegenError::duplicate(NameKind::Field, &name));
        }
        self.check_references(|out| field.collect_types(out))?;
        let id = self.arena.alloc_field(field);
        self.node_mut(owner)?.fields.insert(name, id);
        Ok(id)
    }

    pub fn add_method(&mut self, owner: TypeDeclId, method: MethodDecl) -> Result<MethodId, CodegenError> {
        let name = method.name().clone();
        if self.node(owner)?.methods.contains_key(&name) {
            return Err(CodegenError::duplicate(NameKind::Method, &name));
        }
        self.check_references(|out| method.collect_types(out))?;
        let id = self.arena.alloc_method(method);
        self.node_mut(owner)?.methods.insert(name, id);
        Ok(id)
    }

    pub fn add_constructor(
        &mut self,
        owner: TypeDeclId,
        ctor: ConstructorDecl,
    ) -> Result<ConstructorId, CodegenError> {
        let decl = &self.node(owner)?.decl;
        if decl.kind() == TypeKind::Interface {
            return Err(decl.unsupported("a constructor"));
        }
        self.check_references(|out| ctor.collect_types(out))?;
        let id = self.arena.alloc_constructor(ctor);
        self.node_mut(owner)?.constructors.push(id);
        Ok(id)
    }

    /// Top-level declarations in insertion order.
    pub fn top_level_types(&self) -> impl Iterator<Item = TypeDeclId> + '_ {
        self.top_level.values().copied()
    }

    #[must_use]
    pub fn type_decl(&self, id: TypeDeclId) -> Option<&TypeDecl> {
        self.arena.type_node(id).map(|node| &node.decl)
    }

    pub fn type_decl_mut(&mut self, id: TypeDeclId) -> Option<&mut TypeDecl> {
        self.arena.type_node_mut(id).map(|node| &mut node.decl)
    }

    #[must_use]
    pub fn qualified_name(&self, id: TypeDeclId) -> Option<&QualifiedName> {
        self.arena.type_node(id).map(|node| &node.name)
    }

    /// Direct member types of `id`, in insertion order.
    pub fn nested_types(&self, id: TypeDeclId) -> impl Iterator<Item = TypeDeclId> + '_ {
        self.arena
            .type_node(id)
            .into_iter()
            .flat_map(|node| node.nested.values().copied())
    }

    #[must_use]
    pub fn field(&self, id: FieldId) -> Option<&FieldDecl> {
        self.arena.fields.get(id.idx())
    }

    pub fn field_mut(&mut self, id: FieldId) -> Option<&mut FieldDecl> {
        self.arena.fields.get_mut(id.idx())
    }

    #[must_use]
    pub fn method(&self, id: MethodId) -> Option<&MethodDecl> {
        self.arena.methods.get(id.idx())
    }

    pub fn method_mut(&mut self, id: MethodId) -> Option<&mut MethodDecl> {
        self.arena.methods.get_mut(id.idx())
    }

    #[must_use]
    pub fn constructor(&self, id: ConstructorId) -> Option<&ConstructorDecl> {
        self.arena.constructors.get(id.idx())
    }

    pub fn constructor_mut(&mut self, id: ConstructorId) -> Option<&mut ConstructorDecl> {
        self.arena.constructors.get_mut(id.idx())
    }

    /// Every named type mentioned anywhere in the unit's declarations.
    #[must_use]
    pub fn referenced_named_types(&self) -> BTreeSet<QualifiedName> {
        let mut out = BTreeSet::new();
        for id in self.top_level.values() {
            self.arena.collect_types(*id, &mut out);
        }
        out
    }

    /// The qualified names of every type declared in the unit, nested included.
    #[must_use]
    pub fn declared_types(&self) -> BTreeSet<QualifiedName> {
        self.arena.types.iter().map(|node| node.name.clone()).collect()
    }

    #[must_use]
    pub fn import_request(&self) -> ImportRequest {
        ImportRequest {
            package: self.package.clone(),
            referenced: self.referenced_named_types(),
            declared: self.declared_types(),
            explicit: self.imports.clone(),
        }
    }

    #[must_use]
    pub fn resolve_imports(&self, config: &ImportConfig) -> ImportTable {
        ImportResolver::new(config.clone()).resolve(&self.import_request())
    }

    /// Render with the default layout and `java.lang` as the only implicit
    /// package.
    pub fn render(&self, sink: &mut dyn fmt::Write) -> fmt::Result {
        self.render_with(sink, &FormatConfig::default(), &ImportConfig::default())
    }

    pub fn render_with(
        &self,
        sink: &mut dyn fmt::Write,
        format: &FormatConfig,
        imports: &ImportConfig,
    ) -> fmt::Result {
        let span = tracing::debug_span!("render_unit", package = %self.package);
        let _guard = span.enter();

        let table = self.resolve_imports(imports);
        let import_lines = table.imports();
        tracing::debug!(
            target = "nova.codegen",
            types = self.arena.types.len(),
            imports = import_lines.len(),
            "rendering compilation unit"
        );

        let mut out = CodeWriter::new(sink, format);
        if let Some(comment) = &self.file_comment {
            for line in comment.lines() {
                if line.is_empty() {
                    out.write_str("//\n")?;
                } else {
                    writeln!(out, "// {line}")?;
                }
            }
        }
        if !self.package.is_default() {
            writeln!(out, "package {};", self.package)?;
            out.newline()?;
        }
        for import in &import_lines {
            writeln!(out, "import {import};")?;
        }
        if !import_lines.is_empty() {
            out.newline()?;
        }

        let root = table.root_context();
        for (idx, id) in self.top_level.values().enumerate() {
            if idx > 0 {
                out.newline()?;
            }
            write_type_decl(&self.arena, *id, &root, &mut out)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn to_source(&self) -> String {
        self.to_string()
    }

    /// Top-level types of this unit's package among `types`, nested references
    /// included through their top-level ancestor.
    fn same_package_references<'a>(
        &'a self,
        types: &'a BTreeSet<QualifiedName>,
    ) -> impl Iterator<Item = QualifiedName> + 'a {
        types
            .iter()
            .map(QualifiedName::top_level_type)
            .filter(move |top| *top.package() == self.package)
    }

    /// Rejects new references to same-package types whose simple name an
    /// explicit import already uses.
    fn check_references(
        &self,
        collect: impl FnOnce(&mut BTreeSet<QualifiedName>),
    ) -> Result<(), CodegenError> {
        if self.imports.is_empty() {
            return Ok(());
        }
        let mut types = BTreeSet::new();
        collect(&mut types);
        for local in self.same_package_references(&types) {
            if let Some(import) = self
                .imports
                .iter()
                .find(|import| import.simple_name() == local.simple_name() && **import != local)
            {
                return Err(CodegenError::ConflictingImport {
                    import: import.to_dotted(),
                    existing: local.to_dotted(),
                });
            }
        }
        Ok(())
    }

    fn node(&self, id: TypeDeclId) -> Result<&TypeNode, CodegenError> {
        self.arena
            .type_node(id)
            .ok_or_else(|| CodegenError::UnknownDeclaration(format!("{id:?}")))
    }

    fn node_mut(&mut self, id: TypeDeclId) -> Result<&mut TypeNode, CodegenError> {
        self.arena
            .type_node_mut(id)
            .ok_or_else(|| CodegenError::UnknownDeclaration(format!("{id:?}")))
    }
}

impl fmt::Display for CompilationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f)
    }
}

fn check_enum(decl: &TypeDecl) -> Result<(), CodegenError> {
    if decl.kind() == TypeKind::Enum && decl.enum_constants.is_empty() {
        return Err(CodegenError::EmptyEnum {
            name: decl.name().to_string(),
        });
    }
    Ok(())
}
