use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Write as _};
use std::sync::Arc;

use nova_core::{Name, PackageName, QualifiedName};
use nova_types::{TypeRef, WildcardBound};

/// What a simple name refers to inside a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeBinding {
    Type(QualifiedName),
    /// A type parameter of an enclosing declaration. It shadows any type with
    /// the same simple name.
    TypeVariable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    File,
    Type,
    Method,
}

struct ScopeData {
    parent: Option<Arc<ScopeData>>,
    kind: ScopeKind,
    bindings: BTreeMap<Name, ScopeBinding>,
}

/// The naming context a declaration is rendered in.
///
/// A context is an immutable value: the current package plus a chain of
/// scopes, innermost first. Extending a context allocates a new innermost
/// scope that points at (and shares) its parent, so a child context can never
/// change what its parent or siblings see.
#[derive(Clone)]
pub struct RenderingContext {
    package: PackageName,
    scope: Arc<ScopeData>,
}

impl RenderingContext {
    /// A context with nothing visible, for rendering without any imports.
    #[must_use]
    pub fn new(package: PackageName) -> Self {
        Self::with_bindings(package, ScopeKind::File, BTreeMap::new())
    }

    pub(crate) fn with_bindings(
        package: PackageName,
        kind: ScopeKind,
        bindings: BTreeMap<Name, ScopeBinding>,
    ) -> Self {
        Self {
            package,
            scope: Arc::new(ScopeData {
                parent: None,
                kind,
                bindings,
            }),
        }
    }

    #[must_use]
    pub fn package(&self) -> &PackageName {
        &self.package
    }

    fn kind(&self) -> ScopeKind {
        self.scope.kind
    }

    /// Number of scopes in the chain (1 for a file context).
    fn depth(&self) -> usize {
        let mut depth = 1;
        let mut scope = &self.scope;
        while let Some(parent) = &scope.parent {
            depth += 1;
            scope = parent;
        }
        depth
    }

    /// A child context in which each of `names` is visible by its simple name.
    ///
    /// Used when entering a type declaration: its direct member types become
    /// visible, shadowing same-named types from outer scopes.
    #[must_use]
    pub fn with_additional_visible_names(
        &self,
        names: impl IntoIterator<Item = QualifiedName>,
    ) -> Self {
        let bindings = names
            .into_iter()
            .map(|name| (name.simple_name().clone(), ScopeBinding::Type(name)))
            .collect();
        self.child(ScopeKind::Type, bindings)
    }

    /// A child context in which each of `names` is a type variable.
    #[must_use]
    pub fn with_type_variables<'a>(
        &self,
        kind: ScopeKind,
        names: impl IntoIterator<Item = &'a Name>,
    ) -> Self {
        let bindings = names
            .into_iter()
            .map(|name| (name.clone(), ScopeBinding::TypeVariable))
            .collect();
        self.child(kind, bindings)
    }

    fn child(&self, kind: ScopeKind, bindings: BTreeMap<Name, ScopeBinding>) -> Self {
        if bindings.is_empty() {
            return self.clone();
        }
        Self {
            package: self.package.clone(),
            scope: Arc::new(ScopeData {
                parent: Some(Arc::clone(&self.scope)),
                kind,
                bindings,
            }),
        }
    }

    /// What `simple` refers to here, searching from the innermost scope out.
    #[must_use]
    pub fn lookup(&self, simple: &str) -> Option<&ScopeBinding> {
        let mut scope = &self.scope;
        loop {
            if let Some(binding) = scope.bindings.get(simple) {
                return Some(binding);
            }
            scope = scope.parent.as_ref()?;
        }
    }

    /// Whether `name` is reachable by its simple name alone.
    #[must_use]
    pub fn is_visible(&self, name: &QualifiedName) -> bool {
        matches!(
            self.lookup(name.simple_name().as_str()),
            Some(ScopeBinding::Type(bound)) if bound == name
        )
    }

    /// Every simple name bound in this context or any enclosing one.
    fn visible_names(&self) -> BTreeSet<Name> {
        let mut out = BTreeSet::new();
        let mut scope = Some(&self.scope);
        while let Some(current) = scope {
            out.extend(current.bindings.keys().cloned());
            scope = current.parent.as_ref();
        }
        out
    }

    /// The shortest text that denotes `name` here.
    ///
    /// Walks from `name` outward through its enclosing types; the first one
    /// whose simple name is bound to itself is printed by simple name followed
    /// by the rest of the chain (`Map.Entry`). Otherwise the canonical name is
    /// printed.
    #[must_use]
    pub fn text_for(&self, name: &QualifiedName) -> String {
        for ancestor in name.ancestors() {
            if !self.is_visible(&ancestor) {
                continue;
            }
            let mut text = ancestor.simple_name().to_string();
            if let Some(suffix) = name.suffix_after(&ancestor) {
                text.push_str(&suffix);
            }
            return text;
        }
        name.to_dotted()
    }

    /// [`RenderingContext::text_for`] lifted to full type references.
    #[must_use]
    pub fn type_text(&self, ty: &TypeRef) -> String {
        let mut out = String::new();
        // Writing into a `String` cannot fail.
        let _ = self.write_type(ty, &mut out);
        out
    }

    /// Stream the text for `ty` into `out`.
    pub fn write_type(&self, ty: &TypeRef, out: &mut dyn fmt::Write) -> fmt::Result {
        match ty {
            TypeRef::Named(name) => out.write_str(&self.text_for(name)),
            TypeRef::Parameterized(param) => {
                out.write_str(&self.text_for(param.base()))?;
                out.write_char('<')?;
                for (idx, arg) in param.args().iter().enumerate() {
                    if idx > 0 {
                        out.write_str(", ")?;
                    }
                    self.write_type(arg, out)?;
                }
                out.write_char('>')
            }
            TypeRef::Array(component) => {
                self.write_type(component, out)?;
                out.write_str("[]")
            }
            TypeRef::Wildcard(WildcardBound::Unbounded) => out.write_char('?'),
            TypeRef::Wildcard(WildcardBound::Extends(bound)) => {
                out.write_str("? extends ")?;
                self.write_type(bound, out)
            }
            TypeRef::Wildcard(WildcardBound::Super(bound)) => {
                out.write_str("? super ")?;
                self.write_type(bound, out)
            }
            TypeRef::TypeVariable(var) => out.write_str(var.name().as_str()),
            TypeRef::Primitive(p) => out.write_str(p.keyword()),
            TypeRef::Void => out.write_str("void"),
            TypeRef::Null => out.write_str("null"),
        }
    }
}

impl fmt::Debug for RenderingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderingContext")
            .field("package", &self.package)
            .field("kind", &self.kind())
            .field("depth", &self.depth())
            .field("visible", &self.visible_names())
            .finish()
    }
}
