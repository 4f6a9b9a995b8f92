use std::collections::{BTreeMap, BTreeSet};

use nova_core::{Name, PackageName, QualifiedName};
use serde::{Deserialize, Serialize};

use crate::scopes::{RenderingContext, ScopeBinding, ScopeKind};

/// Import resolution settings.
///
/// ```toml
/// implicit_packages = ["java.lang"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportConfig {
    /// Packages whose top-level types are visible in every compilation unit
    /// without an import (`java.lang` for Java).
    #[serde(default = "ImportConfig::default_implicit_packages")]
    pub implicit_packages: Vec<String>,
}

impl ImportConfig {
    fn default_implicit_packages() -> Vec<String> {
        vec!["java.lang".to_owned()]
    }

    #[must_use]
    pub fn is_implicit(&self, package: &PackageName) -> bool {
        if package.is_default() {
            return false;
        }
        let dotted = package.to_dotted();
        self.implicit_packages.iter().any(|p| *p == dotted)
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            implicit_packages: Self::default_implicit_packages(),
        }
    }
}

/// How a simple name came to be usable in a compilation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClaimKind {
    /// A top-level type declared by the unit itself.
    Declared,
    /// Visible without an import: same package or an implicit package.
    Implicit,
    /// Needs a single-type-import line.
    Imported,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub name: QualifiedName,
    pub kind: ClaimKind,
}

/// Result of import resolution for one compilation unit: which type owns each
/// simple name at file scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportTable {
    package: PackageName,
    claims: BTreeMap<Name, Claim>,
    always_qualified: BTreeSet<QualifiedName>,
}

impl ImportTable {
    pub(crate) fn new(
        package: PackageName,
        claims: BTreeMap<Name, Claim>,
        always_qualified: BTreeSet<QualifiedName>,
    ) -> Self {
        Self {
            package,
            claims,
            always_qualified,
        }
    }

    #[must_use]
    pub fn package(&self) -> &PackageName {
        &self.package
    }

    /// The type owning `simple` at file scope, if any.
    #[must_use]
    pub fn claim(&self, simple: &str) -> Option<&Claim> {
        self.claims.get(simple)
    }

    /// All claims, ordered by simple name.
    pub fn claims(&self) -> impl Iterator<Item = (&Name, &Claim)> + '_ {
        self.claims.iter()
    }

    /// Types that need an import line, in canonical order.
    #[must_use]
    pub fn imports(&self) -> Vec<&QualifiedName> {
        let imported: BTreeSet<&QualifiedName> = self
            .claims
            .values()
            .filter(|claim| claim.kind == ClaimKind::Imported)
            .map(|claim| &claim.name)
            .collect();
        imported.into_iter().collect()
    }

    /// Referenced types that could not be given any short form.
    #[must_use]
    pub fn always_qualified(&self) -> &BTreeSet<QualifiedName> {
        &self.always_qualified
    }

    /// The file-level rendering context: every claimed simple name is bound to
    /// its owner.
    #[must_use]
    pub fn root_context(&self) -> RenderingContext {
        let bindings = self
            .claims
            .iter()
            .map(|(simple, claim)| (simple.clone(), ScopeBinding::Type(claim.name.clone())))
            .collect();
        RenderingContext::with_bindings(self.package.clone(), ScopeKind::File, bindings)
    }
}
