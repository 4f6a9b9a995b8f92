use std::collections::{BTreeMap, BTreeSet};

use nova_core::{Name, PackageName, QualifiedName};

use crate::import_map::{Claim, ClaimKind, ImportConfig, ImportTable};

/// Everything the resolver needs to know about one compilation unit.
#[derive(Debug, Clone, Default)]
pub struct ImportRequest {
    pub package: PackageName,
    /// Every named type referenced anywhere in the unit.
    pub referenced: BTreeSet<QualifiedName>,
    /// Every type (top-level and nested) declared by the unit itself.
    pub declared: BTreeSet<QualifiedName>,
    /// Imports requested by the caller, in the order they were added.
    pub explicit: Vec<QualifiedName>,
}

/// Chooses the import table for a compilation unit.
///
/// Own top-level types claim their simple names first, followed by the other
/// top-level types of the same package, which hide same-named types of
/// implicitly visible packages. Then every candidate (explicit imports and
/// referenced types, in canonical order) walks outward through its enclosing
/// types until it finds an ancestor whose simple name is free or already owned
/// by that ancestor. Candidates with no such ancestor are always printed fully
/// qualified.
#[derive(Debug, Clone, Default)]
pub struct ImportResolver {
    config: ImportConfig,
}

impl ImportResolver {
    #[must_use]
    pub fn new(config: ImportConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn resolve(&self, request: &ImportRequest) -> ImportTable {
        let package = &request.package;
        let mut claims: BTreeMap<Name, Claim> = BTreeMap::new();

        for declared in request.declared.iter().filter(|name| name.is_top_level()) {
            claims.entry(declared.simple_name().clone()).or_insert_with(|| Claim {
                name: declared.clone(),
                kind: ClaimKind::Declared,
            });
        }

        let candidates: BTreeSet<&QualifiedName> = request
            .explicit
            .iter()
            .chain(request.referenced.iter())
            .collect();

        // Same-package types shadow implicit packages in Java source.
        for local in candidates
            .iter()
            .map(|candidate| candidate.top_level_type())
            .filter(|top| top.package() == package)
        {
            claims.entry(local.simple_name().clone()).or_insert_with(|| Claim {
                name: local,
                kind: ClaimKind::Implicit,
            });
        }

        let mut always_qualified = BTreeSet::new();
        for candidate in candidates {
            if request.declared.contains(&candidate.top_level_type()) {
                continue;
            }
            if !self.claim_first_free_ancestor(package, candidate, &mut claims) {
                tracing::trace!(
                    target = "nova.resolve",
                    name = %candidate,
                    "no simple name available, keeping fully qualified"
                );
                always_qualified.insert(candidate.clone());
            }
        }

        let table = ImportTable::new(package.clone(), claims, always_qualified);
        tracing::debug!(
            target = "nova.resolve",
            package = %package,
            referenced = request.referenced.len(),
            explicit = request.explicit.len(),
            imports = table.imports().len(),
            qualified = table.always_qualified().len(),
            "resolved imports"
        );
        table
    }

    /// Returns `false` if no ancestor of `candidate` could be given a simple
    /// name.
    fn claim_first_free_ancestor(
        &self,
        package: &PackageName,
        candidate: &QualifiedName,
        claims: &mut BTreeMap<Name, Claim>,
    ) -> bool {
        for ancestor in candidate.ancestors() {
            let Some(kind) = self.claim_kind(package, &ancestor) else {
                continue;
            };
            match claims.get(ancestor.simple_name().as_str()) {
                Some(existing) if existing.name == ancestor => return true,
                Some(_) => continue,
                None => {
                    claims.insert(
                        ancestor.simple_name().clone(),
                        Claim {
                            name: ancestor,
                            kind,
                        },
                    );
                    return true;
                }
            }
        }
        false
    }

    /// How `ancestor` would become visible by simple name, or `None` if it
    /// never can from `package`.
    fn claim_kind(&self, package: &PackageName, ancestor: &QualifiedName) -> Option<ClaimKind> {
        let home = ancestor.package();
        if home.is_default() {
            // Types in the unnamed package cannot be imported.
            return (ancestor.is_top_level() && package.is_default()).then_some(ClaimKind::Implicit);
        }
        if ancestor.is_top_level() && (home == package || self.config.is_implicit(home)) {
            Some(ClaimKind::Implicit)
        } else {
            Some(ClaimKind::Imported)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn qn(canonical: &str) -> QualifiedName {
        QualifiedName::best_guess(canonical).unwrap()
    }

    fn request(package: &str, referenced: &[&str], declared: &[&str]) -> ImportRequest {
        ImportRequest {
            package: PackageName::from_dotted(package).unwrap(),
            referenced: referenced.iter().map(|c| qn(c)).collect(),
            declared: declared.iter().map(|c| qn(c)).collect(),
            explicit: Vec::new(),
        }
    }

    fn imports(table: &ImportTable) -> Vec<String> {
        table.imports().into_iter().map(QualifiedName::to_dotted).collect()
    }

    #[test]
    fn same_package_and_java_lang_need_no_import() {
        let table = ImportResolver::default().resolve(&request(
            "p",
            &["p.Sibling", "java.lang.String", "java.util.List"],
            &["p.Widget"],
        ));
        assert_eq!(imports(&table), vec!["java.util.List"]);
        assert_eq!(table.claim("Sibling").unwrap().kind, ClaimKind::Implicit);
        assert_eq!(table.claim("String").unwrap().kind, ClaimKind::Implicit);
        assert_eq!(table.claim("Widget").unwrap().kind, ClaimKind::Declared);
    }

    #[test]
    fn own_types_win_over_referenced_types() {
        let table = ImportResolver::default().resolve(&request(
            "p",
            &["a.Widget", "java.lang.String"],
            &["p.Widget", "p.String"],
        ));
        assert!(imports(&table).is_empty());
        assert_eq!(
            table.always_qualified().iter().map(|n| n.to_dotted()).collect::<Vec<_>>(),
            vec!["a.Widget", "java.lang.String"]
        );
    }

    #[test]
    fn same_package_types_hide_implicit_packages() {
        let table = ImportResolver::default().resolve(&request(
            "p",
            &["java.lang.String", "p.String", "java.lang.Override", "a.Kind", "p.Override.Kind"],
            &[],
        ));
        assert_eq!(imports(&table), vec!["a.Kind"]);
        assert_eq!(table.claim("String").unwrap().name, qn("p.String"));
        assert_eq!(table.claim("Override").unwrap().name, qn("p.Override"));
        assert_eq!(
            table.always_qualified().iter().map(|n| n.to_dotted()).collect::<Vec<_>>(),
            vec!["java.lang.Override", "java.lang.String"]
        );

        let ctx = table.root_context();
        assert_eq!(ctx.text_for(&qn("p.String")), "String");
        assert_eq!(ctx.text_for(&qn("java.lang.String")), "java.lang.String");
        assert_eq!(ctx.text_for(&qn("p.Override.Kind")), "Override.Kind");
    }

    #[test]
    fn nested_candidate_falls_back_to_enclosing_type() {
        let table = ImportResolver::default().resolve(&request(
            "p",
            &["a.Entry", "java.util.Map.Entry"],
            &[],
        ));
        assert_eq!(imports(&table), vec!["a.Entry", "java.util.Map"]);
        assert!(table.always_qualified().is_empty());
        assert_eq!(table.root_context().text_for(&qn("java.util.Map.Entry")), "Map.Entry");
    }

    #[test]
    fn references_into_own_types_are_not_imported() {
        let table = ImportResolver::default().resolve(&request(
            "p",
            &["p.Widget.Part", "q.Part"],
            &["p.Widget", "p.Widget.Part"],
        ));
        assert_eq!(imports(&table), vec!["q.Part"]);
    }

    #[test]
    fn default_package_types_are_never_imported() {
        let table = ImportResolver::default().resolve(&request("p", &["Main", "Main.Inner"], &[]));
        assert!(imports(&table).is_empty());
        assert_eq!(table.always_qualified().len(), 2);

        let table = ImportResolver::default().resolve(&request("", &["Main.Inner"], &[]));
        assert!(imports(&table).is_empty());
        assert_eq!(table.claim("Main").unwrap().kind, ClaimKind::Implicit);
    }

    #[test]
    fn explicit_imports_are_candidates_even_when_unreferenced() {
        let mut req = request("p", &[], &[]);
        req.explicit.push(qn("java.util.concurrent.ConcurrentHashMap"));
        let table = ImportResolver::default().resolve(&req);
        assert_eq!(imports(&table), vec!["java.util.concurrent.ConcurrentHashMap"]);
    }

    #[test]
    fn custom_implicit_packages() {
        let resolver = ImportResolver::new(ImportConfig {
            implicit_packages: vec!["lib".to_owned()],
        });
        let table = resolver.resolve(&request("p", &["lib.List", "java.lang.String"], &[]));
        assert_eq!(imports(&table), vec!["java.lang.String"]);
        assert_eq!(table.claim("List").unwrap().kind, ClaimKind::Implicit);
    }
}
