use std::collections::BTreeSet;

use indexmap::IndexMap;
use nova_core::{Name, QualifiedName};

use crate::ids::{ConstructorId, FieldId, MethodId, TypeDeclId};
use crate::{ConstructorDecl, FieldDecl, MethodDecl, TypeDecl, Writable};

/// Storage for every declaration of one compilation unit.
///
/// Nodes are only ever appended, so handles stay valid for the lifetime of the
/// unit.
#[derive(Debug, Clone, Default)]
pub(crate) struct Arena {
    pub(crate) types: Vec<TypeNode>,
    pub(crate) fields: Vec<FieldDecl>,
    pub(crate) methods: Vec<MethodDecl>,
    pub(crate) constructors: Vec<ConstructorDecl>,
}

#[derive(Debug, Clone)]
pub(crate) struct TypeNode {
    pub(crate) decl: TypeDecl,
    /// Computed from the parent chain on insertion.
    pub(crate) name: QualifiedName,
    pub(crate) parent: Option<TypeDeclId>,
    pub(crate) fields: IndexMap<Name, FieldId>,
    pub(crate) methods: IndexMap<Name, MethodId>,
    pub(crate) constructors: Vec<ConstructorId>,
    pub(crate) nested: IndexMap<Name, TypeDeclId>,
}

impl Arena {
    pub(crate) fn alloc_type(
        &mut self,
        decl: TypeDecl,
        name: QualifiedName,
        parent: Option<TypeDeclId>,
    ) -> TypeDeclId {
        let id = TypeDeclId::from_idx(self.types.len());
        self.types.push(TypeNode {
            decl,
            name,
            parent,
            fields: IndexMap::new(),
            methods: IndexMap::new(),
            constructors: Vec::new(),
            nested: IndexMap::new(),
        });
        id
    }

    pub(crate) fn alloc_field(&mut self, field: FieldDecl) -> FieldId {
        let id = FieldId::from_idx(self.fields.len());
        self.fields.push(field);
        id
    }

    pub(crate) fn alloc_method(&mut self, method: MethodDecl) -> MethodId {
        let id = MethodId::from_idx(self.methods.len());
        self.methods.push(method);
        id
    }

    pub(crate) fn alloc_constructor(&mut self, ctor: ConstructorDecl) -> ConstructorId {
        let id = ConstructorId::from_idx(self.constructors.len());
        self.constructors.push(ctor);
        id
    }

    pub(crate) fn type_node(&self, id: TypeDeclId) -> Option<&TypeNode> {
        self.types.get(id.idx())
    }

    pub(crate) fn type_node_mut(&mut self, id: TypeDeclId) -> Option<&mut TypeNode> {
        self.types.get_mut(id.idx())
    }

    /// `id` followed by each of its enclosing declarations.
    pub(crate) fn enclosing_chain(&self, id: TypeDeclId) -> impl Iterator<Item = &TypeNode> + '_ {
        std::iter::successors(self.type_node(id), |node| {
            node.parent.and_then(|parent| self.type_node(parent))
        })
    }

    /// Every named type mentioned by `id`, its members and nested types.
    pub(crate) fn collect_types(&self, id: TypeDeclId, out: &mut BTreeSet<QualifiedName>) {
        let Some(node) = self.type_node(id) else {
            return;
        };
        node.decl.collect_types(out);
        for field in node.fields.values() {
            self.fields[field.idx()].collect_types(out);
        }
        for ctor in &node.constructors {
            self.constructors[ctor.idx()].collect_types(out);
        }
        for method in node.methods.values() {
            self.methods[method.idx()].collect_types(out);
        }
        for nested in node.nested.values() {
            self.collect_types(*nested, out);
        }
    }
}
