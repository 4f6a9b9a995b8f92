//! Java type references as used by generated declarations.
//!
//! [`TypeRef`] is a closed, immutable model of everything that can appear in a
//! typed position of a Java declaration: named and parameterized class types,
//! arrays, wildcards, type variables, primitives, `void` and the null type.
//! Construction validates the Java well-formedness rules that matter for
//! emitting source; once built, every operation is total.

use std::collections::BTreeSet;
use std::fmt;

use nova_core::{InvalidReferenceError, Name, QualifiedName};
use thiserror::Error;

mod type_info;

pub use type_info::{TypeInfo, TypeInfoKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidTypeError {
    #[error(transparent)]
    Name(#[from] InvalidReferenceError),
    #[error("parameterized type `{0}` has no type arguments")]
    EmptyTypeArguments(String),
    #[error("`{0}` cannot be used as a type argument")]
    InvalidTypeArgument(String),
    #[error("`{0}` cannot be an array component type")]
    InvalidArrayComponent(String),
    #[error("`{0}` cannot be used as a bound")]
    InvalidBound(String),
    #[error("element is not a type: {0}")]
    NotAType(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Char,
    Float,
    Double,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 8] = [
        PrimitiveType::Boolean,
        PrimitiveType::Byte,
        PrimitiveType::Short,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Char,
        PrimitiveType::Float,
        PrimitiveType::Double,
    ];

    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Char => "char",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }

    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.keyword() == keyword)
    }

    /// The `java.lang` wrapper class for this primitive.
    #[must_use]
    pub fn boxed(self) -> QualifiedName {
        let simple = match self {
            PrimitiveType::Boolean => "Boolean",
            PrimitiveType::Byte => "Byte",
            PrimitiveType::Short => "Short",
            PrimitiveType::Int => "Integer",
            PrimitiveType::Long => "Long",
            PrimitiveType::Char => "Character",
            PrimitiveType::Float => "Float",
            PrimitiveType::Double => "Double",
        };
        java_lang(simple)
    }
}

fn java_lang(simple: &str) -> QualifiedName {
    match QualifiedName::top_level("java.lang", simple) {
        Ok(name) => name,
        Err(err) => unreachable!("static java.lang name `{simple}` is valid: {err}"),
    }
}

/// A reference to a Java type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeRef {
    Named(QualifiedName),
    Parameterized(ParameterizedType),
    Array(Box<TypeRef>),
    Wildcard(WildcardBound),
    TypeVariable(TypeVariable),
    Primitive(PrimitiveType),
    Void,
    Null,
}

/// `base<args...>`. Always has at least one argument.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParameterizedType {
    base: QualifiedName,
    args: Vec<TypeRef>,
}

impl ParameterizedType {
    pub fn new(base: QualifiedName, args: Vec<TypeRef>) -> Result<Self, InvalidTypeError> {
        if args.is_empty() {
            return Err(InvalidTypeError::EmptyTypeArguments(base.to_dotted()));
        }
        if let Some(bad) = args.iter().find(|arg| !arg.is_reference_type()) {
            return Err(InvalidTypeError::InvalidTypeArgument(bad.to_string()));
        }
        Ok(Self { base, args })
    }

    #[must_use]
    pub fn base(&self) -> &QualifiedName {
        &self.base
    }

    #[must_use]
    pub fn args(&self) -> &[TypeRef] {
        &self.args
    }
}

/// `?`, `? extends T` or `? super T`. At most one bound exists by construction.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WildcardBound {
    Unbounded,
    Extends(Box<TypeRef>),
    Super(Box<TypeRef>),
}

/// A type variable such as `T`, optionally carrying bounds.
///
/// At use sites only the name is printed; in a type parameter declaration the
/// `extends` bound is printed too.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeVariable {
    name: Name,
    extends_bound: Option<Box<TypeRef>>,
    super_bound: Option<Box<TypeRef>>,
}

impl TypeVariable {
    pub fn new(name: &str) -> Result<Self, InvalidTypeError> {
        Ok(Self {
            name: Name::new(name)?,
            extends_bound: None,
            super_bound: None,
        })
    }

    pub fn with_extends(mut self, bound: TypeRef) -> Result<Self, InvalidTypeError> {
        check_bound(&bound)?;
        self.extends_bound = Some(Box::new(bound));
        Ok(self)
    }

    pub fn with_super(mut self, bound: TypeRef) -> Result<Self, InvalidTypeError> {
        check_bound(&bound)?;
        self.super_bound = Some(Box::new(bound));
        Ok(self)
    }

    #[must_use]
    pub fn name(&self) -> &Name {
        &self.name
    }

    #[must_use]
    pub fn extends_bound(&self) -> Option<&TypeRef> {
        self.extends_bound.as_deref()
    }

    #[must_use]
    pub fn super_bound(&self) -> Option<&TypeRef> {
        self.super_bound.as_deref()
    }

    fn collect_named(&self, out: &mut BTreeSet<QualifiedName>) {
        if let Some(bound) = &self.extends_bound {
            bound.collect_named(out);
        }
        if let Some(bound) = &self.super_bound {
            bound.collect_named(out);
        }
    }
}

fn check_bound(bound: &TypeRef) -> Result<(), InvalidTypeError> {
    match bound {
        TypeRef::Named(_)
        | TypeRef::Parameterized(_)
        | TypeRef::Array(_)
        | TypeRef::TypeVariable(_) => Ok(()),
        TypeRef::Wildcard(_) | TypeRef::Primitive(_) | TypeRef::Void | TypeRef::Null => {
            Err(InvalidTypeError::InvalidBound(bound.to_string()))
        }
    }
}

impl TypeRef {
    /// `Named` from a canonical name using [`QualifiedName::best_guess`].
    pub fn named(canonical: &str) -> Result<Self, InvalidTypeError> {
        Ok(TypeRef::Named(QualifiedName::best_guess(canonical)?))
    }

    pub fn parameterized(
        base: QualifiedName,
        args: impl IntoIterator<Item = TypeRef>,
    ) -> Result<Self, InvalidTypeError> {
        Ok(TypeRef::Parameterized(ParameterizedType::new(
            base,
            args.into_iter().collect(),
        )?))
    }

    pub fn array_of(component: TypeRef) -> Result<Self, InvalidTypeError> {
        match component {
            TypeRef::Void | TypeRef::Null | TypeRef::Wildcard(_) => {
                Err(InvalidTypeError::InvalidArrayComponent(component.to_string()))
            }
            other => Ok(TypeRef::Array(Box::new(other))),
        }
    }

    #[must_use]
    pub fn wildcard() -> Self {
        TypeRef::Wildcard(WildcardBound::Unbounded)
    }

    pub fn wildcard_extends(bound: TypeRef) -> Result<Self, InvalidTypeError> {
        check_bound(&bound)?;
        Ok(TypeRef::Wildcard(WildcardBound::Extends(Box::new(bound))))
    }

    pub fn wildcard_super(bound: TypeRef) -> Result<Self, InvalidTypeError> {
        check_bound(&bound)?;
        Ok(TypeRef::Wildcard(WildcardBound::Super(Box::new(bound))))
    }

    pub fn type_variable(name: &str) -> Result<Self, InvalidTypeError> {
        Ok(TypeRef::TypeVariable(TypeVariable::new(name)?))
    }

    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeRef::Primitive(_))
    }

    /// Types that may appear as a type argument or bound: class, array and
    /// type-variable types, plus wildcards.
    #[must_use]
    pub fn is_reference_type(&self) -> bool {
        match self {
            TypeRef::Named(_)
            | TypeRef::Parameterized(_)
            | TypeRef::Array(_)
            | TypeRef::Wildcard(_)
            | TypeRef::TypeVariable(_) => true,
            TypeRef::Primitive(_) | TypeRef::Void | TypeRef::Null => false,
        }
    }

    /// The primitive wrapper for primitives, `self` otherwise.
    #[must_use]
    pub fn boxed(&self) -> TypeRef {
        match self {
            TypeRef::Primitive(p) => TypeRef::Named(p.boxed()),
            TypeRef::Void => TypeRef::Named(java_lang("Void")),
            other => other.clone(),
        }
    }

    /// Every named type reachable from this reference (bases, arguments,
    /// components and bounds).
    #[must_use]
    pub fn referenced_named_types(&self) -> BTreeSet<QualifiedName> {
        let mut out = BTreeSet::new();
        self.collect_named(&mut out);
        out
    }

    /// Accumulating form of [`TypeRef::referenced_named_types`].
    pub fn collect_named(&self, out: &mut BTreeSet<QualifiedName>) {
        match self {
            TypeRef::Named(name) => {
                out.insert(name.clone());
            }
            TypeRef::Parameterized(ty) => {
                out.insert(ty.base.clone());
                for arg in &ty.args {
                    arg.collect_named(out);
                }
            }
            TypeRef::Array(component) => component.collect_named(out),
            TypeRef::Wildcard(bound) => match bound {
                WildcardBound::Unbounded => {}
                WildcardBound::Extends(b) | WildcardBound::Super(b) => b.collect_named(out),
            },
            TypeRef::TypeVariable(var) => var.collect_named(out),
            TypeRef::Primitive(_) | TypeRef::Void | TypeRef::Null => {}
        }
    }
}

impl From<PrimitiveType> for TypeRef {
    fn from(value: PrimitiveType) -> Self {
        TypeRef::Primitive(value)
    }
}

impl From<QualifiedName> for TypeRef {
    fn from(value: QualifiedName) -> Self {
        TypeRef::Named(value)
    }
}

impl From<TypeVariable> for TypeRef {
    fn from(value: TypeVariable) -> Self {
        TypeRef::TypeVariable(value)
    }
}

/// Fully qualified source text, without any import awareness.
impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{name}"),
            TypeRef::Parameterized(ty) => {
                write!(f, "{}<", ty.base)?;
                for (idx, arg) in ty.args.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
            TypeRef::Array(component) => write!(f, "{component}[]"),
            TypeRef::Wildcard(WildcardBound::Unbounded) => f.write_str("?"),
            TypeRef::Wildcard(WildcardBound::Extends(bound)) => write!(f, "? extends {bound}"),
            TypeRef::Wildcard(WildcardBound::Super(bound)) => write!(f, "? super {bound}"),
            TypeRef::TypeVariable(var) => write!(f, "{}", var.name),
            TypeRef::Primitive(p) => f.write_str(p.keyword()),
            TypeRef::Void => f.write_str("void"),
            TypeRef::Null => f.write_str("null"),
        }
    }
}
