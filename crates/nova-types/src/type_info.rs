//! Input boundary for host-compiler type information.
//!
//! Annotation processors and other generators usually start from the host
//! compiler's reflective view of a type. That view is modeled by the
//! [`TypeInfo`] trait; [`TypeRef::from_type_info`] maps it to a [`TypeRef`]
//! without ever calling back into the host beyond the trait methods.

use nova_core::{Name, PackageName, QualifiedName};

use crate::{InvalidTypeError, PrimitiveType, TypeRef, TypeVariable};

/// Discriminates what a [`TypeInfo`] denotes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeInfoKind {
    /// A class, interface or enum type, possibly with type arguments.
    Declared,
    Array,
    Wildcard,
    TypeVariable,
    Primitive(PrimitiveType),
    Void,
    Null,
    /// Packages, executables, errors and anything else that is not a type.
    NotAType,
}

/// Read-only view of a type as reported by a host compiler.
///
/// Only the accessors relevant to [`TypeInfo::kind`] are consulted; the rest
/// may return empty values.
pub trait TypeInfo {
    fn kind(&self) -> TypeInfoKind;

    /// Human-readable description, used in error messages.
    fn describe(&self) -> String;

    /// Package segments of a declared type (empty for the default package).
    fn package_segments(&self) -> Vec<String> {
        Vec::new()
    }

    /// Simple names of the enclosing types of a declared type, outermost first.
    fn enclosing_names(&self) -> Vec<String> {
        Vec::new()
    }

    /// Simple name of a declared type, or the name of a type variable.
    fn simple_name(&self) -> String {
        String::new()
    }

    /// Type arguments of a declared type (empty if raw or not generic).
    fn type_arguments(&self) -> Vec<&Self> {
        Vec::new()
    }

    /// Component type of an array.
    fn component_type(&self) -> Option<&Self> {
        None
    }

    /// `extends` bound of a wildcard or type variable.
    fn upper_bound(&self) -> Option<&Self> {
        None
    }

    /// `super` bound of a wildcard or type variable.
    fn lower_bound(&self) -> Option<&Self> {
        None
    }
}

impl TypeRef {
    /// Map host type information to a [`TypeRef`].
    ///
    /// This is a pure function of the information exposed by `info`.
    pub fn from_type_info<T: TypeInfo>(info: &T) -> Result<TypeRef, InvalidTypeError> {
        match info.kind() {
            TypeInfoKind::Declared => {
                let name = declared_name(info)?;
                let args = info
                    .type_arguments()
                    .into_iter()
                    .map(|arg| TypeRef::from_type_info(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                if args.is_empty() {
                    Ok(TypeRef::Named(name))
                } else {
                    TypeRef::parameterized(name, args)
                }
            }
            TypeInfoKind::Array => {
                let component = info
                    .component_type()
                    .ok_or_else(|| InvalidTypeError::NotAType(info.describe()))?;
                TypeRef::array_of(TypeRef::from_type_info(component)?)
            }
            TypeInfoKind::Wildcard => match (info.upper_bound(), info.lower_bound()) {
                (None, None) => Ok(TypeRef::wildcard()),
                (Some(upper), None) => TypeRef::wildcard_extends(TypeRef::from_type_info(upper)?),
                (None, Some(lower)) => TypeRef::wildcard_super(TypeRef::from_type_info(lower)?),
                (Some(_), Some(_)) => Err(InvalidTypeError::InvalidBound(info.describe())),
            },
            TypeInfoKind::TypeVariable => {
                let mut var = TypeVariable::new(&info.simple_name())?;
                if let Some(upper) = info.upper_bound() {
                    var = var.with_extends(TypeRef::from_type_info(upper)?)?;
                }
                if let Some(lower) = info.lower_bound() {
                    var = var.with_super(TypeRef::from_type_info(lower)?)?;
                }
                Ok(TypeRef::TypeVariable(var))
            }
            TypeInfoKind::Primitive(kind) => Ok(TypeRef::Primitive(kind)),
            TypeInfoKind::Void => Ok(TypeRef::Void),
            TypeInfoKind::Null => Ok(TypeRef::Null),
            TypeInfoKind::NotAType => Err(InvalidTypeError::NotAType(info.describe())),
        }
    }
}

fn declared_name<T: TypeInfo>(info: &T) -> Result<QualifiedName, InvalidTypeError> {
    let package = info
        .package_segments()
        .iter()
        .map(|s| Name::new(s))
        .collect::<Result<Vec<_>, _>>()?;
    let enclosing = info
        .enclosing_names()
        .iter()
        .map(|s| Name::new(s))
        .collect::<Result<Vec<_>, _>>()?;
    let simple = Name::new(&info.simple_name())?;
    Ok(QualifiedName::new(
        PackageName::from_segments(package),
        enclosing,
        simple,
    ))
}
