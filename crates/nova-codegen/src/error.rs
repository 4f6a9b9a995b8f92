use std::fmt;

use nova_core::InvalidReferenceError;
use nova_types::InvalidTypeError;
use thiserror::Error;

use crate::decl::TypeKind;
use crate::modifier::Modifier;

/// What kind of declaration a [`CodegenError::DuplicateName`] is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Type,
    Field,
    Method,
    Parameter,
    TypeParameter,
    EnumConstant,
    Annotation,
    AnnotationMember,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NameKind::Type => "type",
            NameKind::Field => "field",
            NameKind::Method => "method",
            NameKind::Parameter => "parameter",
            NameKind::TypeParameter => "type parameter",
            NameKind::EnumConstant => "enum constant",
            NameKind::Annotation => "annotation",
            NameKind::AnnotationMember => "annotation member",
        })
    }
}

/// Errors raised while building a declaration tree.
///
/// Rendering never produces these: once a tree is built it always renders,
/// and the only rendering failure is the sink's own [`fmt::Error`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    #[error("duplicate {kind} `{name}`")]
    DuplicateName { kind: NameKind, name: String },
    #[error(transparent)]
    InvalidReference(#[from] InvalidTypeError),
    #[error("enum `{name}` must declare at least one constant")]
    EmptyEnum { name: String },
    #[error("import of `{import}` conflicts with `{existing}`")]
    ConflictingImport { import: String, existing: String },
    #[error("conflicting modifiers `{first}` and `{second}`")]
    ConflictingModifiers { first: Modifier, second: Modifier },
    #[error("{member} is not allowed in {kind} `{owner}`")]
    UnsupportedMember {
        owner: String,
        kind: TypeKind,
        member: &'static str,
    },
    #[error("varargs method `{0}` must end with an array parameter")]
    InvalidVarargs(String),
    #[error("invalid format string {format:?}: {reason}")]
    InvalidFormat { format: String, reason: String },
    #[error("{0} does not belong to this compilation unit")]
    UnknownDeclaration(String),
}

impl From<InvalidReferenceError> for CodegenError {
    fn from(err: InvalidReferenceError) -> Self {
        CodegenError::InvalidReference(InvalidTypeError::Name(err))
    }
}

impl CodegenError {
    pub(crate) fn duplicate(kind: NameKind, name: impl fmt::Display) -> Self {
        CodegenError::DuplicateName {
            kind,
            name: name.to_string(),
        }
    }
}
