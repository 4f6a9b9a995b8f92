//! Build Java declarations programmatically and render them as source text.
//!
//! A [`CompilationUnit`] owns a tree of [`TypeDecl`]s with their fields,
//! methods, constructors and member types. Rendering collects every type the
//! tree mentions, lets [`nova_resolve::ImportResolver`] pick the import lines,
//! and prints each reference in its shortest unambiguous form for the scope it
//! appears in:
//!
//! ```
//! use nova_codegen::{CodeArg, CodeBlock, CompilationUnit, FieldDecl, MethodDecl, Modifier, TypeDecl};
//! use nova_types::TypeRef;
//!
//! let mut unit = CompilationUnit::in_package("com.example").unwrap();
//! let mut greeter = TypeDecl::class("Greeter").unwrap();
//! greeter.add_modifiers([Modifier::Public]).unwrap();
//! let greeter = unit.add_type(greeter).unwrap();
//!
//! let list = TypeRef::named("java.util.List").unwrap();
//! unit.add_field(greeter, FieldDecl::new(list, "names").unwrap()).unwrap();
//!
//! let mut hello = MethodDecl::new("hello").unwrap();
//! hello.set_body(CodeBlock::of("$T.out.println($S);\n", [
//!     CodeArg::from(TypeRef::named("java.lang.System").unwrap()),
//!     CodeArg::string("hi"),
//! ]).unwrap());
//! unit.add_method(greeter, hello).unwrap();
//!
//! assert_eq!(unit.to_source(), "\
//! package com.example;
//!
//! import java.util.List;
//!
//! public class Greeter {
//!     List names;
//!
//!     void hello() {
//!         System.out.println(\"hi\");
//!     }
//! }
//! ");
//! ```

mod annotation;
mod arena;
mod code;
mod decl;
mod error;
mod ids;
mod modifier;
mod render;
mod unit;
mod writable;

pub use annotation::{AnnotationSpec, Annotations};
pub use code::{CodeArg, CodeBlock};
pub use decl::{ConstructorDecl, EnumConstant, FieldDecl, MethodDecl, ParamDecl, TypeDecl, TypeKind};
pub use error::{CodegenError, NameKind};
pub use ids::{ConstructorId, FieldId, MethodId, TypeDeclId};
pub use modifier::{Modifier, Modifiers};
pub use unit::CompilationUnit;
pub use writable::Writable;
