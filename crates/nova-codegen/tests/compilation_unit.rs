use insta::assert_snapshot;
use nova_codegen::{
    AnnotationSpec, CodeArg, CodeBlock, CodegenError, CompilationUnit, ConstructorDecl,
    EnumConstant, FieldDecl, MethodDecl, Modifier, NameKind, ParamDecl, TypeDecl,
};
use nova_core::QualifiedName;
use nova_format::{FormatConfig, IndentStyle, NewlineStyle};
use nova_resolve::ImportConfig;
use nova_types::{PrimitiveType, TypeRef, TypeVariable};
use pretty_assertions::assert_eq;

fn qn(canonical: &str) -> QualifiedName {
    QualifiedName::best_guess(canonical).unwrap()
}

fn named(canonical: &str) -> TypeRef {
    TypeRef::named(canonical).unwrap()
}

fn code(format: &str, args: impl IntoIterator<Item = CodeArg>) -> CodeBlock {
    CodeBlock::of(format, args).unwrap()
}

fn render(unit: &CompilationUnit, imports: &ImportConfig) -> String {
    let mut out = String::new();
    unit.render_with(&mut out, &FormatConfig::default(), imports)
        .unwrap();
    out
}

#[test]
fn implicit_package_and_repeated_reference_share_one_import() {
    let mut unit = CompilationUnit::in_package("p").unwrap();
    let widget = unit.add_type(TypeDecl::class("Widget").unwrap()).unwrap();
    let gadgets = TypeRef::parameterized(qn("lib.List"), [named("p.other.Gadget")]).unwrap();

    unit.add_field(widget, FieldDecl::new(gadgets.clone(), "parts").unwrap())
        .unwrap();
    let mut method = MethodDecl::new("gadgets").unwrap();
    method
        .set_return_type(gadgets.clone())
        .add_parameter(ParamDecl::new(gadgets, "input").unwrap())
        .unwrap()
        .set_body(code("return input;\n", []));
    unit.add_method(widget, method).unwrap();

    let imports = ImportConfig {
        implicit_packages: vec!["java.lang".to_owned(), "lib".to_owned()],
    };
    assert_snapshot!(render(&unit, &imports), @r###"
package p;

import p.other.Gadget;

class Widget {
    List<Gadget> parts;

    List<Gadget> gadgets(List<Gadget> input) {
        return input;
    }
}
"###);
}

#[test]
fn colliding_simple_names_keep_the_loser_qualified() {
    let mut unit = CompilationUnit::in_package("p").unwrap();
    let shipment = unit.add_type(TypeDecl::class("Shipment").unwrap()).unwrap();
    unit.add_field(shipment, FieldDecl::new(named("a.Box"), "first").unwrap())
        .unwrap();
    unit.add_field(shipment, FieldDecl::new(named("b.Box"), "second").unwrap())
        .unwrap();
    let mut swap = MethodDecl::new("swap").unwrap();
    swap.set_return_type(named("b.Box"))
        .add_parameter(ParamDecl::new(named("a.Box"), "input").unwrap())
        .unwrap();
    unit.add_method(shipment, swap).unwrap();

    assert_snapshot!(unit.to_source(), @r###"
package p;

import a.Box;

class Shipment {
    Box first;
    b.Box second;

    b.Box swap(Box input) {
    }
}
"###);
}

#[test]
fn enum_without_constants_is_rejected_on_insertion() {
    let mut unit = CompilationUnit::in_package("p").unwrap();
    assert_eq!(
        unit.add_type(TypeDecl::enumeration("Nothing").unwrap()),
        Err(CodegenError::EmptyEnum {
            name: "Nothing".to_owned()
        })
    );

    let outer = unit.add_type(TypeDecl::class("Outer").unwrap()).unwrap();
    assert!(matches!(
        unit.add_nested_type(outer, TypeDecl::enumeration("Inner").unwrap()),
        Err(CodegenError::EmptyEnum { .. })
    ));
    assert_eq!(unit.nested_types(outer).count(), 0);
}

#[test]
fn renders_every_kind_of_member() {
    let mut unit = CompilationUnit::in_package("com.example.shapes").unwrap();
    unit.set_file_comment("Generated code. Do not edit.");

    let mut shape = TypeDecl::interface("Shape").unwrap();
    shape
        .add_modifiers([Modifier::Public])
        .unwrap()
        .add_type_parameter(
            TypeVariable::new("T")
                .unwrap()
                .with_extends(named("java.lang.Number"))
                .unwrap(),
        )
        .unwrap();
    let shape = unit.add_type(shape).unwrap();
    let mut area = MethodDecl::new("area").unwrap();
    area.set_return_type(TypeRef::type_variable("T").unwrap());
    unit.add_method(shape, area).unwrap();
    let mut describe = MethodDecl::new("describe").unwrap();
    describe
        .add_modifiers([Modifier::Default])
        .unwrap()
        .set_return_type(named("java.lang.String"))
        .set_body(code("return $S + area();\n", [CodeArg::string("area=")]));
    unit.add_method(shape, describe).unwrap();

    let mut color = TypeDecl::enumeration("Color").unwrap();
    color
        .add_enum_constant(EnumConstant::new("RED").unwrap().with_args(code("$S", [CodeArg::string("#f00")])))
        .unwrap()
        .add_enum_constant(EnumConstant::new("GREEN").unwrap().with_args(code("$S", [CodeArg::string("#0f0")])))
        .unwrap();
    let color = unit.add_type(color).unwrap();
    let mut hex = FieldDecl::new(named("java.lang.String"), "hex").unwrap();
    hex.add_modifiers([Modifier::Private, Modifier::Final]).unwrap();
    unit.add_field(color, hex).unwrap();
    let mut ctor = ConstructorDecl::new();
    ctor.add_parameter(ParamDecl::new(named("java.lang.String"), "hex").unwrap())
        .unwrap()
        .set_body(code("this.hex = hex;\n", []));
    unit.add_constructor(color, ctor).unwrap();

    let mut circle = TypeDecl::class("Circle").unwrap();
    circle
        .set_javadoc(code("A circle.\n", []))
        .annotate_with(AnnotationSpec::new(qn("java.lang.Deprecated")))
        .unwrap()
        .add_modifiers([Modifier::Final, Modifier::Public])
        .unwrap()
        .add_interface(TypeRef::parameterized(qn("com.example.shapes.Shape"), [named("java.lang.Double")]).unwrap())
        .set_static_block(code(
            "$T.out.println($S);\n",
            [CodeArg::from(named("java.lang.System")), CodeArg::string("loaded")],
        ))
        .unwrap();
    let circle = unit.add_type(circle).unwrap();

    let mut pi = FieldDecl::new(PrimitiveType::Double, "PI").unwrap();
    pi.add_modifiers([Modifier::Private, Modifier::Static, Modifier::Final])
        .unwrap()
        .set_initializer(code("3.14", []));
    unit.add_field(circle, pi).unwrap();

    let mut ctor = ConstructorDecl::new();
    ctor.add_modifiers([Modifier::Public]).unwrap();
    unit.add_constructor(circle, ctor).unwrap();

    let mut area = MethodDecl::new("area").unwrap();
    area.annotate_with(AnnotationSpec::new(qn("java.lang.Override")))
        .unwrap()
        .add_modifiers([Modifier::Public])
        .unwrap()
        .set_return_type(named("java.lang.Double"))
        .set_body(code("return PI;\n", []));
    unit.add_method(circle, area).unwrap();

    let element = TypeRef::type_variable("E").unwrap();
    let mut collect = MethodDecl::new("collect").unwrap();
    collect
        .add_modifiers([Modifier::Public, Modifier::Static])
        .unwrap()
        .add_type_parameter(TypeVariable::new("E").unwrap())
        .unwrap()
        .set_return_type(TypeRef::parameterized(qn("java.util.List"), [element.clone()]).unwrap())
        .add_parameter(ParamDecl::new(TypeRef::array_of(element).unwrap(), "items").unwrap())
        .unwrap()
        .set_varargs(true)
        .unwrap()
        .set_body(code("return $T.of(items);\n", [CodeArg::from(qn("java.util.List"))]));
    unit.add_method(circle, collect).unwrap();

    assert_snapshot!(unit.to_source(), @r###"
// Generated code. Do not edit.
package com.example.shapes;

import java.util.List;

public interface Shape<T extends Number> {
    T area();

    default String describe() {
        return "area=" + area();
    }
}

enum Color {
    RED("#f00"),
    GREEN("#0f0");

    private final String hex;

    Color(String hex) {
        this.hex = hex;
    }
}

/**
 * A circle.
 */
@Deprecated
public final class Circle implements Shape<Double> {
    private static final double PI = 3.14;

    static {
        System.out.println("loaded");
    }

    public Circle() {
    }

    @Override
    public Double area() {
        return PI;
    }

    public static <E> List<E> collect(E... items) {
        return List.of(items);
    }
}
"###);
}

#[test]
fn enum_without_other_members_has_no_semicolon() {
    let mut unit = CompilationUnit::in_package("").unwrap();
    let mut level = TypeDecl::enumeration("Level").unwrap();
    level
        .add_enum_constant(EnumConstant::new("LOW").unwrap())
        .unwrap()
        .add_enum_constant(
            EnumConstant::new("HIGH")
                .unwrap()
                .with_javadoc(code("Loud.\n", [])),
        )
        .unwrap();
    unit.add_type(level).unwrap();

    assert_snapshot!(unit.to_source(), @r###"
enum Level {
    LOW,
    /**
     * Loud.
     */
    HIGH
}
"###);
}

#[test]
fn javadoc_and_annotation_values_take_part_in_imports() {
    let mut unit = CompilationUnit::in_package("p").unwrap();
    let mut service = TypeDecl::class("Service").unwrap();
    service.set_javadoc(code("Backed by a {@link $T}.\n", [CodeArg::from(qn("java.util.concurrent.ConcurrentMap"))]));
    let mut route = AnnotationSpec::new(qn("web.Route"));
    route
        .add_member("value", code("$S", [CodeArg::string("/svc")]))
        .unwrap()
        .add_member("handler", code("$T.class", [CodeArg::from(qn("web.handlers.Default"))]))
        .unwrap();
    service.annotate_with(route).unwrap();
    unit.add_type(service).unwrap();

    assert_snapshot!(unit.to_source(), @r###"
package p;

import java.util.concurrent.ConcurrentMap;
import web.Route;
import web.handlers.Default;

/**
 * Backed by a {@link ConcurrentMap}.
 */
@Route(value = "/svc", handler = Default.class)
class Service {
}
"###);
}

#[test]
fn explicit_imports_are_emitted_and_checked() {
    let mut unit = CompilationUnit::in_package("p").unwrap();
    unit.add_import(qn("java.util.Objects")).unwrap();
    unit.add_import(qn("java.util.Objects")).unwrap();
    unit.add_type(TypeDecl::class("Widget").unwrap()).unwrap();

    assert_eq!(
        unit.add_import(qn("q.Widget")).map(|_| ()),
        Err(CodegenError::ConflictingImport {
            import: "q.Widget".to_owned(),
            existing: "p.Widget".to_owned(),
        })
    );
    assert!(matches!(
        unit.add_import(qn("com.google.common.base.Objects")),
        Err(CodegenError::ConflictingImport { .. })
    ));

    unit.add_import(qn("q.Gadget")).unwrap();
    assert_eq!(
        unit.add_type(TypeDecl::class("Gadget").unwrap()),
        Err(CodegenError::ConflictingImport {
            import: "q.Gadget".to_owned(),
            existing: "p.Gadget".to_owned(),
        })
    );

    assert_eq!(
        unit.to_source(),
        "package p;\n\nimport java.util.Objects;\nimport q.Gadget;\n\nclass Widget {\n}\n"
    );
}

#[test]
fn explicit_import_conflicts_with_referenced_package_sibling() {
    let mut unit = CompilationUnit::in_package("p").unwrap();
    let widget = unit.add_type(TypeDecl::class("Widget").unwrap()).unwrap();

    unit.add_import(qn("q.Foo")).unwrap();
    assert_eq!(
        unit.add_field(widget, FieldDecl::new(named("p.Foo"), "foo").unwrap()),
        Err(CodegenError::ConflictingImport {
            import: "q.Foo".to_owned(),
            existing: "p.Foo".to_owned(),
        })
    );
    let mut nested = MethodDecl::new("entry").unwrap();
    nested.set_return_type(named("p.Foo.Entry"));
    assert!(matches!(
        unit.add_method(widget, nested),
        Err(CodegenError::ConflictingImport { .. })
    ));
    unit.add_field(widget, FieldDecl::new(named("q.Foo"), "imported").unwrap())
        .unwrap();

    unit.add_field(widget, FieldDecl::new(named("p.Bar"), "bar").unwrap())
        .unwrap();
    assert_eq!(
        unit.add_import(qn("q.Bar")).map(|_| ()),
        Err(CodegenError::ConflictingImport {
            import: "q.Bar".to_owned(),
            existing: "p.Bar".to_owned(),
        })
    );

    assert_eq!(
        unit.to_source(),
        "package p;\n\nimport q.Foo;\n\nclass Widget {\n    Foo imported;\n    Bar bar;\n}\n"
    );
}

#[test]
fn duplicate_names_are_rejected_per_container() {
    let mut unit = CompilationUnit::in_package("p").unwrap();
    let outer = unit.add_type(TypeDecl::class("Outer").unwrap()).unwrap();
    assert!(matches!(
        unit.add_type(TypeDecl::interface("Outer").unwrap()),
        Err(CodegenError::DuplicateName {
            kind: NameKind::Type,
            ..
        })
    ));

    let int = TypeRef::Primitive(PrimitiveType::Int);
    unit.add_field(outer, FieldDecl::new(int.clone(), "size").unwrap())
        .unwrap();
    assert!(matches!(
        unit.add_field(outer, FieldDecl::new(int, "size").unwrap()),
        Err(CodegenError::DuplicateName {
            kind: NameKind::Field,
            ..
        })
    ));

    unit.add_method(outer, MethodDecl::new("run").unwrap()).unwrap();
    assert!(matches!(
        unit.add_method(outer, MethodDecl::new("run").unwrap()),
        Err(CodegenError::DuplicateName {
            kind: NameKind::Method,
            ..
        })
    ));

    let middle = unit
        .add_nested_type(outer, TypeDecl::class("Middle").unwrap())
        .unwrap();
    assert!(unit
        .add_nested_type(outer, TypeDecl::class("Middle").unwrap())
        .is_err());
    // A member type may not share a name with any enclosing type.
    assert!(unit
        .add_nested_type(middle, TypeDecl::class("Outer").unwrap())
        .is_err());
    assert!(unit
        .add_nested_type(middle, TypeDecl::class("Middle").unwrap())
        .is_err());

    let inner = unit
        .add_nested_type(middle, TypeDecl::class("Inner").unwrap())
        .unwrap();
    assert_eq!(unit.qualified_name(inner), Some(&qn("p.Outer.Middle.Inner")));
}

#[test]
fn constructors_are_not_allowed_in_interfaces() {
    let mut unit = CompilationUnit::in_package("p").unwrap();
    let api = unit.add_type(TypeDecl::interface("Api").unwrap()).unwrap();
    assert!(matches!(
        unit.add_constructor(api, ConstructorDecl::new()),
        Err(CodegenError::UnsupportedMember { .. })
    ));
}

#[test]
fn handles_allow_refinement_after_insertion() {
    let mut unit = CompilationUnit::in_package("p").unwrap();
    let widget = unit.add_type(TypeDecl::class("Widget").unwrap()).unwrap();
    let run = unit.add_method(widget, MethodDecl::new("run").unwrap()).unwrap();
    let count = unit
        .add_field(widget, FieldDecl::new(PrimitiveType::Long, "count").unwrap())
        .unwrap();

    unit.method_mut(run)
        .unwrap()
        .add_exception(named("java.io.IOException"))
        .set_body(code("count++;\n", []));
    unit.field_mut(count)
        .unwrap()
        .add_modifiers([Modifier::Private])
        .unwrap();
    unit.type_decl_mut(widget)
        .unwrap()
        .add_modifiers([Modifier::Public])
        .unwrap();

    assert_snapshot!(unit.to_source(), @r###"
package p;

import java.io.IOException;

public class Widget {
    private long count;

    void run() throws IOException {
        count++;
    }
}
"###);

    let mut other = CompilationUnit::in_package("q").unwrap();
    assert!(matches!(
        other.add_field(widget, FieldDecl::new(PrimitiveType::Int, "x").unwrap()),
        Err(CodegenError::UnknownDeclaration(_))
    ));
}

#[test]
fn layout_follows_format_config() {
    let mut unit = CompilationUnit::in_package("p").unwrap();
    let widget = unit.add_type(TypeDecl::class("Widget").unwrap()).unwrap();
    let mut run = MethodDecl::new("run").unwrap();
    run.set_body(code("return;\n", []));
    unit.add_method(widget, run).unwrap();

    let config = FormatConfig {
        indent_width: 2,
        indent_style: IndentStyle::Tabs,
        newline: NewlineStyle::CrLf,
    };
    let mut out = String::new();
    unit.render_with(&mut out, &config, &ImportConfig::default())
        .unwrap();
    assert_eq!(
        out,
        "package p;\r\n\r\nclass Widget {\r\n\tvoid run() {\r\n\t\treturn;\r\n\t}\r\n}\r\n"
    );
}

#[test]
fn javadoc_indentation_follows_format_config() {
    let mut unit = CompilationUnit::in_package("p").unwrap();
    let mut widget = TypeDecl::class("Widget").unwrap();
    widget.set_javadoc(code("Usage:\n$>new Widget();\n$<Done.\n", []));
    unit.add_type(widget).unwrap();

    let config = FormatConfig {
        indent_style: IndentStyle::Tabs,
        ..FormatConfig::default()
    };
    let mut out = String::new();
    unit.render_with(&mut out, &config, &ImportConfig::default())
        .unwrap();
    assert_eq!(
        out,
        "package p;\n\n/**\n * Usage:\n * \tnew Widget();\n * Done.\n */\nclass Widget {\n}\n"
    );
}

#[test]
fn rendering_is_idempotent() {
    let mut unit = CompilationUnit::in_package("p").unwrap();
    let widget = unit.add_type(TypeDecl::class("Widget").unwrap()).unwrap();
    unit.add_field(widget, FieldDecl::new(named("a.Box"), "a").unwrap())
        .unwrap();
    unit.add_field(widget, FieldDecl::new(named("b.Box"), "b").unwrap())
        .unwrap();

    let first = unit.to_source();
    assert_eq!(unit.to_source(), first);
    assert_eq!(unit.to_string(), first);
}

#[test]
fn units_can_be_shared_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CompilationUnit>();
    assert_send_sync::<nova_resolve::RenderingContext>();
}
