use std::collections::BTreeSet;
use std::fmt::{self, Write as _};

use nova_core::{Name, QualifiedName};
use nova_format::CodeWriter;
use nova_resolve::RenderingContext;
use nova_types::TypeRef;

use crate::{CodegenError, Writable};

/// An argument consumed by one placeholder of a [`CodeBlock`] format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeArg {
    /// Emitted verbatim by `$L`; quoted by `$S`; checked as an identifier by `$N`.
    Literal(String),
    /// A string value for `$S`. `None` prints `null`.
    Str(Option<String>),
    Name(Name),
    Type(TypeRef),
    Code(CodeBlock),
}

impl CodeArg {
    pub fn literal(value: impl fmt::Display) -> Self {
        CodeArg::Literal(value.to_string())
    }

    pub fn string(value: impl Into<String>) -> Self {
        CodeArg::Str(Some(value.into()))
    }

    #[must_use]
    pub fn null_string() -> Self {
        CodeArg::Str(None)
    }

    fn describe(&self) -> &'static str {
        match self {
            CodeArg::Literal(_) => "literal",
            CodeArg::Str(_) => "string",
            CodeArg::Name(_) => "name",
            CodeArg::Type(_) => "type",
            CodeArg::Code(_) => "code block",
        }
    }
}

impl From<&str> for CodeArg {
    fn from(value: &str) -> Self {
        CodeArg::Literal(value.to_owned())
    }
}

impl From<String> for CodeArg {
    fn from(value: String) -> Self {
        CodeArg::Literal(value)
    }
}

impl From<i32> for CodeArg {
    fn from(value: i32) -> Self {
        CodeArg::literal(value)
    }
}

impl From<i64> for CodeArg {
    fn from(value: i64) -> Self {
        CodeArg::literal(value)
    }
}

impl From<bool> for CodeArg {
    fn from(value: bool) -> Self {
        CodeArg::literal(value)
    }
}

impl From<Name> for CodeArg {
    fn from(value: Name) -> Self {
        CodeArg::Name(value)
    }
}

impl From<TypeRef> for CodeArg {
    fn from(value: TypeRef) -> Self {
        CodeArg::Type(value)
    }
}

impl From<QualifiedName> for CodeArg {
    fn from(value: QualifiedName) -> Self {
        CodeArg::Type(TypeRef::Named(value))
    }
}

impl From<CodeBlock> for CodeArg {
    fn from(value: CodeBlock) -> Self {
        CodeArg::Code(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CodePart {
    Text(String),
    Type(TypeRef),
    Indent,
    Unindent,
}

/// A fragment of Java code with embedded type references.
///
/// Built from format strings:
///
/// | placeholder | argument                     | output                              |
/// |-------------|------------------------------|-------------------------------------|
/// | `$L`        | anything but a type          | the value as is                     |
/// | `$S`        | string or literal            | a quoted, escaped string (`null` for none) |
/// | `$N`        | name, or literal identifier  | the name                            |
/// | `$T`        | type                         | the shortest text for the type      |
/// | `$$`        | -                            | `$`                                 |
/// | `$>` `$<`   | -                            | indent / unindent following lines   |
///
/// Types are kept structured so that they take part in import resolution and
/// print according to the scope the block is rendered in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeBlock {
    parts: Vec<CodePart>,
}

impl CodeBlock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of(format: &str, args: impl IntoIterator<Item = CodeArg>) -> Result<Self, CodegenError> {
        let mut block = Self::new();
        block.add(format, args)?;
        Ok(block)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn add(
        &mut self,
        format: &str,
        args: impl IntoIterator<Item = CodeArg>,
    ) -> Result<&mut Self, CodegenError> {
        let mut parts = Vec::new();
        parse_format(format, args.into_iter().collect(), &mut parts)?;
        for part in parts {
            self.push(part);
        }
        Ok(self)
    }

    /// `format` followed by `;` and a newline.
    pub fn add_statement(
        &mut self,
        format: &str,
        args: impl IntoIterator<Item = CodeArg>,
    ) -> Result<&mut Self, CodegenError> {
        self.add(format, args)?;
        self.push_text(";\n");
        Ok(self)
    }

    /// `if (...) {`, `for (...) {`, ... and indent.
    pub fn begin_control_flow(
        &mut self,
        format: &str,
        args: impl IntoIterator<Item = CodeArg>,
    ) -> Result<&mut Self, CodegenError> {
        self.add(format, args)?;
        self.push_text(" {\n");
        self.push(CodePart::Indent);
        Ok(self)
    }

    /// `} else if (...) {`, `} catch (...) {`, ...
    pub fn next_control_flow(
        &mut self,
        format: &str,
        args: impl IntoIterator<Item = CodeArg>,
    ) -> Result<&mut Self, CodegenError> {
        self.push(CodePart::Unindent);
        self.push_text("} ");
        self.add(format, args)?;
        self.push_text(" {\n");
        self.push(CodePart::Indent);
        Ok(self)
    }

    pub fn end_control_flow(&mut self) -> &mut Self {
        self.push(CodePart::Unindent);
        self.push_text("}\n");
        self
    }

    /// Closes a block with a trailing clause, as in `} while (...);`.
    pub fn end_control_flow_with(
        &mut self,
        format: &str,
        args: impl IntoIterator<Item = CodeArg>,
    ) -> Result<&mut Self, CodegenError> {
        self.push(CodePart::Unindent);
        self.push_text("} ");
        self.add(format, args)?;
        self.push_text(";\n");
        Ok(self)
    }

    pub fn add_code(&mut self, other: &CodeBlock) -> &mut Self {
        for part in &other.parts {
            self.push(part.clone());
        }
        self
    }

    fn push_text(&mut self, text: &str) {
        self.push(CodePart::Text(text.to_owned()));
    }

    fn push(&mut self, part: CodePart) {
        if let CodePart::Text(text) = &part {
            if text.is_empty() {
                return;
            }
            if let Some(CodePart::Text(last)) = self.parts.last_mut() {
                last.push_str(text);
                return;
            }
        }
        self.parts.push(part);
    }
}

fn parse_format(
    format: &str,
    args: Vec<CodeArg>,
    parts: &mut Vec<CodePart>,
) -> Result<(), CodegenError> {
    let invalid = |reason: String| CodegenError::InvalidFormat {
        format: format.to_owned(),
        reason,
    };

    let arg_count = args.len();
    let mut args = args.into_iter();
    let mut text = String::new();
    let mut chars = format.chars();
    while let Some(c) = chars.next() {
        if c != '$' {
            text.push(c);
            continue;
        }
        let Some(placeholder) = chars.next() else {
            return Err(invalid("dangling `$` at end of format".to_owned()));
        };
        match placeholder {
            '$' => text.push('$'),
            '>' | '<' => {
                flush(&mut text, parts);
                parts.push(if placeholder == '>' {
                    CodePart::Indent
                } else {
                    CodePart::Unindent
                });
            }
            'L' | 'S' | 'N' | 'T' => {
                let Some(arg) = args.next() else {
                    return Err(invalid(format!(
                        "`${placeholder}` has no matching argument ({arg_count} given)"
                    )));
                };
                match (placeholder, arg) {
                    ('L', CodeArg::Literal(value)) => text.push_str(&value),
                    ('L', CodeArg::Name(name)) => text.push_str(name.as_str()),
                    ('L', CodeArg::Str(value)) => text.push_str(value.as_deref().unwrap_or("null")),
                    ('L', CodeArg::Code(code)) => {
                        flush(&mut text, parts);
                        parts.extend(code.parts);
                    }
                    ('S', CodeArg::Str(value)) => match value {
                        Some(value) => write_string_literal(&value, &mut text),
                        None => text.push_str("null"),
                    },
                    ('S', CodeArg::Literal(value)) => write_string_literal(&value, &mut text),
                    ('N', CodeArg::Name(name)) => text.push_str(name.as_str()),
                    ('N', CodeArg::Literal(value)) => text.push_str(Name::new(&value)?.as_str()),
                    ('T', CodeArg::Type(ty)) => {
                        flush(&mut text, parts);
                        parts.push(CodePart::Type(ty));
                    }
                    (placeholder, arg) => {
                        return Err(invalid(format!(
                            "`${placeholder}` cannot take a {} argument",
                            arg.describe()
                        )))
                    }
                }
            }
            other => return Err(invalid(format!("unknown placeholder `${other}`"))),
        }
    }
    flush(&mut text, parts);

    let unused = args.count();
    if unused > 0 {
        return Err(invalid(format!("{unused} unused argument(s)")));
    }
    Ok(())
}

fn flush(text: &mut String, parts: &mut Vec<CodePart>) {
    if !text.is_empty() {
        parts.push(CodePart::Text(std::mem::take(text)));
    }
}

/// Append `value` as a Java string literal, quotes included.
pub(crate) fn write_string_literal(value: &str, out: &mut String) {
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

impl Writable for CodeBlock {
    fn collect_types(&self, out: &mut BTreeSet<QualifiedName>) {
        for part in &self.parts {
            if let CodePart::Type(ty) = part {
                ty.collect_named(out);
            }
        }
    }

    fn write_to(&self, ctx: &RenderingContext, out: &mut CodeWriter<'_>) -> fmt::Result {
        for part in &self.parts {
            match part {
                CodePart::Text(text) => out.write_str(text)?,
                CodePart::Type(ty) => ctx.write_type(ty, &mut *out)?,
                CodePart::Indent => out.indent(),
                CodePart::Unindent => out.unindent(),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nova_core::PackageName;
    use pretty_assertions::assert_eq;

    fn render(block: &CodeBlock) -> String {
        block.render_in(&RenderingContext::new(PackageName::default_package()))
    }

    #[test]
    fn placeholders_expand() {
        let list = TypeRef::named("java.util.List").unwrap();
        let block = CodeBlock::of(
            "$T $N = $L; // $S costs $$1",
            [
                CodeArg::from(list),
                CodeArg::from("items"),
                CodeArg::from("null"),
                CodeArg::string("a \"quoted\"\n"),
            ],
        )
        .unwrap();
        assert_eq!(
            render(&block),
            r#"java.util.List items = null; // "a \"quoted\"\n" costs $1"#
        );
    }

    #[test]
    fn control_flow_indents() {
        let mut block = CodeBlock::new();
        block
            .begin_control_flow("if (x > $L)", [CodeArg::from(0)])
            .unwrap()
            .add_statement("return $S", [CodeArg::null_string()])
            .unwrap()
            .next_control_flow("else", [])
            .unwrap()
            .add_statement("x++", [])
            .unwrap()
            .end_control_flow();
        assert_eq!(
            render(&block),
            "if (x > 0) {\n    return null;\n} else {\n    x++;\n}\n"
        );
    }

    #[test]
    fn rejects_malformed_formats() {
        for (format, args) in [
            ("$T", vec![]),
            ("$L", vec![CodeArg::from(1), CodeArg::from(2)]),
            ("$Q", vec![]),
            ("trailing $", vec![]),
            ("$T", vec![CodeArg::from("java.util.List")]),
        ] {
            assert!(
                matches!(
                    CodeBlock::of(format, args),
                    Err(CodegenError::InvalidFormat { .. })
                ),
                "{format}"
            );
        }
        assert!(matches!(
            CodeBlock::of("$N", [CodeArg::from("class")]),
            Err(CodegenError::InvalidReference(_))
        ));
    }

    #[test]
    fn nested_blocks_keep_their_types() {
        let inner = CodeBlock::of("new $T()", [CodeArg::from(TypeRef::named("a.Foo").unwrap())]).unwrap();
        let outer = CodeBlock::of("return $L", [CodeArg::from(inner)]).unwrap();
        let names: Vec<String> = outer
            .referenced_named_types()
            .iter()
            .map(QualifiedName::to_dotted)
            .collect();
        assert_eq!(names, vec!["a.Foo"]);
    }
}
