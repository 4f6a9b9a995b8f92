use std::borrow::Borrow;
use std::fmt;

use smol_str::SmolStr;

use crate::InvalidReferenceError;

/// A single validated Java identifier (a package segment, a type's simple name,
/// a member name, ...).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(SmolStr);

impl Name {
    /// Validate `text` as a Java identifier.
    pub fn new(text: &str) -> Result<Self, InvalidReferenceError> {
        if text.is_empty() {
            return Err(InvalidReferenceError::EmptyName);
        }
        if !is_java_identifier(text) {
            return Err(InvalidReferenceError::InvalidIdentifier(text.to_string()));
        }
        Ok(Self(SmolStr::new(text)))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Whether the first character is uppercase, the usual convention for type names.
    #[must_use]
    pub fn starts_uppercase(&self) -> bool {
        self.0.chars().next().is_some_and(char::is_uppercase)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for Name {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<&str> for Name {
    type Error = InvalidReferenceError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Name::new(value)
    }
}

impl TryFrom<String> for Name {
    type Error = InvalidReferenceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Name::new(&value)
    }
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Returns `true` if `text` is a legal Java identifier (JLS 3.8).
///
/// `$` and `_` are accepted as identifier characters; the lone `_` and reserved
/// keywords/literals are rejected.
#[must_use]
pub fn is_java_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first == '$' || first == '_' || unicode_ident::is_xid_start(first)) {
        return false;
    }
    if !chars.all(|c| c == '$' || unicode_ident::is_xid_continue(c)) {
        return false;
    }
    !is_java_keyword(text)
}

/// Reserved keywords, the literals `true`/`false`/`null`, and `_`.
#[must_use]
pub fn is_java_keyword(text: &str) -> bool {
    matches!(
        text,
        "_" | "abstract"
            | "assert"
            | "boolean"
            | "break"
            | "byte"
            | "case"
            | "catch"
            | "char"
            | "class"
            | "const"
            | "continue"
            | "default"
            | "do"
            | "double"
            | "else"
            | "enum"
            | "extends"
            | "false"
            | "final"
            | "finally"
            | "float"
            | "for"
            | "goto"
            | "if"
            | "implements"
            | "import"
            | "instanceof"
            | "int"
            | "interface"
            | "long"
            | "native"
            | "new"
            | "null"
            | "package"
            | "private"
            | "protected"
            | "public"
            | "return"
            | "short"
            | "static"
            | "strictfp"
            | "super"
            | "switch"
            | "synchronized"
            | "this"
            | "throw"
            | "throws"
            | "transient"
            | "true"
            | "try"
            | "void"
            | "volatile"
            | "while"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_unicode_and_dollar_identifiers() {
        assert!(Name::new("Größe").is_ok());
        assert!(Name::new("$proxy").is_ok());
        assert!(Name::new("_internal").is_ok());
        assert!(Name::new("Outer$Inner").is_ok());
    }

    #[test]
    fn rejects_keywords_and_garbage() {
        assert_eq!(Name::new(""), Err(InvalidReferenceError::EmptyName));
        assert!(matches!(
            Name::new("class"),
            Err(InvalidReferenceError::InvalidIdentifier(_))
        ));
        assert!(Name::new("_").is_err());
        assert!(Name::new("1abc").is_err());
        assert!(Name::new("a.b").is_err());
        assert!(Name::new("has space").is_err());
    }
}
