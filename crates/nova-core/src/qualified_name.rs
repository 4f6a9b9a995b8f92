use std::cmp::Ordering;
use std::fmt;

use crate::{InvalidReferenceError, Name};

/// A (possibly empty) dotted package path. The empty path is the default package.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct PackageName {
    segments: Vec<Name>,
}

impl PackageName {
    /// The unnamed (default) package.
    #[must_use]
    pub fn default_package() -> Self {
        Self::default()
    }

    /// Parse `java.util`-style text. The empty string is the default package.
    pub fn from_dotted(text: &str) -> Result<Self, InvalidReferenceError> {
        if text.is_empty() {
            return Ok(Self::default());
        }
        let segments = split_segments(text)?;
        Ok(Self { segments })
    }

    #[must_use]
    pub fn from_segments(segments: Vec<Name>) -> Self {
        Self { segments }
    }

    #[must_use]
    pub fn segments(&self) -> &[Name] {
        &self.segments
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        self.segments.is_empty()
    }

    #[must_use]
    pub fn to_dotted(&self) -> String {
        join_dotted(self.segments.iter())
    }
}

impl Ord for PackageName {
    fn cmp(&self, other: &Self) -> Ordering {
        dotted_chars(self.segments.iter()).cmp(dotted_chars(other.segments.iter()))
    }
}

impl PartialOrd for PackageName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PackageName({})", self.to_dotted())
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_dotted())
    }
}

/// The fully qualified name of a (possibly nested) type.
///
/// The name is an ordered chain: the package path, the simple names of all
/// enclosing types from the outermost inward, and the type's own simple name.
/// `java.util.Map.Entry` is package `java.util`, enclosing `[Map]`, simple
/// name `Entry`.
///
/// Equality is structural. Ordering is the canonical order, see [`canonical_cmp`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    package: PackageName,
    enclosing: Vec<Name>,
    simple: Name,
}

impl QualifiedName {
    #[must_use]
    pub fn new(package: PackageName, enclosing: Vec<Name>, simple: Name) -> Self {
        Self {
            package,
            enclosing,
            simple,
        }
    }

    /// A top-level type `simple` in `package` (dotted, may be empty).
    pub fn top_level(package: &str, simple: &str) -> Result<Self, InvalidReferenceError> {
        Ok(Self::new(
            PackageName::from_dotted(package)?,
            Vec::new(),
            Name::new(simple)?,
        ))
    }

    /// A type in `package` whose dotted type path is `type_path`, e.g.
    /// `("java.util", "Map.Entry")`.
    pub fn from_dotted(package: &str, type_path: &str) -> Result<Self, InvalidReferenceError> {
        if type_path.is_empty() {
            return Err(InvalidReferenceError::EmptyName);
        }
        let mut names = split_segments(type_path)?;
        let simple = names
            .pop()
            .ok_or_else(|| InvalidReferenceError::EmptySegment(type_path.to_string()))?;
        Ok(Self::new(PackageName::from_dotted(package)?, names, simple))
    }

    /// Split a canonical name using the usual naming convention: package
    /// segments start lowercase, the first segment starting with an uppercase
    /// letter is the outermost type.
    ///
    /// `java.util.Map.Entry` becomes package `java.util`, types `Map.Entry`.
    pub fn best_guess(canonical: &str) -> Result<Self, InvalidReferenceError> {
        if canonical.is_empty() {
            return Err(InvalidReferenceError::EmptyName);
        }
        let segments = split_segments(canonical)?;
        let Some(first_type) = segments.iter().position(Name::starts_uppercase) else {
            return Err(InvalidReferenceError::MissingTypeSegment(
                canonical.to_string(),
            ));
        };

        let mut segments = segments;
        let mut types = segments.split_off(first_type);
        let simple = match types.pop() {
            Some(simple) => simple,
            None => {
                return Err(InvalidReferenceError::MissingTypeSegment(
                    canonical.to_string(),
                ))
            }
        };
        Ok(Self::new(PackageName::from_segments(segments), types, simple))
    }

    /// The member type `simple` declared inside `self`.
    #[must_use]
    pub fn nested(&self, simple: Name) -> Self {
        let mut enclosing = self.enclosing.clone();
        enclosing.push(self.simple.clone());
        Self::new(self.package.clone(), enclosing, simple)
    }

    #[must_use]
    pub fn package(&self) -> &PackageName {
        &self.package
    }

    #[must_use]
    pub fn enclosing_names(&self) -> &[Name] {
        &self.enclosing
    }

    #[must_use]
    pub fn simple_name(&self) -> &Name {
        &self.simple
    }

    #[must_use]
    pub fn is_top_level(&self) -> bool {
        self.enclosing.is_empty()
    }

    /// The directly enclosing type, if this is a member type.
    #[must_use]
    pub fn enclosing_type(&self) -> Option<Self> {
        let (simple, enclosing) = self.enclosing.split_last()?;
        Some(Self::new(
            self.package.clone(),
            enclosing.to_vec(),
            simple.clone(),
        ))
    }

    /// The outermost enclosing type (or `self` if top level).
    #[must_use]
    pub fn top_level_type(&self) -> Self {
        match self.enclosing.first() {
            Some(outermost) => Self::new(self.package.clone(), Vec::new(), outermost.clone()),
            None => self.clone(),
        }
    }

    /// `self`, then each enclosing type walking outward.
    #[must_use]
    pub fn ancestors(&self) -> Ancestors {
        Ancestors {
            next: Some(self.clone()),
        }
    }

    /// All segments: package, enclosing types, then the simple name.
    pub fn segments(&self) -> impl Iterator<Item = &Name> + '_ {
        self.package
            .segments
            .iter()
            .chain(self.enclosing.iter())
            .chain(std::iter::once(&self.simple))
    }

    /// Type-name segments only: enclosing types, then the simple name.
    pub fn type_names(&self) -> impl Iterator<Item = &Name> + '_ {
        self.enclosing.iter().chain(std::iter::once(&self.simple))
    }

    /// Whether `self` is `other` or one of `other`'s enclosing types.
    #[must_use]
    pub fn encloses(&self, other: &QualifiedName) -> bool {
        self.package == other.package
            && self.enclosing.len() <= other.enclosing.len()
            && self.type_names().eq(other.type_names().take(self.enclosing.len() + 1))
    }

    /// The dotted text that follows `ancestor` in `self`'s canonical name.
    ///
    /// Returns `Some("")` when `ancestor == self`, `Some(".Inner")` for a
    /// directly enclosing type, `None` if `ancestor` does not enclose `self`.
    #[must_use]
    pub fn suffix_after(&self, ancestor: &QualifiedName) -> Option<String> {
        if !ancestor.encloses(self) {
            return None;
        }
        let mut out = String::new();
        for name in self.type_names().skip(ancestor.enclosing.len() + 1) {
            out.push('.');
            out.push_str(name.as_str());
        }
        Some(out)
    }

    /// The canonical (dotted) name.
    #[must_use]
    pub fn to_dotted(&self) -> String {
        join_dotted(self.segments())
    }

    fn canonical_chars(&self) -> impl Iterator<Item = char> + '_ {
        dotted_chars(self.segments())
    }
}

/// Compare two names by their dotted canonical text.
///
/// This is the single ordering primitive used for import selection: it is a
/// total order over canonical strings and agrees with `a.to_dotted().cmp(&b.to_dotted())`,
/// without allocating.
#[must_use]
pub fn canonical_cmp(a: &QualifiedName, b: &QualifiedName) -> Ordering {
    a.canonical_chars().cmp(b.canonical_chars())
}

impl Ord for QualifiedName {
    fn cmp(&self, other: &Self) -> Ordering {
        // Equal canonical text with a different package split (`a.B.C` as a
        // package `a.B` type `C` vs type `B.C` in `a`) must not compare equal.
        canonical_cmp(self, other)
            .then_with(|| self.package.segments.len().cmp(&other.package.segments.len()))
    }
}

impl PartialOrd for QualifiedName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QualifiedName({})", self.to_dotted())
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in self.segments() {
            if !first {
                f.write_str(".")?;
            }
            first = false;
            f.write_str(segment.as_str())?;
        }
        Ok(())
    }
}

/// Iterator returned by [`QualifiedName::ancestors`].
#[derive(Debug, Clone)]
pub struct Ancestors {
    next: Option<QualifiedName>,
}

impl Iterator for Ancestors {
    type Item = QualifiedName;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = current.enclosing_type();
        Some(current)
    }
}

fn split_segments(text: &str) -> Result<Vec<Name>, InvalidReferenceError> {
    text.split('.')
        .map(|segment| {
            if segment.is_empty() {
                Err(InvalidReferenceError::EmptySegment(text.to_string()))
            } else {
                Name::new(segment)
            }
        })
        .collect()
}

fn join_dotted<'a>(segments: impl Iterator<Item = &'a Name> + 'a) -> String {
    dotted_chars(segments).collect()
}

fn dotted_chars<'a>(segments: impl Iterator<Item = &'a Name> + 'a) -> impl Iterator<Item = char> + 'a {
    segments.enumerate().flat_map(|(idx, segment)| {
        (idx > 0)
            .then_some('.')
            .into_iter()
            .chain(segment.as_str().chars())
    })
}
