use std::collections::BTreeSet;
use std::fmt;

use crate::CodegenError;

/// Declaration modifiers, ordered the way they are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Abstract,
    Default,
    Static,
    Final,
    Transient,
    Volatile,
    Synchronized,
    Native,
    Strictfp,
}

impl Modifier {
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Abstract => "abstract",
            Modifier::Default => "default",
            Modifier::Static => "static",
            Modifier::Final => "final",
            Modifier::Transient => "transient",
            Modifier::Volatile => "volatile",
            Modifier::Synchronized => "synchronized",
            Modifier::Native => "native",
            Modifier::Strictfp => "strictfp",
        }
    }

    #[must_use]
    pub fn is_access(self) -> bool {
        matches!(self, Modifier::Public | Modifier::Protected | Modifier::Private)
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A modifier set holding at most one access modifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Modifiers {
    set: BTreeSet<Modifier>,
}

impl Modifiers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adding a modifier twice is a no-op; adding a second, different access
    /// modifier fails.
    pub fn add(&mut self, modifier: Modifier) -> Result<(), CodegenError> {
        if modifier.is_access() {
            if let Some(existing) = self.access().filter(|m| *m != modifier) {
                return Err(CodegenError::ConflictingModifiers {
                    first: existing,
                    second: modifier,
                });
            }
        }
        self.set.insert(modifier);
        Ok(())
    }

    pub fn extend(
        &mut self,
        modifiers: impl IntoIterator<Item = Modifier>,
    ) -> Result<(), CodegenError> {
        modifiers.into_iter().try_for_each(|m| self.add(m))
    }

    #[must_use]
    pub fn contains(&self, modifier: Modifier) -> bool {
        self.set.contains(&modifier)
    }

    #[must_use]
    pub fn access(&self) -> Option<Modifier> {
        self.set.iter().copied().find(|m| m.is_access())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Modifiers in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = Modifier> + '_ {
        self.set.iter().copied()
    }
}

impl TryFrom<&[Modifier]> for Modifiers {
    type Error = CodegenError;

    fn try_from(value: &[Modifier]) -> Result<Self, Self::Error> {
        let mut out = Modifiers::new();
        out.extend(value.iter().copied())?;
        Ok(out)
    }
}

/// Each modifier followed by a single space, so the output can be directly
/// followed by the declaration keyword or type.
impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.set {
            write!(f, "{modifier} ")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn prints_in_canonical_order() {
        let mods = Modifiers::try_from(
            &[Modifier::Final, Modifier::Static, Modifier::Public, Modifier::Abstract][..],
        )
        .unwrap();
        assert_eq!(mods.to_string(), "public abstract static final ");
    }

    #[test]
    fn rejects_second_access_modifier() {
        let mut mods = Modifiers::new();
        mods.add(Modifier::Private).unwrap();
        mods.add(Modifier::Private).unwrap();
        assert_eq!(
            mods.add(Modifier::Public),
            Err(CodegenError::ConflictingModifiers {
                first: Modifier::Private,
                second: Modifier::Public,
            })
        );
        assert_eq!(mods.access(), Some(Modifier::Private));
    }
}
