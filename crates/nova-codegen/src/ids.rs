use std::fmt;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            pub(crate) fn from_idx(idx: usize) -> Self {
                $name(u32::try_from(idx).expect("arena index does not fit in u32"))
            }

            #[must_use]
            pub fn idx(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

arena_id!(
    /// A type declaration (top-level or nested) owned by a compilation unit.
    TypeDeclId
);
arena_id!(FieldId);
arena_id!(MethodId);
arena_id!(ConstructorId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trips_through_id() {
        let id = TypeDeclId::from_idx(7);
        assert_eq!(id.idx(), 7);
        assert_eq!(format!("{id:?}"), "TypeDeclId(7)");
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    #[should_panic(expected = "arena index does not fit in u32")]
    fn oversized_index_panics() {
        let _ = FieldId::from_idx(usize::MAX);
    }
}
