use std::cmp::Ordering;
use std::collections::BTreeSet;

use nova_core::{canonical_cmp, Name, PackageName, QualifiedName};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const PROPTEST_CASES: u32 = 256;

fn arb_segment() -> impl Strategy<Value = String> {
    // A small pool keeps collisions (shared prefixes, equal segments) frequent.
    prop::sample::select(vec![
        "a", "b", "ab", "a$", "util", "java", "Box", "Map", "Entry", "List", "B", "X_1",
    ])
    .prop_map(|s| s.to_string())
}

fn arb_qualified_name() -> impl Strategy<Value = QualifiedName> {
    (
        prop::collection::vec(arb_segment(), 0..3),
        prop::collection::vec(arb_segment(), 0..2),
        arb_segment(),
    )
        .prop_map(|(package, enclosing, simple)| {
            let package = package
                .iter()
                .map(|s| Name::new(s).unwrap())
                .collect::<Vec<_>>();
            let enclosing = enclosing
                .iter()
                .map(|s| Name::new(s).unwrap())
                .collect::<Vec<_>>();
            QualifiedName::new(
                PackageName::from_segments(package),
                enclosing,
                Name::new(&simple).unwrap(),
            )
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(PROPTEST_CASES))]

    #[test]
    fn canonical_cmp_agrees_with_dotted_text(a in arb_qualified_name(), b in arb_qualified_name()) {
        prop_assert_eq!(canonical_cmp(&a, &b), a.to_dotted().cmp(&b.to_dotted()));
    }

    #[test]
    fn ord_is_antisymmetric_and_consistent_with_eq(a in arb_qualified_name(), b in arb_qualified_name()) {
        prop_assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
        prop_assert_eq!(a.cmp(&b) == Ordering::Equal, a == b);
    }

    #[test]
    fn ord_is_transitive(
        a in arb_qualified_name(),
        b in arb_qualified_name(),
        c in arb_qualified_name(),
    ) {
        let mut sorted = vec![a, b, c];
        sorted.sort();
        prop_assert!(sorted[0] <= sorted[1]);
        prop_assert!(sorted[1] <= sorted[2]);
        prop_assert!(sorted[0] <= sorted[2]);
    }

    #[test]
    fn sorting_is_reproducible_across_insertion_orders(
        names in prop::collection::vec(arb_qualified_name(), 0..12).prop_shuffle(),
    ) {
        let mut forward = names.clone();
        forward.sort();
        let mut backward = names;
        backward.reverse();
        backward.sort();
        prop_assert_eq!(forward, backward);
    }
}

#[test]
fn prefix_sorts_before_extension() {
    let outer = QualifiedName::best_guess("a.Outer").unwrap();
    let inner = QualifiedName::best_guess("a.Outer.Inner").unwrap();
    let other = QualifiedName::best_guess("a.OuterX").unwrap();
    let set: BTreeSet<_> = [other.clone(), inner.clone(), outer.clone()].into_iter().collect();
    assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![outer, inner, other]);
}

#[test]
fn same_text_with_different_package_split_is_distinct() {
    let nested = QualifiedName::from_dotted("a", "B.C").unwrap();
    let top = QualifiedName::from_dotted("a.B", "C").unwrap();
    assert_eq!(canonical_cmp(&nested, &top), Ordering::Equal);
    assert_ne!(nested, top);
    assert_eq!(nested.cmp(&top), Ordering::Less);
}

#[test]
fn package_order_follows_dotted_text() {
    let a = PackageName::from_dotted("a.b").unwrap();
    let b = PackageName::from_dotted("a$").unwrap();
    assert_eq!(a.cmp(&b), "a.b".cmp("a$"));
}
