//! Property-based tests for the listing filter.
//!
//! The filter must behave like a pure predicate over the collection: it
//! keeps order, never invents rows, and narrowing it never grows the result.

use proptest::prelude::*;
use rentdash_common::filter::{PropertyFilter, TypeFilter};
use rentdash_common::models::{Property, PropertyType};
use rentdash_common::test_util::property;

fn property_type() -> impl Strategy<Value = PropertyType> {
    prop::sample::select(PropertyType::ALL.to_vec())
}

fn type_filter() -> impl Strategy<Value = TypeFilter> {
    prop_oneof![
        Just(TypeFilter::All),
        property_type().prop_map(TypeFilter::Only),
    ]
}

fn listing() -> impl Strategy<Value = Vec<Property>> {
    prop::collection::vec(("[A-Za-z ]{1,16}", property_type()), 0..40).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (name, kind))| property(&format!("p{i}"), &name, kind))
            .collect()
    })
}

proptest! {
    #[test]
    fn result_is_ordered_subsequence(props in listing(), search in "[a-z]{0,3}", kind in type_filter()) {
        let out = PropertyFilter::new(search, kind).apply(&props);
        let mut rest = props.iter();
        for p in &out {
            prop_assert!(rest.any(|q| q.id == p.id), "{} out of order or invented", p.id);
        }
    }

    #[test]
    fn search_is_case_insensitive(props in listing(), search in "[a-z]{1,3}", kind in type_filter()) {
        let lower = PropertyFilter::new(search.clone(), kind).apply(&props);
        let upper = PropertyFilter::new(search.to_uppercase(), kind).apply(&props);
        prop_assert_eq!(lower, upper);
    }

    #[test]
    fn type_filter_only_narrows(props in listing(), search in "[a-z]{0,2}", kind in property_type()) {
        let all = PropertyFilter::new(search.clone(), TypeFilter::All).apply(&props);
        let only = PropertyFilter::new(search, TypeFilter::Only(kind)).apply(&props);
        prop_assert!(only.len() <= all.len());
        prop_assert!(only.iter().all(|p| p.kind == kind));
    }

    #[test]
    fn empty_search_with_all_is_identity(props in listing()) {
        prop_assert_eq!(PropertyFilter::default().apply(&props), props);
    }
}
