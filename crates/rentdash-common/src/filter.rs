//! Client-side filtering for the property listing.
//!
//! Purely local: recomputed over the whole collection whenever the
//! collection, the search text or the type selection changes.

use std::str::FromStr;

use crate::models::{Property, PropertyType};

/// Value of the type dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(PropertyType),
}

impl TypeFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeFilter::All => "all",
            TypeFilter::Only(t) => t.as_str(),
        }
    }
}

impl FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(TypeFilter::All)
        } else {
            s.parse().map(TypeFilter::Only)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyFilter {
    pub search: String,
    pub kind: TypeFilter,
}

impl PropertyFilter {
    pub fn new(search: impl Into<String>, kind: TypeFilter) -> Self {
        Self {
            search: search.into(),
            kind,
        }
    }

    /// Case-insensitive substring on name, address or type, AND the type
    /// selection when it is not `All`.
    pub fn matches(&self, property: &Property) -> bool {
        if let TypeFilter::Only(kind) = self.kind {
            if property.kind != kind {
                return false;
            }
        }
        let needle = self.search.trim().to_lowercase();
        needle.is_empty()
            || property.name.to_lowercase().contains(&needle)
            || property.address.to_lowercase().contains(&needle)
            || property.kind.as_str().contains(&needle)
    }

    /// Matching properties in collection order.
    pub fn apply(&self, properties: &[Property]) -> Vec<Property> {
        properties
            .iter()
            .filter(|p| self.matches(p))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::property;

    fn listing() -> Vec<Property> {
        vec![
            property("1", "Lekki Flat", PropertyType::Apartment),
            property("2", "Ikoyi House", PropertyType::House),
        ]
    }

    fn names(props: &[Property]) -> Vec<&str> {
        props.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn search_is_case_insensitive() {
        let out = PropertyFilter::new("lekki", TypeFilter::All).apply(&listing());
        assert_eq!(names(&out), ["Lekki Flat"]);
        let out = PropertyFilter::new("  IKOYI ", TypeFilter::All).apply(&listing());
        assert_eq!(names(&out), ["Ikoyi House"]);
    }

    #[test]
    fn type_filter_is_exact() {
        let out = PropertyFilter::new("", TypeFilter::Only(PropertyType::House)).apply(&listing());
        assert_eq!(names(&out), ["Ikoyi House"]);
    }

    #[test]
    fn unmatched_search_with_any_type_is_empty() {
        for kind in std::iter::once(TypeFilter::All)
            .chain(PropertyType::ALL.into_iter().map(TypeFilter::Only))
        {
            assert!(PropertyFilter::new("banana", kind).apply(&listing()).is_empty());
        }
    }

    #[test]
    fn search_matches_address_and_type() {
        let mut props = listing();
        props[1].address = "5 Bourdillon Road".into();
        let out = PropertyFilter::new("bourdillon", TypeFilter::All).apply(&props);
        assert_eq!(names(&out), ["Ikoyi House"]);
        let out = PropertyFilter::new("apart", TypeFilter::All).apply(&props);
        assert_eq!(names(&out), ["Lekki Flat"]);
    }

    #[test]
    fn type_filter_parses_dropdown_values() {
        assert_eq!("all".parse::<TypeFilter>(), Ok(TypeFilter::All));
        assert_eq!("villa".parse::<TypeFilter>(), Ok(TypeFilter::Only(PropertyType::Villa)));
        assert!("mansion".parse::<TypeFilter>().is_err());
    }
}
