//! Conjunctive listing filter.
//!
//! A filter starts out matching everything. Each supplied parameter adds one
//! [`Constraint`], and a property matches only when it satisfies all of them.
//! Storage backends either evaluate [`PropertyFilter::matches`] directly or
//! render [`PropertyFilter::constraints`] into their own query language.

use rust_decimal::Decimal;

use crate::property::Property;

/// Optional listing criteria. `None` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyFilter {
    /// Case-insensitive substring of the address. Blank counts as absent.
    pub address: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_size: Option<i32>,
    pub max_size: Option<i32>,
}

/// A single predicate contributed by one filter parameter. Bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Lowercased needle.
    AddressContains(String),
    MinPrice(Decimal),
    MaxPrice(Decimal),
    MinSize(i32),
    MaxSize(i32),
}

impl Constraint {
    pub fn matches(&self, property: &Property) -> bool {
        match self {
            Constraint::AddressContains(needle) => {
                property.address().to_lowercase().contains(needle.as_str())
            }
            Constraint::MinPrice(min) => property.price().amount() >= *min,
            Constraint::MaxPrice(max) => property.price().amount() <= *max,
            Constraint::MinSize(min) => property.size() >= *min,
            Constraint::MaxSize(max) => property.size() <= *max,
        }
    }
}

impl PropertyFilter {
    /// One constraint per supplied parameter, in a fixed order.
    pub fn constraints(&self) -> Vec<Constraint> {
        let mut constraints = Vec::with_capacity(5);

        if let Some(address) = self.address.as_deref() {
            if !address.trim().is_empty() {
                constraints.push(Constraint::AddressContains(address.to_lowercase()));
            }
        }
        if let Some(min) = self.min_price {
            constraints.push(Constraint::MinPrice(min));
        }
        if let Some(max) = self.max_price {
            constraints.push(Constraint::MaxPrice(max));
        }
        if let Some(min) = self.min_size {
            constraints.push(Constraint::MinSize(min));
        }
        if let Some(max) = self.max_size {
            constraints.push(Constraint::MaxSize(max));
        }

        constraints
    }

    pub fn is_unconstrained(&self) -> bool {
        self.constraints().is_empty()
    }

    pub fn matches(&self, property: &Property) -> bool {
        self.constraints().iter().all(|c| c.matches(property))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{PropertyDraft, PropertyId};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn property(id: i64, address: &str, price: &str, size: i32) -> Property {
        let fields = PropertyDraft {
            address: Some(address.to_string()),
            price: Some(dec(price)),
            size: Some(size),
            description: None,
        }
        .validate()
        .unwrap();
        Property::new(PropertyId::new(id), fields)
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = PropertyFilter::default();
        assert!(filter.is_unconstrained());
        assert!(filter.matches(&property(1, "123 Main St", "1", 1)));
    }

    #[test]
    fn blank_address_is_no_constraint() {
        let filter = PropertyFilter {
            address: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(filter.is_unconstrained());
        assert!(filter.matches(&property(1, "456 Oak Ave", "1", 1)));
    }

    #[test]
    fn address_match_is_case_insensitive_substring() {
        let filter = PropertyFilter {
            address: Some("Main".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&property(1, "123 Main St", "1", 1)));
        assert!(filter.matches(&property(2, "9 MAINSTREAM RD", "1", 1)));
        assert!(!filter.matches(&property(3, "456 Oak Ave", "1", 1)));
    }

    #[test]
    fn address_wildcards_are_literal() {
        let filter = PropertyFilter {
            address: Some("%".to_string()),
            ..Default::default()
        };
        assert!(!filter.matches(&property(1, "123 Main St", "1", 1)));
        assert!(filter.matches(&property(2, "Unit 100% Rd", "1", 1)));
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let filter = PropertyFilter {
            min_price: Some(dec("100000")),
            max_price: Some(dec("200000")),
            ..Default::default()
        };
        assert!(filter.matches(&property(1, "a", "100000", 1)));
        assert!(filter.matches(&property(2, "a", "200000.00", 1)));
        assert!(filter.matches(&property(3, "a", "150000", 1)));
        assert!(!filter.matches(&property(4, "a", "99999.99", 1)));
        assert!(!filter.matches(&property(5, "a", "200000.01", 1)));
    }

    #[test]
    fn size_bounds_are_inclusive() {
        let filter = PropertyFilter {
            min_size: Some(2),
            max_size: Some(4),
            ..Default::default()
        };
        assert!(!filter.matches(&property(1, "a", "1", 1)));
        assert!(filter.matches(&property(2, "a", "1", 2)));
        assert!(filter.matches(&property(3, "a", "1", 4)));
        assert!(!filter.matches(&property(4, "a", "1", 5)));
    }

    #[test]
    fn one_sided_bounds() {
        let filter = PropertyFilter {
            min_price: Some(dec("100000")),
            ..Default::default()
        };
        let priced = [("90000", false), ("150000", true), ("250000", true)];
        for (i, (price, expected)) in priced.iter().enumerate() {
            assert_eq!(filter.matches(&property(i as i64, "a", price, 1)), *expected, "price {price}");
        }
    }

    #[test]
    fn filters_combine_conjunctively() {
        let filter = PropertyFilter {
            address: Some("main".to_string()),
            max_price: Some(dec("200000")),
            min_size: Some(3),
            ..Default::default()
        };
        assert_eq!(filter.constraints().len(), 3);

        assert!(filter.matches(&property(1, "123 Main St", "150000", 3)));
        // each property below violates exactly one condition
        assert!(!filter.matches(&property(2, "456 Oak Ave", "150000", 3)));
        assert!(!filter.matches(&property(3, "123 Main St", "250000", 3)));
        assert!(!filter.matches(&property(4, "123 Main St", "150000", 2)));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// A filter matches iff every supplied bound holds.
            #[test]
            fn matches_is_conjunction_of_constraints(
                price_cents in 1i64..100_000_000,
                size in 1i32..50,
                min_price in proptest::option::of(0i64..1_000_000),
                max_price in proptest::option::of(0i64..1_000_000),
                min_size in proptest::option::of(0i32..50),
                max_size in proptest::option::of(0i32..50),
            ) {
                let fields = PropertyDraft {
                    address: Some("1 Test Rd".to_string()),
                    price: Some(Decimal::new(price_cents, 2)),
                    size: Some(size),
                    description: None,
                }
                .validate()
                .unwrap();
                let property = Property::new(PropertyId::new(1), fields);

                let filter = PropertyFilter {
                    address: None,
                    min_price: min_price.map(Decimal::from),
                    max_price: max_price.map(Decimal::from),
                    min_size,
                    max_size,
                };

                let amount = Decimal::new(price_cents, 2);
                let expected = min_price.map_or(true, |m| amount >= Decimal::from(m))
                    && max_price.map_or(true, |m| amount <= Decimal::from(m))
                    && min_size.map_or(true, |m| size >= m)
                    && max_size.map_or(true, |m| size <= m);
                prop_assert_eq!(filter.matches(&property), expected);

                let supplied = [
                    min_price.is_some(),
                    max_price.is_some(),
                    min_size.is_some(),
                    max_size.is_some(),
                ]
                .iter()
                .filter(|s| **s)
                .count();
                prop_assert_eq!(filter.constraints().len(), supplied);
            }
        }
    }
}
