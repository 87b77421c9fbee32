//! Property listings domain module.
//!
//! A property is a single real-estate record: address, asking price, size and
//! an optional free-text description. This crate owns the field constraints
//! and the conjunctive filter used for listing.

pub mod filter;
pub mod property;

pub use filter::{Constraint, PropertyFilter};
pub use property::{
    MAX_FRACTION_DIGITS, MAX_INTEGER_DIGITS, NewProperty, Price, Property, PropertyDraft, PropertyId,
};
