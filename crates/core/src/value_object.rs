//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**; two value objects holding the same
//! values are the same value. A value object is only ever constructed in a
//! valid state, so holding one is proof that its invariants were checked.

/// Marker trait for value objects.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Price(Decimal);
///
/// impl ValueObject for Price {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
