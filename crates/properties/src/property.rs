use core::str::FromStr;

use rust_decimal::Decimal;

use arep_core::{DomainError, DomainResult, Entity, ValueObject};

/// Largest number of digits allowed left of the decimal point in a price.
pub const MAX_INTEGER_DIGITS: u32 = 15;

/// Largest number of digits allowed right of the decimal point in a price.
pub const MAX_FRACTION_DIGITS: u32 = 2;

/// Property identifier, assigned by storage on first persistence.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyId(i64);

impl PropertyId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl From<i64> for PropertyId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl core::fmt::Display for PropertyId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for PropertyId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|e| DomainError::invalid_id(format!("PropertyId: {e}")))
    }
}

/// Asking price: strictly positive, at most 15 integer and 2 fraction digits.
///
/// Trailing zeros do not count towards the fraction limit (`1.500` is a valid
/// price). Accepted values are stored with a scale of exactly 2, matching the
/// `NUMERIC(15, 2)` column they end up in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(Decimal);

impl ValueObject for Price {}

impl Price {
    pub fn new(value: Decimal) -> DomainResult<Self> {
        if value <= Decimal::ZERO {
            return Err(DomainError::validation("price must be greater than 0"));
        }

        let normalized = value.normalize();
        if normalized.scale() > MAX_FRACTION_DIGITS || integer_digits(&normalized) > MAX_INTEGER_DIGITS {
            return Err(DomainError::validation(format!(
                "price must have at most {MAX_INTEGER_DIGITS} integer digits and {MAX_FRACTION_DIGITS} fraction digits"
            )));
        }

        let mut stored = normalized;
        stored.rescale(MAX_FRACTION_DIGITS);
        Ok(Self(stored))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Digits left of the decimal point, ignoring sign (`0.5` has none).
fn integer_digits(value: &Decimal) -> u32 {
    let precision = value.mantissa().unsigned_abs().to_string().len() as i64;
    (precision - i64::from(value.scale())).max(0) as u32
}

/// Unvalidated property fields as received from a client.
///
/// Any field may be missing; `validate` reports every violation at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyDraft {
    pub address: Option<String>,
    pub price: Option<Decimal>,
    pub size: Option<i32>,
    pub description: Option<String>,
}

impl PropertyDraft {
    pub fn validate(self) -> DomainResult<NewProperty> {
        let mut violations = Vec::new();

        let address = match self.address {
            Some(a) if !a.trim().is_empty() => Some(a),
            _ => {
                violations.push("address must not be blank".to_string());
                None
            }
        };

        let price = match self.price {
            Some(p) => match Price::new(p) {
                Ok(p) => Some(p),
                Err(DomainError::Validation(msg)) => {
                    violations.push(msg);
                    None
                }
                Err(e) => return Err(e),
            },
            None => {
                violations.push("price must not be null".to_string());
                None
            }
        };

        let size = match self.size {
            Some(s) if s >= 1 => Some(s),
            Some(_) => {
                violations.push("size must be at least 1".to_string());
                None
            }
            None => {
                violations.push("size must not be null".to_string());
                None
            }
        };

        if let Some(err) = DomainError::from_violations(violations) {
            return Err(err);
        }

        match (address, price, size) {
            (Some(address), Some(price), Some(size)) => Ok(NewProperty {
                address,
                price,
                size,
                description: self.description,
            }),
            _ => Err(DomainError::validation("incomplete property")),
        }
    }
}

/// A validated set of property fields that has not been persisted yet.
///
/// Only obtainable through [`PropertyDraft::validate`], so every value of this
/// type satisfies the field constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProperty {
    address: String,
    price: Price,
    size: i32,
    description: Option<String>,
}

impl NewProperty {
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// A persisted property record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    id: PropertyId,
    address: String,
    price: Price,
    size: i32,
    description: Option<String>,
}

impl Property {
    /// Attach a storage-assigned id to a validated field set.
    pub fn new(id: PropertyId, fields: NewProperty) -> Self {
        Self {
            id,
            address: fields.address,
            price: fields.price,
            size: fields.size,
            description: fields.description,
        }
    }

    /// Overwrite every mutable field in place; the id is preserved.
    pub fn replace_with(&mut self, fields: NewProperty) {
        self.address = fields.address;
        self.price = fields.price;
        self.size = fields.size;
        self.description = fields.description;
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl Entity for Property {
    type Id = PropertyId;

    fn id(&self) -> Self::Id {
        self.id
    }
}
