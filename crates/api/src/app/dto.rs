use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use arep_core::{DomainError, Entity};
use arep_infra::{Page, PageRequest, Sort};
use arep_properties::{Property, PropertyDraft, PropertyFilter};

// -------------------------
// Request DTOs
// -------------------------

/// Create/replace payload. A client-supplied `id` is not part of it and is
/// dropped during deserialization.
#[derive(Debug, Deserialize)]
pub struct PropertyPayload {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision_option")]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub size: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
}

impl PropertyPayload {
    pub fn into_draft(self) -> PropertyDraft {
        PropertyDraft {
            address: self.address,
            price: self.price,
            size: self.size,
            description: self.description,
        }
    }
}

/// Raw listing query string. Values are kept as text so an empty parameter
/// (`?minPrice=`) can mean "not supplied".
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPropertiesParams {
    pub address: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub min_size: Option<String>,
    pub max_size: Option<String>,
    pub page: Option<String>,
    pub size: Option<String>,
    pub sort: Option<String>,
}

impl ListPropertiesParams {
    pub fn into_query(self) -> Result<(PropertyFilter, PageRequest), DomainError> {
        let filter = PropertyFilter {
            address: self.address,
            min_price: parse_param("minPrice", self.min_price)?,
            max_price: parse_param("maxPrice", self.max_price)?,
            min_size: parse_param("minSize", self.min_size)?,
            max_size: parse_param("maxSize", self.max_size)?,
        };

        let sort = match non_empty(self.sort) {
            Some(raw) => Sort::parse(&raw)?,
            None => Sort::default(),
        };
        // Unparseable paging values fall back to the defaults.
        let page = non_empty(self.page).and_then(|p| p.trim().parse::<i64>().ok());
        let size = non_empty(self.size).and_then(|s| s.trim().parse::<i64>().ok());

        Ok((filter, PageRequest::new(page, size, sort)))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_param<T>(name: &str, value: Option<String>) -> Result<Option<T>, DomainError>
where
    T: core::str::FromStr,
{
    match non_empty(value) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| DomainError::validation(format!("{name} must be a number, got {raw:?}"))),
        None => Ok(None),
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct PropertyResponse {
    pub id: i64,
    pub address: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub price: Decimal,
    pub size: i32,
    pub description: Option<String>,
}

impl From<Property> for PropertyResponse {
    fn from(p: Property) -> Self {
        Self {
            id: p.id().get(),
            address: p.address().to_string(),
            price: p.price().amount(),
            size: p.size(),
            description: p.description().map(str::to_string),
        }
    }
}

/// Listing envelope: one page of items plus paging metadata.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u64,
    pub number: u32,
    pub size: u32,
    pub number_of_elements: usize,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

impl<T> PageResponse<T> {
    pub fn from_page<U>(page: Page<U>) -> Self
    where
        T: From<U>,
    {
        let total_pages = page.total_pages();
        let number_of_elements = page.number_of_elements();
        let first = page.is_first();
        let last = page.is_last();
        let empty = page.is_empty();
        let page = page.map(T::from);

        Self {
            content: page.content,
            total_elements: page.total_elements,
            total_pages,
            number: page.number,
            size: page.size,
            number_of_elements,
            first,
            last,
            empty,
        }
    }
}
