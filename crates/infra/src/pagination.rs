//! Paging and ordering for property listings.
//!
//! Requests are normalised on construction so storage backends never see a
//! zero page size or an unbounded one.

use core::cmp::Ordering;
use core::str::FromStr;

use arep_core::{DomainError, DomainResult, Entity};
use arep_properties::Property;

/// Page size used when the client does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Upper bound on the page size a client may request.
pub const MAX_PAGE_SIZE: u32 = 2000;

/// Sortable property columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Id,
    Address,
    Price,
    Size,
}

impl SortField {
    /// Column name in the `properties` table.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Address => "address",
            SortField::Price => "price",
            SortField::Size => "size",
        }
    }
}

impl FromStr for SortField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "id" => Ok(SortField::Id),
            "address" => Ok(SortField::Address),
            "price" => Ok(SortField::Price),
            "size" => Ok(SortField::Size),
            other => Err(DomainError::validation(format!(
                "cannot sort by '{other}'; expected one of: id, address, price, size"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn keyword(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(DomainError::validation(format!(
                "invalid sort direction '{other}'; expected asc or desc"
            ))),
        }
    }
}

/// Listing order. Defaults to ascending id (insertion order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Sort {
    /// Parse `"<field>"` or `"<field>,<asc|desc>"`.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let mut parts = raw.splitn(2, ',');
        let field = parts.next().unwrap_or_default().parse::<SortField>()?;
        let direction = match parts.next() {
            Some(d) => d.parse::<SortDirection>()?,
            None => SortDirection::Asc,
        };
        Ok(Self { field, direction })
    }

    /// Compare two properties in this order; ties fall back to ascending id.
    pub fn compare(&self, a: &Property, b: &Property) -> Ordering {
        let primary = match self.field {
            SortField::Id => a.id().cmp(&b.id()),
            SortField::Address => a.address().cmp(b.address()),
            SortField::Price => a.price().cmp(&b.price()),
            SortField::Size => a.size().cmp(&b.size()),
        };
        let primary = match self.direction {
            SortDirection::Asc => primary,
            SortDirection::Desc => primary.reverse(),
        };
        primary.then_with(|| a.id().cmp(&b.id()))
    }
}

/// Which slice of a listing to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 0-based page index.
    pub page: u32,
    pub size: u32,
    pub sort: Sort,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: Sort::default(),
        }
    }
}

impl PageRequest {
    /// Normalise raw client values: negative page → 0, missing or
    /// non-positive size → default, oversized → [`MAX_PAGE_SIZE`].
    pub fn new(page: Option<i64>, size: Option<i64>, sort: Sort) -> Self {
        let page = page
            .map(|p| u32::try_from(p.max(0)).unwrap_or(u32::MAX))
            .unwrap_or(0);
        let size = match size {
            Some(s) if s >= 1 => u32::try_from(s).unwrap_or(MAX_PAGE_SIZE).min(MAX_PAGE_SIZE),
            _ => DEFAULT_PAGE_SIZE,
        };
        Self { page, size, sort }
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

/// A bounded slice of listing results plus total-count metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub content: Vec<T>,
    /// Number of records matching the filter across all pages.
    pub total_elements: u64,
    /// 0-based page index.
    pub number: u32,
    pub size: u32,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, total_elements: u64, request: &PageRequest) -> Self {
        Self {
            content,
            total_elements,
            number: request.page,
            size: request.size,
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            return 1;
        }
        self.total_elements.div_ceil(u64::from(self.size))
    }

    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    pub fn is_first(&self) -> bool {
        self.number == 0
    }

    pub fn is_last(&self) -> bool {
        u64::from(self.number) + 1 >= self.total_pages()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            number: self.number,
            size: self.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_first_page_of_ten() {
        let req = PageRequest::new(None, None, Sort::default());
        assert_eq!(req, PageRequest::default());
        assert_eq!(req.page, 0);
        assert_eq!(req.size, 10);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let req = PageRequest::new(Some(-3), Some(0), Sort::default());
        assert_eq!((req.page, req.size), (0, DEFAULT_PAGE_SIZE));

        let req = PageRequest::new(Some(2), Some(5000), Sort::default());
        assert_eq!((req.page, req.size), (2, MAX_PAGE_SIZE));
        assert_eq!(req.offset(), 4000);
    }

    #[test]
    fn parses_sort_with_and_without_direction() {
        assert_eq!(
            Sort::parse("price").unwrap(),
            Sort { field: SortField::Price, direction: SortDirection::Asc }
        );
        assert_eq!(
            Sort::parse("size,DESC").unwrap(),
            Sort { field: SortField::Size, direction: SortDirection::Desc }
        );
    }

    #[test]
    fn rejects_unknown_sort_field_or_direction() {
        assert!(matches!(Sort::parse("bedrooms"), Err(DomainError::Validation(_))));
        assert!(matches!(Sort::parse("price,sideways"), Err(DomainError::Validation(_))));
    }

    #[test]
    fn total_pages_rounds_up() {
        let req = PageRequest::default();
        assert_eq!(Page::<()>::new(vec![], 0, &req).total_pages(), 0);
        assert_eq!(Page::<()>::new(vec![], 10, &req).total_pages(), 1);
        assert_eq!(Page::<()>::new(vec![], 11, &req).total_pages(), 2);
    }

    #[test]
    fn first_and_last_flags() {
        let first = Page::new(vec![1; 10], 25, &PageRequest::new(Some(0), None, Sort::default()));
        assert!(first.is_first());
        assert!(!first.is_last());

        let last = Page::new(vec![1; 5], 25, &PageRequest::new(Some(2), None, Sort::default()));
        assert!(!last.is_first());
        assert!(last.is_last());
        assert_eq!(last.number_of_elements(), 5);

        let empty = Page::<i32>::new(vec![], 0, &PageRequest::default());
        assert!(empty.is_first() && empty.is_last() && empty.is_empty());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn normalised_request_is_always_bounded(
                page in proptest::option::of(any::<i64>()),
                size in proptest::option::of(any::<i64>()),
            ) {
                let req = PageRequest::new(page, size, Sort::default());
                prop_assert!((1..=MAX_PAGE_SIZE).contains(&req.size));
                if let Some(p) = page.filter(|p| (0..=i64::from(u32::MAX)).contains(p)) {
                    prop_assert_eq!(i64::from(req.page), p);
                }
            }

            #[test]
            fn pages_cover_every_element_exactly_once(total in 0u64..5_000, size in 1i64..=100) {
                let req = PageRequest::new(None, Some(size), Sort::default());
                let pages = Page::<()>::new(vec![], total, &req).total_pages();
                prop_assert!(pages * u64::from(req.size) >= total);
                prop_assert!(pages == 0 || (pages - 1) * u64::from(req.size) < total);
            }
        }
    }
}
