//! Infrastructure layer: property storage, paging, and the service that
//! orchestrates them.

pub mod pagination;
pub mod repository;
pub mod service;

pub use pagination::{Page, PageRequest, Sort, SortDirection, SortField};
pub use repository::{
    InMemoryPropertyRepository, PostgresPropertyRepository, PropertyRepository, RepositoryError,
};
pub use service::PropertyService;
