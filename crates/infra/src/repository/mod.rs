//! Property storage boundary.
//!
//! The service layer only talks to [`PropertyRepository`]; the in-memory
//! implementation backs tests and local development, the Postgres one backs
//! production.

pub mod in_memory;
pub mod postgres;

use std::sync::Arc;

use arep_properties::{NewProperty, Property, PropertyFilter, PropertyId};
use thiserror::Error;

use crate::pagination::{Page, PageRequest};

pub use in_memory::InMemoryPropertyRepository;
pub use postgres::PostgresPropertyRepository;

/// Storage failure. Missing records are `None`, never an error.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    #[error("storage error: {0}")]
    Storage(String),

    /// A stored row no longer satisfies the property constraints.
    #[error("invalid stored row: {0}")]
    InvalidRow(String),
}

/// Persistence for property records.
///
/// Every method is a single storage operation; none retries.
#[async_trait::async_trait]
pub trait PropertyRepository: Send + Sync {
    /// Persist a new record and return it with its generated id.
    async fn insert(&self, fields: NewProperty) -> Result<Property, RepositoryError>;

    async fn find_by_id(&self, id: PropertyId) -> Result<Option<Property>, RepositoryError>;

    async fn exists_by_id(&self, id: PropertyId) -> Result<bool, RepositoryError>;

    /// Overwrite the stored record with the same id.
    ///
    /// Returns `None` if no such record exists (anymore).
    async fn update(&self, property: &Property) -> Result<Option<Property>, RepositoryError>;

    /// Remove a record. Removing a missing id is a no-op.
    async fn delete_by_id(&self, id: PropertyId) -> Result<(), RepositoryError>;

    /// Records matching every constraint of `filter`, sliced per `page`.
    async fn find_all(
        &self,
        filter: &PropertyFilter,
        page: &PageRequest,
    ) -> Result<Page<Property>, RepositoryError>;
}

#[async_trait::async_trait]
impl<R> PropertyRepository for Arc<R>
where
    R: PropertyRepository + ?Sized,
{
    async fn insert(&self, fields: NewProperty) -> Result<Property, RepositoryError> {
        (**self).insert(fields).await
    }

    async fn find_by_id(&self, id: PropertyId) -> Result<Option<Property>, RepositoryError> {
        (**self).find_by_id(id).await
    }

    async fn exists_by_id(&self, id: PropertyId) -> Result<bool, RepositoryError> {
        (**self).exists_by_id(id).await
    }

    async fn update(&self, property: &Property) -> Result<Option<Property>, RepositoryError> {
        (**self).update(property).await
    }

    async fn delete_by_id(&self, id: PropertyId) -> Result<(), RepositoryError> {
        (**self).delete_by_id(id).await
    }

    async fn find_all(
        &self,
        filter: &PropertyFilter,
        page: &PageRequest,
    ) -> Result<Page<Property>, RepositoryError> {
        (**self).find_all(filter, page).await
    }
}
