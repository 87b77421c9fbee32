//! Property service: orchestrates create/list/get/update/delete over a
//! [`PropertyRepository`].
//!
//! Inputs arrive already validated (`NewProperty`), so nothing here can fail
//! for domain reasons; the only error is a storage failure, which is passed
//! through untouched.

use arep_core::Entity;
use arep_properties::{NewProperty, Property, PropertyFilter, PropertyId};

use crate::pagination::{Page, PageRequest};
use crate::repository::{PropertyRepository, RepositoryError};

#[derive(Debug, Clone)]
pub struct PropertyService<R> {
    repository: R,
}

impl<R> PropertyService<R>
where
    R: PropertyRepository,
{
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Persist a new property. The id is always assigned by storage.
    pub async fn create(&self, fields: NewProperty) -> Result<Property, RepositoryError> {
        let created = self.repository.insert(fields).await?;
        tracing::info!(property_id = %created.id(), "property created");
        Ok(created)
    }

    pub async fn list(
        &self,
        filter: &PropertyFilter,
        page: &PageRequest,
    ) -> Result<Page<Property>, RepositoryError> {
        self.repository.find_all(filter, page).await
    }

    pub async fn get(&self, id: PropertyId) -> Result<Option<Property>, RepositoryError> {
        self.repository.find_by_id(id).await
    }

    /// Replace every mutable field of an existing property.
    ///
    /// Returns `None` without touching storage when `id` does not exist.
    pub async fn update(
        &self,
        id: PropertyId,
        fields: NewProperty,
    ) -> Result<Option<Property>, RepositoryError> {
        let Some(mut existing) = self.repository.find_by_id(id).await? else {
            return Ok(None);
        };

        existing.replace_with(fields);
        let updated = self.repository.update(&existing).await?;
        if updated.is_some() {
            tracing::info!(property_id = %id, "property updated");
        }
        Ok(updated)
    }

    /// Delete a property. Returns whether it existed beforehand.
    pub async fn delete(&self, id: PropertyId) -> Result<bool, RepositoryError> {
        if !self.repository.exists_by_id(id).await? {
            return Ok(false);
        }

        self.repository.delete_by_id(id).await?;
        tracing::info!(property_id = %id, "property deleted");
        Ok(true)
    }
}
