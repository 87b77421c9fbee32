use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};

use arep_core::Entity;
use arep_properties::{NewProperty, Property, PropertyFilter, PropertyId};

use super::{PropertyRepository, RepositoryError};
use crate::pagination::{Page, PageRequest};

/// In-memory property store for tests/dev.
///
/// Ids come from a counter that only moves forward, so a deleted id is never
/// handed out again.
#[derive(Debug)]
pub struct InMemoryPropertyRepository {
    inner: RwLock<BTreeMap<PropertyId, Property>>,
    next_id: AtomicI64,
}

impl InMemoryPropertyRepository {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryPropertyRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<E>(_: E) -> RepositoryError {
    RepositoryError::Storage("in-memory property store lock poisoned".to_string())
}

#[async_trait::async_trait]
impl PropertyRepository for InMemoryPropertyRepository {
    async fn insert(&self, fields: NewProperty) -> Result<Property, RepositoryError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        let id = PropertyId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let property = Property::new(id, fields);
        map.insert(id, property.clone());
        Ok(property)
    }

    async fn find_by_id(&self, id: PropertyId) -> Result<Option<Property>, RepositoryError> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map.get(&id).cloned())
    }

    async fn exists_by_id(&self, id: PropertyId) -> Result<bool, RepositoryError> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map.contains_key(&id))
    }

    async fn update(&self, property: &Property) -> Result<Option<Property>, RepositoryError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        match map.get_mut(&property.id()) {
            Some(stored) => {
                *stored = property.clone();
                Ok(Some(stored.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_by_id(&self, id: PropertyId) -> Result<(), RepositoryError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        map.remove(&id);
        Ok(())
    }

    async fn find_all(
        &self,
        filter: &PropertyFilter,
        page: &PageRequest,
    ) -> Result<Page<Property>, RepositoryError> {
        let map = self.inner.read().map_err(poisoned)?;
        let constraints = filter.constraints();

        let mut matching: Vec<&Property> = map
            .values()
            .filter(|p| constraints.iter().all(|c| c.matches(p)))
            .collect();
        matching.sort_by(|a, b| page.sort.compare(a, b));

        let total = matching.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let content = matching
            .into_iter()
            .skip(offset)
            .take(page.size as usize)
            .cloned()
            .collect();

        Ok(Page::new(content, total, page))
    }
}
