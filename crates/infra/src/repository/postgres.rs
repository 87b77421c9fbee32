//! Postgres-backed property repository.
//!
//! ## Filtering
//!
//! Listing queries start from `WHERE TRUE` and append one `AND <predicate>`
//! per supplied filter parameter, with every value bound as a parameter. The
//! count query and the page query are built by the same function, so the
//! reported total always matches the rows that can be paged through.
//!
//! ## Error Mapping
//!
//! | SQLx Error | RepositoryError |
//! |------------|-----------------|
//! | Database (any SQLSTATE) | `Storage` (code and message kept) |
//! | PoolClosed | `Storage` |
//! | Other | `Storage` |
//! | row failing property validation | `InvalidRow` |

use std::sync::Arc;

use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use arep_core::Entity;
use arep_properties::{Constraint, NewProperty, Property, PropertyDraft, PropertyFilter, PropertyId};

use super::{PropertyRepository, RepositoryError};
use crate::pagination::{Page, PageRequest, SortField};

const COLUMNS: &str = "id, address, price, size, description";

/// Postgres-backed property store over the `properties` table.
///
/// Uses the SQLx connection pool, which is `Send + Sync`; every method is a
/// single statement (listing issues a count and a page query).
#[derive(Debug, Clone)]
pub struct PostgresPropertyRepository {
    pool: Arc<PgPool>,
}

impl PostgresPropertyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[derive(Debug, FromRow)]
struct PropertyRow {
    id: i64,
    address: String,
    price: Decimal,
    size: i32,
    description: Option<String>,
}

impl TryFrom<PropertyRow> for Property {
    type Error = RepositoryError;

    fn try_from(row: PropertyRow) -> Result<Self, Self::Error> {
        let fields = PropertyDraft {
            address: Some(row.address),
            price: Some(row.price),
            size: Some(row.size),
            description: row.description,
        }
        .validate()
        .map_err(|e| RepositoryError::InvalidRow(format!("property {}: {e}", row.id)))?;
        Ok(Property::new(PropertyId::new(row.id), fields))
    }
}

/// Append the conjunctive `WHERE` clause for `filter`.
fn push_filter(qb: &mut QueryBuilder<'static, Postgres>, filter: &PropertyFilter) {
    qb.push(" WHERE TRUE");
    for constraint in filter.constraints() {
        match constraint {
            // strpos keeps `%` and `_` in the needle literal
            Constraint::AddressContains(needle) => {
                qb.push(" AND strpos(lower(address), ").push_bind(needle).push(") > 0");
            }
            Constraint::MinPrice(min) => {
                qb.push(" AND price >= ").push_bind(min);
            }
            Constraint::MaxPrice(max) => {
                qb.push(" AND price <= ").push_bind(max);
            }
            Constraint::MinSize(min) => {
                qb.push(" AND size >= ").push_bind(min);
            }
            Constraint::MaxSize(max) => {
                qb.push(" AND size <= ").push_bind(max);
            }
        }
    }
}

fn count_query(filter: &PropertyFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM properties");
    push_filter(&mut qb, filter);
    qb
}

fn page_query(filter: &PropertyFilter, page: &PageRequest) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM properties"));
    push_filter(&mut qb, filter);

    // Column and direction come from closed enums, never from client text.
    qb.push(" ORDER BY ")
        .push(page.sort.field.column())
        .push(" ")
        .push(page.sort.direction.keyword());
    if page.sort.field != SortField::Id {
        qb.push(", id ASC");
    }

    qb.push(" LIMIT ")
        .push_bind(i64::from(page.size))
        .push(" OFFSET ")
        .push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));
    qb
}

#[async_trait::async_trait]
impl PropertyRepository for PostgresPropertyRepository {
    #[instrument(skip(self, fields), err)]
    async fn insert(&self, fields: NewProperty) -> Result<Property, RepositoryError> {
        let row = sqlx::query_as::<_, PropertyRow>(&format!(
            "INSERT INTO properties (address, price, size, description) \
             VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        ))
        .bind(fields.address())
        .bind(fields.price().amount())
        .bind(fields.size())
        .bind(fields.description())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert", e))?;

        row.try_into()
    }

    #[instrument(skip(self), fields(property_id = %id), err)]
    async fn find_by_id(&self, id: PropertyId) -> Result<Option<Property>, RepositoryError> {
        let row = sqlx::query_as::<_, PropertyRow>(&format!(
            "SELECT {COLUMNS} FROM properties WHERE id = $1"
        ))
        .bind(id.get())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_id", e))?;

        row.map(Property::try_from).transpose()
    }

    #[instrument(skip(self), fields(property_id = %id), err)]
    async fn exists_by_id(&self, id: PropertyId) -> Result<bool, RepositoryError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM properties WHERE id = $1)")
            .bind(id.get())
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("exists_by_id", e))
    }

    #[instrument(skip(self, property), fields(property_id = %property.id()), err)]
    async fn update(&self, property: &Property) -> Result<Option<Property>, RepositoryError> {
        let row = sqlx::query_as::<_, PropertyRow>(&format!(
            "UPDATE properties SET address = $1, price = $2, size = $3, description = $4 \
             WHERE id = $5 RETURNING {COLUMNS}"
        ))
        .bind(property.address())
        .bind(property.price().amount())
        .bind(property.size())
        .bind(property.description())
        .bind(property.id().get())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update", e))?;

        row.map(Property::try_from).transpose()
    }

    #[instrument(skip(self), fields(property_id = %id), err)]
    async fn delete_by_id(&self, id: PropertyId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id.get())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_by_id", e))?;
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn find_all(
        &self,
        filter: &PropertyFilter,
        page: &PageRequest,
    ) -> Result<Page<Property>, RepositoryError> {
        let total: i64 = count_query(filter)
            .build_query_scalar()
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("count_properties", e))?;

        let rows: Vec<PropertyRow> = page_query(filter, page)
            .build_query_as()
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_all", e))?;

        let content = rows
            .into_iter()
            .map(Property::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(content, total.max(0) as u64, page))
    }
}

/// Map SQLx errors to `RepositoryError`.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::Database(db_err) => {
            let code = db_err.code().map(|c| c.into_owned()).unwrap_or_default();
            RepositoryError::Storage(format!(
                "database error in {operation} [{code}]: {}",
                db_err.message()
            ))
        }
        sqlx::Error::PoolClosed => {
            RepositoryError::Storage(format!("connection pool closed in {operation}"))
        }
        _ => RepositoryError::Storage(format!("sqlx error in {operation}: {err}")),
    }
}
