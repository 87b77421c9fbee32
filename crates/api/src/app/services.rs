use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use arep_infra::{
    InMemoryPropertyRepository, PostgresPropertyRepository, PropertyRepository, PropertyService,
};

use crate::config::StorageConfig;

/// Repository behind the service; chosen once at startup.
pub type DynPropertyRepository = Arc<dyn PropertyRepository>;

/// Shared, request-independent application state.
#[derive(Clone)]
pub struct AppServices {
    pub properties: Arc<PropertyService<DynPropertyRepository>>,
}

impl AppServices {
    pub fn new(repository: DynPropertyRepository) -> Self {
        Self {
            properties: Arc::new(PropertyService::new(repository)),
        }
    }
}

pub async fn build_services(storage: &StorageConfig) -> anyhow::Result<AppServices> {
    match storage {
        StorageConfig::InMemory => Ok(build_in_memory_services()),
        StorageConfig::Postgres {
            database_url,
            max_connections,
        } => build_persistent_services(database_url, *max_connections).await,
    }
}

fn build_in_memory_services() -> AppServices {
    tracing::warn!("using in-memory property storage; data is lost on restart");
    AppServices::new(Arc::new(InMemoryPropertyRepository::new()))
}

async fn build_persistent_services(
    database_url: &str,
    max_connections: u32,
) -> anyhow::Result<AppServices> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .context("failed to connect to Postgres")?;

    tracing::info!(max_connections, "connected to Postgres property store");
    Ok(AppServices::new(Arc::new(PostgresPropertyRepository::new(pool))))
}
