use std::sync::Arc;

use anyhow::Context;

use flowora_infra::{AppConfig, PostgresInventoryRepository, StoreConfig};
use flowora_inventory::{InMemoryInventoryRepository, InventoryRepository, InventoryService};

/// Repository handle shared by every request, whatever the backing store.
pub type SharedInventoryRepository = Arc<dyn InventoryRepository>;

/// Services shared across request handlers.
#[derive(Clone)]
pub struct AppServices {
    inventory: InventoryService<SharedInventoryRepository>,
}

impl AppServices {
    pub fn new(repository: SharedInventoryRepository) -> Self {
        Self {
            inventory: InventoryService::new(repository),
        }
    }

    /// Services over a fresh, empty in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryInventoryRepository::new()))
    }

    pub fn inventory(&self) -> &InventoryService<SharedInventoryRepository> {
        &self.inventory
    }
}

/// Wire services according to `config.store`.
///
/// With `USE_PERSISTENT_STORES=true` this connects to Postgres and creates the
/// `items` table if needed; any failure aborts startup.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    match &config.store {
        StoreConfig::InMemory => {
            tracing::info!(store = "in_memory", "inventory store selected");
            Ok(AppServices::in_memory())
        }
        StoreConfig::Postgres { database_url } => {
            let repository = PostgresInventoryRepository::connect(database_url)
                .await
                .context("failed to connect to postgres")?;
            repository
                .ensure_schema()
                .await
                .context("failed to prepare items schema")?;

            tracing::info!(store = "postgres", "inventory store selected");
            Ok(AppServices::new(Arc::new(repository)))
        }
    }
}
