//! In-memory inventory repository for tests/dev.

use std::collections::BTreeMap;
use std::sync::RwLock;

use flowora_core::ItemId;

use crate::item::Item;
use crate::repository::{InventoryRepository, RepositoryError, RepositoryResult};

/// In-memory adapter for [`InventoryRepository`].
///
/// - No IO; every call completes immediately
/// - Keyed by `ItemId` in a `BTreeMap`, so `find_all` is ordered by id
/// - Writers serialize on the lock (last write wins)
#[derive(Debug, Default)]
pub struct InMemoryInventoryRepository {
    items: RwLock<BTreeMap<ItemId, Item>>,
}

impl InMemoryInventoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> RepositoryResult<usize> {
        let items = self.items.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(items.len())
    }

    pub fn is_empty(&self) -> RepositoryResult<bool> {
        Ok(self.len()? == 0)
    }
}

#[async_trait::async_trait]
impl InventoryRepository for InMemoryInventoryRepository {
    async fn find_by_id(&self, id: &ItemId) -> RepositoryResult<Option<Item>> {
        let items = self.items.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(items.get(id).cloned())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Item>> {
        let items = self.items.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(items.values().cloned().collect())
    }

    async fn save(&self, item: Item) -> RepositoryResult<Item> {
        let mut items = self.items.write().map_err(|_| RepositoryError::Poisoned)?;
        items.insert(item.id.clone(), item.clone());
        Ok(item)
    }

    async fn delete_by_id(&self, id: &ItemId) -> RepositoryResult<()> {
        let mut items = self.items.write().map_err(|_| RepositoryError::Poisoned)?;
        items.remove(id);
        Ok(())
    }

    async fn exists_by_id(&self, id: &ItemId) -> RepositoryResult<bool> {
        let items = self.items.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(items.contains_key(id))
    }
}
