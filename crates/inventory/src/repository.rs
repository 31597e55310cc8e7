//! Persistence port for inventory items.

use std::sync::Arc;

use thiserror::Error;

use flowora_core::ItemId;

use crate::item::Item;

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository operation error.
///
/// These are **infrastructure errors** (storage unavailable, unreadable rows)
/// as opposed to domain errors. A missing item is never an error here.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("storage failure in {operation}: {message}")]
    Storage {
        operation: &'static str,
        message: String,
    },

    #[error("stored item could not be decoded: {0}")]
    Corrupt(String),

    #[error("repository lock poisoned")]
    Poisoned,
}

impl RepositoryError {
    pub fn storage(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Storage {
            operation,
            message: message.into(),
        }
    }
}

/// Persistence contract used by the application layer.
///
/// Implementations decide the storage technology (in-memory, Postgres, ...);
/// domain logic only ever sees this trait.
///
/// - `find_by_id` returns `Ok(None)` for unknown ids.
/// - `find_all` returns items ordered by `id`.
/// - `save` is an upsert by `id` and returns the stored representation.
/// - `delete_by_id` is idempotent.
///
/// No versioning or optimistic locking: concurrent writers to the same id are
/// last-write-wins.
#[async_trait::async_trait]
pub trait InventoryRepository: Send + Sync {
    async fn find_by_id(&self, id: &ItemId) -> RepositoryResult<Option<Item>>;

    async fn find_all(&self) -> RepositoryResult<Vec<Item>>;

    async fn save(&self, item: Item) -> RepositoryResult<Item>;

    async fn delete_by_id(&self, id: &ItemId) -> RepositoryResult<()>;

    async fn exists_by_id(&self, id: &ItemId) -> RepositoryResult<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }
}

#[async_trait::async_trait]
impl<R> InventoryRepository for Arc<R>
where
    R: InventoryRepository + ?Sized,
{
    async fn find_by_id(&self, id: &ItemId) -> RepositoryResult<Option<Item>> {
        (**self).find_by_id(id).await
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Item>> {
        (**self).find_all().await
    }

    async fn save(&self, item: Item) -> RepositoryResult<Item> {
        (**self).save(item).await
    }

    async fn delete_by_id(&self, id: &ItemId) -> RepositoryResult<()> {
        (**self).delete_by_id(id).await
    }

    async fn exists_by_id(&self, id: &ItemId) -> RepositoryResult<bool> {
        (**self).exists_by_id(id).await
    }
}
