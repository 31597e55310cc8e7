//! Application service coordinating inventory use cases.

use thiserror::Error;
use tracing::instrument;

use flowora_core::{DomainError, ItemId};

use crate::aggregate::InventoryItem;
use crate::item::Item;
use crate::patch::ItemPatch;
use crate::policy::InventoryDomainService;
use crate::repository::{InventoryRepository, RepositoryError};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Use-case level error, as surfaced to a transport layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),

    /// Storage failures propagate unmodified; nothing is retried.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => {
                ServiceError::Validation(msg)
            }
            DomainError::Conflict(msg) => ServiceError::Conflict(msg),
        }
    }
}

/// Command: CreateItem.
///
/// `id` is optional; when absent or blank a `SKU-` identifier is assigned.
/// `fields` carries the rest of the payload, mandatory fields included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateItem {
    pub id: Option<String>,
    pub fields: ItemPatch,
}

impl CreateItem {
    /// Build the aggregate for this command under the given id.
    pub fn to_domain(&self, id: ItemId) -> Result<InventoryItem, DomainError> {
        let mut builder = InventoryItem::builder(id);
        if let Some(sku) = &self.fields.sku {
            builder = builder.sku(sku.clone());
        }
        if let Some(name) = &self.fields.name {
            builder = builder.name(name.clone());
        }
        if let Some(category) = &self.fields.category {
            builder = builder.category(category.clone());
        }
        if let Some(uom) = &self.fields.uom {
            builder = builder.uom(uom.clone());
        }
        if let Some(status) = &self.fields.status {
            builder = builder.status(status.clone());
        }
        builder.build()
    }

    fn requested_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.trim().is_empty())
    }
}

/// Inventory use cases over any [`InventoryRepository`].
///
/// `list` returns every stored item in one response. There is no filtering
/// or pagination, which bounds how large the catalogue can usefully grow.
#[derive(Debug, Clone)]
pub struct InventoryService<R> {
    repository: R,
    domain: InventoryDomainService,
}

impl<R> InventoryService<R>
where
    R: InventoryRepository,
{
    pub fn new(repository: R) -> Self {
        Self::with_domain_service(repository, InventoryDomainService::new())
    }

    pub fn with_domain_service(repository: R, domain: InventoryDomainService) -> Self {
        Self { repository, domain }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Create an item: assign id, build + default the aggregate, validate, persist.
    ///
    /// Every check runs before the repository is written to. A caller-supplied
    /// id that already exists is a conflict (`save` itself would upsert).
    #[instrument(skip(self, cmd), fields(sku = ?cmd.fields.sku), err)]
    pub async fn create(&self, cmd: CreateItem) -> ServiceResult<Item> {
        let id = ItemId::assign(cmd.requested_id())?;

        let aggregate = self.domain.ensure_defaults(cmd.to_domain(id.clone())?);
        let item = cmd
            .fields
            .clone()
            .into_details()
            .apply(&Item::from_aggregate(aggregate))?;

        if cmd.requested_id().is_some() && self.repository.exists_by_id(&id).await? {
            return Err(DomainError::conflict(format!("item {id} already exists")).into());
        }

        let saved = self.repository.save(item).await?;
        tracing::info!(item_id = %saved.id, "inventory item created");
        Ok(saved)
    }

    #[instrument(skip(self), err)]
    pub async fn list(&self) -> ServiceResult<Vec<Item>> {
        Ok(self.repository.find_all().await?)
    }

    /// Look up one item; unknown (or blank) ids yield `Ok(None)`.
    #[instrument(skip(self), err)]
    pub async fn get(&self, id: &str) -> ServiceResult<Option<Item>> {
        match ItemId::parse(id) {
            Ok(id) => Ok(self.repository.find_by_id(&id).await?),
            Err(_) => Ok(None),
        }
    }

    /// Merge `patch` over the stored item and persist the result.
    #[instrument(skip(self, patch), err)]
    pub async fn update(&self, id: &str, patch: ItemPatch) -> ServiceResult<Item> {
        let id = ItemId::parse(id).map_err(|_| ServiceError::NotFound)?;
        let current = self
            .repository
            .find_by_id(&id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        if patch.is_empty() {
            return Ok(current);
        }

        let merged = patch.apply(&current)?;
        let saved = self.repository.save(merged).await?;
        tracing::info!(item_id = %saved.id, "inventory item updated");
        Ok(saved)
    }

    /// Delete an existing item; unknown ids are `NotFound`.
    #[instrument(skip(self), err)]
    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        let id = ItemId::parse(id).map_err(|_| ServiceError::NotFound)?;
        if !self.repository.exists_by_id(&id).await? {
            return Err(ServiceError::NotFound);
        }

        self.repository.delete_by_id(&id).await?;
        tracing::info!(item_id = %id, "inventory item deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;

    use super::*;
    use crate::in_memory::InMemoryInventoryRepository;
    use flowora_core::ITEM_ID_PREFIX;

    fn service() -> InventoryService<Arc<InMemoryInventoryRepository>> {
        InventoryService::new(Arc::new(InMemoryInventoryRepository::new()))
    }

    fn widget_fields() -> ItemPatch {
        ItemPatch {
            sku: Some("ABC-1".to_string()),
            name: Some("Widget".to_string()),
            category: Some("Hardware".to_string()),
            uom: Some("EA".to_string()),
            status: Some("ACTIVE".to_string()),
            ..Default::default()
        }
    }

    fn create_widget(id: Option<&str>) -> CreateItem {
        CreateItem {
            id: id.map(str::to_string),
            fields: widget_fields(),
        }
    }

    #[tokio::test]
    async fn create_without_id_assigns_prefixed_id_and_echoes_fields() {
        let svc = service();

        let created = svc.create(create_widget(None)).await.unwrap();

        assert!(created.id.as_str().starts_with(ITEM_ID_PREFIX));
        assert!(created.id.as_str().len() > ITEM_ID_PREFIX.len());
        assert_eq!(created.sku, "ABC-1");
        assert_eq!(created.name, "Widget");
        assert_eq!(created.category, "Hardware");
        assert_eq!(created.uom, "EA");
        assert_eq!(created.status, "ACTIVE");
        assert_eq!(svc.get(created.id.as_str()).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn create_with_blank_id_assigns_one() {
        let created = service().create(create_widget(Some("  "))).await.unwrap();
        assert!(created.id.as_str().starts_with(ITEM_ID_PREFIX));
    }

    #[tokio::test]
    async fn create_keeps_optional_fields() {
        let svc = service();
        let cmd = CreateItem {
            id: Some("X".to_string()),
            fields: ItemPatch {
                sale_price: Some(Decimal::new(4999, 2)),
                tags: Some(vec!["new".to_string()]),
                purchase: Some(true),
                ..widget_fields()
            },
        };

        let created = svc.create(cmd).await.unwrap();
        assert_eq!(created.id.as_str(), "X");
        assert_eq!(created.sale_price, Some(Decimal::new(4999, 2)));
        assert_eq!(created.tags, Some(vec!["new".to_string()]));
        assert_eq!(created.purchase, Some(true));
        assert_eq!(created.description, None);
    }

    #[tokio::test]
    async fn create_with_blank_sku_is_rejected_without_writing() {
        let svc = service();
        let cmd = CreateItem {
            id: None,
            fields: ItemPatch {
                sku: Some("".to_string()),
                ..widget_fields()
            },
        };

        let err = svc.create(cmd).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(svc.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_with_missing_status_is_rejected() {
        let svc = service();
        let cmd = CreateItem {
            id: Some("X".to_string()),
            fields: ItemPatch {
                status: None,
                ..widget_fields()
            },
        };

        assert!(matches!(svc.create(cmd).await, Err(ServiceError::Validation(_))));
        assert!(svc.repository().is_empty().unwrap());
    }

    #[tokio::test]
    async fn create_with_unaddressable_id_is_rejected_without_writing() {
        let svc = service();

        for raw in ["a\nb", "a/b"] {
            let err = svc.create(create_widget(Some(raw))).await.unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)), "{raw:?}");
        }

        assert!(svc.list().await.unwrap().is_empty());
        assert!(svc.create(create_widget(Some("café"))).await.is_ok());
    }

    #[test]
    fn domain_errors_map_to_service_errors() {
        assert!(matches!(
            ServiceError::from(DomainError::invalid_id("bad")),
            ServiceError::Validation(msg) if msg == "bad"
        ));
        assert!(matches!(
            ServiceError::from(DomainError::conflict("taken")),
            ServiceError::Conflict(msg) if msg == "taken"
        ));
    }

    #[tokio::test]
    async fn create_with_taken_id_is_a_conflict() {
        let svc = service();
        svc.create(create_widget(Some("X"))).await.unwrap();

        let mut second = create_widget(Some("X"));
        second.fields.name = Some("Other".to_string());

        assert!(matches!(svc.create(second).await, Err(ServiceError::Conflict(_))));
        assert_eq!(svc.get("X").await.unwrap().unwrap().name, "Widget");
    }

    #[tokio::test]
    async fn update_changes_only_patched_fields() {
        let svc = service();
        let created = svc.create(create_widget(Some("X"))).await.unwrap();

        let patch = ItemPatch {
            status: Some("INACTIVE".to_string()),
            ..Default::default()
        };
        let updated = svc.update("X", patch).await.unwrap();

        let mut expected = created;
        expected.status = "INACTIVE".to_string();
        assert_eq!(updated, expected);
        assert_eq!(svc.get("X").await.unwrap(), Some(expected));
    }

    #[tokio::test]
    async fn update_missing_is_not_found_and_creates_nothing() {
        let svc = service();
        let patch = ItemPatch {
            name: Some("Ghost".to_string()),
            ..Default::default()
        };

        assert!(matches!(svc.update("missing", patch).await, Err(ServiceError::NotFound)));
        assert!(svc.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_that_blanks_a_mandatory_field_is_rejected() {
        let svc = service();
        let created = svc.create(create_widget(Some("X"))).await.unwrap();

        let patch = ItemPatch {
            uom: Some(" ".to_string()),
            ..Default::default()
        };

        assert!(matches!(svc.update("X", patch).await, Err(ServiceError::Validation(_))));
        assert_eq!(svc.get("X").await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn empty_patch_returns_stored_item() {
        let svc = service();
        let created = svc.create(create_widget(Some("X"))).await.unwrap();

        assert_eq!(svc.update("X", ItemPatch::default()).await.unwrap(), created);
    }

    #[tokio::test]
    async fn delete_existing_then_missing() {
        let svc = service();
        svc.create(create_widget(Some("X"))).await.unwrap();

        svc.delete("X").await.unwrap();
        assert_eq!(svc.get("X").await.unwrap(), None);
        assert!(matches!(svc.delete("X").await, Err(ServiceError::NotFound)));
    }

    #[tokio::test]
    async fn list_on_empty_store_is_empty() {
        assert!(service().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_blank_id_is_none() {
        assert_eq!(service().get("").await.unwrap(), None);
    }
}
