use flowora_core::{DomainError, DomainResult, ItemId};

/// Aggregate root: InventoryItem.
///
/// The reduced view of an item that domain policy operates on: identity plus the
/// mandatory classification fields. It is a projection of [`crate::Item`], not a
/// separately stored entity.
///
/// Values are immutable. Construction goes through [`InventoryItemBuilder`],
/// which is the only place the non-blank invariants are checked; "changing" an
/// aggregate means `to_builder()` + `build()` into a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryItem {
    id: ItemId,
    sku: String,
    name: String,
    category: String,
    uom: String,
    status: String,
}

impl InventoryItem {
    pub fn builder(id: ItemId) -> InventoryItemBuilder {
        InventoryItemBuilder::new(id)
    }

    /// Copy this aggregate into a builder (for producing a modified value).
    pub fn to_builder(&self) -> InventoryItemBuilder {
        InventoryItemBuilder {
            id: self.id.clone(),
            sku: Some(self.sku.clone()),
            name: Some(self.name.clone()),
            category: Some(self.category.clone()),
            uom: Some(self.uom.clone()),
            status: Some(self.status.clone()),
        }
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn uom(&self) -> &str {
        &self.uom
    }

    pub fn status(&self) -> &str {
        &self.status
    }
}

/// Builder for [`InventoryItem`]; `build()` enforces the aggregate invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryItemBuilder {
    id: ItemId,
    sku: Option<String>,
    name: Option<String>,
    category: Option<String>,
    uom: Option<String>,
    status: Option<String>,
}

impl InventoryItemBuilder {
    pub fn new(id: ItemId) -> Self {
        Self {
            id,
            sku: None,
            name: None,
            category: None,
            uom: None,
            status: None,
        }
    }

    pub fn sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn uom(mut self, uom: impl Into<String>) -> Self {
        self.uom = Some(uom.into());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn build(self) -> DomainResult<InventoryItem> {
        Ok(InventoryItem {
            id: self.id,
            sku: required("sku", self.sku)?,
            name: required("name", self.name)?,
            category: required("category", self.category)?,
            uom: required("uom", self.uom)?,
            status: required("status", self.status)?,
        })
    }
}

fn required(field: &str, value: Option<String>) -> DomainResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(DomainError::blank_field(field)),
    }
}
