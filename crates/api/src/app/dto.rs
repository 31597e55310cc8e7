use serde::{Deserialize, Serialize};

use flowora_inventory::{CreateItem, Item, ItemPatch};

/// Body of `POST /api/inventory`: an optional `id` plus every item field.
#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub fields: ItemPatch,
}

impl From<CreateItemRequest> for CreateItem {
    fn from(req: CreateItemRequest) -> Self {
        CreateItem {
            id: req.id,
            fields: req.fields,
        }
    }
}

/// Body of `GET /api/inventory`.
///
/// Only `items` is populated; batches, stock levels, locations and movements
/// are always empty arrays so clients can rely on the envelope shape.
#[derive(Debug, Serialize)]
pub struct InventoryResponse {
    pub items: Vec<Item>,
    pub batches: Vec<serde_json::Value>,
    pub stock: Vec<serde_json::Value>,
    pub locations: Vec<serde_json::Value>,
    pub movements: Vec<serde_json::Value>,
}

impl InventoryResponse {
    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            items,
            batches: Vec::new(),
            stock: Vec::new(),
            locations: Vec::new(),
            movements: Vec::new(),
        }
    }
}
