use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use flowora_core::{DomainError, DomainResult, ItemId};

use crate::aggregate::InventoryItem;

/// Full inventory item record (the unit of persistence).
///
/// Only the identity and classification fields mirrored by [`InventoryItem`] are
/// mandatory. Every other field is optional, and `None` is distinct from an
/// empty value: an unset `tags` is not the same as `Some(vec![])`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub sku: String,
    pub name: String,
    pub category: String,
    pub industry: Option<String>,
    pub sub_category: Option<String>,
    pub uom: String,
    pub status: String,
    pub tracking_type: Option<String>,
    pub hsn_sac: Option<String>,

    pub reorder_min_qty: Option<i32>,
    pub reorder_qty: Option<i32>,
    pub shelf_life_days: Option<i32>,
    pub batch_type: Option<String>,
    pub importance: Option<String>,
    pub types: Option<BTreeSet<String>>,

    pub internal_manufacturing: Option<bool>,
    pub purchase: Option<bool>,

    pub std_cost: Option<Decimal>,
    pub purchase_cost: Option<Decimal>,
    pub sale_price: Option<Decimal>,
    pub gst: Option<Decimal>,
    pub mrp: Option<Decimal>,

    pub description: Option<String>,
    pub internal_notes: Option<String>,
    pub lead_time_days: Option<i32>,
    pub tags: Option<Vec<String>>,
    pub safety_stock_by_location: Option<BTreeMap<String, i32>>,
    pub default_store_id: Option<String>,
}

impl Item {
    /// Full record for an aggregate, with every optional field unset.
    pub fn from_aggregate(aggregate: InventoryItem) -> Self {
        Self {
            id: aggregate.id().clone(),
            sku: aggregate.sku().to_string(),
            name: aggregate.name().to_string(),
            category: aggregate.category().to_string(),
            industry: None,
            sub_category: None,
            uom: aggregate.uom().to_string(),
            status: aggregate.status().to_string(),
            tracking_type: None,
            hsn_sac: None,
            reorder_min_qty: None,
            reorder_qty: None,
            shelf_life_days: None,
            batch_type: None,
            importance: None,
            types: None,
            internal_manufacturing: None,
            purchase: None,
            std_cost: None,
            purchase_cost: None,
            sale_price: None,
            gst: None,
            mrp: None,
            description: None,
            internal_notes: None,
            lead_time_days: None,
            tags: None,
            safety_stock_by_location: None,
            default_store_id: None,
        }
    }

    /// Project this record onto the reduced aggregate view.
    ///
    /// Fails if a mandatory field is blank, which is also the check `validate`
    /// starts with.
    pub fn aggregate(&self) -> DomainResult<InventoryItem> {
        InventoryItem::builder(self.id.clone())
            .sku(self.sku.clone())
            .name(self.name.clone())
            .category(self.category.clone())
            .uom(self.uom.clone())
            .status(self.status.clone())
            .build()
    }

    /// Check every invariant a persisted item must satisfy.
    pub fn validate(&self) -> DomainResult<()> {
        self.aggregate()?;

        let quantities = [
            ("reorderMinQty", self.reorder_min_qty),
            ("reorderQty", self.reorder_qty),
            ("shelfLifeDays", self.shelf_life_days),
            ("leadTimeDays", self.lead_time_days),
        ];
        for (field, value) in quantities {
            if value.is_some_and(|v| v < 0) {
                return Err(DomainError::validation(format!("{field} cannot be negative")));
            }
        }

        Ok(())
    }
}
