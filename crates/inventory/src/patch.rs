//! Partial-update (merge) semantics.
//!
//! An [`ItemPatch`] behaves like a JSON merge patch over the item shape, except
//! that `null` never clears a field: absent and `null` both mean "leave as is".
//! The patch has no `id` field, so identity cannot be changed by a merge.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use flowora_core::DomainResult;

use crate::item::Item;

/// Incoming partial representation of an item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub industry: Option<String>,
    pub sub_category: Option<String>,
    pub uom: Option<String>,
    pub status: Option<String>,
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

impl ItemPatch {
    /// Merge this patch over `current`, producing a new item.
    ///
    /// Present fields overwrite, absent fields are kept. The merged item is
    /// re-validated: a patch that blanks a mandatory field (or sets a negative
    /// quantity) is rejected and `current` is left untouched.
    pub fn apply(self, current: &Item) -> DomainResult<Item> {
        let mut next = current.clone();

        set(&mut next.sku, self.sku);
        set(&mut next.name, self.name);
        set(&mut next.category, self.category);
        set(&mut next.uom, self.uom);
        set(&mut next.status, self.status);

        set_opt(&mut next.industry, self.industry);
        set_opt(&mut next.sub_category, self.sub_category);
        set_opt(&mut next.tracking_type, self.tracking_type);
        set_opt(&mut next.hsn_sac, self.hsn_sac);
        set_opt(&mut next.reorder_min_qty, self.reorder_min_qty);
        set_opt(&mut next.reorder_qty, self.reorder_qty);
        set_opt(&mut next.shelf_life_days, self.shelf_life_days);
        set_opt(&mut next.batch_type, self.batch_type);
        set_opt(&mut next.importance, self.importance);
        set_opt(&mut next.types, self.types);
        set_opt(&mut next.internal_manufacturing, self.internal_manufacturing);
        set_opt(&mut next.purchase, self.purchase);
        set_opt(&mut next.std_cost, self.std_cost);
        set_opt(&mut next.purchase_cost, self.purchase_cost);
        set_opt(&mut next.sale_price, self.sale_price);
        set_opt(&mut next.gst, self.gst);
        set_opt(&mut next.mrp, self.mrp);
        set_opt(&mut next.description, self.description);
        set_opt(&mut next.internal_notes, self.internal_notes);
        set_opt(&mut next.lead_time_days, self.lead_time_days);
        set_opt(&mut next.tags, self.tags);
        set_opt(&mut next.safety_stock_by_location, self.safety_stock_by_location);
        set_opt(&mut next.default_store_id, self.default_store_id);

        next.validate()?;
        Ok(next)
    }

    /// The same patch with the aggregate-owned fields removed.
    ///
    /// Used on creation, where those fields come from the aggregate after
    /// domain policy has run.
    pub fn into_details(self) -> Self {
        Self {
            sku: None,
            name: None,
            category: None,
            uom: None,
            status: None,
            ..self
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn set<T>(slot: &mut T, incoming: Option<T>) {
    if let Some(value) = incoming {
        *slot = value;
    }
}

fn set_opt<T>(slot: &mut Option<T>, incoming: Option<T>) {
    if incoming.is_some() {
        *slot = incoming;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowora_core::{DomainError, ItemId};
    use crate::aggregate::InventoryItem;

    fn stored() -> Item {
        let aggregate = InventoryItem::builder(ItemId::parse("X").unwrap())
            .sku("ABC-1")
            .name("Widget")
            .category("Hardware")
            .uom("EA")
            .status("ACTIVE")
            .build()
            .unwrap();
        let mut item = Item::from_aggregate(aggregate);
        item.industry = Some("Manufacturing".to_string());
        item.reorder_qty = Some(40);
        item.tags = Some(vec!["fast".to_string(), "metal".to_string()]);
        item.safety_stock_by_location = Some(BTreeMap::from([("WH-1".to_string(), 5)]));
        item.mrp = Some(Decimal::new(2500, 2));
        item
    }

    #[test]
    fn status_only_patch_changes_only_status() {
        let current = stored();
        let patch = ItemPatch {
            status: Some("INACTIVE".to_string()),
            ..Default::default()
        };

        let merged = patch.apply(&current).unwrap();

        let mut expected = current.clone();
        expected.status = "INACTIVE".to_string();
        assert_eq!(merged, expected);
    }

    #[test]
    fn empty_patch_is_identity() {
        let current = stored();
        assert!(ItemPatch::default().is_empty());
        assert_eq!(ItemPatch::default().apply(&current).unwrap(), current);
    }

    #[test]
    fn present_collections_replace_wholesale() {
        let current = stored();
        let patch = ItemPatch {
            tags: Some(vec![]),
            safety_stock_by_location: Some(BTreeMap::from([("WH-2".to_string(), 9)])),
            ..Default::default()
        };

        let merged = patch.apply(&current).unwrap();
        assert_eq!(merged.tags, Some(vec![]));
        assert_eq!(
            merged.safety_stock_by_location,
            Some(BTreeMap::from([("WH-2".to_string(), 9)]))
        );
        assert_eq!(merged.industry, current.industry);
    }

    #[test]
    fn blanking_a_mandatory_field_is_rejected() {
        let current = stored();
        let patch = ItemPatch {
            name: Some("   ".to_string()),
            ..Default::default()
        };

        assert_eq!(patch.apply(&current), Err(DomainError::blank_field("name")));
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let patch = ItemPatch {
            reorder_min_qty: Some(-3),
            ..Default::default()
        };
        assert!(matches!(patch.apply(&stored()), Err(DomainError::Validation(_))));
    }

    #[test]
    fn id_in_payload_is_ignored() {
        let current = stored();
        let patch: ItemPatch =
            serde_json::from_str(r#"{"id":"OTHER","name":"Gadget","tags":null}"#).unwrap();

        let merged = patch.apply(&current).unwrap();
        assert_eq!(merged.id, current.id);
        assert_eq!(merged.name, "Gadget");
        assert_eq!(merged.tags, current.tags);
    }

    #[test]
    fn into_details_drops_aggregate_fields() {
        let patch = ItemPatch {
            sku: Some("S".to_string()),
            status: Some("ACTIVE".to_string()),
            description: Some("steel".to_string()),
            ..Default::default()
        };

        let details = patch.into_details();
        assert!(details.sku.is_none());
        assert!(details.status.is_none());
        assert_eq!(details.description.as_deref(), Some("steel"));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: a name-only patch yields the stored item with just the name replaced.
            #[test]
            fn merge_preserves_unspecified_fields(name in "[A-Za-z][A-Za-z0-9 ]{0,40}") {
                let current = stored();
                let patch = ItemPatch { name: Some(name.clone()), ..Default::default() };

                let merged = patch.apply(&current).unwrap();

                let mut expected = current.clone();
                expected.name = name;
                prop_assert_eq!(merged, expected);
            }

            /// Property: no payload can move the item to a different id.
            #[test]
            fn merge_never_changes_id(
                other_id in "[A-Z]{1,8}-[0-9]{1,6}",
                status in proptest::option::of("[A-Z]{1,10}"),
                reorder_qty in proptest::option::of(0i32..10_000),
            ) {
                let current = stored();
                let body = serde_json::json!({
                    "id": other_id,
                    "status": status,
                    "reorderQty": reorder_qty,
                });
                let patch: ItemPatch = serde_json::from_value(body).unwrap();

                let merged = patch.apply(&current).unwrap();
                prop_assert_eq!(merged.id, current.id);
            }
        }
    }
}
