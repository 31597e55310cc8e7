//! Default-value policy for newly constructed aggregates.

use crate::aggregate::InventoryItem;

/// Domain service applying default-value policy on the creation path.
///
/// Pure: no IO, no clock, no randomness. Defaults are strictly additive and
/// never overwrite a value the caller provided. Every field of
/// [`InventoryItem`] is mandatory and caller-supplied, so there is currently
/// nothing left to fill and the aggregate passes through unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InventoryDomainService;

impl InventoryDomainService {
    pub fn new() -> Self {
        Self
    }

    pub fn ensure_defaults(&self, item: InventoryItem) -> InventoryItem {
        item
    }
}
