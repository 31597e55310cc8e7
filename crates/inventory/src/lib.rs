//! Inventory domain module.
//!
//! Layers, leaves first:
//! - `item`: the full persisted record (`Item`)
//! - `aggregate`: the reduced, invariant-bearing `InventoryItem`
//! - `patch`: partial-update (merge) semantics
//! - `policy`: default-value policy applied on creation
//! - `repository`: the persistence port + an in-memory adapter
//! - `service`: application use cases (create/list/get/update/delete)
//!
//! Nothing here performs IO except through the repository port.

pub mod aggregate;
pub mod in_memory;
pub mod item;
pub mod patch;
pub mod policy;
pub mod repository;
pub mod service;

pub use aggregate::{InventoryItem, InventoryItemBuilder};
pub use in_memory::InMemoryInventoryRepository;
pub use item::Item;
pub use patch::ItemPatch;
pub use policy::InventoryDomainService;
pub use repository::{InventoryRepository, RepositoryError, RepositoryResult};
pub use service::{CreateItem, InventoryService, ServiceError, ServiceResult};
