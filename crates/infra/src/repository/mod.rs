//! Storage adapters for the inventory repository port.
//!
//! The in-memory adapter lives next to the port in `flowora-inventory`; this
//! module holds the persistent ones.

pub mod postgres;

pub use postgres::PostgresInventoryRepository;
