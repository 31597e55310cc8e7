pub mod inventory;
pub mod system;
