//! Product record store boundary.
//!
//! The store is the system of record for products: the disposition service
//! reads snapshots from it and writes full records back. No partial-field
//! updates exist.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryProductStore;
pub use r#trait::{ProductStore, StoreError};
