//! `stockflow-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the product,
//! order and infrastructure crates (no IO, no clocks, no storage).

pub mod entity;
pub mod error;
pub mod id;
pub mod version;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{OrderId, ProductId};
pub use version::{ExpectedVersion, Versioned};
