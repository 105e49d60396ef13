//! Orders domain module.
//!
//! An order is only a list of product references here; the order pass walks
//! it and hands each product to the disposition engine.

pub mod order;

pub use order::{Order, OrderLine};
