//! Products domain module.
//!
//! This crate contains the product record, the temporal predicates over it and
//! the disposition rules applied during order processing, implemented purely as
//! deterministic domain logic (no IO, no clock, no storage).

pub mod disposition;
pub mod product;
pub mod temporal;

pub use disposition::{
    Decision, Disposition, DispositionError, Effect, handle_expired_product, handle_seasonal_product,
    notify_delay, process_expirable_product, process_normal_product, process_product,
    process_seasonal_product,
};
pub use product::{Product, ProductCategory};
pub use temporal::{days_to_duration, is_expired, is_in_season, will_delay_exceed_season};
