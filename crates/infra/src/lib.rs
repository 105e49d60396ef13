//! Infrastructure layer: stores, clock, configuration and the services that
//! run the disposition rules against them.

pub mod clock;
pub mod config;
pub mod order_processor;
pub mod order_store;
pub mod product_service;
pub mod product_store;


pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConcurrencyMode, ConfigError, EngineConfig};
pub use order_processor::{OrderError, OrderProcessor, OrderReport, ProductReport};
pub use order_store::{InMemoryOrderStore, OrderStore};
pub use product_service::{DispositionService, ProcessError, Processed};
pub use product_store::{InMemoryProductStore, ProductStore, StoreError};
