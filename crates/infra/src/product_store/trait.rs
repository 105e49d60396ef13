use std::sync::Arc;

use thiserror::Error;

use stockflow_core::ProductId;
use stockflow_products::Product;

/// Store operation error.
///
/// These are **infrastructure errors** (storage, concurrency) as opposed to
/// domain errors (validation, invariants) raised by the decision procedures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Compare-and-swap write found a newer revision (retryable).
    #[error("optimistic concurrency check failed: {0}")]
    Concurrency(String),

    #[error("record not found: {0}")]
    NotFound(String),

    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error("storage backend failed: {0}")]
    Backend(String),
}

/// Key-addressed product store.
///
/// ## Write semantics
///
/// - `update`: full-record overwrite keyed by `product.id`, **last write wins**.
///   The snapshot's `version` is ignored; the store assigns the next revision.
///   Two writers working from the same snapshot silently lose one update.
/// - `update_if_version`: same overwrite, but only if the stored revision still
///   equals `product.version`; otherwise `StoreError::Concurrency`.
///
/// Both return the revision assigned to the written record.
pub trait ProductStore: Send + Sync {
    fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    fn update(&self, product: &Product) -> Result<u64, StoreError>;

    fn update_if_version(&self, product: &Product) -> Result<u64, StoreError>;
}

impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        (**self).find_by_id(id)
    }

    fn update(&self, product: &Product) -> Result<u64, StoreError> {
        (**self).update(product)
    }

    fn update_if_version(&self, product: &Product) -> Result<u64, StoreError> {
        (**self).update_if_version(product)
    }
}
