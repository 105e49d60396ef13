use std::collections::HashMap;
use std::sync::RwLock;

use stockflow_core::{ExpectedVersion, ProductId, Versioned};
use stockflow_products::Product;

use super::r#trait::{ProductStore, StoreError};

/// In-memory product store.
///
/// Intended for tests/dev. Revisions start at 1 on insert and grow by one per
/// write.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    records: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) a record after validation; returns the stored copy.
    pub fn insert(&self, mut product: Product) -> Result<Product, StoreError> {
        product
            .validate()
            .map_err(|e| StoreError::InvalidRecord(e.to_string()))?;

        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;

        product.version = records.get(&product.id).map(|p| p.version + 1).unwrap_or(1);
        records.insert(product.id, product.clone());
        Ok(product)
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn write(&self, product: &Product, expected: ExpectedVersion) -> Result<u64, StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;

        let stored = records
            .get(&product.id)
            .ok_or_else(|| StoreError::NotFound(format!("product {}", product.id)))?;

        let current = stored.version;
        expected
            .check(current)
            .map_err(|e| StoreError::Concurrency(format!("product {}: {e}", product.id)))?;

        let mut next = product.clone();
        next.version = current + 1;
        records.insert(next.id, next);
        Ok(current + 1)
    }
}

impl ProductStore for InMemoryProductStore {
    fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;

        Ok(records.get(&id).cloned())
    }

    fn update(&self, product: &Product) -> Result<u64, StoreError> {
        self.write(product, ExpectedVersion::Any)
    }

    fn update_if_version(&self, product: &Product) -> Result<u64, StoreError> {
        self.write(product, ExpectedVersion::Exact(product.version()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_assigns_first_revision() {
        let store = InMemoryProductStore::new();
        let stored = store.insert(Product::normal("USB Hub", 3, 0)).unwrap();
        assert_eq!(stored.version, 1);
        assert_eq!(store.find_by_id(stored.id).unwrap(), Some(stored));
    }

    #[test]
    fn insert_rejects_invalid_record() {
        let store = InMemoryProductStore::new();
        let err = store.insert(Product::normal("", 3, 0)).unwrap_err();
        assert!(matches!(err, StoreError::InvalidRecord(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn update_overwrites_whole_record_and_bumps_revision() {
        let store = InMemoryProductStore::new();
        let stored = store.insert(Product::normal("USB Hub", 3, 0)).unwrap();

        let mut changed = stored.clone();
        changed.available = 1;
        changed.lead_time = 9;
        assert_eq!(store.update(&changed).unwrap(), 2);

        let read = store.find_by_id(stored.id).unwrap().unwrap();
        assert_eq!(read.available, 1);
        assert_eq!(read.lead_time, 9);
        assert_eq!(read.version, 2);
    }

    #[test]
    fn update_ignores_stale_snapshot_version() {
        let store = InMemoryProductStore::new();
        let stored = store.insert(Product::normal("USB Hub", 3, 0)).unwrap();

        store.update(&stored).unwrap();
        // Same (now stale) snapshot still wins.
        assert_eq!(store.update(&stored).unwrap(), 3);
    }

    #[test]
    fn update_if_version_rejects_stale_snapshot() {
        let store = InMemoryProductStore::new();
        let stored = store.insert(Product::normal("USB Hub", 3, 0)).unwrap();

        store.update_if_version(&stored).unwrap();
        let err = store.update_if_version(&stored).unwrap_err();
        match err {
            StoreError::Concurrency(msg) => {
                assert!(msg.starts_with(&format!("product {}", stored.id)));
                assert!(msg.contains("expected: Exact(1), actual: 2"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn update_of_unknown_record_is_not_found() {
        let store = InMemoryProductStore::new();
        let err = store.update(&Product::normal("Ghost", 1, 0)).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
