//! Order lookup boundary.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use stockflow_core::OrderId;
use stockflow_orders::Order;

use crate::product_store::StoreError;

/// Resolves an order and its product lines.
pub trait OrderStore: Send + Sync {
    fn find_order(&self, id: OrderId) -> Result<Option<Order>, StoreError>;
}

impl<S> OrderStore for Arc<S>
where
    S: OrderStore + ?Sized,
{
    fn find_order(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        (**self).find_order(id)
    }
}

/// In-memory order store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, order: Order) {
        if let Ok(mut orders) = self.orders.write() {
            orders.insert(order.id_typed(), order);
        }
    }
}

impl OrderStore for InMemoryOrderStore {
    fn find_order(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        let orders = self
            .orders
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;

        Ok(orders.get(&id).cloned())
    }
}
