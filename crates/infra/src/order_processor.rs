//! Order pass: run every product of an order through the disposition service.
//!
//! Products are processed one at a time, in order-line order, each distinct
//! product once. There is no cross-product transaction: the first failure
//! aborts the pass and leaves the products already processed committed.

use thiserror::Error;

use stockflow_core::{OrderId, ProductId};
use stockflow_notifications::NotificationSink;
use stockflow_products::Disposition;

use crate::clock::Clock;
use crate::order_store::OrderStore;
use crate::product_service::{DispositionService, ProcessError};
use crate::product_store::{ProductStore, StoreError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    #[error("order {order_id} references unknown product {product_id}")]
    ProductNotFound { order_id: OrderId, product_id: ProductId },

    #[error("store lookup failed: {0}")]
    Store(#[from] StoreError),

    /// Processing a product failed; products before it in the order stay processed.
    #[error("processing product {product_id} failed: {source}")]
    Process {
        product_id: ProductId,
        processed: usize,
        #[source]
        source: ProcessError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductReport {
    pub product_id: ProductId,
    pub disposition: Disposition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderReport {
    pub order_id: OrderId,
    pub products: Vec<ProductReport>,
}

pub struct OrderProcessor<O, P, N, C> {
    orders: O,
    service: DispositionService<P, N, C>,
}

impl<O, P, N, C> OrderProcessor<O, P, N, C> {
    pub fn new(orders: O, service: DispositionService<P, N, C>) -> Self {
        Self { orders, service }
    }

    pub fn service(&self) -> &DispositionService<P, N, C> {
        &self.service
    }

    pub fn into_parts(self) -> (O, DispositionService<P, N, C>) {
        (self.orders, self.service)
    }
}

impl<O, P, N, C> OrderProcessor<O, P, N, C>
where
    O: OrderStore,
    P: ProductStore,
    N: NotificationSink,
    C: Clock,
{
    /// Resolve the order and process each of its distinct products in turn.
    ///
    /// Each product is read fresh from the store right before it is processed.
    /// A missing order or product is a caller precondition failure.
    pub fn process_order(&self, order_id: OrderId) -> Result<OrderReport, OrderError> {
        let order = self
            .orders
            .find_order(order_id)?
            .ok_or(OrderError::OrderNotFound(order_id))?;

        let product_ids = order.distinct_product_ids();
        tracing::info!(%order_id, products = product_ids.len(), "processing order");

        let mut products = Vec::with_capacity(product_ids.len());
        for product_id in product_ids {
            let snapshot = self
                .service
                .products()
                .find_by_id(product_id)?
                .ok_or(OrderError::ProductNotFound { order_id, product_id })?;

            let processed = self.service.process_product(&snapshot).map_err(|source| {
                tracing::error!(%order_id, %product_id, "order pass aborted: {source}");
                OrderError::Process {
                    product_id,
                    processed: products.len(),
                    source,
                }
            })?;

            products.push(ProductReport {
                product_id,
                disposition: processed.disposition,
            });
        }

        Ok(OrderReport { order_id, products })
    }
}
