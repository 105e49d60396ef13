use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use stockflow_core::{Entity, OrderId, ProductId};

/// Order line: association between an order and a product.
///
/// The association carries no quantity; each line stands for one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub line_no: usize,
    pub product_id: ProductId,
}

/// Customer order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    lines: Vec<OrderLine>,
}

impl Order {
    pub fn new(id: OrderId) -> Self {
        Self { id, lines: Vec::new() }
    }

    /// Build an order with one line per product, in the given order.
    pub fn with_products(id: OrderId, products: impl IntoIterator<Item = ProductId>) -> Self {
        let mut order = Self::new(id);
        for product_id in products {
            order.add_line(product_id);
        }
        order
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Append a line; returns its 1-based line number.
    pub fn add_line(&mut self, product_id: ProductId) -> usize {
        let line_no = self.lines.len() + 1;
        self.lines.push(OrderLine { line_no, product_id });
        line_no
    }

    /// Each referenced product once, in order of first appearance.
    pub fn distinct_product_ids(&self) -> Vec<ProductId> {
        let mut seen = HashSet::with_capacity(self.lines.len());
        self.lines
            .iter()
            .map(|l| l.product_id)
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
