use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message emitted by the disposition engine.
///
/// Notifications are facts about one product at one point of an order pass;
/// they carry the product name verbatim as it was on the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    /// Product is out of stock and will be restocked in `lead_time_days`.
    Delay {
        lead_time_days: u32,
        product_name: String,
    },
    /// Product cannot be supplied (season over or not running).
    OutOfStock { product_name: String },
    /// Product is past its expiry date.
    Expiration {
        product_name: String,
        expiry_date: DateTime<Utc>,
    },
}

impl Notification {
    pub fn delay(lead_time_days: u32, product_name: impl Into<String>) -> Self {
        Self::Delay {
            lead_time_days,
            product_name: product_name.into(),
        }
    }

    pub fn out_of_stock(product_name: impl Into<String>) -> Self {
        Self::OutOfStock {
            product_name: product_name.into(),
        }
    }

    pub fn expiration(product_name: impl Into<String>, expiry_date: DateTime<Utc>) -> Self {
        Self::Expiration {
            product_name: product_name.into(),
            expiry_date,
        }
    }

    /// Stable notification type identifier (e.g. "product.delay").
    pub fn notification_type(&self) -> &'static str {
        match self {
            Notification::Delay { .. } => "product.delay",
            Notification::OutOfStock { .. } => "product.out_of_stock",
            Notification::Expiration { .. } => "product.expiration",
        }
    }

    pub fn product_name(&self) -> &str {
        match self {
            Notification::Delay { product_name, .. }
            | Notification::OutOfStock { product_name }
            | Notification::Expiration { product_name, .. } => product_name,
        }
    }
}
