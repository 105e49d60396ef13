use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockflow_core::{DomainError, Entity, ProductId, Versioned};

/// Product category: decides which disposition procedure applies.
///
/// Stored records carry the category as a string tag (`"NORMAL"`, `"SEASONAL"`,
/// `"EXPIRABLE"`). Tags outside that set are kept verbatim as `Unrecognized` so
/// the record survives a read/write cycle untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProductCategory {
    Normal,
    Seasonal,
    Expirable,
    Unrecognized(String),
}

impl ProductCategory {
    pub fn as_str(&self) -> &str {
        match self {
            ProductCategory::Normal => "NORMAL",
            ProductCategory::Seasonal => "SEASONAL",
            ProductCategory::Expirable => "EXPIRABLE",
            ProductCategory::Unrecognized(tag) => tag,
        }
    }
}

impl From<String> for ProductCategory {
    fn from(value: String) -> Self {
        match value.as_str() {
            "NORMAL" => ProductCategory::Normal,
            "SEASONAL" => ProductCategory::Seasonal,
            "EXPIRABLE" => ProductCategory::Expirable,
            _ => ProductCategory::Unrecognized(value),
        }
    }
}

impl From<&str> for ProductCategory {
    fn from(value: &str) -> Self {
        ProductCategory::from(value.to_string())
    }
}

impl From<ProductCategory> for String {
    fn from(value: ProductCategory) -> Self {
        match value {
            ProductCategory::Unrecognized(tag) => tag,
            other => other.as_str().to_string(),
        }
    }
}

impl core::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product snapshot, as read from and written back to the product store.
///
/// Only the fields relevant to the category carry meaning: season bounds for
/// `Seasonal`, expiry date for `Expirable`. Absent dates are tolerated
/// everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(rename = "type")]
    pub category: ProductCategory,
    /// Units in stock.
    pub available: u32,
    /// Days until restock.
    pub lead_time: u32,
    pub expiry_date: Option<DateTime<Utc>>,
    pub season_start_date: Option<DateTime<Utc>>,
    pub season_end_date: Option<DateTime<Utc>>,
    /// Store revision of this snapshot (optimistic concurrency token).
    #[serde(default)]
    pub version: u64,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>, category: ProductCategory) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            available: 0,
            lead_time: 0,
            expiry_date: None,
            season_start_date: None,
            season_end_date: None,
            version: 0,
        }
    }

    pub fn normal(name: impl Into<String>, available: u32, lead_time: u32) -> Self {
        Self::new(ProductId::new(), name, ProductCategory::Normal)
            .with_available(available)
            .with_lead_time(lead_time)
    }

    pub fn seasonal(
        name: impl Into<String>,
        available: u32,
        lead_time: u32,
        season_start_date: DateTime<Utc>,
        season_end_date: DateTime<Utc>,
    ) -> Self {
        let mut p = Self::new(ProductId::new(), name, ProductCategory::Seasonal)
            .with_available(available)
            .with_lead_time(lead_time);
        p.season_start_date = Some(season_start_date);
        p.season_end_date = Some(season_end_date);
        p
    }

    pub fn expirable(
        name: impl Into<String>,
        available: u32,
        lead_time: u32,
        expiry_date: DateTime<Utc>,
    ) -> Self {
        let mut p = Self::new(ProductId::new(), name, ProductCategory::Expirable)
            .with_available(available)
            .with_lead_time(lead_time);
        p.expiry_date = Some(expiry_date);
        p
    }

    pub fn with_available(mut self, available: u32) -> Self {
        self.available = available;
        self
    }

    pub fn with_lead_time(mut self, lead_time: u32) -> Self {
        self.lead_time = lead_time;
        self
    }

    pub fn in_stock(&self) -> bool {
        self.available > 0
    }

    /// Copy with one unit taken from stock. Stock never goes below zero.
    pub fn decremented(&self) -> Self {
        let mut next = self.clone();
        next.available = self.available.saturating_sub(1);
        next
    }

    /// Copy with stock zeroed out (product no longer supplied).
    pub fn unavailable(&self) -> Self {
        let mut next = self.clone();
        next.available = 0;
        next
    }

    /// Validate a record before it enters the store.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        if let (Some(start), Some(end)) = (self.season_start_date, self.season_end_date) {
            if start > end {
                return Err(DomainError::validation("season start must not be after season end"));
            }
        }

        Ok(())
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Versioned for Product {
    fn version(&self) -> u64 {
        self.version
    }
}
