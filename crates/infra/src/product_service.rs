//! Disposition execution (application-level orchestration).
//!
//! The decision procedures in `stockflow-products` are pure: they return a
//! [`Decision`] describing the new record and the notification to send. This
//! module performs those effects against the injected store and sink.
//!
//! ```text
//! Product snapshot
//!   ↓
//! 1. Read the clock once
//!   ↓
//! 2. Decide (pure, per category)
//!   ↓
//! 3. Perform effects in order: Persist → store, Notify → sink
//! ```
//!
//! Effects are not retried and nothing is rolled back: a failing write or send
//! returns the error with every earlier effect of the same decision already
//! performed.

use thiserror::Error;

use stockflow_core::ProductId;
use stockflow_notifications::{NotificationSink, NotifyError};
use stockflow_products::{Decision, Disposition, DispositionError, Effect, Product};

use crate::clock::{Clock, SystemClock};
use crate::config::{ConcurrencyMode, EngineConfig};
use crate::product_store::{ProductStore, StoreError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProcessError {
    /// The decision could not be made (precondition on the record failed).
    #[error(transparent)]
    Disposition(#[from] DispositionError),

    /// The record was modified since the snapshot was read (retryable).
    #[error("conflicting update: {0}")]
    Conflict(String),

    #[error("product store failed: {0}")]
    Store(StoreError),

    #[error("notification failed: {0}")]
    Notify(#[from] NotifyError),
}

impl ProcessError {
    /// Whether re-reading the record and processing again may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProcessError::Conflict(_))
    }
}

impl From<StoreError> for ProcessError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Concurrency(msg) => ProcessError::Conflict(msg),
            other => ProcessError::Store(other),
        }
    }
}

/// Result of processing one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Processed {
    pub disposition: Disposition,
    /// Record after the pass, carrying the revision assigned by the store when
    /// it was written.
    pub product: Product,
}

/// Applies disposition decisions to products held in a [`ProductStore`] and
/// sends the resulting notifications through a [`NotificationSink`].
///
/// ## Concurrency
///
/// With `ConcurrencyMode::LastWriteWins` (default) two passes working from the
/// same snapshot both succeed and one decrement is lost. With
/// `ConcurrencyMode::Optimistic` the second write fails with
/// [`ProcessError::Conflict`]; callers re-read the record and retry.
#[derive(Debug)]
pub struct DispositionService<P, N, C = SystemClock> {
    products: P,
    notifier: N,
    clock: C,
    concurrency: ConcurrencyMode,
}

impl<P, N> DispositionService<P, N, SystemClock> {
    pub fn new(products: P, notifier: N) -> Self {
        Self {
            products,
            notifier,
            clock: SystemClock,
            concurrency: ConcurrencyMode::default(),
        }
    }

    pub fn from_config(products: P, notifier: N, config: &EngineConfig) -> Self {
        Self::new(products, notifier).with_concurrency(config.concurrency)
    }
}

impl<P, N, C> DispositionService<P, N, C> {
    pub fn with_clock<C2>(self, clock: C2) -> DispositionService<P, N, C2> {
        DispositionService {
            products: self.products,
            notifier: self.notifier,
            clock,
            concurrency: self.concurrency,
        }
    }

    pub fn with_concurrency(mut self, concurrency: ConcurrencyMode) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn concurrency(&self) -> ConcurrencyMode {
        self.concurrency
    }

    pub fn products(&self) -> &P {
        &self.products
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }
}

impl<P, N, C> DispositionService<P, N, C>
where
    P: ProductStore,
    N: NotificationSink,
    C: Clock,
{
    /// Dispatch on category and apply the matching procedure.
    pub fn process_product(&self, product: &Product) -> Result<Processed, ProcessError> {
        let now = self.clock.now();
        let decision = stockflow_products::process_product(product, now)?;
        self.execute(product, decision)
    }

    pub fn process_normal_product(&self, product: &Product) -> Result<Processed, ProcessError> {
        self.execute(product, stockflow_products::process_normal_product(product))
    }

    pub fn process_seasonal_product(&self, product: &Product) -> Result<Processed, ProcessError> {
        let now = self.clock.now();
        self.execute(product, stockflow_products::process_seasonal_product(product, now))
    }

    pub fn handle_seasonal_product(&self, product: &Product) -> Result<Processed, ProcessError> {
        let now = self.clock.now();
        self.execute(product, stockflow_products::handle_seasonal_product(product, now))
    }

    pub fn process_expirable_product(&self, product: &Product) -> Result<Processed, ProcessError> {
        let now = self.clock.now();
        let decision = stockflow_products::process_expirable_product(product, now)?;
        self.execute(product, decision)
    }

    pub fn handle_expired_product(&self, product: &Product) -> Result<Processed, ProcessError> {
        let now = self.clock.now();
        let decision = stockflow_products::handle_expired_product(product, now)?;
        self.execute(product, decision)
    }

    /// Record `lead_time` on the product and send a delay notification.
    pub fn notify_delay(&self, lead_time: u32, product: &Product) -> Result<Processed, ProcessError> {
        self.execute(product, stockflow_products::notify_delay(lead_time, product))
    }

    fn execute(&self, product: &Product, decision: Decision) -> Result<Processed, ProcessError> {
        let Decision { disposition, effects } = decision;
        let mut current = product.clone();

        for effect in effects {
            match effect {
                Effect::Persist(record) => {
                    let version = self.persist(&record)?;
                    current = record;
                    current.version = version;
                }
                Effect::Notify(notification) => {
                    self.notifier.send(&notification)?;
                    tracing::info!(
                        product_id = %product.id,
                        notification_type = notification.notification_type(),
                        "notification sent"
                    );
                }
            }
        }

        log_disposition(product.id, &disposition);

        Ok(Processed {
            disposition,
            product: current,
        })
    }

    fn persist(&self, record: &Product) -> Result<u64, ProcessError> {
        let written = match self.concurrency {
            ConcurrencyMode::LastWriteWins => self.products.update(record),
            ConcurrencyMode::Optimistic => self.products.update_if_version(record),
        };

        written.map_err(|e| {
            if let StoreError::Concurrency(msg) = &e {
                tracing::warn!(product_id = %record.id, "stale product snapshot: {msg}");
            }
            ProcessError::from(e)
        })
    }
}

fn log_disposition(product_id: ProductId, disposition: &Disposition) {
    match disposition {
        Disposition::Fulfilled { remaining } => {
            tracing::debug!(%product_id, remaining, "fulfilled from stock");
        }
        Disposition::Delayed { lead_time_days } => {
            tracing::debug!(%product_id, lead_time_days, "restock delayed");
        }
        Disposition::SeasonOverrun => {
            tracing::debug!(%product_id, "restock lands after season end; marked unavailable");
        }
        Disposition::OutOfSeason => {
            tracing::debug!(%product_id, "out of season");
        }
        Disposition::Expired => {
            tracing::debug!(%product_id, "expired; marked unavailable");
        }
        Disposition::Unfulfilled => {
            tracing::debug!(%product_id, "no stock and no lead time; nothing to do");
        }
        Disposition::UnhandledCategory { tag } => {
            tracing::warn!(%product_id, category = %tag, "no disposition for product category");
        }
    }
}
