//! Notification port.
//!
//! The disposition engine talks to the outside world through three typed
//! operations. Sinks deliver best-effort and are never retried by the caller:
//! an `Err` is propagated as-is, a successful return says nothing about
//! downstream delivery.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::notification::Notification;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// Sink state was poisoned by a panicking thread.
    #[error("notification sink lock poisoned")]
    Poisoned,

    /// The underlying channel rejected the message.
    #[error("notification transport failed: {0}")]
    Transport(String),
}

/// Fire-and-forget notification channel.
pub trait NotificationSink: Send + Sync {
    fn send_delay_notification(&self, lead_time_days: u32, product_name: &str) -> Result<(), NotifyError>;

    fn send_out_of_stock_notification(&self, product_name: &str) -> Result<(), NotifyError>;

    fn send_expiration_notification(
        &self,
        product_name: &str,
        expiry_date: DateTime<Utc>,
    ) -> Result<(), NotifyError>;

    /// Route a typed notification to the matching operation.
    fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        match notification {
            Notification::Delay {
                lead_time_days,
                product_name,
            } => self.send_delay_notification(*lead_time_days, product_name),
            Notification::OutOfStock { product_name } => self.send_out_of_stock_notification(product_name),
            Notification::Expiration {
                product_name,
                expiry_date,
            } => self.send_expiration_notification(product_name, *expiry_date),
        }
    }
}

impl<S> NotificationSink for Arc<S>
where
    S: NotificationSink + ?Sized,
{
    fn send_delay_notification(&self, lead_time_days: u32, product_name: &str) -> Result<(), NotifyError> {
        (**self).send_delay_notification(lead_time_days, product_name)
    }

    fn send_out_of_stock_notification(&self, product_name: &str) -> Result<(), NotifyError> {
        (**self).send_out_of_stock_notification(product_name)
    }

    fn send_expiration_notification(
        &self,
        product_name: &str,
        expiry_date: DateTime<Utc>,
    ) -> Result<(), NotifyError> {
        (**self).send_expiration_notification(product_name, expiry_date)
    }
}
