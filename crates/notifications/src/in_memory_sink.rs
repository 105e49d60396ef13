//! In-memory notification sink for tests/dev.

use std::sync::{Mutex, mpsc};

use chrono::{DateTime, Utc};

use crate::notification::Notification;
use crate::sink::{NotificationSink, NotifyError};
use crate::subscription::Subscription;

/// Recording sink with subscriber fan-out.
///
/// - No IO / no async
/// - Keeps every notification in send order (`sent()`)
/// - Best-effort fan-out to live subscribers; dead subscribers are dropped
#[derive(Debug, Default)]
pub struct InMemoryNotificationSink {
    sent: Mutex<Vec<Notification>>,
    subscribers: Mutex<Vec<mpsc::Sender<Notification>>>,
}

impl InMemoryNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything sent so far.
    pub fn sent(&self) -> Vec<Notification> {
        match self.sent.lock() {
            Ok(sent) => sent.clone(),
            Err(_) => vec![],
        }
    }

    pub fn clear(&self) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.clear();
        }
    }

    pub fn subscribe(&self) -> Subscription<Notification> {
        let (tx, rx) = mpsc::channel();

        // A poisoned lock still hands out a subscription; it just never receives.
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }

        Subscription::new(rx)
    }

    fn record(&self, notification: Notification) -> Result<(), NotifyError> {
        {
            let mut subs = self.subscribers.lock().map_err(|_| NotifyError::Poisoned)?;
            subs.retain(|tx| tx.send(notification.clone()).is_ok());
        }

        let mut sent = self.sent.lock().map_err(|_| NotifyError::Poisoned)?;
        sent.push(notification);
        Ok(())
    }
}

impl NotificationSink for InMemoryNotificationSink {
    fn send_delay_notification(&self, lead_time_days: u32, product_name: &str) -> Result<(), NotifyError> {
        self.record(Notification::delay(lead_time_days, product_name))
    }

    fn send_out_of_stock_notification(&self, product_name: &str) -> Result<(), NotifyError> {
        self.record(Notification::out_of_stock(product_name))
    }

    fn send_expiration_notification(
        &self,
        product_name: &str,
        expiry_date: DateTime<Utc>,
    ) -> Result<(), NotifyError> {
        self.record(Notification::expiration(product_name, expiry_date))
    }
}
